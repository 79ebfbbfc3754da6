use std::{fmt, num::NonZeroUsize, str::FromStr};

/// A one-based position in the displayed person list.
///
/// Users always see and type one-based positions; the zero-based form is only
/// used to address the underlying storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index(NonZeroUsize);

impl Index {
    /// Creates an index from a one-based position.
    ///
    /// Returns `None` if `position` is zero.
    #[must_use]
    pub const fn from_one_based(position: usize) -> Option<Self> {
        match NonZeroUsize::new(position) {
            Some(position) => Some(Self(position)),
            None => None,
        }
    }

    /// Creates an index from a zero-based offset.
    #[must_use]
    pub const fn from_zero_based(offset: usize) -> Self {
        match NonZeroUsize::new(offset + 1) {
            Some(position) => Self(position),
            None => unreachable!(),
        }
    }

    /// The one-based position.
    #[must_use]
    pub const fn one_based(self) -> usize {
        self.0.get()
    }

    /// The zero-based offset.
    #[must_use]
    pub const fn zero_based(self) -> usize {
        self.0.get() - 1
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when text is not a positive integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Index is not a non-zero unsigned integer: '{0}'")]
pub struct InvalidIndexError(String);

impl FromStr for Index {
    type Err = InvalidIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(InvalidIndexError(s.to_string()));
        }
        trimmed
            .parse::<NonZeroUsize>()
            .map(Self)
            .map_err(|_| InvalidIndexError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_integers() {
        let index: Index = "3".parse().unwrap();
        assert_eq!(index.one_based(), 3);
        assert_eq!(index.zero_based(), 2);
        assert_eq!(Index::from_zero_based(2), index);
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        assert!("0".parse::<Index>().is_err());
        assert!("-5".parse::<Index>().is_err());
        assert!("+5".parse::<Index>().is_err());
        assert!("1 some random string".parse::<Index>().is_err());
        assert!("".parse::<Index>().is_err());
    }
}
