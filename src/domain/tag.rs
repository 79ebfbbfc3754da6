use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

use crate::domain::ValidationError;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:alnum:]]+$").expect("tag pattern must compile"));

/// A label attached to a person, such as `friends` or `colleagues`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(String);

impl Tag {
    /// Describes the values a tag accepts.
    pub const CONSTRAINTS: &'static str = "Tags names should be alphanumeric";

    /// Creates a new tag.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `name` is empty or contains anything
    /// other than alphanumeric characters.
    pub fn new(name: String) -> Result<Self, ValidationError> {
        if Self::is_valid(&name) {
            Ok(Self(name))
        } else {
            Err(ValidationError::new("Tag", Self::CONSTRAINTS))
        }
    }

    /// Returns `true` if `name` is a valid tag name.
    #[must_use]
    pub fn is_valid(name: &str) -> bool {
        TAG_PATTERN.is_match(name)
    }

    /// Returns the tag name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Tag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}
