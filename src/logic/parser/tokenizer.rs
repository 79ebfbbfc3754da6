//! Splits command arguments on their prefixes.
//!
//! In `1 n/Amy Bee t/friend t/colleague`, `1` is the preamble and each prefix
//! owns the text up to the next recognised prefix. A prefix only counts when
//! it starts the arguments or follows whitespace, so `e/amy@a/b.com` is a
//! single email value.

use std::collections::HashMap;

/// An argument prefix such as `n/`.
pub(super) type Prefix = &'static str;

pub(super) const NAME: Prefix = "n/";
pub(super) const PHONE: Prefix = "p/";
pub(super) const EMAIL: Prefix = "e/";
pub(super) const ADDRESS: Prefix = "a/";
pub(super) const REMARK: Prefix = "r/";
pub(super) const TAG: Prefix = "t/";
pub(super) const PASSWORD: Prefix = "pw/";

/// Tokenized arguments: the preamble plus every value of every prefix, in
/// input order.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct ArgumentMultimap {
    preamble: String,
    values: HashMap<Prefix, Vec<String>>,
}

impl ArgumentMultimap {
    /// The text before the first prefix, trimmed.
    pub(super) fn preamble(&self) -> &str {
        &self.preamble
    }

    /// The last value given for `prefix`.
    pub(super) fn value(&self, prefix: Prefix) -> Option<&str> {
        self.values
            .get(prefix)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Every value given for `prefix`, in input order.
    pub(super) fn all_values(&self, prefix: Prefix) -> &[String] {
        self.values.get(prefix).map_or(&[], Vec::as_slice)
    }

    /// Whether every one of `prefixes` has at least one value.
    pub(super) fn has_all(&self, prefixes: &[Prefix]) -> bool {
        prefixes.iter().all(|prefix| self.values.contains_key(prefix))
    }
}

pub(super) fn tokenize(args: &str, prefixes: &[Prefix]) -> ArgumentMultimap {
    // Padding makes a prefix at the very start look like any other.
    let padded = format!(" {args}");

    let mut positions: Vec<(usize, Prefix)> = prefixes
        .iter()
        .flat_map(|&prefix| {
            let needle = format!(" {prefix}");
            padded
                .match_indices(&needle)
                .map(move |(at, _)| (at + 1, prefix))
                .collect::<Vec<_>>()
        })
        .collect();
    positions.sort_unstable();

    let preamble_end = positions.first().map_or(padded.len(), |&(at, _)| at);
    let mut multimap = ArgumentMultimap {
        preamble: padded[..preamble_end].trim().to_string(),
        values: HashMap::new(),
    };

    for (i, &(start, prefix)) in positions.iter().enumerate() {
        let end = positions.get(i + 1).map_or(padded.len(), |&(next, _)| next);
        let value = padded[start + prefix.len()..end].trim().to_string();
        multimap.values.entry(prefix).or_default().push(value);
    }

    multimap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_prefixes_is_all_preamble() {
        let args = tokenize("  some text  ", &[NAME, PHONE]);
        assert_eq!(args.preamble(), "some text");
        assert_eq!(args.value(NAME), None);
        assert!(args.all_values(PHONE).is_empty());
    }

    #[test]
    fn splits_on_prefixes() {
        let args = tokenize("1 n/Amy Bee p/123 t/a t/b", &[NAME, PHONE, TAG]);

        assert_eq!(args.preamble(), "1");
        assert_eq!(args.value(NAME), Some("Amy Bee"));
        assert_eq!(args.value(PHONE), Some("123"));
        assert_eq!(args.all_values(TAG), ["a", "b"]);
    }

    #[test]
    fn repeated_prefix_keeps_last_value() {
        let args = tokenize("p/111 p/222", &[PHONE]);
        assert_eq!(args.value(PHONE), Some("222"));
        assert_eq!(args.all_values(PHONE), ["111", "222"]);
    }

    #[test]
    fn prefix_must_follow_whitespace() {
        let args = tokenize("e/amy@a/b.com", &[EMAIL, ADDRESS]);
        assert_eq!(args.value(EMAIL), Some("amy@a/b.com"));
        assert_eq!(args.value(ADDRESS), None);
    }

    #[test]
    fn empty_value_is_recorded() {
        let args = tokenize("1 t/", &[TAG]);
        assert_eq!(args.all_values(TAG), [""]);
        assert!(args.has_all(&[TAG]));
        assert!(!args.has_all(&[TAG, NAME]));
    }

    #[test]
    fn unknown_prefixes_stay_in_the_preamble() {
        let args = tokenize("1 i/ string", &[NAME]);
        assert_eq!(args.preamble(), "1 i/ string");
    }
}
