use std::{collections::BTreeSet, fmt};

use crate::domain::{Address, Email, Field, Name, Phone, Remark, Tag};

/// A contact in the address book.
///
/// Every field is validated on construction, so a `Person` is always
/// well-formed. Two persons are equal when their values, favourite flag and
/// tags match; privacy flags do not take part in the comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// Full name.
    pub name: Field<Name>,
    /// Phone number.
    pub phone: Field<Phone>,
    /// Email address.
    pub email: Field<Email>,
    /// Postal address.
    pub address: Field<Address>,
    /// Free-form remark.
    pub remark: Field<Remark>,
    /// Whether the person is marked as a favourite.
    pub favourite: bool,
    /// Tags associated with the person.
    pub tags: BTreeSet<Tag>,
}

impl Person {
    /// Creates a public, non-favourite person with no remark and no tags.
    #[must_use]
    pub fn new(name: Name, phone: Phone, email: Email, address: Address) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            address: address.into(),
            remark: Remark::empty().into(),
            favourite: false,
            tags: BTreeSet::new(),
        }
    }

    /// Returns `true` if any whitespace-separated word of the name equals one
    /// of `keywords`, ignoring case.
    #[must_use]
    pub fn name_matches_any<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        self.name.as_str().split_whitespace().any(|word| {
            keywords
                .iter()
                .any(|keyword| word.eq_ignore_ascii_case(keyword.as_ref()))
        })
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} Phone: {} Email: {} Address: {}",
            self.name,
            if self.favourite { " ★" } else { "" },
            self.phone,
            self.email,
            self.address
        )?;
        if self.remark.is_private() || !self.remark.value().is_empty() {
            write!(f, " Remark: {}", self.remark)?;
        }
        if !self.tags.is_empty() {
            write!(f, " Tags: ")?;
            for tag in &self.tags {
                write!(f, "{tag}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn alice() -> Person {
        let mut person = Person::new(
            "Alice Pauline".parse().unwrap(),
            "94351253".parse().unwrap(),
            "alice@example.com".parse().unwrap(),
            "123, Jurong West Ave 6, #08-111".parse().unwrap(),
        );
        person.tags.insert("friends".parse().unwrap());
        person
    }

    pub(crate) fn benson() -> Person {
        let mut person = Person::new(
            "Benson Meier".parse().unwrap(),
            "98765432".parse().unwrap(),
            "johnd@example.com".parse().unwrap(),
            "311, Clementi Ave 2, #02-25".parse().unwrap(),
        );
        person.remark = Field::parse("Likes to swim").unwrap();
        person.favourite = true;
        person.tags.insert("owesMoney".parse().unwrap());
        person.tags.insert("friends".parse().unwrap());
        person
    }

    #[test]
    fn display_lists_every_field() {
        assert_eq!(
            benson().to_string(),
            "Benson Meier ★ Phone: 98765432 Email: johnd@example.com Address: 311, Clementi \
             Ave 2, #02-25 Remark: Likes to swim Tags: [friends][owesMoney]"
        );
    }

    #[test]
    fn display_hides_private_fields() {
        let mut person = alice();
        person.phone = person.phone.with_privacy(true);
        person.address = person.address.with_privacy(true);

        let shown = person.to_string();
        assert!(shown.contains("Phone: <Private Phone>"));
        assert!(shown.contains("Address: <Private Address>"));
        assert!(!shown.contains("94351253"));
        assert!(shown.contains("alice@example.com"));
    }

    #[test]
    fn equality_ignores_privacy_but_not_values() {
        let mut private = alice();
        private.email = private.email.with_privacy(true);
        assert_eq!(private, alice());

        let mut other = alice();
        other.favourite = true;
        assert_ne!(other, alice());
    }

    #[test]
    fn name_matching_is_whole_word_and_case_insensitive() {
        let person = alice();
        assert!(person.name_matches_any(&["pauline"]));
        assert!(person.name_matches_any(&["bob", "ALICE"]));
        assert!(!person.name_matches_any(&["Ali"]));
    }
}
