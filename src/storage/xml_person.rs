use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Field, FieldValue, Person, Tag, ValidationError};

/// Errors that can occur when converting stored data back into the domain.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// A required value is absent from the stored record.
    #[error("Person's {0} field is missing!")]
    MissingField(&'static str),

    /// A stored value fails its field's format check.
    #[error("invalid stored {field}: {source}")]
    InvalidField {
        /// The field holding the offending value.
        field: &'static str,
        /// Why the value was rejected.
        #[source]
        source: ValidationError,
    },

    /// The stored data contains the same person twice.
    #[error("stored data contains duplicate persons")]
    DuplicatePerson,

    /// The document is not well-formed, or does not have the expected shape.
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// A person as stored in the XML data file.
///
/// Values and privacy flags are kept as separate elements. Every privacy flag
/// is optional so that files written before flags existed still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct XmlPerson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    name_is_private: Option<bool>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    phone_is_private: Option<bool>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_is_private: Option<bool>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    address_is_private: Option<bool>,
    #[serde(default)]
    favourite: Option<String>,
    #[serde(default)]
    remark: Option<String>,
    #[serde(default)]
    remark_is_private: Option<bool>,
    #[serde(default)]
    tagged: Vec<String>,
}

impl From<&Person> for XmlPerson {
    fn from(person: &Person) -> Self {
        Self {
            name: Some(person.name.as_str().to_string()),
            name_is_private: Some(person.name.is_private()),
            phone: Some(person.phone.as_str().to_string()),
            phone_is_private: Some(person.phone.is_private()),
            email: Some(person.email.as_str().to_string()),
            email_is_private: Some(person.email.is_private()),
            address: Some(person.address.as_str().to_string()),
            address_is_private: Some(person.address.is_private()),
            favourite: Some(person.favourite.to_string()),
            remark: Some(person.remark.as_str().to_string()),
            remark_is_private: Some(person.remark.is_private()),
            tagged: person.tags.iter().map(|tag| tag.as_str().to_string()).collect(),
        }
    }
}

impl TryFrom<XmlPerson> for Person {
    type Error = ConversionError;

    fn try_from(xml: XmlPerson) -> Result<Self, Self::Error> {
        let tags = xml
            .tagged
            .into_iter()
            .map(|name| Tag::new(name).map_err(|source| invalid("Tag", source)))
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self {
            name: decode_field(xml.name, xml.name_is_private)?,
            phone: decode_field(xml.phone, xml.phone_is_private)?,
            email: decode_field(xml.email, xml.email_is_private)?,
            address: decode_field(xml.address, xml.address_is_private)?,
            // Remarks may legitimately be empty, and empty elements can come
            // back as absent.
            remark: decode_field(
                Some(xml.remark.unwrap_or_default()),
                xml.remark_is_private,
            )?,
            favourite: decode_favourite(xml.favourite.as_deref()),
            tags,
        })
    }
}

/// Rebuilds a field from its stored value and optional privacy flag.
///
/// An absent flag decodes as `false`.
fn decode_field<T: FieldValue>(
    value: Option<String>,
    private: Option<bool>,
) -> Result<Field<T>, ConversionError> {
    let value = value.ok_or(ConversionError::MissingField(T::LABEL))?;
    let value = T::new(value).map_err(|source| invalid(T::LABEL, source))?;
    Ok(Field::new(value, private.unwrap_or_default()))
}

/// Anything other than a case-insensitive `"true"` is not a favourite.
fn decode_favourite(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

const fn invalid(field: &'static str, source: ValidationError) -> ConversionError {
    ConversionError::InvalidField { field, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{alice, benson};

    fn all_private(mut person: Person) -> Person {
        person.name = person.name.with_privacy(true);
        person.phone = person.phone.with_privacy(true);
        person.email = person.email.with_privacy(true);
        person.address = person.address.with_privacy(true);
        person.remark = person.remark.with_privacy(true);
        person
    }

    fn assert_same_privacy(left: &Person, right: &Person) {
        assert_eq!(left.name.is_private(), right.name.is_private());
        assert_eq!(left.phone.is_private(), right.phone.is_private());
        assert_eq!(left.email.is_private(), right.email.is_private());
        assert_eq!(left.address.is_private(), right.address.is_private());
        assert_eq!(left.remark.is_private(), right.remark.is_private());
    }

    #[test]
    fn round_trip_preserves_values_privacy_and_tags() {
        for person in [alice(), benson(), all_private(benson())] {
            let restored = Person::try_from(XmlPerson::from(&person)).unwrap();
            assert_eq!(restored, person);
            assert_eq!(restored.tags, person.tags);
            assert_same_privacy(&restored, &person);
        }
    }

    #[test]
    fn serialize_copies_flags_and_stringifies_favourite() {
        let mut person = benson();
        person.phone = person.phone.with_privacy(true);

        let xml = XmlPerson::from(&person);

        assert_eq!(xml.phone.as_deref(), Some("98765432"));
        assert_eq!(xml.phone_is_private, Some(true));
        assert_eq!(xml.name_is_private, Some(false));
        assert_eq!(xml.favourite.as_deref(), Some("true"));
        assert_eq!(xml.tagged, vec!["friends".to_string(), "owesMoney".to_string()]);
    }

    #[test]
    fn missing_privacy_flags_default_to_public() {
        let legacy = XmlPerson {
            name_is_private: None,
            phone_is_private: None,
            email_is_private: None,
            address_is_private: None,
            remark_is_private: None,
            ..XmlPerson::from(&all_private(alice()))
        };

        let person = Person::try_from(legacy).unwrap();

        assert_same_privacy(&person, &alice());
        assert!(!person.phone.is_private());
    }

    #[test]
    fn invalid_value_names_the_field() {
        let xml = XmlPerson {
            phone: Some("9312 1534".to_string()),
            ..XmlPerson::from(&alice())
        };

        let error = Person::try_from(xml).unwrap_err();

        assert!(matches!(
            error,
            ConversionError::InvalidField { field: "Phone", .. }
        ));
    }

    #[test]
    fn invalid_tag_names_the_field() {
        let xml = XmlPerson {
            tagged: vec!["not a tag".to_string()],
            ..XmlPerson::from(&alice())
        };

        let error = Person::try_from(xml).unwrap_err();

        assert!(matches!(error, ConversionError::InvalidField { field: "Tag", .. }));
    }

    #[test]
    fn missing_value_names_the_field() {
        let xml = XmlPerson {
            email: None,
            ..XmlPerson::from(&alice())
        };

        let error = Person::try_from(xml).unwrap_err();

        assert!(matches!(error, ConversionError::MissingField("Email")));
        assert_eq!(error.to_string(), "Person's Email field is missing!");
    }

    #[test]
    fn missing_remark_and_favourite_take_defaults() {
        let xml = XmlPerson {
            remark: None,
            favourite: None,
            ..XmlPerson::from(&benson())
        };

        let person = Person::try_from(xml).unwrap();

        assert!(person.remark.value().is_empty());
        assert!(!person.favourite);
    }

    #[test]
    fn favourite_parsing_is_lenient() {
        assert!(decode_favourite(Some("TRUE")));
        assert!(decode_favourite(Some("true")));
        assert!(!decode_favourite(Some("yes")));
        assert!(!decode_favourite(None));
    }
}
