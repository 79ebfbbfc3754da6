use serde::{Deserialize, Serialize};

use super::{ConversionError, xml_person::XmlPerson};
use crate::domain::{AddressBook, AddressBookError, Person};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// The root element of the XML data file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename = "addressbook")]
pub(crate) struct XmlAddressBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locked: Option<bool>,
    #[serde(default)]
    persons: Vec<XmlPerson>,
}

impl XmlAddressBook {
    /// Renders the document, including the XML declaration.
    pub(crate) fn to_xml(&self) -> Result<String, ConversionError> {
        let mut xml = format!("{XML_DECLARATION}\n");
        let mut serializer = quick_xml::se::Serializer::new(&mut xml);
        serializer.indent(' ', 2);
        self.serialize(serializer)
            .map_err(|e| ConversionError::Malformed(e.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }

    /// Parses a document.
    pub(crate) fn from_xml(xml: &str) -> Result<Self, ConversionError> {
        quick_xml::de::from_str(xml).map_err(|e| ConversionError::Malformed(e.to_string()))
    }
}

impl From<&AddressBook> for XmlAddressBook {
    fn from(book: &AddressBook) -> Self {
        Self {
            locked: book.is_locked().then_some(true),
            persons: book.persons().iter().map(XmlPerson::from).collect(),
        }
    }
}

impl TryFrom<XmlAddressBook> for AddressBook {
    type Error = ConversionError;

    fn try_from(xml: XmlAddressBook) -> Result<Self, Self::Error> {
        let persons = xml
            .persons
            .into_iter()
            .map(Person::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_persons(persons, xml.locked.unwrap_or_default()).map_err(|e| match e {
            AddressBookError::DuplicatePerson => ConversionError::DuplicatePerson,
            other => ConversionError::Malformed(other.to_string()),
        })
    }
}
