mod prefs;
mod xml_address_book;
mod xml_person;
mod xml_storage;

pub use prefs::PrefsStorage;
pub use xml_person::ConversionError;
pub use xml_storage::{StorageError, XmlAddressBookStorage};
