//! Address++
//!
//! Contacts are kept in an XML file and edited through short textual
//! commands. Individual fields can be hidden from display, and the whole
//! address book can be locked behind a password.

pub mod domain;
pub use domain::{
    Address, AddressBook, AddressBookError, Email, Field, FieldValue, Index, Name, Person, Phone,
    Remark, Tag, UserPrefs, ValidationError,
};

/// XML and preferences persistence.
pub mod storage;
pub use storage::{ConversionError, PrefsStorage, StorageError, XmlAddressBookStorage};

/// Command parsing and lock-gated execution.
pub mod logic;
pub use logic::{CommandError, CommandResult, Credentials, Logic, ParseError};
