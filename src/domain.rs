//! Domain models for contact management.
//!
//! This module contains the contact fields with their privacy flags, the
//! [`Person`] aggregate, the [`AddressBook`] store and the user preferences
//! that hold the lock credential.

mod address_book;
pub use address_book::{AddressBook, AddressBookError};

/// Validated contact fields and the privacy wrapper shared by all of them.
pub mod field;
pub use field::{Address, Email, Field, FieldValue, Name, Phone, Remark, ValidationError};

mod index;
pub use index::{Index, InvalidIndexError};

mod person;
pub use person::Person;

/// User preferences and password hashing.
pub mod prefs;
pub use prefs::{PrefsError, UserPrefs};

mod tag;
pub use tag::Tag;

#[cfg(test)]
pub(crate) use person::tests as fixtures;
