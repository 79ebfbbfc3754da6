use std::collections::BTreeSet;

use super::person_at;
use crate::{
    domain::{Address, AddressBook, Email, Index, Name, Person, Phone, Remark, Tag},
    logic::{CommandError, CommandResult},
};

/// The values to replace on a person. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct EditPersonDescriptor {
    pub(crate) name: Option<Name>,
    pub(crate) phone: Option<Phone>,
    pub(crate) email: Option<Email>,
    pub(crate) address: Option<Address>,
    pub(crate) remark: Option<Remark>,
    pub(crate) tags: Option<BTreeSet<Tag>>,
}

impl EditPersonDescriptor {
    pub(crate) const fn is_any_field_edited(&self) -> bool {
        self.name.is_some()
            || self.phone.is_some()
            || self.email.is_some()
            || self.address.is_some()
            || self.remark.is_some()
            || self.tags.is_some()
    }

    /// Applies the edits to a copy of `person`. Privacy flags are kept.
    fn apply_to(self, person: &Person) -> Person {
        let mut edited = person.clone();
        if let Some(name) = self.name {
            edited.name = edited.name.with_value(name);
        }
        if let Some(phone) = self.phone {
            edited.phone = edited.phone.with_value(phone);
        }
        if let Some(email) = self.email {
            edited.email = edited.email.with_value(email);
        }
        if let Some(address) = self.address {
            edited.address = edited.address.with_value(address);
        }
        if let Some(remark) = self.remark {
            edited.remark = edited.remark.with_value(remark);
        }
        if let Some(tags) = self.tags {
            edited.tags = tags;
        }
        edited
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    pub(crate) index: Index,
    pub(crate) descriptor: EditPersonDescriptor,
}

impl Edit {
    pub(crate) const USAGE: &'static str = "edit: Edits the details of the person identified by \
         the index number used in the last person listing. Existing values will be \
         overwritten by the input values. An empty t/ removes all tags.\n\
         Parameters: INDEX (must be a positive integer) [n/NAME] [p/PHONE] [e/EMAIL] \
         [a/ADDRESS] [r/REMARK] [t/TAG]...\n\
         Example: edit 1 p/91234567 e/johndoe@example.com";

    pub(super) fn execute(self, book: &mut AddressBook) -> Result<CommandResult, CommandError> {
        let edited = self.descriptor.apply_to(person_at(book, self.index)?);
        let message = format!("Edited Person: {edited}");
        book.set(self.index, edited)?;
        Ok(CommandResult::new(message))
    }
}

/// The privacy flags to set on a person. `None` leaves a flag as it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PrivacyDescriptor {
    pub(crate) name: Option<bool>,
    pub(crate) phone: Option<bool>,
    pub(crate) email: Option<bool>,
    pub(crate) address: Option<bool>,
    pub(crate) remark: Option<bool>,
}

impl PrivacyDescriptor {
    pub(crate) const fn is_any_field_set(&self) -> bool {
        self.name.is_some()
            || self.phone.is_some()
            || self.email.is_some()
            || self.address.is_some()
            || self.remark.is_some()
    }

    fn apply_to(self, person: &Person) -> Person {
        let mut changed = person.clone();
        if let Some(private) = self.name {
            changed.name = changed.name.with_privacy(private);
        }
        if let Some(private) = self.phone {
            changed.phone = changed.phone.with_privacy(private);
        }
        if let Some(private) = self.email {
            changed.email = changed.email.with_privacy(private);
        }
        if let Some(private) = self.address {
            changed.address = changed.address.with_privacy(private);
        }
        if let Some(private) = self.remark {
            changed.remark = changed.remark.with_privacy(private);
        }
        changed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChangePrivacy {
    pub(crate) index: Index,
    pub(crate) privacy: PrivacyDescriptor,
}

impl ChangePrivacy {
    pub(crate) const USAGE: &'static str = "changeprivacy: Changes the privacy of the details \
         of the person identified by the index number used in the last person listing. \
         Private details are hidden whenever the person is shown.\n\
         Parameters: INDEX (must be a positive integer) [n/TRUE or FALSE] [p/TRUE or FALSE] \
         [e/TRUE or FALSE] [a/TRUE or FALSE] [r/TRUE or FALSE]\n\
         Example: changeprivacy 1 n/true p/false e/true a/false";

    pub(super) fn execute(self, book: &mut AddressBook) -> Result<CommandResult, CommandError> {
        let changed = self.privacy.apply_to(person_at(book, self.index)?);
        let message = format!("Changed the Privacy of the Person: {changed}");
        book.set(self.index, changed)?;
        Ok(CommandResult::new(message))
    }
}
