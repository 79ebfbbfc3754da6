use crate::domain::{Index, Person, Tag};

/// An ordered collection of unique persons, plus the lock flag.
///
/// Insertion order is display order. While [`AddressBook::is_locked`] is
/// `true` the command layer refuses everything except `lock`, `unlock`,
/// `help` and `exit`; the book itself does not enforce the lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    persons: Vec<Person>,
    locked: bool,
}

/// Errors raised by address book mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressBookError {
    /// The person is already in the address book.
    #[error("This person already exists in the address book")]
    DuplicatePerson,

    /// The index does not refer to a person in the address book.
    #[error("The person index provided is invalid")]
    InvalidIndex(Index),
}

impl AddressBook {
    /// Creates an empty, unlocked address book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an address book from a list of persons.
    ///
    /// # Errors
    ///
    /// Returns [`AddressBookError::DuplicatePerson`] if the list contains the
    /// same person twice.
    pub fn with_persons(
        persons: impl IntoIterator<Item = Person>,
        locked: bool,
    ) -> Result<Self, AddressBookError> {
        let mut book = Self {
            persons: Vec::new(),
            locked,
        };
        for person in persons {
            book.add(person)?;
        }
        Ok(book)
    }

    /// The persons in display order.
    #[must_use]
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    /// The number of persons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    /// Returns `true` if the address book has no persons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Returns the person at `index`, if any.
    #[must_use]
    pub fn get(&self, index: Index) -> Option<&Person> {
        self.persons.get(index.zero_based())
    }

    /// Returns `true` if an equal person is already present.
    #[must_use]
    pub fn contains(&self, person: &Person) -> bool {
        self.persons.contains(person)
    }

    /// Appends a person.
    ///
    /// # Errors
    ///
    /// Returns [`AddressBookError::DuplicatePerson`] if an equal person is
    /// already present.
    pub fn add(&mut self, person: Person) -> Result<(), AddressBookError> {
        if self.contains(&person) {
            return Err(AddressBookError::DuplicatePerson);
        }
        self.persons.push(person);
        Ok(())
    }

    /// Replaces the person at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range, or if the replacement
    /// equals a *different* person already in the book.
    pub fn set(&mut self, index: Index, person: Person) -> Result<Person, AddressBookError> {
        let offset = index.zero_based();
        if offset >= self.persons.len() {
            return Err(AddressBookError::InvalidIndex(index));
        }
        let duplicate = self
            .persons
            .iter()
            .enumerate()
            .any(|(i, existing)| i != offset && *existing == person);
        if duplicate {
            return Err(AddressBookError::DuplicatePerson);
        }
        Ok(std::mem::replace(&mut self.persons[offset], person))
    }

    /// Removes and returns the person at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressBookError::InvalidIndex`] if `index` is out of range.
    pub fn remove(&mut self, index: Index) -> Result<Person, AddressBookError> {
        if index.zero_based() >= self.persons.len() {
            return Err(AddressBookError::InvalidIndex(index));
        }
        Ok(self.persons.remove(index.zero_based()))
    }

    /// Removes every person. The lock flag is untouched.
    pub fn clear(&mut self) {
        self.persons.clear();
    }

    /// Replaces the person list wholesale, keeping the lock flag.
    ///
    /// Used to restore snapshots taken from this same book, which are already
    /// free of duplicates.
    pub(crate) fn restore(&mut self, persons: Vec<Person>) {
        self.persons = persons;
    }

    /// Removes `tag` from every person that has it.
    ///
    /// Returns the number of persons that were changed.
    pub fn remove_tag(&mut self, tag: &Tag) -> usize {
        self.persons
            .iter_mut()
            .map(|person| person.tags.remove(tag))
            .filter(|removed| *removed)
            .count()
    }

    /// Persons whose name contains one of `keywords` as a whole word, with
    /// their positions in the full list.
    pub fn find<'a, S: AsRef<str>>(
        &'a self,
        keywords: &'a [S],
    ) -> impl Iterator<Item = (Index, &'a Person)> + 'a {
        self.persons
            .iter()
            .enumerate()
            .filter(move |(_, person)| person.name_matches_any(keywords))
            .map(|(offset, person)| (Index::from_zero_based(offset), person))
    }

    /// Whether the address book is locked.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Sets the lock flag.
    pub const fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{alice, benson};

    fn index(position: usize) -> Index {
        Index::from_one_based(position).unwrap()
    }

    #[test]
    fn add_rejects_duplicates() {
        let mut book = AddressBook::new();
        book.add(alice()).unwrap();
        assert_eq!(book.add(alice()), Err(AddressBookError::DuplicatePerson));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn duplicate_check_ignores_privacy() {
        let mut book = AddressBook::new();
        book.add(alice()).unwrap();
        let mut private = alice();
        private.name = private.name.with_privacy(true);
        assert_eq!(book.add(private), Err(AddressBookError::DuplicatePerson));
    }

    #[test]
    fn with_persons_rejects_duplicates() {
        assert_eq!(
            AddressBook::with_persons([alice(), alice()], false),
            Err(AddressBookError::DuplicatePerson)
        );
    }

    #[test]
    fn set_replaces_in_place() {
        let mut book = AddressBook::with_persons([alice(), benson()], false).unwrap();
        let mut edited = alice();
        edited.favourite = true;

        let previous = book.set(index(1), edited.clone()).unwrap();

        assert_eq!(previous, alice());
        assert_eq!(book.persons(), &[edited, benson()]);
    }

    #[test]
    fn set_allows_unchanged_person_but_rejects_collisions() {
        let mut book = AddressBook::with_persons([alice(), benson()], false).unwrap();
        assert!(book.set(index(1), alice()).is_ok());
        assert_eq!(
            book.set(index(1), benson()),
            Err(AddressBookError::DuplicatePerson)
        );
        assert_eq!(
            book.set(index(3), alice()),
            Err(AddressBookError::InvalidIndex(index(3)))
        );
    }

    #[test]
    fn remove_checks_bounds() {
        let mut book = AddressBook::with_persons([alice(), benson()], false).unwrap();
        assert_eq!(
            book.remove(index(3)),
            Err(AddressBookError::InvalidIndex(index(3)))
        );
        assert_eq!(book.remove(index(1)), Ok(alice()));
        assert_eq!(book.persons(), &[benson()]);
    }

    #[test]
    fn remove_tag_counts_changed_persons() {
        let mut book = AddressBook::with_persons([alice(), benson()], false).unwrap();
        let friends: Tag = "friends".parse().unwrap();

        assert_eq!(book.remove_tag(&friends), 2);
        assert_eq!(book.remove_tag(&friends), 0);
        assert!(book.persons().iter().all(|p| !p.tags.contains(&friends)));
    }

    #[test]
    fn find_reports_positions_in_full_list() {
        let book = AddressBook::with_persons([alice(), benson()], false).unwrap();
        let found: Vec<_> = book.find(&["meier"]).collect();
        assert_eq!(found, vec![(index(2), &benson())]);
    }

    #[test]
    fn clear_keeps_lock_flag() {
        let mut book = AddressBook::with_persons([alice()], true).unwrap();
        book.clear();
        assert!(book.is_empty());
        assert!(book.is_locked());
    }
}
