use std::path::PathBuf;

use tracing::instrument;

use super::{CommandError, CommandResult, Credentials, history::History};
use crate::{
    domain::{AddressBook, AddressBookError, Index, Person, Remark, Tag},
    storage::XmlAddressBookStorage,
};

mod edit;
mod lock;

pub(crate) use edit::{ChangePrivacy, Edit, EditPersonDescriptor, PrivacyDescriptor};
pub(crate) use lock::{Lock, Unlock};

/// Everything a command may touch while executing.
pub(crate) struct Context<'a> {
    pub(crate) book: &'a mut AddressBook,
    pub(crate) storage: &'a XmlAddressBookStorage,
    pub(crate) credentials: &'a dyn Credentials,
    pub(crate) history: &'a mut History,
}

/// A parsed command, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Add(Add),
    Edit(Edit),
    Delete(Delete),
    Clear,
    List,
    Find(Find),
    Favourite(Favourite),
    Remark(SetRemark),
    ChangePrivacy(ChangePrivacy),
    RemoveTag(RemoveTag),
    Backup(Backup),
    Undo,
    Redo,
    Lock(Lock),
    Unlock(Unlock),
    Help,
    Exit,
}

impl Command {
    pub(crate) const HELP_USAGE: &'static str =
        "help: Shows program usage instructions.\nExample: help";
    pub(crate) const LIST_USAGE: &'static str = "list: Lists all persons.\nExample: list";
    pub(crate) const CLEAR_USAGE: &'static str =
        "clear: Removes every person from the address book.\nExample: clear";
    pub(crate) const UNDO_USAGE: &'static str =
        "undo: Reverts the last change to the persons.\nExample: undo";
    pub(crate) const REDO_USAGE: &'static str =
        "redo: Reapplies the last undone change.\nExample: redo";
    pub(crate) const EXIT_USAGE: &'static str = "exit: Exits the program.\nExample: exit";

    /// The canonical command word, for logging.
    pub(crate) const fn word(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Edit(_) => "edit",
            Self::Delete(_) => "delete",
            Self::Clear => "clear",
            Self::List => "list",
            Self::Find(_) => "find",
            Self::Favourite(_) => "favourite",
            Self::Remark(_) => "remark",
            Self::ChangePrivacy(_) => "changeprivacy",
            Self::RemoveTag(_) => "removetag",
            Self::Backup(_) => "backup",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Lock(_) => "lock",
            Self::Unlock(_) => "unlock",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }

    /// Whether the command is refused while the address book is locked.
    pub(crate) const fn is_gated(&self) -> bool {
        !matches!(self, Self::Lock(_) | Self::Unlock(_) | Self::Help | Self::Exit)
    }

    /// Whether the command changes the person list and can be undone.
    pub(crate) const fn is_undoable(&self) -> bool {
        matches!(
            self,
            Self::Add(_)
                | Self::Edit(_)
                | Self::Delete(_)
                | Self::Clear
                | Self::Favourite(_)
                | Self::Remark(_)
                | Self::ChangePrivacy(_)
                | Self::RemoveTag(_)
        )
    }

    /// Whether the address book must be saved after the command runs.
    pub(crate) const fn mutates(&self) -> bool {
        self.is_undoable()
            || matches!(
                self,
                Self::Undo | Self::Redo | Self::Lock(_) | Self::Unlock(_)
            )
    }

    #[instrument(level = "debug", skip_all, fields(command = self.word()))]
    pub(crate) fn execute(self, ctx: &mut Context<'_>) -> Result<CommandResult, CommandError> {
        match self {
            Self::Add(command) => command.execute(ctx.book),
            Self::Edit(command) => command.execute(ctx.book),
            Self::Delete(command) => command.execute(ctx.book),
            Self::Clear => {
                ctx.book.clear();
                Ok(CommandResult::new("Address book has been cleared!"))
            }
            Self::List => Ok(list(ctx.book)),
            Self::Find(command) => Ok(command.execute(ctx.book)),
            Self::Favourite(command) => command.execute(ctx.book),
            Self::Remark(command) => command.execute(ctx.book),
            Self::ChangePrivacy(command) => command.execute(ctx.book),
            Self::RemoveTag(command) => Ok(command.execute(ctx.book)),
            Self::Backup(command) => command.execute(ctx.book, ctx.storage),
            Self::Undo => {
                let previous = ctx
                    .history
                    .undo(ctx.book.persons().to_vec())
                    .ok_or(CommandError::NothingToUndo)?;
                ctx.book.restore(previous);
                Ok(CommandResult::new("Undo success!"))
            }
            Self::Redo => {
                let next = ctx
                    .history
                    .redo(ctx.book.persons().to_vec())
                    .ok_or(CommandError::NothingToRedo)?;
                ctx.book.restore(next);
                Ok(CommandResult::new("Redo success!"))
            }
            Self::Lock(command) => Ok(command.execute(ctx.book, ctx.credentials)),
            Self::Unlock(command) => Ok(command.execute(ctx.book, ctx.credentials)),
            Self::Help => Ok(CommandResult::new(help())),
            Self::Exit => Ok(CommandResult::exit(
                "Exiting Address Book as requested ...",
            )),
        }
    }
}

fn help() -> String {
    [
        Add::USAGE,
        Edit::USAGE,
        Delete::USAGE,
        Command::CLEAR_USAGE,
        Command::LIST_USAGE,
        Find::USAGE,
        Favourite::USAGE,
        SetRemark::USAGE,
        ChangePrivacy::USAGE,
        RemoveTag::USAGE,
        Backup::USAGE,
        Command::UNDO_USAGE,
        Command::REDO_USAGE,
        Lock::USAGE,
        Unlock::USAGE,
        Command::HELP_USAGE,
        Command::EXIT_USAGE,
    ]
    .join("\n\n")
}

/// Renders persons as a numbered list, one per line.
fn numbered<'a>(persons: impl IntoIterator<Item = (Index, &'a Person)>) -> String {
    persons
        .into_iter()
        .map(|(index, person)| format!("\n{index}. {person}"))
        .collect()
}

fn list(book: &AddressBook) -> CommandResult {
    if book.is_empty() {
        return CommandResult::new("The address book is empty");
    }
    let persons = book
        .persons()
        .iter()
        .enumerate()
        .map(|(offset, person)| (Index::from_zero_based(offset), person));
    CommandResult::new(format!("Listed all persons{}", numbered(persons)))
}

fn person_at(book: &AddressBook, index: Index) -> Result<&Person, AddressBookError> {
    book.get(index).ok_or(AddressBookError::InvalidIndex(index))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Add {
    pub(crate) person: Person,
}

impl Add {
    pub(crate) const USAGE: &'static str = "add: Adds a person to the address book.\n\
         Parameters: n/NAME p/PHONE e/EMAIL a/ADDRESS [r/REMARK] [t/TAG]...\n\
         Example: add n/John Doe p/98765432 e/johnd@example.com a/311, Clementi Ave 2, #02-25 \
         t/friends t/owesMoney";

    fn execute(self, book: &mut AddressBook) -> Result<CommandResult, CommandError> {
        let message = format!("New person added: {}", self.person);
        book.add(self.person)?;
        Ok(CommandResult::new(message))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Delete {
    pub(crate) index: Index,
}

impl Delete {
    pub(crate) const USAGE: &'static str = "delete: Deletes the person identified by the index \
         number used in the last person listing.\n\
         Parameters: INDEX (must be a positive integer)\n\
         Example: delete 1";

    fn execute(self, book: &mut AddressBook) -> Result<CommandResult, CommandError> {
        let removed = book.remove(self.index)?;
        Ok(CommandResult::new(format!("Deleted Person: {removed}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Find {
    pub(crate) keywords: Vec<String>,
}

impl Find {
    pub(crate) const USAGE: &'static str = "find: Finds all persons whose names contain any of \
         the specified keywords (case-insensitive) and displays them as a list with index \
         numbers.\n\
         Parameters: KEYWORD [MORE_KEYWORDS]...\n\
         Example: find alice bob charlie";

    fn execute(self, book: &AddressBook) -> CommandResult {
        let found: Vec<_> = book.find(&self.keywords).collect();
        let count = found.len();
        CommandResult::new(format!("{count} persons listed!{}", numbered(found)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Favourite {
    pub(crate) index: Index,
}

impl Favourite {
    pub(crate) const USAGE: &'static str = "favourite: Toggles whether the person identified by \
         the index number is a favourite.\n\
         Parameters: INDEX (must be a positive integer)\n\
         Example: favourite 1";

    fn execute(self, book: &mut AddressBook) -> Result<CommandResult, CommandError> {
        let mut person = person_at(book, self.index)?.clone();
        person.favourite = !person.favourite;
        let message = if person.favourite {
            format!("Favourited Person: {person}")
        } else {
            format!("Unfavourited Person: {person}")
        };
        book.set(self.index, person)?;
        Ok(CommandResult::new(message))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SetRemark {
    pub(crate) index: Index,
    pub(crate) remark: Remark,
}

impl SetRemark {
    pub(crate) const USAGE: &'static str = "remark: Edits the remark of the person identified by \
         the index number. An empty remark removes it.\n\
         Parameters: INDEX (must be a positive integer) r/[REMARK]\n\
         Example: remark 1 r/Likes to swim.";

    fn execute(self, book: &mut AddressBook) -> Result<CommandResult, CommandError> {
        let mut person = person_at(book, self.index)?.clone();
        let removed = self.remark.is_empty();
        person.remark = person.remark.with_value(self.remark);
        let message = if removed {
            format!("Removed remark from Person: {person}")
        } else {
            format!("Added remark to Person: {person}")
        };
        book.set(self.index, person)?;
        Ok(CommandResult::new(message))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RemoveTag {
    pub(crate) tag: Tag,
}

impl RemoveTag {
    pub(crate) const USAGE: &'static str = "removetag: Removes the tag from every person that \
         has it.\n\
         Parameters: TAG\n\
         Example: removetag friends";

    fn execute(self, book: &mut AddressBook) -> CommandResult {
        let changed = book.remove_tag(&self.tag);
        CommandResult::new(format!(
            "Removed tag {} from {changed} person(s)",
            self.tag
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Backup {
    pub(crate) path: Option<PathBuf>,
}

impl Backup {
    pub(crate) const USAGE: &'static str = "backup: Writes a copy of the address book. Without \
         a path, the copy is written next to the data file.\n\
         Parameters: [PATH]\n\
         Example: backup backups/contacts.xml";

    fn execute(
        self,
        book: &AddressBook,
        storage: &XmlAddressBookStorage,
    ) -> Result<CommandResult, CommandError> {
        let path = match self.path {
            Some(path) => {
                storage.backup(book, &path)?;
                path
            }
            None => storage.backup_default(book)?,
        };
        Ok(CommandResult::new(format!(
            "Address book backed up to {}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{alice, benson};

    fn index(position: usize) -> Index {
        Index::from_one_based(position).unwrap()
    }

    fn sample_book() -> AddressBook {
        AddressBook::with_persons([alice(), benson()], false).unwrap()
    }

    #[test]
    fn only_lock_unlock_help_and_exit_bypass_the_gate() {
        let ungated = [
            Command::Lock(Lock::new("pw".to_string())),
            Command::Unlock(Unlock::new("pw".to_string())),
            Command::Help,
            Command::Exit,
        ];
        assert!(ungated.iter().all(|command| !command.is_gated()));

        let gated = [
            Command::List,
            Command::Clear,
            Command::Undo,
            Command::Redo,
            Command::Delete(Delete { index: index(1) }),
            Command::Backup(Backup { path: None }),
        ];
        assert!(gated.iter().all(Command::is_gated));
    }

    #[test]
    fn lock_and_unlock_are_saved_but_not_undoable() {
        let lock = Command::Lock(Lock::new("pw".to_string()));
        assert!(lock.mutates());
        assert!(!lock.is_undoable());
        assert!(!Command::List.mutates());
    }

    #[test]
    fn list_numbers_persons_from_one() {
        let result = list(&sample_book());
        let lines: Vec<_> = result.feedback().lines().collect();

        assert_eq!(lines[0], "Listed all persons");
        assert!(lines[1].starts_with("1. Alice Pauline"));
        assert!(lines[2].starts_with("2. Benson Meier"));
    }

    #[test]
    fn list_of_empty_book() {
        assert_eq!(
            list(&AddressBook::new()).feedback(),
            "The address book is empty"
        );
    }

    #[test]
    fn favourite_toggles() {
        let mut book = sample_book();

        let result = Favourite { index: index(2) }.execute(&mut book).unwrap();

        assert!(result.feedback().starts_with("Unfavourited Person: Benson Meier"));
        assert!(!book.persons()[1].favourite);
    }

    #[test]
    fn remark_keeps_privacy() {
        let mut book = sample_book();
        let mut private = benson();
        private.remark = private.remark.with_privacy(true);
        book.set(index(2), private).unwrap();

        SetRemark {
            index: index(2),
            remark: "Moved house".parse().unwrap(),
        }
        .execute(&mut book)
        .unwrap();

        let remark = &book.persons()[1].remark;
        assert_eq!(remark.as_str(), "Moved house");
        assert!(remark.is_private());
    }

    #[test]
    fn empty_remark_removes_it() {
        let mut book = sample_book();

        let result = SetRemark {
            index: index(2),
            remark: Remark::empty(),
        }
        .execute(&mut book)
        .unwrap();

        assert!(result.feedback().starts_with("Removed remark from Person"));
        assert!(book.persons()[1].remark.value().is_empty());
    }

    #[test]
    fn delete_out_of_range_changes_nothing() {
        let mut book = sample_book();

        let error = Delete { index: index(5) }.execute(&mut book).unwrap_err();

        assert!(matches!(
            error,
            CommandError::AddressBook(AddressBookError::InvalidIndex(_))
        ));
        assert_eq!(book, sample_book());
    }

    #[test]
    fn help_mentions_every_command() {
        let text = help();
        for word in [
            "add:", "edit:", "delete:", "clear:", "list:", "find:", "favourite:", "remark:",
            "changeprivacy:", "removetag:", "backup:", "undo:", "redo:", "lock:", "unlock:",
            "help:", "exit:",
        ] {
            assert!(text.contains(word), "{word}");
        }
    }
}
