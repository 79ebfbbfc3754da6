use std::fmt;

use tracing::instrument;

use crate::{
    domain::{AddressBook, AddressBookError, PrefsError, ValidationError},
    storage::{PrefsStorage, StorageError, XmlAddressBookStorage},
};

mod command;
mod history;
mod parser;

use command::Context;
use history::History;

/// A source of the stored lock credential.
///
/// The credential is fetched afresh on every `lock`/`unlock`, so changes made
/// to it while the program is running take effect immediately.
pub trait Credentials: fmt::Debug {
    /// Returns the stored password digest (lowercase hex SHA-256).
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be read. Callers treat this
    /// as a password mismatch.
    fn password_hash(&self) -> Result<String, PrefsError>;
}

impl Credentials for PrefsStorage {
    fn password_hash(&self) -> Result<String, PrefsError> {
        Ok(self.read()?.password_hash().to_string())
    }
}

/// Feedback from a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    feedback: String,
    exit: bool,
}

impl CommandResult {
    /// A result carrying `feedback` for the user.
    #[must_use]
    pub fn new(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            exit: false,
        }
    }

    fn exit(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            exit: true,
        }
    }

    /// The message to show the user.
    #[must_use]
    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    /// Whether the user asked to end the session.
    #[must_use]
    pub const fn is_exit(&self) -> bool {
        self.exit
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.feedback)
    }
}

/// Errors raised while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The command word is not recognised.
    #[error("Unknown command")]
    UnknownCommand,

    /// The arguments do not follow the command's syntax.
    ///
    /// Carries the usage message of the command.
    #[error("Invalid command format! \n{0}")]
    InvalidFormat(&'static str),

    /// `edit` was given an index but nothing to change.
    #[error("At least one field to edit must be provided.")]
    NoFieldsEdited,

    /// `changeprivacy` was given an index but no field flags.
    #[error("At least one field to change must be provided.")]
    NoPrivacyChanged,

    /// An argument value failed its field's format check.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Errors raised while executing a command.
///
/// All of these are recoverable: the session carries on after reporting
/// them.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The input could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The address book is locked and the command is not allowed.
    #[error("Address++ is locked. Unlock it to continue")]
    Locked,

    /// The change was rejected by the address book.
    #[error(transparent)]
    AddressBook(#[from] AddressBookError),

    /// There is no earlier state to return to.
    #[error("No more commands to undo!")]
    NothingToUndo,

    /// There is no undone state to return to.
    #[error("No more commands to redo!")]
    NothingToRedo,

    /// The address book could not be saved or backed up.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Executes commands against an address book, enforcing the lock.
///
/// This is the explicit store handle: it owns the in-memory address book, the
/// storage it is saved to after every change, the credential source used by
/// `lock`/`unlock`, and the undo history.
#[derive(Debug)]
pub struct Logic {
    book: AddressBook,
    storage: XmlAddressBookStorage,
    credentials: Box<dyn Credentials>,
    history: History,
}

impl Logic {
    /// Wraps an already loaded address book.
    #[must_use]
    pub fn new(
        book: AddressBook,
        storage: XmlAddressBookStorage,
        credentials: impl Credentials + 'static,
    ) -> Self {
        Self {
            book,
            storage,
            credentials: Box::new(credentials),
            history: History::default(),
        }
    }

    /// Loads the address book from `storage`, starting empty if the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is
    /// malformed. The file is left untouched in that case.
    pub fn load(
        storage: XmlAddressBookStorage,
        credentials: impl Credentials + 'static,
    ) -> Result<Self, StorageError> {
        let book = storage.read()?.unwrap_or_else(|| {
            tracing::info!("Starting with an empty address book");
            AddressBook::new()
        });
        Ok(Self::new(book, storage, credentials))
    }

    /// The current address book.
    #[must_use]
    pub const fn address_book(&self) -> &AddressBook {
        &self.book
    }

    /// The storage the address book is saved to.
    #[must_use]
    pub const fn storage(&self) -> &XmlAddressBookStorage {
        &self.storage
    }

    /// Parses and executes one line of user input.
    ///
    /// While the address book is locked, every command except `lock`,
    /// `unlock`, `help` and `exit` is refused without side effects. Commands
    /// that change the address book save it before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be parsed, the command is refused
    /// or fails, or the result cannot be saved. An incorrect password is not
    /// an error.
    #[instrument(level = "debug", skip_all)]
    pub fn execute(&mut self, input: &str) -> Result<CommandResult, CommandError> {
        let command = parser::parse(input)?;
        tracing::debug!(command = command.word(), "Parsed command");

        if self.book.is_locked() && command.is_gated() {
            tracing::info!(command = command.word(), "Refused while locked");
            return Err(CommandError::Locked);
        }

        let snapshot = command
            .is_undoable()
            .then(|| self.book.persons().to_vec());
        let mutates = command.mutates();

        let mut context = Context {
            book: &mut self.book,
            storage: &self.storage,
            credentials: self.credentials.as_ref(),
            history: &mut self.history,
        };
        let result = command.execute(&mut context)?;

        if let Some(snapshot) = snapshot {
            self.history.record(snapshot);
        }
        if mutates {
            if let Err(e) = self.storage.save(&self.book) {
                tracing::error!(
                    path = %self.storage.path().display(),
                    "Failed to save address book: {e}"
                );
                return Err(e.into());
            }
        }

        Ok(result)
    }
}
