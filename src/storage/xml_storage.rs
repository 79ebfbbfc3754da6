//! A filesystem backed store for the address book
//!
//! The [`XmlAddressBookStorage`] reads and writes an [`AddressBook`] as a
//! single XML document, and can write full copies of it elsewhere as
//! backups.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use super::{ConversionError, xml_address_book::XmlAddressBook};
use crate::domain::AddressBook;

/// Reads and writes the address book as an XML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAddressBookStorage {
    path: PathBuf,
}

/// Errors raised by [`XmlAddressBookStorage`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The file could not be read or written.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file exists but its content is not a valid address book.
    #[error("data file {} is not in the correct format: {source}", path.display())]
    DataConversion {
        /// The file being read.
        path: PathBuf,
        /// What was wrong with it.
        #[source]
        source: ConversionError,
    },
}

impl XmlAddressBookStorage {
    /// Creates a storage handle for the given file. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The primary data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Points the storage at a different primary file.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        tracing::info!("Address book file is now {}", self.path.display());
    }

    /// The default backup location: the primary path with `-backup.xml`
    /// appended.
    #[must_use]
    pub fn default_backup_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push("-backup.xml");
        PathBuf::from(path)
    }

    /// Reads the address book from the primary file.
    ///
    /// # Errors
    ///
    /// See [`XmlAddressBookStorage::read_from`].
    pub fn read(&self) -> Result<Option<AddressBook>, StorageError> {
        self.read_from(&self.path)
    }

    /// Reads the address book from `path`.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file cannot be read, and
    /// [`StorageError::DataConversion`] if its content is malformed or holds
    /// invalid values. Nothing is partially loaded.
    pub fn read_from(&self, path: &Path) -> Result<Option<AddressBook>, StorageError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("Address book file {} not found", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let conversion_error = |source| StorageError::DataConversion {
            path: path.to_path_buf(),
            source,
        };
        let document = XmlAddressBook::from_xml(&content).map_err(conversion_error)?;
        let book = AddressBook::try_from(document).map_err(conversion_error)?;

        tracing::debug!(
            "Loaded {} persons from {}",
            book.len(),
            path.display()
        );
        Ok(Some(book))
    }

    /// Writes the address book to the primary file.
    ///
    /// # Errors
    ///
    /// See [`XmlAddressBookStorage::save_to`].
    pub fn save(&self, book: &AddressBook) -> Result<(), StorageError> {
        self.save_to(book, &self.path)
    }

    /// Writes the address book to `path`, replacing any existing content.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file or its parent directories
    /// cannot be created or written to.
    pub fn save_to(&self, book: &AddressBook, path: &Path) -> Result<(), StorageError> {
        let xml = XmlAddressBook::from(book)
            .to_xml()
            .map_err(|source| StorageError::DataConversion {
                path: path.to_path_buf(),
                source,
            })?;

        write_file(path, xml.as_bytes()).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Saved {} persons to {}", book.len(), path.display());
        Ok(())
    }

    /// Writes a full copy of the address book to `path`.
    ///
    /// The primary file is not touched.
    ///
    /// # Errors
    ///
    /// See [`XmlAddressBookStorage::save_to`].
    pub fn backup(&self, book: &AddressBook, path: &Path) -> Result<(), StorageError> {
        tracing::debug!("Attempting to write backup to {}", path.display());
        self.save_to(book, path)
    }

    /// Writes a full copy of the address book next to the primary file, at
    /// [`XmlAddressBookStorage::default_backup_path`].
    ///
    /// Returns the path written to.
    ///
    /// # Errors
    ///
    /// See [`XmlAddressBookStorage::save_to`].
    pub fn backup_default(&self, book: &AddressBook) -> Result<PathBuf, StorageError> {
        let path = self.default_backup_path();
        self.backup(book, &path)?;
        Ok(path)
    }
}

fn write_file(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content)?;
    writer.flush()
}
