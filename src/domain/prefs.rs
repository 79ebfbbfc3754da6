use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// User preferences.
///
/// These live in a small TOML file next to the address book, and hold the
/// location of the data file and the credential used to lock it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct UserPrefs {
    /// Where the address book XML file lives.
    address_book_file_path: PathBuf,

    /// Display name of the address book.
    address_book_name: String,

    /// Lowercase hex SHA-256 digest of the lock password.
    ///
    /// Empty when no password has been set, in which case no password will
    /// ever match.
    password_hash: String,
}

impl Default for UserPrefs {
    fn default() -> Self {
        Self {
            address_book_file_path: default_address_book_file_path(),
            address_book_name: default_address_book_name(),
            password_hash: String::new(),
        }
    }
}

/// Errors raised while reading or writing user preferences.
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    /// The preferences file could not be read.
    #[error("failed to read preferences file {}: {source}", path.display())]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The preferences file is not valid TOML, or has the wrong shape.
    #[error("failed to parse preferences file {}: {source}", path.display())]
    Parse {
        /// The file that was being parsed.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The preferences could not be serialized.
    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The preferences file could not be written.
    #[error("failed to write preferences file {}: {source}", path.display())]
    Write {
        /// The file that was being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl UserPrefs {
    /// Loads the preferences from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, PrefsError> {
        let content = std::fs::read_to_string(path).map_err(|source| PrefsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| PrefsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Saves the preferences to a TOML file at the given path.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences cannot be serialized or if the
    /// file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), PrefsError> {
        let content = toml::to_string_pretty(self)?;
        let write_error = |source| PrefsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, content).map_err(write_error)
    }

    /// Where the address book XML file lives.
    #[must_use]
    pub fn address_book_file_path(&self) -> &Path {
        &self.address_book_file_path
    }

    /// Moves the address book to a different file.
    pub fn set_address_book_file_path(&mut self, path: PathBuf) {
        self.address_book_file_path = path;
    }

    /// Display name of the address book.
    #[must_use]
    pub fn address_book_name(&self) -> &str {
        &self.address_book_name
    }

    /// The stored password digest. Empty if no password has been set.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns `true` if a lock password has been set.
    #[must_use]
    pub fn has_password(&self) -> bool {
        !self.password_hash.is_empty()
    }

    /// Replaces the lock password. Only its digest is stored.
    pub fn set_password(&mut self, password: &str) {
        self.password_hash = hash_password(password);
    }
}

/// Digests a password for storage and comparison.
///
/// The digest is a lowercase hex SHA-256 of the UTF-8 bytes of `password`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let hash = Sha256::digest(password.as_bytes());
    format!("{hash:x}")
}

fn default_address_book_file_path() -> PathBuf {
    PathBuf::from("data").join("addressbook.xml")
}

fn default_address_book_name() -> String {
    "MyAddressBook".to_string()
}

/// The serialized versions of the preferences.
/// This allows for future changes to the file format and to the domain type
/// without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_address_book_file_path")]
        address_book_file_path: PathBuf,

        #[serde(default = "default_address_book_name")]
        address_book_name: String,

        #[serde(default, skip_serializing_if = "String::is_empty")]
        password_hash: String,
    },
}

impl From<Versions> for UserPrefs {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                address_book_file_path,
                address_book_name,
                password_hash,
            } => Self {
                address_book_file_path,
                address_book_name,
                password_hash,
            },
        }
    }
}

impl From<UserPrefs> for Versions {
    fn from(prefs: UserPrefs) -> Self {
        Self::V1 {
            address_book_file_path: prefs.address_book_file_path,
            address_book_name: prefs.address_book_name,
            password_hash: prefs.password_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn hash_is_lowercase_sha256_hex() {
        assert_eq!(
            hash_password("secret"),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn set_password_stores_only_the_digest() {
        let mut prefs = UserPrefs::default();
        assert!(!prefs.has_password());

        prefs.set_password("secret");

        assert!(prefs.has_password());
        assert_eq!(prefs.password_hash(), hash_password("secret"));
        assert!(!prefs.password_hash().contains("secret"));
    }

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\naddress_book_file_path = \"contacts/book.xml\"\naddress_book_name = \"Work\"\npassword_hash = \"abc123\"\n",
        )
        .unwrap();

        let prefs = UserPrefs::load(file.path()).unwrap();

        assert_eq!(
            prefs.address_book_file_path(),
            Path::new("contacts/book.xml")
        );
        assert_eq!(prefs.address_book_name(), "Work");
        assert_eq!(prefs.password_hash(), "abc123");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = UserPrefs::load(&missing).unwrap_err();
        assert!(matches!(error, PrefsError::Read { .. }));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\naddress_book_name = 3\n")
            .unwrap();

        let error = UserPrefs::load(file.path()).unwrap_err();
        assert!(matches!(error, PrefsError::Parse { .. }));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = UserPrefs::default();
        let actual: UserPrefs = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_password() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("preferences.toml");

        let mut prefs = UserPrefs::default();
        prefs.set_password("secret");
        prefs.save(&path).unwrap();

        assert_eq!(UserPrefs::load(&path).unwrap(), prefs);
    }
}
