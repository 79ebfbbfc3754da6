use std::{
    io,
    path::{Path, PathBuf},
};

use crate::domain::{PrefsError, UserPrefs};

/// Reads and writes [`UserPrefs`] as a TOML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefsStorage {
    path: PathBuf,
}

impl PrefsStorage {
    /// Creates a storage handle for the given file. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The preferences file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed.
    pub fn read(&self) -> Result<UserPrefs, PrefsError> {
        UserPrefs::load(&self.path)
    }

    /// Reads the preferences, falling back to the defaults if the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read_or_default(&self) -> Result<UserPrefs, PrefsError> {
        match self.read() {
            Err(PrefsError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    "No preferences at {}, using defaults",
                    self.path.display()
                );
                Ok(UserPrefs::default())
            }
            result => result,
        }
    }

    /// Writes the preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, prefs: &UserPrefs) -> Result<(), PrefsError> {
        prefs.save(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = PrefsStorage::new(tmp.path().join("preferences.toml"));

        assert!(storage.read().is_err());
        assert_eq!(storage.read_or_default().unwrap(), UserPrefs::default());
    }

    #[test]
    fn malformed_file_is_not_replaced_by_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = PrefsStorage::new(tmp.path().join("preferences.toml"));
        let mut prefs = UserPrefs::default();
        prefs.set_password("secret");
        storage.save(&prefs).unwrap();
        let mut content = std::fs::read_to_string(storage.path()).unwrap();
        content.push_str("this is = = not toml\n");
        std::fs::write(storage.path(), content).unwrap();

        assert!(matches!(
            storage.read_or_default(),
            Err(PrefsError::Parse { .. })
        ));
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory where the file should be.
        let storage = PrefsStorage::new(tmp.path());

        assert!(matches!(
            storage.read_or_default(),
            Err(PrefsError::Read { .. })
        ));
    }

    #[test]
    fn save_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = PrefsStorage::new(tmp.path().join("preferences.toml"));
        let mut prefs = UserPrefs::default();
        prefs.set_password("secret");

        storage.save(&prefs).unwrap();

        assert_eq!(storage.read().unwrap(), prefs);
    }
}
