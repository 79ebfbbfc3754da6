use std::fmt;

use crate::{
    domain::{AddressBook, prefs::hash_password},
    logic::{CommandResult, Credentials},
};

pub(crate) const MESSAGE_LOCKED: &str = "Address++ locked successfully";
pub(crate) const MESSAGE_UNLOCKED: &str = "Address++ unlocked successfully";
pub(crate) const MESSAGE_PASSWORD_INCORRECT: &str = "Password is incorrect. Please try again";

/// Locks the address book, if the password matches.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Lock {
    password: String,
}

impl Lock {
    pub(crate) const USAGE: &'static str = "lock: Locks the address book. No other commands \
         can be executed until it is unlocked.\n\
         Parameters: pw/PASSWORD\n\
         Example: lock pw/hunter2";

    pub(crate) const fn new(password: String) -> Self {
        Self { password }
    }

    pub(crate) fn execute(
        self,
        book: &mut AddressBook,
        credentials: &dyn Credentials,
    ) -> CommandResult {
        set_lock(book, credentials, &self.password, true)
    }
}

/// Unlocks the address book, if the password matches.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Unlock {
    password: String,
}

impl Unlock {
    pub(crate) const USAGE: &'static str = "unlock: Unlocks the address book.\n\
         Parameters: pw/PASSWORD\n\
         Example: unlock pw/hunter2";

    pub(crate) const fn new(password: String) -> Self {
        Self { password }
    }

    pub(crate) fn execute(
        self,
        book: &mut AddressBook,
        credentials: &dyn Credentials,
    ) -> CommandResult {
        set_lock(book, credentials, &self.password, false)
    }
}

// Passwords stay out of debug output and traces.
impl fmt::Debug for Lock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lock").finish_non_exhaustive()
    }
}

impl fmt::Debug for Unlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unlock").finish_non_exhaustive()
    }
}

fn set_lock(
    book: &mut AddressBook,
    credentials: &dyn Credentials,
    password: &str,
    locked: bool,
) -> CommandResult {
    if !password_matches(credentials, password) {
        return CommandResult::new(MESSAGE_PASSWORD_INCORRECT);
    }

    book.set_locked(locked);
    tracing::info!("Lock state is now: {}", book.is_locked());

    CommandResult::new(if locked {
        MESSAGE_LOCKED
    } else {
        MESSAGE_UNLOCKED
    })
}

/// Compares the digest of `password` with the stored one.
///
/// Fails closed: if the stored credential cannot be read, no password
/// matches. Not constant-time.
fn password_matches(credentials: &dyn Credentials, password: &str) -> bool {
    match credentials.password_hash() {
        Ok(stored) => hash_password(password) == stored,
        Err(e) => {
            tracing::warn!(
                "Could not read stored credential, treating password as incorrect: {e}"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PrefsError;

    #[derive(Debug)]
    struct FixedHash(&'static str);

    impl Credentials for FixedHash {
        fn password_hash(&self) -> Result<String, PrefsError> {
            Ok(self.0.to_string())
        }
    }

    const SECRET_HASH: &str = "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b";

    #[test]
    fn matching_is_case_sensitive_on_the_digest() {
        assert!(password_matches(&FixedHash(SECRET_HASH), "secret"));
        assert!(!password_matches(
            &FixedHash("2BB80D537B1DA3E38BD30361AA855686BDE0EACD7162FEF6A25FE97BF527A25B"),
            "secret"
        ));
    }

    #[test]
    fn empty_credential_matches_nothing() {
        assert!(!password_matches(&FixedHash(""), ""));
        assert!(!password_matches(&FixedHash(""), "secret"));
    }

    #[test]
    fn lock_then_unlock() {
        let mut book = AddressBook::new();

        let locked = Lock::new("secret".to_string()).execute(&mut book, &FixedHash(SECRET_HASH));
        assert_eq!(locked.feedback(), MESSAGE_LOCKED);
        assert!(book.is_locked());

        let unlocked =
            Unlock::new("secret".to_string()).execute(&mut book, &FixedHash(SECRET_HASH));
        assert_eq!(unlocked.feedback(), MESSAGE_UNLOCKED);
        assert!(!book.is_locked());
    }

    #[test]
    fn wrong_password_leaves_state_alone() {
        let mut book = AddressBook::new();
        book.set_locked(true);

        let result = Unlock::new("wrong".to_string()).execute(&mut book, &FixedHash(SECRET_HASH));

        assert_eq!(result.feedback(), MESSAGE_PASSWORD_INCORRECT);
        assert!(book.is_locked());
    }

    #[test]
    fn debug_output_hides_password() {
        let shown = format!("{:?}", Lock::new("hunter2".to_string()));
        assert!(!shown.contains("hunter2"));
    }
}
