//! Account password storage.
//!
//! Stored hashes are Argon2id PHC strings, so the salt and cost parameters
//! are read back from the hash itself at sign-in.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use recipebook_core::error::CoreError;

fn argon2() -> Argon2<'static> {
    Argon2::default()
}

/// Salted hash of a sign-up password, ready for `users.password_hash`.
pub fn hash(password: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))
}

/// Whether `password` matches the stored hash of an account.
///
/// A mismatch is `Ok(false)`; a stored value that is not a PHC string is an
/// internal error rather than a failed sign-in.
pub fn matches(password: &str, stored: &str) -> Result<bool, CoreError> {
    let unreadable =
        |e: password_hash::Error| CoreError::Internal(format!("Stored password hash is unreadable: {e}"));

    let parsed = PasswordHash::new(stored).map_err(unreadable)?;
    match argon2().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(unreadable(e)),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn stored_hash_accepts_only_its_password() {
        let stored = hash("mug-cake-forever").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(matches("mug-cake-forever", &stored).unwrap());
        assert!(!matches("mug-cake-4ever", &stored).unwrap());
    }

    #[test]
    fn each_account_gets_its_own_salt() {
        assert_ne!(hash("secret").unwrap(), hash("secret").unwrap());
    }

    #[test]
    fn corrupt_stored_hash_is_internal() {
        assert_matches!(
            matches("secret", "plaintext-secret"),
            Err(CoreError::Internal(msg)) if msg.starts_with("Stored password hash is unreadable")
        );
    }
}
