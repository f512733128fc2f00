//! Authentication collaborators.
//!
//! The list view-model only asks [`AuthState`] who is signed in; the
//! credential exchange itself lives behind [`Authenticator`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::CoreError;
use crate::types::OwnerId;

/// Minimum password length enforced on sign-up unless configured otherwise.
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 6;

// ---------------------------------------------------------------------------
// AuthState
// ---------------------------------------------------------------------------

/// Source of the currently signed-in owner.
pub trait AuthState: Send + Sync {
    fn current_user_id(&self) -> Option<OwnerId>;
}

/// An owner id handed over by navigation when a screen is constructed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedOwner(pub Option<OwnerId>);

impl AuthState for FixedOwner {
    fn current_user_id(&self) -> Option<OwnerId> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// E-mail and password pair used for both sign-in and sign-up.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl Credentials {
    /// Build credentials, trimming and lower-casing the e-mail.
    pub fn new(email: &str, password: impl Into<String>) -> Self {
        Self {
            email: normalize_email(email),
            password: password.into(),
        }
    }

    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Canonical form of an e-mail address used for lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Sign-up password policy: minimum length and matching confirmation.
pub fn check_new_password(
    password: &str,
    confirmation: &str,
    min_length: usize,
) -> Result<(), CoreError> {
    if password != confirmation {
        return Err(CoreError::Validation("Passwords do not match".into()));
    }
    if password.chars().count() < min_length {
        return Err(CoreError::Validation(format!(
            "Password must be at least {min_length} characters long"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Authenticator
// ---------------------------------------------------------------------------

/// Credential exchange with the account backend.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve credentials to the owner id. Unknown e-mail and wrong
    /// password are both [`CoreError::InvalidCredentials`].
    async fn sign_in(&self, credentials: &Credentials) -> Result<OwnerId, CoreError>;

    /// Register a new account. An e-mail already in use is
    /// [`CoreError::Conflict`].
    async fn sign_up(&self, credentials: &Credentials) -> Result<OwnerId, CoreError>;
}

/// Account table kept in memory. Passwords are compared verbatim, so this
/// is only suitable for tests and local demos.
#[derive(Debug, Default)]
pub struct MemoryAuthenticator {
    accounts: Mutex<HashMap<String, (OwnerId, String)>>,
}

impl MemoryAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, (OwnerId, String)>>, CoreError> {
        self.accounts
            .lock()
            .map_err(|_| CoreError::Internal("account table lock poisoned".into()))
    }
}

#[async_trait]
impl Authenticator for MemoryAuthenticator {
    async fn sign_in(&self, credentials: &Credentials) -> Result<OwnerId, CoreError> {
        credentials.check()?;
        let accounts = self.accounts()?;
        match accounts.get(&normalize_email(&credentials.email)) {
            Some((owner, password)) if *password == credentials.password => Ok(*owner),
            _ => Err(CoreError::InvalidCredentials),
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<OwnerId, CoreError> {
        credentials.check()?;
        let email = normalize_email(&credentials.email);
        let mut accounts = self.accounts()?;
        if accounts.contains_key(&email) {
            return Err(CoreError::Conflict(format!(
                "An account already exists for {email}"
            )));
        }
        let owner = Uuid::now_v7();
        accounts.insert(email, (owner, credentials.password.clone()));
        Ok(owner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
