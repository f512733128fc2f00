//! Sign-in state for the running app.
//!
//! [`SessionManager`] is the [`AuthState`] the list and editor screens
//! consult. It optionally remembers the last e-mail used so the login form
//! can be prefilled; the password is never written to disk.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use recipebook_core::auth::{check_new_password, AuthState, Authenticator, Credentials};
use recipebook_core::error::CoreError;
use recipebook_core::types::OwnerId;
use serde::{Deserialize, Serialize};

/// File name of the remember-me record inside the data directory.
pub const REMEMBERED_LOGIN_FILE: &str = "remembered_login.json";

/// A signed-in owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub owner_id: OwnerId,
    pub email: String,
}

// ---------------------------------------------------------------------------
// RememberedLogin
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct RememberedLoginFile {
    email: String,
}

/// JSON file holding the last remembered e-mail.
#[derive(Debug, Clone)]
pub struct RememberedLogin {
    path: PathBuf,
}

impl RememberedLogin {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Remember-me record stored under `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(REMEMBERED_LOGIN_FILE))
    }

    /// The remembered e-mail, `None` when nothing has been saved.
    pub async fn load(&self) -> Result<Option<String>, CoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CoreError::Internal(format!(
                    "Cannot read {}: {e}",
                    self.path.display()
                )))
            }
        };
        let file: RememberedLoginFile = serde_json::from_str(&raw).map_err(|e| {
            CoreError::Internal(format!("Malformed {}: {e}", self.path.display()))
        })?;
        Ok(Some(file.email))
    }

    pub async fn save(&self, email: &str) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CoreError::Internal(format!("Cannot create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(&RememberedLoginFile {
            email: email.to_string(),
        })
        .map_err(|e| CoreError::Internal(e.to_string()))?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            CoreError::Internal(format!("Cannot write {}: {e}", self.path.display()))
        })
    }

    /// Forget the remembered e-mail. Clearing twice is fine.
    pub async fn clear(&self) -> Result<(), CoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Internal(format!(
                "Cannot remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionManager
// ---------------------------------------------------------------------------

pub struct SessionManager {
    authenticator: Arc<dyn Authenticator>,
    remembered: RememberedLogin,
    password_min_length: usize,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        remembered: RememberedLogin,
        password_min_length: usize,
    ) -> Self {
        Self {
            authenticator,
            remembered,
            password_min_length,
            current: RwLock::new(None),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// E-mail to prefill on the login form.
    ///
    /// An unreadable remember-me file is logged and treated as empty.
    pub async fn remembered_email(&self) -> Option<String> {
        match self.remembered.load().await {
            Ok(email) => email,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring remembered login");
                None
            }
        }
    }

    /// Sign in and, when `remember` is set, store the e-mail for next time.
    ///
    /// Unchecking `remember` forgets any previously stored e-mail. Failing
    /// to update the remember-me file does not fail the sign-in.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<Session, CoreError> {
        let (owner_id, email) = self.authenticate(email, password).await?;

        let persisted = if remember {
            self.remembered.save(&email).await
        } else {
            self.remembered.clear().await
        };
        if let Err(e) = persisted {
            tracing::warn!(error = %e, "Failed to update remembered login");
        }

        Ok(self.establish(owner_id, email))
    }

    /// Sign in without touching the remembered e-mail.
    ///
    /// Used when credentials are supplied by something other than the login
    /// form, e.g. every non-login CLI command.
    pub async fn resume(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        let (owner_id, email) = self.authenticate(email, password).await?;
        Ok(self.establish(owner_id, email))
    }

    /// Register a new account and sign it in.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Session, CoreError> {
        check_new_password(password, confirmation, self.password_min_length)?;
        let credentials = Credentials::new(email, password);
        credentials.check()?;

        let owner_id = self.authenticator.sign_up(&credentials).await?;
        tracing::info!(owner_id = %owner_id, "Account created");
        Ok(self.establish(owner_id, credentials.email))
    }

    /// Drop the current session. The remembered e-mail is kept.
    pub fn sign_out(&self) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(session) = previous {
            tracing::info!(owner_id = %session.owner_id, "Signed out");
        }
    }

    /// Resolve credentials to an owner, returning the normalized e-mail.
    async fn authenticate(&self, email: &str, password: &str) -> Result<(OwnerId, String), CoreError> {
        let credentials = Credentials::new(email, password);
        credentials.check()?;

        match self.authenticator.sign_in(&credentials).await {
            Ok(owner_id) => Ok((owner_id, credentials.email)),
            Err(e) => {
                tracing::info!(email = %credentials.email, error = %e, "Sign-in rejected");
                Err(e)
            }
        }
    }

    fn establish(&self, owner_id: OwnerId, email: String) -> Session {
        let session = Session { owner_id, email };
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        tracing::info!(owner_id = %owner_id, "Signed in");
        session
    }
}

impl AuthState for SessionManager {
    fn current_user_id(&self) -> Option<OwnerId> {
        self.current().map(|s| s.owner_id)
    }
}
