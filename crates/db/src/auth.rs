//! [`Authenticator`] backed by the `users` table.

use async_trait::async_trait;
use recipebook_core::auth::{normalize_email, Authenticator, Credentials};
use recipebook_core::error::CoreError;
use recipebook_core::types::OwnerId;
use uuid::Uuid;

use crate::error::map_sqlx_error;
use crate::models::user::CreateUser;
use crate::password;
use crate::repositories::UserRepo;
use crate::DbPool;

const ENTITY: &str = "user";

/// E-mail / password accounts with Argon2id hashes.
#[derive(Debug, Clone)]
pub struct PgAuthenticator {
    pool: DbPool,
}

impl PgAuthenticator {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Authenticator for PgAuthenticator {
    async fn sign_in(&self, credentials: &Credentials) -> Result<OwnerId, CoreError> {
        credentials.check()?;
        let email = normalize_email(&credentials.email);

        let Some(user) = UserRepo::find_by_email(&self.pool, &email)
            .await
            .map_err(|e| map_sqlx_error(e, ENTITY))?
        else {
            tracing::info!(%email, "Sign-in for unknown account");
            return Err(CoreError::InvalidCredentials);
        };

        if !password::matches(&credentials.password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Sign-in with wrong password");
            return Err(CoreError::InvalidCredentials);
        }

        UserRepo::record_login(&self.pool, user.id)
            .await
            .map_err(|e| map_sqlx_error(e, ENTITY))?;
        tracing::info!(user_id = %user.id, "User signed in");
        Ok(user.id)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<OwnerId, CoreError> {
        credentials.check()?;
        let email = normalize_email(&credentials.email);
        let password_hash = password::hash(&credentials.password)?;

        let user = UserRepo::create(
            &self.pool,
            Uuid::now_v7(),
            &CreateUser {
                email: email.clone(),
                password_hash,
            },
        )
        .await
        .map_err(|e| match map_sqlx_error(e, ENTITY) {
            CoreError::Conflict(_) => {
                CoreError::Conflict(format!("An account already exists for {email}"))
            }
            other => other,
        })?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user.id)
    }
}
