//! User account model.

use recipebook_core::types::{OwnerId, Timestamp};
use sqlx::FromRow;

/// Full row from the `users` table.
///
/// Holds the password hash; never hand this to a presentation layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: OwnerId,
    pub email: String,
    pub password_hash: String,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new account. `email` must already be normalized.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
}
