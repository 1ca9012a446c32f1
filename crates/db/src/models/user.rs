//! User entity model and DTOs.

use ideamart_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- never serialize this to responses directly.
/// Use [`UserResponse`] for external-facing output.
///
/// Invariant (enforced by a CHECK constraint): at least one of `username`
/// and `mobile_number` is set.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub mobile_number: Option<String>,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: Option<String>,
    pub mobile_number: Option<String>,
    pub is_admin: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            mobile_number: user.mobile_number,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The caller sets exactly the identifier
/// fields that apply to the account kind being registered.
#[derive(Debug)]
pub struct CreateUser {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub mobile_number: Option<String>,
}
