//! Session model and DTO.

use ideamart_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `sessions` table. The opaque token is the lookup
/// key; it carries no decodable structure.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for creating a new session.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
}
