//! Login-attempt ledger model.

use ideamart_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// One row in the append-only `login_attempts` ledger.
///
/// Rows are never updated or deleted by the auth core; they are read back
/// only as windowed aggregates by the rate limiter.
#[derive(Debug, Clone, FromRow)]
pub struct LoginAttempt {
    pub id: DbId,
    /// The username or mobile number exactly as supplied at login.
    pub identifier: String,
    pub success: bool,
    /// Set when the attempt succeeded or the identifier resolved to a real
    /// account.
    pub user_id: Option<DbId>,
    pub attempted_at: Timestamp,
}
