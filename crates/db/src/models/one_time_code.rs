//! One-time-code model.

use ideamart_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A one-time code row. Only the SHA-256 digest of the code is stored.
///
/// `consumed` flips to `true` exactly once; a consumed or expired code never
/// verifies again.
#[derive(Debug, Clone, FromRow)]
pub struct OneTimeCode {
    pub id: DbId,
    pub mobile_number: String,
    pub code_hash: String,
    pub expires_at: Timestamp,
    pub consumed: bool,
    pub created_at: Timestamp,
}
