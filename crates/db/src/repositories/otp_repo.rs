//! Repository for the `one_time_codes` table.

use sqlx::PgPool;

use ideamart_core::types::{DbId, Timestamp};

use crate::models::one_time_code::OneTimeCode;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, mobile_number, code_hash, expires_at, consumed, created_at";

/// Operations over one-time codes.
///
/// Each request appends a fresh row; verification always reads the latest
/// row for a number, so an older unconsumed code is superseded by recency
/// rather than mutated.
pub struct OtpRepo;

impl OtpRepo {
    /// Insert a fresh code row for the number.
    pub async fn create(
        pool: &PgPool,
        mobile_number: &str,
        code_hash: &str,
        expires_at: Timestamp,
    ) -> Result<OneTimeCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO one_time_codes (mobile_number, code_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OneTimeCode>(&query)
            .bind(mobile_number)
            .bind(code_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// The most recent code row for the number, consumed or not.
    pub async fn find_latest_for(
        pool: &PgPool,
        mobile_number: &str,
    ) -> Result<Option<OneTimeCode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM one_time_codes
             WHERE mobile_number = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, OneTimeCode>(&query)
            .bind(mobile_number)
            .fetch_optional(pool)
            .await
    }

    /// Conditionally mark a code consumed.
    ///
    /// Returns `true` only for the first caller; the `consumed = false`
    /// predicate makes this a compare-and-set, so of two concurrent
    /// verifiers exactly one wins.
    pub async fn mark_consumed(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE one_time_codes SET consumed = true WHERE id = $1 AND consumed = false")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk-delete consumed and expired codes. Returns the count of deleted
    /// rows. For an external sweeper; the auth core never requires it.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM one_time_codes WHERE consumed = true OR expires_at <= NOW()")
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
