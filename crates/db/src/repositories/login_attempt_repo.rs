//! Repository for the append-only `login_attempts` ledger.

use sqlx::PgPool;

use ideamart_core::types::{DbId, Timestamp};

use crate::models::login_attempt::LoginAttempt;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, identifier, success, user_id, attempted_at";

/// Append and windowed-read operations over the attempt ledger.
///
/// There is no update or single-row delete: the ledger is append-only, and
/// the rate limiter evaluates its sliding window lazily at read time.
pub struct LoginAttemptRepo;

impl LoginAttemptRepo {
    /// Append one attempt outcome.
    pub async fn create(
        pool: &PgPool,
        identifier: &str,
        success: bool,
        user_id: Option<DbId>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO login_attempts (identifier, success, user_id) VALUES ($1, $2, $3)")
            .bind(identifier)
            .bind(success)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Count failed attempts for `identifier` at or after `since`.
    pub async fn count_failed_since(
        pool: &PgPool,
        identifier: &str,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM login_attempts
             WHERE identifier = $1 AND success = false AND attempted_at >= $2",
        )
        .bind(identifier)
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// The oldest failed attempt for `identifier` at or after `since`.
    pub async fn oldest_failed_since(
        pool: &PgPool,
        identifier: &str,
        since: Timestamp,
    ) -> Result<Option<LoginAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM login_attempts
             WHERE identifier = $1 AND success = false AND attempted_at >= $2
             ORDER BY attempted_at ASC, id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, LoginAttempt>(&query)
            .bind(identifier)
            .bind(since)
            .fetch_optional(pool)
            .await
    }

    /// Retention hook: delete ledger rows older than `cutoff`. Returns the
    /// count of deleted rows. The auth core never calls this.
    pub async fn prune_before(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM login_attempts WHERE attempted_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
