//! Store-backed sliding-window rate limiting keyed by login identifier.
//!
//! The window is evaluated lazily against the append-only `login_attempts`
//! ledger at check time; there is no background expiry job and no in-memory
//! counter, so horizontally scaled processes all see the same state.
//! Successful attempts stop adding failures but never remove prior failures
//! from the count.

use chrono::{Duration, Utc};

use ideamart_core::error::AuthError;
use ideamart_core::types::{DbId, Timestamp};
use ideamart_db::repositories::LoginAttemptRepo;
use ideamart_db::DbPool;

use crate::store_err;

/// Sliding-window failure limiter.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    max_attempts: i64,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_attempts: i64, window_minutes: i64) -> Self {
        Self {
            max_attempts,
            window: Duration::minutes(window_minutes),
        }
    }

    /// Append one attempt outcome to the ledger. Recording is unconditional;
    /// this method never rejects an attempt by itself.
    pub async fn record(
        &self,
        pool: &DbPool,
        identifier: &str,
        success: bool,
        user_id: Option<DbId>,
    ) -> Result<(), AuthError> {
        LoginAttemptRepo::create(pool, identifier, success, user_id)
            .await
            .map_err(store_err)
    }

    /// True when the identifier has accumulated `max_attempts` failures
    /// inside the current window.
    pub async fn is_limited(&self, pool: &DbPool, identifier: &str) -> Result<bool, AuthError> {
        let since = Utc::now() - self.window;
        let failures = LoginAttemptRepo::count_failed_since(pool, identifier, since)
            .await
            .map_err(store_err)?;
        Ok(failures >= self.max_attempts)
    }

    /// The instant at which the oldest in-window failure falls out of the
    /// window, i.e. the earliest moment one more attempt frees up. `None`
    /// when there are no in-window failures.
    pub async fn expiration_of(
        &self,
        pool: &DbPool,
        identifier: &str,
    ) -> Result<Option<Timestamp>, AuthError> {
        let since = Utc::now() - self.window;
        let oldest = LoginAttemptRepo::oldest_failed_since(pool, identifier, since)
            .await
            .map_err(store_err)?;
        Ok(oldest.map(|attempt| attempt.attempted_at + self.window))
    }
}
