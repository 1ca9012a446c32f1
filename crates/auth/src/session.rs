//! Opaque-token session issuance, validation, and invalidation.

use chrono::{Duration, Utc};

use ideamart_core::error::AuthError;
use ideamart_core::types::DbId;
use ideamart_db::models::session::{CreateSession, Session};
use ideamart_db::repositories::SessionRepo;
use ideamart_db::DbPool;

use crate::store_err;
use crate::token::generate_session_token;

/// Issues and checks opaque session tokens backed by the `sessions` table.
///
/// Expiry is handled lazily: an expired row is detected (and purged) when
/// its token is next validated. No sweeper is required, though
/// [`SessionRepo::delete_expired`] exists for one.
#[derive(Debug, Clone)]
pub struct SessionManager {
    expiry: Duration,
}

impl SessionManager {
    pub fn new(expiry_days: i64) -> Self {
        Self {
            expiry: Duration::days(expiry_days),
        }
    }

    /// Create a session for the user and return it, token included.
    pub async fn issue(&self, pool: &DbPool, user_id: DbId) -> Result<Session, AuthError> {
        let input = CreateSession {
            user_id,
            token: generate_session_token(),
            expires_at: Utc::now() + self.expiry,
        };
        let session = SessionRepo::create(pool, &input).await.map_err(store_err)?;
        tracing::info!(user_id, session_id = session.id, "session issued");
        Ok(session)
    }

    /// Look up a token.
    ///
    /// An unknown token and an expired one produce the same `None`; the
    /// expired row is deleted on the way out.
    pub async fn validate(&self, pool: &DbPool, token: &str) -> Result<Option<Session>, AuthError> {
        let Some(session) = SessionRepo::find_by_token(pool, token)
            .await
            .map_err(store_err)?
        else {
            return Ok(None);
        };

        if session.expires_at <= Utc::now() {
            SessionRepo::delete_by_token(pool, token)
                .await
                .map_err(store_err)?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Delete a session by token. `true` when a row was removed, `false`
    /// when the token was already gone. Idempotent; a missing token is not
    /// an error, so repeated logout calls are safe.
    pub async fn invalidate(&self, pool: &DbPool, token: &str) -> Result<bool, AuthError> {
        let deleted = SessionRepo::delete_by_token(pool, token)
            .await
            .map_err(store_err)?;
        if deleted {
            tracing::info!("session invalidated");
        }
        Ok(deleted)
    }
}
