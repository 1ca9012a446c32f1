//! The auth orchestrator.
//!
//! [`AuthService`] is what the surrounding web/CLI layer calls. Every login
//! path runs the same shape:
//!
//! 1. rate-limit check -- a limited identifier never reaches a password or
//!    code comparison, so limiting adds no timing signal;
//! 2. the underlying authenticator (credentials or OTP);
//! 3. an unconditional ledger record of the outcome, user id included only
//!    when one is known;
//! 4. session issuance on success.

use std::sync::Arc;

use chrono::Utc;

use ideamart_core::error::AuthError;
use ideamart_db::models::session::Session;
use ideamart_db::models::user::User;
use ideamart_db::DbPool;

use crate::config::AuthConfig;
use crate::credentials::CredentialAuthenticator;
use crate::otp::OtpEngine;
use crate::rate_limit::RateLimiter;
use crate::session::SessionManager;
use crate::sms::SmsProvider;

/// Facade over the credential authenticator, OTP engine, rate limiter, and
/// session manager.
pub struct AuthService {
    pool: DbPool,
    limiter: RateLimiter,
    sessions: SessionManager,
    otp: OtpEngine,
}

impl AuthService {
    /// Wire the subsystem from configuration, a connected pool, and the
    /// startup-selected SMS provider.
    pub fn new(pool: DbPool, config: &AuthConfig, sms: Arc<dyn SmsProvider>) -> Self {
        Self {
            pool,
            limiter: RateLimiter::new(
                config.rate_limit_attempts,
                config.rate_limit_window_minutes,
            ),
            sessions: SessionManager::new(config.session_expiry_days),
            otp: OtpEngine::new(config.otp_expiry_minutes, sms),
        }
    }

    /// Register a username/password account.
    pub async fn register_with_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        CredentialAuthenticator::register(&self.pool, username, password).await
    }

    /// Register a mobile-number account.
    pub async fn register_with_mobile(&self, mobile_number: &str) -> Result<User, AuthError> {
        OtpEngine::register_mobile(&self.pool, mobile_number).await
    }

    /// Username/password login. Returns a fresh session on success.
    pub async fn login_with_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        self.check_limit(username).await?;

        let check = CredentialAuthenticator::login(&self.pool, username, password).await?;
        self.limiter
            .record(&self.pool, username, check.user.is_ok(), check.known_user_id)
            .await?;

        let user = check.user?;
        self.sessions.issue(&self.pool, user.id).await
    }

    /// Request a one-time code for a mobile number.
    ///
    /// A limited identifier is refused a new code; the request itself is not
    /// an authentication attempt and is not recorded in the ledger.
    pub async fn request_otp(&self, mobile_number: &str) -> Result<(), AuthError> {
        self.check_limit(mobile_number).await?;
        self.otp.request_code(&self.pool, mobile_number).await
    }

    /// Verify a one-time code. Returns a fresh session on success.
    pub async fn verify_otp(&self, mobile_number: &str, code: &str) -> Result<Session, AuthError> {
        self.check_limit(mobile_number).await?;

        let result = self.otp.verify_code(&self.pool, mobile_number, code).await;
        let user_id = result.as_ref().ok().map(|user| user.id);
        self.limiter
            .record(&self.pool, mobile_number, result.is_ok(), user_id)
            .await?;

        let user = result?;
        self.sessions.issue(&self.pool, user.id).await
    }

    /// Resolve a session token to its session.
    ///
    /// Unknown and expired tokens produce the same `SESSION_NOT_FOUND`.
    pub async fn validate_session_token(&self, token: &str) -> Result<Session, AuthError> {
        self.sessions
            .validate(&self.pool, token)
            .await?
            .ok_or(AuthError::SessionNotFound)
    }

    /// Log out. `true` when the session existed; safe to call repeatedly.
    pub async fn invalidate_session(&self, token: &str) -> Result<bool, AuthError> {
        self.sessions.invalidate(&self.pool, token).await
    }

    async fn check_limit(&self, identifier: &str) -> Result<(), AuthError> {
        if self.limiter.is_limited(&self.pool, identifier).await? {
            let retry_after = self
                .limiter
                .expiration_of(&self.pool, identifier)
                .await?
                .unwrap_or_else(Utc::now);
            tracing::warn!(identifier = %identifier, "rate limited");
            return Err(AuthError::RateLimited { retry_after });
        }
        Ok(())
    }
}
