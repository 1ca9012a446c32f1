//! Error taxonomy for the authentication subsystem.
//!
//! Every exposed operation returns [`AuthError`] on failure. Each variant
//! carries a stable machine code ([`AuthError::code`]) and the HTTP status
//! the transport layer should map it to ([`AuthError::http_status`]).
//!
//! The uniformity of [`AuthError::AuthFailed`] and [`AuthError::OtpInvalid`]
//! across their distinct internal causes is a security invariant, not an
//! oversight: callers (and attackers) must not be able to tell "no such
//! account" from "wrong secret".

use crate::types::Timestamp;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Malformed input, rejected before the store is touched.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Credential login failure. Identical for "no such user", "account has
    /// no password", and "wrong password".
    #[error("Authentication failed")]
    AuthFailed,

    /// OTP verification failure. Identical for "no code", "consumed",
    /// "expired", and "wrong code".
    #[error("Invalid or expired code")]
    OtpInvalid,

    /// Too many recent failures for this identifier.
    #[error("Too many failed attempts; retry after {retry_after}")]
    RateLimited { retry_after: Timestamp },

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Mobile number is already registered")]
    MobileTaken,

    /// Unknown or expired session token. The two causes are not
    /// distinguished.
    #[error("Session not found")]
    SessionNotFound,

    /// A correct OTP was presented for a mobile number with no account.
    #[error("No account is registered for this mobile number")]
    UserNotFound,

    /// Store or provider failure. The inner detail is for server-side logs
    /// only; the display form leaks nothing.
    #[error("An internal error occurred")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable code for error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation { .. } => "VALIDATION_ERROR",
            AuthError::AuthFailed => "AUTH_FAILED",
            AuthError::OtpInvalid => "OTP_INVALID",
            AuthError::RateLimited { .. } => "RATE_LIMITED",
            AuthError::UsernameTaken => "USERNAME_TAKEN",
            AuthError::MobileTaken => "MOBILE_TAKEN",
            AuthError::SessionNotFound => "SESSION_NOT_FOUND",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for the transport layer.
    pub fn http_status(&self) -> u16 {
        match self {
            AuthError::Validation { .. } => 400,
            AuthError::AuthFailed | AuthError::OtpInvalid => 401,
            AuthError::RateLimited { .. } => 429,
            AuthError::UsernameTaken | AuthError::MobileTaken => 409,
            AuthError::SessionNotFound | AuthError::UserNotFound => 404,
            AuthError::Internal(_) => 500,
        }
    }
}
