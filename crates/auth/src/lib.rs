//! Authentication and session subsystem for the Ideamart marketplace.
//!
//! Callers normally go through [`service::AuthService`], which wires the
//! rate limiter, the credential and OTP authenticators, and the session
//! manager into the login and registration flows. The individual components
//! are public so the surrounding layer can reuse them in tooling and tests.

pub mod config;
pub mod credentials;
pub mod otp;
pub mod password;
pub mod rate_limit;
pub mod service;
pub mod session;
pub mod sms;
pub mod token;

pub use config::{AuthConfig, ConfigError};
pub use service::AuthService;

use ideamart_core::error::AuthError;

/// Convert a store failure into the generic internal error.
///
/// The detail goes to server-side logs only; callers see the uniform
/// `INTERNAL_ERROR` envelope.
pub(crate) fn store_err(err: sqlx::Error) -> AuthError {
    tracing::error!(error = %err, "store operation failed");
    AuthError::Internal(err.to_string())
}
