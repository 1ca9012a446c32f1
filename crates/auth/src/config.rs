//! Startup configuration resolved from the environment.
//!
//! Resolution is fallible rather than panicking: a [`ConfigError`] means the
//! process must refuse to start, since running with defaulted-away security
//! parameters is worse than not running.

use ideamart_core::validate::validate_mobile_number;

/// Default session lifetime in days.
const DEFAULT_SESSION_EXPIRY_DAYS: i64 = 7;
/// Default one-time-code lifetime in minutes.
const DEFAULT_OTP_EXPIRY_MINUTES: i64 = 5;
/// Default failure count that trips the rate limiter.
const DEFAULT_RATE_LIMIT_ATTEMPTS: i64 = 5;
/// Default sliding-window width in minutes.
const DEFAULT_RATE_LIMIT_WINDOW_MINUTES: i64 = 15;

/// Invalid or missing environment configuration. Startup-fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{0} must be a positive integer, got {1:?}")]
    NotPositive(&'static str, String),

    #[error("SMS_PROVIDER must be 'mock' or 'twilio', got {0:?}")]
    UnknownSmsProvider(String),

    #[error("{0} must be an E.164 phone number")]
    InvalidPhoneNumber(&'static str),
}

/// Credentials for the Twilio Messages API.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number, E.164.
    pub from_number: String,
}

/// Which SMS delivery channel to use, chosen once at startup.
#[derive(Debug, Clone)]
pub enum SmsProviderKind {
    Mock,
    Twilio(TwilioConfig),
}

/// Auth subsystem configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub database_url: String,
    pub session_expiry_days: i64,
    pub otp_expiry_minutes: i64,
    pub rate_limit_attempts: i64,
    pub rate_limit_window_minutes: i64,
    pub sms: SmsProviderKind,
}

impl AuthConfig {
    /// Load configuration from the environment (`.env` honored first).
    ///
    /// | Env Var                     | Required    | Default |
    /// |-----------------------------|-------------|---------|
    /// | `DATABASE_URL`              | **yes**     | --      |
    /// | `SESSION_EXPIRY_DAYS`       | no          | `7`     |
    /// | `OTP_EXPIRY_MINUTES`        | no          | `5`     |
    /// | `RATE_LIMIT_ATTEMPTS`       | no          | `5`     |
    /// | `RATE_LIMIT_WINDOW_MINUTES` | no          | `15`    |
    /// | `SMS_PROVIDER`              | no          | `mock`  |
    /// | `TWILIO_ACCOUNT_SID`        | with twilio | --      |
    /// | `TWILIO_AUTH_TOKEN`         | with twilio | --      |
    /// | `TWILIO_PHONE_NUMBER`       | with twilio | --      |
    ///
    /// Numeric values must be positive integers.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = require_env("DATABASE_URL")?;
        let session_expiry_days = positive_int("SESSION_EXPIRY_DAYS", DEFAULT_SESSION_EXPIRY_DAYS)?;
        let otp_expiry_minutes = positive_int("OTP_EXPIRY_MINUTES", DEFAULT_OTP_EXPIRY_MINUTES)?;
        let rate_limit_attempts = positive_int("RATE_LIMIT_ATTEMPTS", DEFAULT_RATE_LIMIT_ATTEMPTS)?;
        let rate_limit_window_minutes =
            positive_int("RATE_LIMIT_WINDOW_MINUTES", DEFAULT_RATE_LIMIT_WINDOW_MINUTES)?;

        let provider = std::env::var("SMS_PROVIDER").unwrap_or_else(|_| "mock".into());
        let sms = match provider.as_str() {
            "mock" => SmsProviderKind::Mock,
            "twilio" => {
                let from_number = require_env("TWILIO_PHONE_NUMBER")?;
                if validate_mobile_number(&from_number).is_err() {
                    return Err(ConfigError::InvalidPhoneNumber("TWILIO_PHONE_NUMBER"));
                }
                SmsProviderKind::Twilio(TwilioConfig {
                    account_sid: require_env("TWILIO_ACCOUNT_SID")?,
                    auth_token: require_env("TWILIO_AUTH_TOKEN")?,
                    from_number,
                })
            }
            other => return Err(ConfigError::UnknownSmsProvider(other.to_string())),
        };

        Ok(Self {
            database_url,
            session_expiry_days,
            otp_expiry_minutes,
            rate_limit_attempts,
            rate_limit_window_minutes,
            sms,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// Resolve an optional positive-integer variable, falling back to `default`
/// when unset or empty.
fn positive_int(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    let raw = match std::env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => return Ok(default),
    };
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::NotPositive(name, raw)),
    }
}
