//! Shared helpers for the auth integration tests.

use std::sync::Arc;

use ideamart_auth::config::{AuthConfig, SmsProviderKind};
use ideamart_auth::sms::MockSms;
use ideamart_auth::AuthService;
use ideamart_db::DbPool;

/// Configuration matching the documented defaults, with the mock provider.
pub fn test_config() -> AuthConfig {
    AuthConfig {
        database_url: "postgres://unused-in-tests".to_string(),
        session_expiry_days: 7,
        otp_expiry_minutes: 5,
        rate_limit_attempts: 5,
        rate_limit_window_minutes: 15,
        sms: SmsProviderKind::Mock,
    }
}

/// Build an [`AuthService`] over the test pool, returning the mock SMS
/// provider so tests can read the dispatched messages.
pub fn build_service(pool: DbPool) -> (AuthService, Arc<MockSms>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let sms = Arc::new(MockSms::new());
    let service = AuthService::new(pool, &test_config(), sms.clone());
    (service, sms)
}

/// Extract the 6-digit code from an SMS body produced by the OTP engine.
#[allow(dead_code)]
pub fn code_from_body(body: &str) -> String {
    body.split("code is ")
        .nth(1)
        .expect("sms body should contain a code")
        .chars()
        .take(6)
        .collect()
}

/// The code carried by the most recently dispatched mock message.
#[allow(dead_code)]
pub fn last_code(sms: &MockSms) -> String {
    let sent = sms.sent();
    let last = sent.last().expect("at least one sms should be recorded");
    code_from_body(&last.body)
}

/// A wrong-but-well-formed code: the given code with its last digit changed.
#[allow(dead_code)]
pub fn corrupt_code(code: &str) -> String {
    let mut chars: Vec<char> = code.chars().collect();
    let last = chars.last_mut().expect("code should not be empty");
    *last = if *last == '9' { '0' } else { '9' };
    chars.into_iter().collect()
}
