//! SMS delivery providers.
//!
//! The auth core depends only on the [`SmsProvider`] capability. The
//! concrete provider is selected once at startup from
//! [`SmsProviderKind`](crate::config::SmsProviderKind); nothing downstream
//! branches on which one is in use.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::{SmsProviderKind, TwilioConfig};

/// Failure to hand a message to the delivery channel.
#[derive(Debug, thiserror::Error)]
#[error("SMS dispatch failed: {0}")]
pub struct SmsError(pub String);

/// Capability interface for sending one text message.
#[async_trait]
pub trait SmsProvider: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError>;
}

/// Build the configured provider.
pub fn provider_for(kind: &SmsProviderKind) -> Arc<dyn SmsProvider> {
    match kind {
        SmsProviderKind::Mock => Arc::new(MockSms::new()),
        SmsProviderKind::Twilio(config) => Arc::new(TwilioSms::new(config)),
    }
}

/// A message captured by [`MockSms`].
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub to: String,
    pub body: String,
}

/// In-memory provider for development and tests.
///
/// Messages are recorded instead of delivered. Bodies are never written to
/// the log because they contain one-time codes.
#[derive(Debug, Default)]
pub struct MockSms {
    sent: Mutex<Vec<SentMessage>>,
}

impl MockSms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded so far, oldest first.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl SmsProvider for MockSms {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        tracing::info!(to = %to, "mock sms recorded");
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(SentMessage {
                to: to.to_string(),
                body: body.to_string(),
            });
        Ok(())
    }
}

/// Twilio Messages API provider.
pub struct TwilioSms {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSms {
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        }
    }
}

#[async_trait]
impl SmsProvider for TwilioSms {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );
        let params = [("To", to), ("From", self.from_number.as_str()), ("Body", body)];

        let response = self
            .client
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| SmsError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, to = %to, detail = %detail, "twilio rejected message");
            return Err(SmsError(format!("Twilio returned {status}")));
        }
        Ok(())
    }
}
