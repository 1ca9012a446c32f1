//! One-time-code login over SMS.
//!
//! Per-number state machine: a request writes a fresh code row (digest
//! only), verification succeeds at most once per code and only before
//! expiry. Every failure mode -- no code, consumed, expired, wrong code --
//! surfaces as the same `OTP_INVALID` error so a caller learns nothing about
//! which one occurred.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;

use ideamart_core::error::AuthError;
use ideamart_core::hashing::{digest_eq, sha256_hex};
use ideamart_core::validate::validate_mobile_number;
use ideamart_db::models::user::{CreateUser, User};
use ideamart_db::repositories::{OtpRepo, UserRepo};
use ideamart_db::{is_unique_violation, DbPool};

use crate::sms::SmsProvider;
use crate::store_err;

/// Digits in a generated code.
const CODE_LEN: usize = 6;

/// Generates, dispatches, and verifies time-boxed one-time codes.
pub struct OtpEngine {
    ttl: Duration,
    sms: Arc<dyn SmsProvider>,
}

impl OtpEngine {
    pub fn new(ttl_minutes: i64, sms: Arc<dyn SmsProvider>) -> Self {
        Self {
            ttl: Duration::minutes(ttl_minutes),
            sms,
        }
    }

    /// Generate and dispatch a fresh code for the number.
    ///
    /// An earlier unconsumed code is superseded by recency: verification
    /// always checks the most recent code, and a new request is never
    /// blocked by an outstanding one. The raw code goes only into the SMS
    /// body; the store and the log see its digest or nothing.
    pub async fn request_code(&self, pool: &DbPool, mobile_number: &str) -> Result<(), AuthError> {
        validate_mobile_number(mobile_number)?;

        let code = generate_code();
        let expires_at = Utc::now() + self.ttl;
        OtpRepo::create(pool, mobile_number, &sha256_hex(code.as_bytes()), expires_at)
            .await
            .map_err(store_err)?;

        let body = format!(
            "Your Ideamart verification code is {code}. It expires in {} minutes.",
            self.ttl.num_minutes()
        );
        self.sms.send(mobile_number, &body).await.map_err(|e| {
            tracing::error!(identifier = %mobile_number, error = %e, "otp dispatch failed");
            AuthError::Internal(e.to_string())
        })?;

        tracing::info!(identifier = %mobile_number, "otp dispatched");
        Ok(())
    }

    /// Verify a code for the number, returning the account it unlocks.
    ///
    /// Consumption is a conditional update: of two concurrent verifiers
    /// presenting the correct code, exactly one wins and the other gets the
    /// uniform failure.
    pub async fn verify_code(
        &self,
        pool: &DbPool,
        mobile_number: &str,
        code: &str,
    ) -> Result<User, AuthError> {
        validate_mobile_number(mobile_number)?;

        let Some(latest) = OtpRepo::find_latest_for(pool, mobile_number)
            .await
            .map_err(store_err)?
        else {
            return Err(AuthError::OtpInvalid);
        };

        if latest.consumed
            || latest.expires_at <= Utc::now()
            || !digest_eq(&sha256_hex(code.as_bytes()), &latest.code_hash)
        {
            tracing::info!(identifier = %mobile_number, "otp verification rejected");
            return Err(AuthError::OtpInvalid);
        }

        if !OtpRepo::mark_consumed(pool, latest.id)
            .await
            .map_err(store_err)?
        {
            // Lost the consume race; indistinguishable from any other miss.
            return Err(AuthError::OtpInvalid);
        }

        match UserRepo::find_by_mobile(pool, mobile_number)
            .await
            .map_err(store_err)?
        {
            Some(user) => {
                tracing::info!(user_id = user.id, "otp verified");
                Ok(user)
            }
            None => Err(AuthError::UserNotFound),
        }
    }

    /// Register an account keyed by mobile number.
    ///
    /// Verifying a code does not create an account; this explicit operation
    /// does. A uniqueness conflict surfaces as `MOBILE_TAKEN`.
    pub async fn register_mobile(pool: &DbPool, mobile_number: &str) -> Result<User, AuthError> {
        validate_mobile_number(mobile_number)?;

        let input = CreateUser {
            username: None,
            password_hash: None,
            mobile_number: Some(mobile_number.to_string()),
        };
        match UserRepo::create(pool, &input).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "mobile account registered");
                Ok(user)
            }
            Err(e) if is_unique_violation(&e, "uq_users_mobile_number") => {
                Err(AuthError::MobileTaken)
            }
            Err(e) => Err(store_err(e)),
        }
    }
}

/// A fresh zero-padded numeric code.
fn generate_code() -> String {
    let max = 10u32.pow(CODE_LEN as u32);
    let n = rand::rng().random_range(0..max);
    format!("{n:0width$}", width = CODE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..64 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LEN);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }
}
