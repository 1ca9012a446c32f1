//! Username + password authentication and registration.
//!
//! The login check is enumeration-proof: "no such user", "account has no
//! password", and "wrong password" are one indistinguishable failure. All
//! three paths pay for one Argon2 verification (against a dummy hash when
//! there is nothing real to compare), so response timing does not reveal
//! whether an account exists.

use ideamart_core::error::AuthError;
use ideamart_core::types::DbId;
use ideamart_core::validate::validate_username;
use ideamart_db::models::user::{CreateUser, User};
use ideamart_db::repositories::UserRepo;
use ideamart_db::{is_unique_violation, DbPool};

use crate::password::{hash_password, verify_password, DUMMY_HASH};
use crate::store_err;

/// Outcome of a credential check.
#[derive(Debug)]
pub struct CredentialCheck {
    /// The uniform caller-facing result.
    pub user: Result<User, AuthError>,
    /// The account the username resolved to, if any. Recorded in the attempt
    /// ledger even when the password was wrong.
    pub known_user_id: Option<DbId>,
}

/// Verifies username/password pairs and registers credential accounts.
pub struct CredentialAuthenticator;

impl CredentialAuthenticator {
    /// Check a username/password pair.
    ///
    /// The outer `Err` is a store failure only; authentication failure lives
    /// inside [`CredentialCheck::user`] so the caller can record the ledger
    /// entry before propagating it.
    pub async fn login(
        pool: &DbPool,
        username: &str,
        password: &str,
    ) -> Result<CredentialCheck, AuthError> {
        let found = UserRepo::find_by_username(pool, username)
            .await
            .map_err(store_err)?;
        let known_user_id = found.as_ref().map(|u| u.id);

        let verified = match found.as_ref().and_then(|u| u.password_hash.as_deref()) {
            Some(hash) => verify_password(password, hash),
            None => {
                // Same Argon2 work as the real compare.
                verify_password(password, &DUMMY_HASH);
                false
            }
        };

        let user = match (found, verified) {
            (Some(user), true) => Ok(user),
            _ => {
                tracing::info!(identifier = %username, "credential login rejected");
                Err(AuthError::AuthFailed)
            }
        };
        Ok(CredentialCheck {
            user,
            known_user_id,
        })
    }

    /// Register a username/password account.
    ///
    /// The username is validated before the store is touched; a uniqueness
    /// conflict at the store surfaces as `USERNAME_TAKEN`.
    pub async fn register(
        pool: &DbPool,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(AuthError::Validation {
                field: "password",
                message: "Password must not be empty".into(),
            });
        }

        let password_hash = hash_password(password)
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))?;

        let input = CreateUser {
            username: Some(username.to_string()),
            password_hash: Some(password_hash),
            mobile_number: None,
        };
        match UserRepo::create(pool, &input).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "credential account registered");
                Ok(user)
            }
            Err(e) if is_unique_violation(&e, "uq_users_username") => {
                Err(AuthError::UsernameTaken)
            }
            Err(e) => Err(store_err(e)),
        }
    }
}
