//! Repository-level tests against a live PostgreSQL schema.

mod support {
    use ideamart_db::models::user::CreateUser;

    /// A credential-account DTO with a placeholder hash (hashing itself is
    /// covered in the auth crate).
    pub fn credential_user(username: &str) -> CreateUser {
        CreateUser {
            username: Some(username.to_string()),
            password_hash: Some("$argon2id$placeholder".to_string()),
            mobile_number: None,
        }
    }
}

use chrono::{Duration, Utc};
use ideamart_db::models::session::CreateSession;
use ideamart_db::models::user::CreateUser;
use ideamart_db::repositories::{LoginAttemptRepo, OtpRepo, SessionRepo, UserRepo};
use ideamart_db::{health_check, is_unique_violation};
use sqlx::PgPool;
use support::credential_user;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_check(pool: PgPool) {
    health_check(&pool).await.expect("health check should pass");
}

/// The users table rejects rows without any identifier, and lookups work by
/// either identifier.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_identifier_invariant_and_lookups(pool: PgPool) {
    let no_identifier = CreateUser {
        username: None,
        password_hash: None,
        mobile_number: None,
    };
    assert!(
        UserRepo::create(&pool, &no_identifier).await.is_err(),
        "a user without username or mobile number must be rejected"
    );

    let by_name = UserRepo::create(&pool, &credential_user("finder")).await.unwrap();
    let by_mobile = UserRepo::create(
        &pool,
        &CreateUser {
            username: None,
            password_hash: None,
            mobile_number: Some("+14155550100".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(
        UserRepo::find_by_username(&pool, "finder").await.unwrap().unwrap().id,
        by_name.id
    );
    assert_eq!(
        UserRepo::find_by_mobile(&pool, "+14155550100").await.unwrap().unwrap().id,
        by_mobile.id
    );
    assert!(UserRepo::find_by_username(&pool, "absent").await.unwrap().is_none());
    assert!(UserRepo::find_by_id(&pool, by_name.id).await.unwrap().is_some());
}

/// Unique violations are classified by constraint name.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_violation_classification(pool: PgPool) {
    UserRepo::create(&pool, &credential_user("dupe")).await.unwrap();
    let err = UserRepo::create(&pool, &credential_user("dupe")).await.unwrap_err();

    assert!(is_unique_violation(&err, "uq_users_username"));
    assert!(!is_unique_violation(&err, "uq_users_mobile_number"));
}

/// Consuming a code is a compare-and-set: only the first call reports a row
/// change.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_consumed_is_conditional(pool: PgPool) {
    let code = OtpRepo::create(&pool, "+14155550101", "digest", Utc::now() + Duration::minutes(5))
        .await
        .unwrap();

    assert!(OtpRepo::mark_consumed(&pool, code.id).await.unwrap());
    assert!(!OtpRepo::mark_consumed(&pool, code.id).await.unwrap());

    let row = OtpRepo::find_latest_for(&pool, "+14155550101")
        .await
        .unwrap()
        .unwrap();
    assert!(row.consumed);
}

/// The latest code for a number is the most recently created row.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_latest_prefers_newest(pool: PgPool) {
    let expires = Utc::now() + Duration::minutes(5);
    let _first = OtpRepo::create(&pool, "+14155550102", "digest-a", expires).await.unwrap();
    let second = OtpRepo::create(&pool, "+14155550102", "digest-b", expires).await.unwrap();

    let latest = OtpRepo::find_latest_for(&pool, "+14155550102")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, second.id);
    assert_eq!(latest.code_hash, "digest-b");
}

/// Cleanup removes consumed and expired codes but leaves a live one.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_expired_codes(pool: PgPool) {
    let live = OtpRepo::create(&pool, "+14155550103", "live", Utc::now() + Duration::minutes(5))
        .await
        .unwrap();
    let stale = OtpRepo::create(&pool, "+14155550104", "stale", Utc::now() - Duration::minutes(1))
        .await
        .unwrap();
    let used = OtpRepo::create(&pool, "+14155550105", "used", Utc::now() + Duration::minutes(5))
        .await
        .unwrap();
    OtpRepo::mark_consumed(&pool, used.id).await.unwrap();

    let deleted = OtpRepo::delete_expired(&pool).await.unwrap();
    assert_eq!(deleted, 2, "stale ({}) and used ({}) rows should go", stale.id, used.id);

    let remaining = OtpRepo::find_latest_for(&pool, "+14155550103")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(remaining.id, live.id);
}

/// Windowed ledger reads: failures inside the window are counted, successes
/// and out-of-window failures are not, and the oldest in-window failure is
/// identified.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_attempt_window_queries(pool: PgPool) {
    let id = "window_user";
    LoginAttemptRepo::create(&pool, id, false, None).await.unwrap();
    LoginAttemptRepo::create(&pool, id, false, None).await.unwrap();
    LoginAttemptRepo::create(&pool, id, true, None).await.unwrap();
    LoginAttemptRepo::create(&pool, "someone_else", false, None).await.unwrap();

    // Age the first failure out of the window.
    sqlx::query(
        "UPDATE login_attempts SET attempted_at = NOW() - INTERVAL '20 minutes'
         WHERE id = (SELECT MIN(id) FROM login_attempts WHERE identifier = $1)",
    )
    .bind(id)
    .execute(&pool)
    .await
    .unwrap();

    let since = Utc::now() - Duration::minutes(15);
    assert_eq!(
        LoginAttemptRepo::count_failed_since(&pool, id, since).await.unwrap(),
        1
    );

    let oldest = LoginAttemptRepo::oldest_failed_since(&pool, id, since)
        .await
        .unwrap()
        .unwrap();
    assert!(!oldest.success);
    assert!(oldest.attempted_at >= since);

    // Retention pruning drops the aged row only.
    let pruned = LoginAttemptRepo::prune_before(&pool, since).await.unwrap();
    assert_eq!(pruned, 1);
}

/// Session rows delete by token exactly once; bulk cleanup removes only
/// expired rows.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_delete_semantics(pool: PgPool) {
    let user = UserRepo::create(&pool, &credential_user("session_owner")).await.unwrap();

    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            token: "live-token".to_string(),
            expires_at: Utc::now() + Duration::days(7),
        },
    )
    .await
    .unwrap();
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            token: "stale-token".to_string(),
            expires_at: Utc::now() - Duration::days(1),
        },
    )
    .await
    .unwrap();

    assert!(SessionRepo::delete_by_token(&pool, "live-token").await.unwrap());
    assert!(!SessionRepo::delete_by_token(&pool, "live-token").await.unwrap());

    assert_eq!(SessionRepo::delete_expired(&pool).await.unwrap(), 1);
    assert!(
        SessionRepo::find_by_token(&pool, "stale-token").await.unwrap().is_none(),
        "expired session should be gone"
    );
}
