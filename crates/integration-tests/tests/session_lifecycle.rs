//! Session lifecycle scenarios: hydration, login, MFA, refresh, logout.
//!
//! Every test wires a real `SessionStore` against the canned backend and
//! in-memory storage from the fixture crate. No network is involved.
//!
//! Run with: `cargo test -p jobhub-integration-tests`

use std::sync::Arc;

use jobhub_client::session::{LoginErrorCategory, LoginOutcome, SessionStore};
use jobhub_client::storage::{KeyValueStore, MemoryStore, keys};
use jobhub_core::{User, UserPatch, UserRole};

use jobhub_integration_tests::{FixtureBackend, init_tracing, mfa_user, seeker};

fn app() -> (SessionStore, Arc<FixtureBackend>, Arc<MemoryStore>) {
    init_tracing();
    let backend = Arc::new(FixtureBackend::new());
    let storage = Arc::new(MemoryStore::new());
    let store = SessionStore::new(
        backend.clone(),
        storage.clone(),
        Some("device-test-1".to_owned()),
    );
    (store, backend, storage)
}

fn seed_cached_session(storage: &MemoryStore, account: &User) {
    let encoded = serde_json::to_string(account).expect("encode fixture user");
    storage.set(keys::ACCESS_TOKEN, "at-stored").expect("set");
    storage.set(keys::USER, &encoded).expect("set");
}

fn stored(storage: &MemoryStore, key: &str) -> Option<String> {
    storage.get(key).expect("storage read")
}

// ============================================================================
// Hydration
// ============================================================================

#[tokio::test]
async fn test_initialize_restores_cached_session_without_network() {
    let (store, backend, storage) = app();
    seed_cached_session(&storage, &seeker());

    store.initialize().await;

    let snapshot = store.snapshot();
    assert!(snapshot.is_authenticated);
    assert_eq!(snapshot.role(), Some(UserRole::JobSeeker));
    assert_eq!(store.access_token().as_deref(), Some("at-stored"));
    assert!(backend.calls().is_empty(), "fast path must not hit the network");
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let (store, backend, storage) = app();
    seed_cached_session(&storage, &seeker());

    store.initialize().await;
    let first = store.snapshot();
    store.initialize().await;

    assert_eq!(store.snapshot(), first);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_initialize_treats_junk_literals_as_signed_out() {
    let (store, backend, storage) = app();
    storage.set(keys::ACCESS_TOKEN, "undefined").expect("set");
    storage.set(keys::REFRESH_TOKEN, "null").expect("set");
    storage.set(keys::USER, "  ").expect("set");

    store.initialize().await;

    assert!(!store.is_authenticated());
    assert!(backend.calls().is_empty());
    for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER] {
        assert_eq!(stored(&storage, key), None, "junk under {key} must be purged");
    }
}

#[tokio::test]
async fn test_initialize_recovers_via_refresh_token() {
    // Only a refresh token survived the last visit (the access token and
    // cached user were lost). Hydration exchanges it and re-fetches the
    // profile.
    let (store, backend, storage) = app();
    backend.seed_session("at-old", Some("rt-stored"), &seeker());
    storage.set(keys::REFRESH_TOKEN, "rt-stored").expect("set");

    store.initialize().await;

    let snapshot = store.snapshot();
    assert!(snapshot.is_authenticated);
    assert_eq!(snapshot.role(), Some(UserRole::JobSeeker));
    assert_eq!(backend.calls(), ["refresh", "me"]);

    // The exchange rotated the pair; the old refresh token is gone.
    let rotated = stored(&storage, keys::REFRESH_TOKEN).expect("refresh token stored");
    assert_ne!(rotated, "rt-stored");
    assert!(stored(&storage, keys::USER).is_some(), "profile must be re-cached");
}

#[tokio::test]
async fn test_initialize_with_rejected_refresh_settles_signed_out() {
    let (store, backend, storage) = app();
    storage.set(keys::REFRESH_TOKEN, "rt-stored").expect("set");
    backend.set_refresh_down(true);

    store.initialize().await;

    assert!(!store.is_authenticated());
    for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER] {
        assert_eq!(stored(&storage, key), None, "{key} must be cleared");
    }
}

#[tokio::test]
async fn test_initialize_discards_corrupt_cached_user_and_refreshes() {
    let (store, backend, storage) = app();
    backend.seed_session("at-old", Some("rt-stored"), &seeker());
    storage.set(keys::ACCESS_TOKEN, "at-old").expect("set");
    storage.set(keys::REFRESH_TOKEN, "rt-stored").expect("set");
    storage.set(keys::USER, "{not json").expect("set");

    store.initialize().await;

    assert!(store.is_authenticated());
    assert_eq!(backend.calls(), ["refresh", "me"]);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_persists_grant_and_user() {
    let (store, _backend, storage) = app();

    let outcome = store
        .login("alex.doe@example.com", "password123")
        .await
        .expect("login");

    let LoginOutcome::Authenticated(user) = outcome else {
        panic!("expected a full grant, got an MFA challenge");
    };
    assert_eq!(user.user_type, UserRole::JobSeeker);

    let snapshot = store.snapshot();
    assert!(snapshot.is_authenticated);
    assert!(stored(&storage, keys::ACCESS_TOKEN).is_some());
    assert!(stored(&storage, keys::REFRESH_TOKEN).is_some());

    let cached = stored(&storage, keys::USER).expect("user cached");
    let parsed: User = serde_json::from_str(&cached).expect("cached user parses");
    assert_eq!(parsed.id, user.id);
}

#[tokio::test]
async fn test_login_rejection_leaves_session_untouched() {
    let (store, _backend, storage) = app();

    let error = store
        .login("alex.doe@example.com", "wrong-password")
        .await
        .expect_err("login must fail");

    assert_eq!(
        LoginErrorCategory::classify(&error),
        LoginErrorCategory::InvalidCredentials
    );
    assert!(!store.is_authenticated());
    assert_eq!(stored(&storage, keys::ACCESS_TOKEN), None);
}

#[tokio::test]
async fn test_unverified_login_offers_resend() {
    let (store, backend, _storage) = app();

    let error = store
        .login("pending@example.com", "password123")
        .await
        .expect_err("login must fail");

    let category = LoginErrorCategory::classify(&error);
    assert_eq!(category, LoginErrorCategory::EmailUnverified);
    assert!(category.is_resend_eligible());

    let message = store
        .resend_verification("pending@example.com")
        .await
        .expect("resend");
    assert_eq!(message, "Verification email sent");
    assert_eq!(backend.call_count("resend_verification"), 1);
}

#[tokio::test]
async fn test_locked_account_is_not_resend_eligible() {
    let (store, _backend, _storage) = app();

    let error = store
        .login("locked@example.com", "password123")
        .await
        .expect_err("login must fail");

    let category = LoginErrorCategory::classify(&error);
    assert_eq!(category, LoginErrorCategory::AccountLocked);
    assert!(!category.is_resend_eligible());
}

// ============================================================================
// MFA
// ============================================================================

#[tokio::test]
async fn test_mfa_challenge_then_completion() {
    let (store, _backend, storage) = app();

    let outcome = store
        .login("casey.otp@example.com", "password123")
        .await
        .expect("login");

    let LoginOutcome::MfaRequired { methods } = outcome else {
        panic!("expected an MFA challenge");
    };
    assert_eq!(methods, ["totp", "backup_code"]);

    let snapshot = store.snapshot();
    assert!(!snapshot.is_authenticated, "no tokens until the second factor");
    let challenge = snapshot.mfa.expect("challenge recorded");
    assert_eq!(challenge.mfa_token, "mfa-pending-7");

    store
        .complete_mfa_login("at-mfa-grant".to_owned(), mfa_user(), 900)
        .expect("complete MFA");

    let snapshot = store.snapshot();
    assert!(snapshot.is_authenticated);
    assert!(snapshot.mfa.is_none(), "challenge cleared after completion");
    // MFA grants carry no refresh token.
    assert_eq!(stored(&storage, keys::REFRESH_TOKEN), None);
    assert_eq!(stored(&storage, keys::ACCESS_TOKEN).as_deref(), Some("at-mfa-grant"));
}

#[tokio::test]
async fn test_cancelled_mfa_challenge_is_forgotten() {
    let (store, _backend, _storage) = app();
    store
        .login("casey.otp@example.com", "password123")
        .await
        .expect("login");
    assert!(store.snapshot().mfa.is_some());

    store.cancel_mfa();

    let snapshot = store.snapshot();
    assert!(snapshot.mfa.is_none());
    assert!(!snapshot.is_authenticated);
}

#[tokio::test]
async fn test_failed_login_clears_pending_challenge() {
    let (store, _backend, _storage) = app();
    store
        .login("casey.otp@example.com", "password123")
        .await
        .expect("login");
    assert!(store.snapshot().mfa.is_some());

    store
        .login("casey.otp@example.com", "wrong-password")
        .await
        .expect_err("login must fail");

    assert!(
        store.snapshot().mfa.is_none(),
        "a failed attempt must not leave a stale challenge behind"
    );
}

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_signs_in_the_new_account() {
    let (store, _backend, storage) = app();

    let user = store
        .signup("new.face@example.com", "password123", "New", "Face")
        .await
        .expect("signup");

    assert_eq!(user.user_type, UserRole::NewUser);
    assert_eq!(user.name, "New Face");
    assert!(store.is_authenticated());
    assert!(stored(&storage, keys::REFRESH_TOKEN).is_some());
}

#[tokio::test]
async fn test_signup_with_taken_email_fails() {
    let (store, _backend, _storage) = app();

    let error = store
        .signup("alex.doe@example.com", "password123", "Alex", "Doe")
        .await
        .expect_err("signup must fail");

    assert!(error.user_message().contains("already exists"));
    assert!(!store.is_authenticated());
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_rotates_the_stored_pair() {
    let (store, _backend, storage) = app();
    store
        .login("alex.doe@example.com", "password123")
        .await
        .expect("login");
    let before = stored(&storage, keys::REFRESH_TOKEN).expect("refresh token stored");

    store.refresh().await.expect("refresh");

    let after = stored(&storage, keys::REFRESH_TOKEN).expect("refresh token stored");
    assert_ne!(before, after);
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn test_rejected_refresh_forces_sign_out() {
    let (store, backend, storage) = app();
    store
        .login("alex.doe@example.com", "password123")
        .await
        .expect("login");
    backend.set_refresh_down(true);

    store.refresh().await.expect_err("refresh must fail");

    assert!(!store.is_authenticated());
    for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER] {
        assert_eq!(stored(&storage, key), None, "{key} must be cleared");
    }
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_clears_locally_even_when_server_fails() {
    let (store, backend, storage) = app();
    store
        .login("alex.doe@example.com", "password123")
        .await
        .expect("login");
    backend.set_logout_down(true);

    store.logout().await;

    assert_eq!(backend.call_count("logout"), 1);
    assert!(!store.is_authenticated());
    for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER] {
        assert_eq!(stored(&storage, key), None, "{key} must be cleared");
    }
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn test_profile_update_survives_a_restart() {
    let (store, _backend, storage) = app();
    store
        .login("alex.doe@example.com", "password123")
        .await
        .expect("login");

    store
        .update_profile(UserPatch {
            headline: Some("Senior Frontend Developer".to_owned()),
            location: Some("Lisbon".to_owned()),
            ..UserPatch::default()
        })
        .expect("update profile");

    // Next visit: a fresh store over the same storage hydrates the
    // patched profile without touching the network.
    let next_backend = Arc::new(FixtureBackend::new());
    let next = SessionStore::new(next_backend.clone(), storage, None);
    next.initialize().await;

    let user = next.snapshot().user.expect("restored user");
    assert_eq!(user.headline.as_deref(), Some("Senior Frontend Developer"));
    assert_eq!(user.location.as_deref(), Some("Lisbon"));
    assert!(next_backend.calls().is_empty());
}

#[tokio::test]
async fn test_fetch_current_user_refreshes_the_cache() {
    let (store, backend, storage) = app();
    store
        .login("alex.doe@example.com", "password123")
        .await
        .expect("login");

    let user = store.fetch_current_user().await.expect("fetch profile");
    assert_eq!(user.user_type, UserRole::JobSeeker);
    assert_eq!(backend.call_count("me"), 1);
    assert!(stored(&storage, keys::USER).is_some());
}

// ============================================================================
// Email verification and password reset
// ============================================================================

#[tokio::test]
async fn test_verification_link_with_embedded_grant_signs_in() {
    let (store, _backend, _storage) = app();

    let message = store.verify_email("evt-grant").await.expect("verify");
    assert_eq!(message, "Email verified successfully");
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn test_verification_without_grant_leaves_session_alone() {
    let (store, _backend, _storage) = app();

    let message = store.verify_email("evt-plain").await.expect("verify");
    assert_eq!(message, "Email verified successfully");
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_password_reset_round_trip() {
    let (store, backend, _storage) = app();

    store
        .forgot_password("alex.doe@example.com")
        .await
        .expect("forgot password");
    store
        .reset_password("prt-valid", "n3w-password")
        .await
        .expect("reset password");
    store
        .reset_password("prt-bogus", "n3w-password")
        .await
        .expect_err("bogus token must fail");

    assert_eq!(backend.call_count("forgot_password"), 1);
    assert_eq!(backend.call_count("reset_password"), 2);
}

// ============================================================================
// Invariants
// ============================================================================

#[tokio::test]
async fn test_authenticated_always_tracks_user_and_token() {
    let (store, backend, _storage) = app();
    let check = |label: &str| {
        let snapshot = store.snapshot();
        assert_eq!(
            snapshot.is_authenticated,
            snapshot.user.is_some(),
            "invariant broken after {label}"
        );
    };

    check("construction");
    store.initialize().await;
    check("initialize");
    store
        .login("alex.doe@example.com", "password123")
        .await
        .expect("login");
    check("login");
    store.refresh().await.expect("refresh");
    check("refresh");
    backend.set_refresh_down(true);
    let _ = store.refresh().await;
    check("rejected refresh");
}
