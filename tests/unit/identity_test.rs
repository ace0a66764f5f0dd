//! Unit tests for the identity providers.

use std::env;
use std::sync::Mutex;

use smartmarks::services::identity::{EnvIdentity, IdentityProvider, StaticIdentity};
use smartmarks::types::errors::AuthError;

// Serializes tests that touch the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn with_env(id: Option<&str>, email: Option<&str>, check: impl FnOnce()) {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    match id {
        Some(id) => env::set_var("SMARTMARKS_USER_ID", id),
        None => env::remove_var("SMARTMARKS_USER_ID"),
    }
    match email {
        Some(email) => env::set_var("SMARTMARKS_USER_EMAIL", email),
        None => env::remove_var("SMARTMARKS_USER_EMAIL"),
    }
    check();
    env::remove_var("SMARTMARKS_USER_ID");
    env::remove_var("SMARTMARKS_USER_EMAIL");
}

#[test]
fn test_static_identity_returns_fixed_user() {
    let identity = StaticIdentity::new("alice", "alice@example.com");
    let user = identity.current_user().unwrap();
    assert_eq!(user.id, "alice");
    assert_eq!(user.email, "alice@example.com");
}

#[test]
fn test_static_identity_is_stable_across_calls() {
    let identity = StaticIdentity::new("alice", "alice@example.com");
    assert_eq!(
        identity.current_user().unwrap(),
        identity.current_user().unwrap()
    );
}

#[test]
fn test_env_identity_reads_user_from_environment() {
    with_env(Some("alice"), Some("alice@example.com"), || {
        let user = EnvIdentity.current_user().unwrap();
        assert_eq!(user.id, "alice");
        assert_eq!(user.email, "alice@example.com");
    });
}

#[test]
fn test_env_identity_missing_id_is_unauthenticated() {
    with_env(None, Some("alice@example.com"), || {
        assert_eq!(
            EnvIdentity.current_user().unwrap_err(),
            AuthError::Unauthenticated
        );
    });
}

#[test]
fn test_env_identity_blank_id_is_unauthenticated() {
    with_env(Some("   "), None, || {
        assert_eq!(
            EnvIdentity.current_user().unwrap_err(),
            AuthError::Unauthenticated
        );
    });
}

#[test]
fn test_env_identity_defaults_missing_email() {
    with_env(Some("alice"), None, || {
        let user = EnvIdentity.current_user().unwrap();
        assert_eq!(user.id, "alice");
        assert_eq!(user.email, "unknown");
    });
}
