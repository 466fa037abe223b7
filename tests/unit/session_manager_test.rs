//! Unit tests for the SessionManager public API.
//!
//! Exercises the session gate contract: tokens resolve to identities while
//! live, and unknown, revoked, or expired tokens resolve to nothing.

use std::sync::Arc;

use smartmark::database::Database;
use smartmark::managers::session_manager::{SessionManager, SessionManagerTrait};

/// Helper: create a SessionManager backed by a fresh in-memory database.
fn setup() -> SessionManager {
    let db = Arc::new(Database::open_in_memory().expect("Failed to open in-memory database"));
    SessionManager::new(db)
}

#[test]
fn test_sign_in_then_resolve_returns_identity() {
    let mgr = setup();

    let session = mgr
        .sign_in("user-1", Some("user@example.com"), None)
        .unwrap();

    let identity = mgr.resolve_identity(&session.token).expect("token should resolve");
    assert_eq!(identity.id, "user-1");
    assert_eq!(identity.email.as_deref(), Some("user@example.com"));
}

#[test]
fn test_unknown_token_resolves_to_none() {
    let mgr = setup();
    assert!(mgr.resolve_identity("no-such-token").is_none());
}

#[test]
fn test_sign_out_revokes_token() {
    let mgr = setup();
    let session = mgr.sign_in("user-1", None, None).unwrap();

    assert!(mgr.resolve_identity(&session.token).is_some());
    mgr.sign_out(&session.token).unwrap();
    assert!(mgr.resolve_identity(&session.token).is_none());
}

#[test]
fn test_sign_out_of_unknown_token_is_a_noop() {
    let mgr = setup();
    mgr.sign_out("never-issued").expect("revoking an unknown token should not error");
}

#[test]
fn test_expired_session_resolves_to_none() {
    let mgr = setup();

    // Negative TTL puts the deadline in the past immediately.
    let session = mgr.sign_in("user-1", None, Some(-10_000)).unwrap();
    assert!(mgr.resolve_identity(&session.token).is_none());
}

#[test]
fn test_session_without_ttl_does_not_expire() {
    let mgr = setup();
    let session = mgr.sign_in("user-1", None, None).unwrap();
    assert!(session.expires_at.is_none());
    assert!(mgr.resolve_identity(&session.token).is_some());
}

#[test]
fn test_sessions_are_independent_per_token() {
    let mgr = setup();
    let a = mgr.sign_in("alice", None, None).unwrap();
    let b = mgr.sign_in("bob", None, None).unwrap();

    mgr.sign_out(&a.token).unwrap();

    assert!(mgr.resolve_identity(&a.token).is_none());
    let identity = mgr.resolve_identity(&b.token).expect("bob's session must survive");
    assert_eq!(identity.id, "bob");
}
