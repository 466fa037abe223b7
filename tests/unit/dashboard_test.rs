//! Integration tests for the App/Dashboard composition.
//!
//! Walks the full user flow: gate, snapshot seed, live feed
//! propagation between views, optimistic mutation dedup, and ownership
//! isolation across identities.

use smartmark::app::App;
use smartmark::managers::bookmark_store::BookmarkStoreTrait;
use smartmark::managers::session_manager::SessionManagerTrait;
use smartmark::types::errors::BookmarkError;
use smartmark::types::session::{Identity, Redirect};

/// Helper: in-memory app plus a signed-in token for the given user.
fn setup(user_id: &str) -> (App, String) {
    let app = App::open_in_memory().expect("Failed to open in-memory database");
    let session = app
        .sessions()
        .sign_in(user_id, None, None)
        .expect("sign_in failed");
    (app, session.token)
}

#[test]
fn test_unauthenticated_open_redirects_to_login() {
    let app = App::open_in_memory().unwrap();
    assert_eq!(app.open_dashboard("bogus-token").err(), Some(Redirect::ToLogin));
}

#[test]
fn test_dashboard_seeds_from_existing_rows_newest_first() {
    let (app, token) = setup("u1");
    let user = Identity {
        id: "u1".to_string(),
        email: None,
    };

    // Rows created before the view mounts come in via the snapshot.
    let store = app.store();
    store.create(&user, "First", "https://one.example.com").unwrap();
    store.create(&user, "Second", "https://two.example.com").unwrap();

    let dashboard = app.open_dashboard(&token).unwrap();
    assert_eq!(dashboard.bookmarks().len(), 2);

    let rows = dashboard.bookmarks();
    let mut expected: Vec<_> = rows.to_vec();
    expected.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    assert_eq!(rows, expected.as_slice());
}

#[test]
fn test_add_propagates_to_other_view_of_same_identity() {
    let (app, token) = setup("u1");
    let mut tab_a = app.open_dashboard(&token).unwrap();
    let mut tab_b = app.open_dashboard(&token).unwrap();

    let bookmark = tab_a.add_bookmark("Shared", "https://example.com").unwrap();

    // Tab A sees it immediately (optimistic), Tab B after pumping.
    assert!(tab_a.bookmarks().iter().any(|b| b.id == bookmark.id));
    assert!(tab_b.bookmarks().is_empty());

    assert_eq!(tab_b.pump(), 1);
    assert!(tab_b.bookmarks().iter().any(|b| b.id == bookmark.id));
}

#[test]
fn test_own_feed_echo_is_a_noop_after_optimistic_insert() {
    let (app, token) = setup("u1");
    let mut dashboard = app.open_dashboard(&token).unwrap();

    dashboard.add_bookmark("Once", "https://example.com").unwrap();
    assert_eq!(dashboard.bookmarks().len(), 1);

    // The feed echo of the same insert must not create a duplicate.
    assert_eq!(dashboard.pump(), 0);
    assert_eq!(dashboard.bookmarks().len(), 1);
}

#[test]
fn test_own_feed_echo_is_a_noop_after_optimistic_delete() {
    let (app, token) = setup("u1");
    let mut dashboard = app.open_dashboard(&token).unwrap();

    let bookmark = dashboard.add_bookmark("Gone", "https://example.com").unwrap();
    dashboard.pump();

    dashboard.delete_bookmark(&bookmark.id).unwrap();
    assert!(dashboard.bookmarks().is_empty());

    assert_eq!(dashboard.pump(), 0);
    assert!(dashboard.bookmarks().is_empty());
}

#[test]
fn test_delete_propagates_to_other_view() {
    let (app, token) = setup("u1");
    let mut tab_a = app.open_dashboard(&token).unwrap();
    let mut tab_b = app.open_dashboard(&token).unwrap();

    let bookmark = tab_a.add_bookmark("Shared", "https://example.com").unwrap();
    tab_b.pump();
    assert_eq!(tab_b.bookmarks().len(), 1);

    tab_b.delete_bookmark(&bookmark.id).unwrap();
    assert_eq!(tab_a.pump(), 1);
    assert!(tab_a.bookmarks().is_empty());
}

#[test]
fn test_validation_failures_leave_view_and_store_untouched() {
    let (app, token) = setup("u1");
    let mut dashboard = app.open_dashboard(&token).unwrap();

    assert!(matches!(
        dashboard.add_bookmark("", "https://example.com"),
        Err(BookmarkError::Validation(_))
    ));
    assert!(matches!(
        dashboard.add_bookmark("Home", "not-a-url"),
        Err(BookmarkError::Validation(_))
    ));

    assert!(dashboard.bookmarks().is_empty());
    assert_eq!(dashboard.pump(), 0);
}

#[test]
fn test_other_identities_see_nothing() {
    let app = App::open_in_memory().unwrap();
    let alice_token = app.sessions().sign_in("alice", None, None).unwrap().token;
    let bob_token = app.sessions().sign_in("bob", None, None).unwrap().token;

    let mut alice_view = app.open_dashboard(&alice_token).unwrap();
    let mut bob_view = app.open_dashboard(&bob_token).unwrap();

    let secret = alice_view
        .add_bookmark("Private", "https://private.example.com")
        .unwrap();

    assert_eq!(bob_view.pump(), 0);
    assert!(bob_view.bookmarks().is_empty());

    // Bob's delete of Alice's row is a silent no-op on every surface.
    bob_view.delete_bookmark(&secret.id).unwrap();
    assert_eq!(alice_view.pump(), 0);
    assert_eq!(alice_view.bookmarks().len(), 1);
}

#[test]
fn test_dropping_dashboard_releases_its_subscription() {
    let (app, token) = setup("u1");
    let dashboard = app.open_dashboard(&token).unwrap();
    assert_eq!(app.feed().subscriber_count("u1"), 1);

    drop(dashboard);
    assert_eq!(app.feed().subscriber_count("u1"), 0);
}

#[test]
fn test_reopening_after_signout_redirects() {
    let (app, token) = setup("u1");
    assert!(app.open_dashboard(&token).is_ok());

    app.sessions().sign_out(&token).unwrap();
    assert_eq!(app.open_dashboard(&token).err(), Some(Redirect::ToLogin));
}
