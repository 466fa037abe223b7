//! Smartmark demo shell.
//!
//! Console walkthrough of the core: session gate, store, change feed, and
//! reconciler. This is the presentation layer stand-in; all behavior it
//! shows lives in the library.

use smartmark::app::App;
use smartmark::managers::session_manager::SessionManagerTrait;
use smartmark::types::errors::BookmarkError;
use smartmark::types::session::Redirect;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Smartmark v{} — Demo Mode                   ║", env!("CARGO_PKG_VERSION"));
    println!("║     Realtime per-user bookmark sync, console edition       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let app = App::open_in_memory().expect("Failed to open in-memory database");

    demo_session_gate(&app);
    demo_realtime_sync(&app);
    demo_validation(&app);
    demo_isolation(&app);

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ All components demonstrated successfully!");
    println!("═══════════════════════════════════════════════════════════════");
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn demo_session_gate(app: &App) {
    section("Session Gate");

    match app.open_dashboard("not-a-real-token") {
        Err(Redirect::ToLogin) => println!("  Unknown token -> redirect to login"),
        Ok(_) => println!("  ERROR: gate let an unknown token through"),
    }

    let session = app
        .sessions()
        .sign_in("user-demo", Some("demo@example.com"), None)
        .expect("sign_in failed");
    println!("  Signed in: token issued ({}…)", &session.token[..8]);

    let dashboard = app.open_dashboard(&session.token).expect("gate rejected a live session");
    println!(
        "  Dashboard mounted for {} with {} bookmark(s)",
        dashboard.identity().id,
        dashboard.bookmarks().len()
    );

    app.sessions().sign_out(&session.token).expect("sign_out failed");
    match app.open_dashboard(&session.token) {
        Err(Redirect::ToLogin) => println!("  Signed out -> token now redirects to login"),
        Ok(_) => println!("  ERROR: revoked token still resolves"),
    }
    println!("  ✓ Session Gate OK");
    println!();
}

fn demo_realtime_sync(app: &App) {
    section("Realtime Sync (two views, one identity)");

    let session = app
        .sessions()
        .sign_in("user-sync", None, None)
        .expect("sign_in failed");

    let mut tab_a = app.open_dashboard(&session.token).expect("mount failed");
    let mut tab_b = app.open_dashboard(&session.token).expect("mount failed");

    let bookmark = tab_a
        .add_bookmark("Rust Language", "https://rust-lang.org")
        .expect("add failed");
    println!("  Tab A added '{}'", bookmark.title);

    let applied = tab_b.pump();
    println!(
        "  Tab B pumped feed: {} change(s), now {} bookmark(s)",
        applied,
        tab_b.bookmarks().len()
    );

    // Tab A already applied its own write optimistically; the echo is a no-op.
    let echo = tab_a.pump();
    println!("  Tab A pumped its own echo: {} state change(s)", echo);

    tab_b.delete_bookmark(&bookmark.id).expect("delete failed");
    tab_a.pump();
    println!(
        "  Tab B deleted it; Tab A now has {} bookmark(s)",
        tab_a.bookmarks().len()
    );
    println!("  ✓ Realtime Sync OK");
    println!();
}

fn demo_validation(app: &App) {
    section("Validation");

    let session = app
        .sessions()
        .sign_in("user-validate", None, None)
        .expect("sign_in failed");
    let mut dashboard = app.open_dashboard(&session.token).expect("mount failed");

    match dashboard.add_bookmark("   ", "https://example.com") {
        Err(BookmarkError::Validation(msg)) => println!("  Blank title rejected: {}", msg),
        other => println!("  ERROR: expected validation failure, got {:?}", other.map(|b| b.id)),
    }

    match dashboard.add_bookmark("Home", "not-a-url") {
        Err(BookmarkError::Validation(msg)) => println!("  Relative URL rejected: {}", msg),
        other => println!("  ERROR: expected validation failure, got {:?}", other.map(|b| b.id)),
    }

    println!("  Bookmarks after rejected inputs: {}", dashboard.bookmarks().len());
    println!("  ✓ Validation OK");
    println!();
}

fn demo_isolation(app: &App) {
    section("Row Ownership Isolation");

    let alice = app.sessions().sign_in("alice", None, None).expect("sign_in failed");
    let bob = app.sessions().sign_in("bob", None, None).expect("sign_in failed");

    let mut alice_view = app.open_dashboard(&alice.token).expect("mount failed");
    let mut bob_view = app.open_dashboard(&bob.token).expect("mount failed");

    let secret = alice_view
        .add_bookmark("Alice's notes", "https://notes.example.com")
        .expect("add failed");

    let seen_by_bob = bob_view.pump();
    println!(
        "  Alice added a bookmark; Bob's feed delivered {} event(s), list = {}",
        seen_by_bob,
        bob_view.bookmarks().len()
    );

    bob_view.delete_bookmark(&secret.id).expect("delete should be a silent no-op");
    alice_view.pump();
    println!(
        "  Bob tried deleting Alice's row: no error, Alice still has {} bookmark(s)",
        alice_view.bookmarks().len()
    );
    println!("  ✓ Isolation OK");
}
