//! App Core for Smartmark.
//!
//! `App` wires the database, session manager, and change feed together.
//! `Dashboard` is one mounted view for one authenticated identity: it is
//! opened through the session gate, seeded from a store snapshot, and kept
//! live by an owner-scoped feed subscription that is released when the
//! dashboard is dropped.

use std::sync::Arc;

use tracing::warn;

use crate::database::connection::Database;
use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::managers::session_manager::{SessionManager, SessionManagerTrait};
use crate::managers::view_state::ViewState;
use crate::services::change_feed::{ChangeFeed, FeedSubscription};
use crate::types::bookmark::Bookmark;
use crate::types::errors::BookmarkError;
use crate::types::session::{Identity, Redirect};

/// Central application struct holding the shared backend pieces.
///
/// `BookmarkStore` handles are created on demand via [`App::store`]; they
/// are cheap clones of the shared database and feed.
pub struct App {
    db: Arc<Database>,
    feed: Arc<ChangeFeed>,
    session_manager: SessionManager,
}

impl App {
    /// Opens (or creates) the application over a database file.
    pub fn open(db_path: &str) -> Result<Self, rusqlite::Error> {
        Ok(Self::with_database(Database::open(db_path)?))
    }

    /// Opens the application over an in-memory database, for tests and demos.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Ok(Self::with_database(Database::open_in_memory()?))
    }

    fn with_database(db: Database) -> Self {
        let db = Arc::new(db);
        Self {
            session_manager: SessionManager::new(db.clone()),
            feed: Arc::new(ChangeFeed::new()),
            db,
        }
    }

    /// The session manager (sign-in, resolution, sign-out).
    pub fn sessions(&self) -> &SessionManager {
        &self.session_manager
    }

    /// A store handle bound to the shared database and feed.
    pub fn store(&self) -> BookmarkStore {
        BookmarkStore::new(self.db.clone(), self.feed.clone())
    }

    /// The shared change feed hub.
    pub fn feed(&self) -> Arc<ChangeFeed> {
        self.feed.clone()
    }

    /// Session gate: resolves the token and mounts a dashboard view.
    ///
    /// An unresolvable token yields `Redirect::ToLogin` and touches
    /// nothing else: no store reads, no subscription.
    pub fn open_dashboard(&self, token: &str) -> Result<Dashboard, Redirect> {
        let identity = self
            .session_manager
            .resolve_identity(token)
            .ok_or(Redirect::ToLogin)?;
        Ok(Dashboard::open(identity, self.store(), &self.feed))
    }
}

/// One mounted, live view of an identity's bookmarks.
///
/// Local mutations are applied optimistically; the feed echo of the same
/// event is then a no-op in the reconciler, and the same holds in the
/// opposite arrival order.
pub struct Dashboard {
    identity: Identity,
    store: BookmarkStore,
    view: ViewState,
    subscription: FeedSubscription,
}

impl Dashboard {
    /// Subscribes, snapshots, and seeds, in that order.
    ///
    /// Subscribing before the snapshot means a change committed while the
    /// view mounts lands either in the snapshot, in the feed buffer, or in
    /// both; idempotent reconciliation makes "both" harmless. A failed
    /// snapshot degrades to an empty list rather than failing the mount.
    fn open(identity: Identity, store: BookmarkStore, feed: &Arc<ChangeFeed>) -> Self {
        let subscription = feed.subscribe(&identity);

        let initial = match store.list_owned(&identity) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(owner = %identity.id, error = %e, "initial snapshot failed; starting empty");
                Vec::new()
            }
        };

        let mut view = ViewState::new();
        view.seed(initial);

        Self {
            identity,
            store,
            view,
            subscription,
        }
    }

    /// The identity this view belongs to.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The reconciled collection, newest first.
    pub fn bookmarks(&self) -> &[Bookmark] {
        self.view.bookmarks()
    }

    /// Creates a bookmark and applies it to the local view immediately.
    ///
    /// Validation failures surface before any store access; store
    /// rejections carry the backend message verbatim. No retries.
    pub fn add_bookmark(&mut self, title: &str, url: &str) -> Result<Bookmark, BookmarkError> {
        let bookmark = self.store.create(&self.identity, title, url)?;
        self.view.apply_insert(bookmark.clone());
        Ok(bookmark)
    }

    /// Deletes a bookmark and removes it from the local view immediately.
    ///
    /// A non-owned or unknown id is a silent no-op end to end.
    pub fn delete_bookmark(&mut self, bookmark_id: &str) -> Result<(), BookmarkError> {
        self.store.delete(&self.identity, bookmark_id)?;
        self.view.apply_remove(bookmark_id);
        Ok(())
    }

    /// Applies all pending feed events to the view.
    ///
    /// Returns how many of them changed the state.
    pub fn pump(&mut self) -> usize {
        self.subscription.drain(&mut self.view)
    }
}
