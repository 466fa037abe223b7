//! View State Reconciler for Smartmark.
//!
//! The in-memory ordered bookmark collection behind a live view. Both
//! delivery paths feed it: the direct response to a local create/delete,
//! and the change-feed echo of the same event. Neither path is ordered
//! relative to the other, so both transition functions are idempotent:
//! whichever copy of an event arrives second is a no-op, and any
//! interleaving converges to the same final state.
//!
//! Reconciliation never fails and never suspends.

use crate::types::bookmark::Bookmark;
use crate::types::event::FeedChange;

/// Ordered bookmark collection, keyed by id, newest first.
#[derive(Debug, Default)]
pub struct ViewState {
    entries: Vec<Bookmark>,
}

impl ViewState {
    /// Creates an empty view state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the state wholesale with an initial snapshot and re-sorts.
    pub fn seed(&mut self, initial: Vec<Bookmark>) {
        self.entries = initial;
        self.sort();
    }

    /// Inserts a bookmark unless its id is already present.
    ///
    /// Returns whether the state changed.
    pub fn apply_insert(&mut self, bookmark: Bookmark) -> bool {
        if self.contains(&bookmark.id) {
            return false;
        }
        self.entries.push(bookmark);
        self.sort();
        true
    }

    /// Removes the bookmark with the given id; absent ids are a no-op.
    ///
    /// Returns whether the state changed.
    pub fn apply_remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|b| b.id != id);
        self.entries.len() != before
    }

    /// Applies a validated feed change through the matching transition.
    pub fn apply(&mut self, change: FeedChange) -> bool {
        match change {
            FeedChange::Inserted(bookmark) => self.apply_insert(bookmark),
            FeedChange::Deleted(id) => self.apply_remove(&id),
        }
    }

    /// The current collection, ordered `created_at` descending.
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.entries
    }

    /// Looks up a bookmark by id.
    pub fn get(&self, id: &str) -> Option<&Bookmark> {
        self.entries.iter().find(|b| b.id == id)
    }

    /// Whether a bookmark with the given id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display order: `created_at` descending, ties broken by ascending id.
    /// Must match the store's `ORDER BY created_at DESC, id ASC` so a
    /// seeded snapshot and feed-built state agree.
    fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    }
}
