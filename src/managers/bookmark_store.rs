//! Bookmark Store Adapter for Smartmark.
//!
//! Implements `BookmarkStoreTrait`: create/list/delete for the bookmark
//! collection, always scoped to the owning identity, backed by SQLite via
//! `rusqlite`. Committed changes are published to the change feed so that
//! every live view of the same identity observes them.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::params;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::database::connection::Database;
use crate::services::change_feed::ChangeFeed;
use crate::types::bookmark::Bookmark;
use crate::types::errors::BookmarkError;
use crate::types::event::FeedMessage;
use crate::types::session::Identity;

/// Trait defining bookmark store operations.
pub trait BookmarkStoreTrait {
    /// Lists the identity's bookmarks, newest first.
    fn list_owned(&self, identity: &Identity) -> Result<Vec<Bookmark>, BookmarkError>;
    /// Validates and inserts a new bookmark, returning the stored row.
    fn create(&self, identity: &Identity, title: &str, url: &str)
        -> Result<Bookmark, BookmarkError>;
    /// Deletes a bookmark the identity owns. Deleting an absent or
    /// non-owned id is a no-op, so callers learn nothing about other
    /// identities' rows.
    fn delete(&self, identity: &Identity, bookmark_id: &str) -> Result<(), BookmarkError>;
}

/// Bookmark store backed by SQLite, publishing committed changes to the feed.
pub struct BookmarkStore {
    db: Arc<Database>,
    feed: Arc<ChangeFeed>,
}

impl BookmarkStore {
    /// Creates a new `BookmarkStore` over the given database and feed hub.
    pub fn new(db: Arc<Database>, feed: Arc<ChangeFeed>) -> Self {
        Self { db, feed }
    }

    /// Returns the current UNIX timestamp in milliseconds.
    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    /// Local input validation, performed before any database access.
    ///
    /// Returns the trimmed title and url on success.
    fn validate(title: &str, url: &str) -> Result<(String, String), BookmarkError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BookmarkError::Validation(
                "title must not be empty".to_string(),
            ));
        }

        let url = url.trim();
        // Url::parse accepts absolute URLs only; relative input fails here.
        Url::parse(url)
            .map_err(|e| BookmarkError::Validation(format!("invalid url '{}': {}", url, e)))?;

        Ok((title.to_string(), url.to_string()))
    }

    /// Maps a rusqlite error onto the store taxonomy: constraint failures
    /// are rejections (surfaced verbatim), everything else is the store
    /// being unavailable.
    fn map_db_error(e: rusqlite::Error) -> BookmarkError {
        match &e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                BookmarkError::Rejected(e.to_string())
            }
            _ => BookmarkError::Unavailable(e.to_string()),
        }
    }

    /// Reads a single `Bookmark` row into a struct.
    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            owner: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

impl BookmarkStoreTrait for BookmarkStore {
    fn list_owned(&self, identity: &Identity) -> Result<Vec<Bookmark>, BookmarkError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, title, url, owner, created_at FROM bookmarks \
                 WHERE owner = ?1 ORDER BY created_at DESC, id ASC",
            )
            .map_err(Self::map_db_error)?;

        let rows = stmt
            .query_map(params![identity.id], Self::row_to_bookmark)
            .map_err(Self::map_db_error)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(Self::map_db_error)?);
        }
        Ok(results)
    }

    fn create(
        &self,
        identity: &Identity,
        title: &str,
        url: &str,
    ) -> Result<Bookmark, BookmarkError> {
        let (title, url) = Self::validate(title, url)?;

        let bookmark = Bookmark {
            id: Uuid::new_v4().to_string(),
            title,
            url,
            owner: identity.id.clone(),
            created_at: Self::now_millis(),
        };

        self.db
            .connection()
            .execute(
                "INSERT INTO bookmarks (id, title, url, owner, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    bookmark.id,
                    bookmark.title,
                    bookmark.url,
                    bookmark.owner,
                    bookmark.created_at
                ],
            )
            .map_err(Self::map_db_error)?;

        // Publish only after the row is committed, so the feed never
        // carries a write that did not happen.
        self.feed
            .publish(&bookmark.owner, FeedMessage::inserted(&bookmark));
        debug!(id = %bookmark.id, owner = %bookmark.owner, "bookmark created");

        Ok(bookmark)
    }

    fn delete(&self, identity: &Identity, bookmark_id: &str) -> Result<(), BookmarkError> {
        let conn = self.db.connection();

        // Fetch the row under the owner predicate first: the feed event
        // carries the full row, and a non-owned id must fall through as a
        // silent no-op.
        let existing: Option<Bookmark> = conn
            .query_row(
                "SELECT id, title, url, owner, created_at FROM bookmarks \
                 WHERE id = ?1 AND owner = ?2",
                params![bookmark_id, identity.id],
                Self::row_to_bookmark,
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(Self::map_db_error(other)),
            })?;

        let Some(bookmark) = existing else {
            debug!(id = %bookmark_id, "delete skipped: not found under requester's ownership");
            return Ok(());
        };

        let affected = conn
            .execute(
                "DELETE FROM bookmarks WHERE id = ?1 AND owner = ?2",
                params![bookmark_id, identity.id],
            )
            .map_err(Self::map_db_error)?;

        if affected > 0 {
            self.feed
                .publish(&bookmark.owner, FeedMessage::deleted(&bookmark));
            debug!(id = %bookmark.id, owner = %bookmark.owner, "bookmark deleted");
        }

        Ok(())
    }
}
