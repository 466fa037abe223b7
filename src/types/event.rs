use serde::{Deserialize, Serialize};

use crate::types::bookmark::Bookmark;

/// Discriminator attached to every feed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Insert,
    Delete,
}

/// The wire form of a change-feed event: an event kind plus the affected
/// row as raw JSON, identical in shape to the stored row.
///
/// The row is kept as a `serde_json::Value` so that subscribers own the
/// decision of what to do with a malformed payload (drop and log, per the
/// failure contract) instead of the transport failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedMessage {
    pub kind: ChangeKind,
    pub row: serde_json::Value,
}

impl FeedMessage {
    /// Builds an `Insert` message carrying the full bookmark row.
    pub fn inserted(bookmark: &Bookmark) -> Self {
        Self {
            kind: ChangeKind::Insert,
            row: serde_json::to_value(bookmark).unwrap_or(serde_json::Value::Null),
        }
    }

    /// Builds a `Delete` message carrying the removed row.
    pub fn deleted(bookmark: &Bookmark) -> Self {
        Self {
            kind: ChangeKind::Delete,
            row: serde_json::to_value(bookmark).unwrap_or(serde_json::Value::Null),
        }
    }
}

/// A feed message after validation, ready to hand to the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedChange {
    Inserted(Bookmark),
    Deleted(String),
}
