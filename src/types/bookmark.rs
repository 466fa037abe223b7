use serde::{Deserialize, Serialize};

/// A saved bookmark, as stored and as carried on feed events.
///
/// `id` and `created_at` are assigned by the store at insert time and are
/// immutable afterwards. `owner` is the identity id of the creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub owner: String,
    /// Unix epoch milliseconds, assigned by the store.
    pub created_at: i64,
}
