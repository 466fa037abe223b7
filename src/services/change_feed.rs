//! Change feed for Smartmark.
//!
//! An in-process publish/subscribe hub carrying bookmark insert/delete
//! events, partitioned by owner. The owner predicate is enforced here at
//! the hub: a subscriber only ever receives events for rows it owns, so
//! no client-side filtering is needed for isolation.
//!
//! Delivery contract (what a substituted backend must also satisfy):
//! events for a given row arrive in causal order (insert before delete),
//! delivery is at-least-once, and no ordering holds between a client's own
//! call response and the feed echo of the same event. The reconciler's
//! idempotent transitions absorb both the duplication and the race.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;
use tracing::warn;

use crate::managers::view_state::ViewState;
use crate::types::bookmark::Bookmark;
use crate::types::event::{ChangeKind, FeedChange, FeedMessage};
use crate::types::session::Identity;

/// Buffered events per owner channel before a slow subscriber lags.
const FEED_CHANNEL_CAPACITY: usize = 256;

/// Per-owner broadcast hub.
///
/// Channels are created lazily on first subscribe and pruned when a
/// publish finds no remaining subscribers.
#[derive(Debug, Default)]
pub struct ChangeFeed {
    channels: Mutex<HashMap<String, broadcast::Sender<FeedMessage>>>,
}

impl ChangeFeed {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a message to every live subscription for `owner`.
    ///
    /// Returns the number of subscribers reached; a message with no
    /// audience is dropped and its channel pruned.
    pub fn publish(&self, owner: &str, message: FeedMessage) -> usize {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        match channels.get(owner) {
            Some(tx) => match tx.send(message) {
                Ok(reached) => reached,
                Err(_) => {
                    // Last subscriber dropped since the channel was created.
                    channels.remove(owner);
                    0
                }
            },
            None => 0,
        }
    }

    /// Opens a subscription scoped to the identity's rows.
    ///
    /// The subscription is released when the returned value is dropped,
    /// however the owning view is torn down.
    pub fn subscribe(&self, identity: &Identity) -> FeedSubscription {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let tx = channels
            .entry(identity.id.clone())
            .or_insert_with(|| broadcast::channel(FEED_CHANNEL_CAPACITY).0);
        FeedSubscription {
            owner: identity.id.clone(),
            rx: tx.subscribe(),
        }
    }

    /// Number of live subscriptions for the given owner.
    pub fn subscriber_count(&self, owner: &str) -> usize {
        let channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels
            .get(owner)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}

/// A live, owner-scoped subscription to the change feed.
///
/// Dropping it unsubscribes; there is no explicit close.
pub struct FeedSubscription {
    owner: String,
    rx: broadcast::Receiver<FeedMessage>,
}

impl FeedSubscription {
    /// The owner id this subscription is scoped to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Synchronously applies every pending event to the view state.
    ///
    /// Returns how many events actually changed the state; duplicates of
    /// already-applied local mutations count as zero. Malformed events are
    /// dropped by [`parse_message`]. A lagged receiver logs the gap and
    /// keeps going with what remains in the buffer.
    pub fn drain(&mut self, view: &mut ViewState) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(message) => {
                    if let Some(change) = parse_message(message) {
                        if view.apply(change) {
                            applied += 1;
                        }
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(owner = %self.owner, skipped, "change feed lagged; events lost");
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => break,
            }
        }
        applied
    }

    /// Awaits the next well-formed change, skipping malformed events and
    /// lag gaps. `None` once the hub side of the channel is gone.
    pub async fn next_change(&mut self) -> Option<FeedChange> {
        loop {
            match self.rx.recv().await {
                Ok(message) => {
                    if let Some(change) = parse_message(message) {
                        return Some(change);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(owner = %self.owner, skipped, "change feed lagged; events lost");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Validates a wire message into a [`FeedChange`].
///
/// A row payload missing required fields is dropped with a log entry and
/// never reaches the reconciler; this is the malformed-event contract of
/// the subscriber, so it can never crash a view.
pub fn parse_message(message: FeedMessage) -> Option<FeedChange> {
    match message.kind {
        ChangeKind::Insert => match serde_json::from_value::<Bookmark>(message.row) {
            Ok(bookmark) => Some(FeedChange::Inserted(bookmark)),
            Err(e) => {
                warn!(error = %e, "dropping malformed insert event");
                None
            }
        },
        ChangeKind::Delete => match message.row.get("id").and_then(|v| v.as_str()) {
            Some(id) if !id.is_empty() => Some(FeedChange::Deleted(id.to_string())),
            _ => {
                warn!("dropping malformed delete event: missing row id");
                None
            }
        },
    }
}
