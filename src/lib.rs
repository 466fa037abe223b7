//! Smartmark: a realtime per-user bookmark sync core.
//!
//! Authenticated identities add, list, and delete URL bookmarks; committed
//! changes fan out through an owner-scoped change feed to every live view
//! of the same identity. The correctness core is the idempotent view-state
//! reconciler in [`managers::view_state`], which converges regardless of
//! whether a local call response or its feed echo arrives first.
//!
//! This library crate exposes all modules for use by the binary and
//! integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod services;
pub mod types;
