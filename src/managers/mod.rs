// Smartmark state managers
// Managers handle stateful operations: sessions, the bookmark store, and
// the per-view reconciled state.

pub mod bookmark_store;
pub mod session_manager;
pub mod view_state;
