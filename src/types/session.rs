use serde::{Deserialize, Serialize};

/// An authenticated identity resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
}

/// A persisted authentication session row.
///
/// `token` is the opaque value handed to the client; `expires_at` is an
/// optional unix-millisecond deadline checked at resolve time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user_id: String,
    pub email: Option<String>,
    pub created_at: i64,
    pub expires_at: Option<i64>,
}

/// Where to send an unauthenticated request instead of serving it.
///
/// Absence of identity is terminal for the current request, not an error,
/// so it is modeled as a redirect rather than through the error enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    ToLogin,
}
