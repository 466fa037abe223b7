use std::fmt;

// === BookmarkError ===

/// Errors related to bookmark store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkError {
    /// Input rejected locally before any store access (empty title,
    /// malformed URL).
    Validation(String),
    /// The store declined the operation; the message is surfaced verbatim.
    Rejected(String),
    /// The store could not be reached or failed mid-operation.
    Unavailable(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            BookmarkError::Rejected(msg) => write!(f, "Store rejected operation: {}", msg),
            BookmarkError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for BookmarkError {}

// === SessionError ===

/// Errors related to session persistence.
///
/// Absence of an identity is not an error; the session gate models it as
/// `None` / `Redirect::ToLogin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::DatabaseError(msg) => write!(f, "Session database error: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {}
