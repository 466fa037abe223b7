//! Session Manager for Smartmark.
//!
//! Implements `SessionManagerTrait`: issuing, resolving, and revoking
//! opaque session tokens, backed by SQLite via `rusqlite`.
//!
//! Resolution is the session gate for the rest of the system: callers that
//! get `None` back must redirect to the login entry point and perform no
//! further reads or writes. Absence of identity is terminal for the
//! current request, never retried.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::params;
use tracing::warn;
use uuid::Uuid;

use crate::database::connection::Database;
use crate::types::errors::SessionError;
use crate::types::session::{AuthSession, Identity};

/// Trait defining session management operations.
pub trait SessionManagerTrait {
    /// Issues a new session for the given user. `ttl_ms` of `None` means
    /// the session does not expire.
    fn sign_in(
        &self,
        user_id: &str,
        email: Option<&str>,
        ttl_ms: Option<i64>,
    ) -> Result<AuthSession, SessionError>;
    /// Resolves the identity behind a token. `None` for unknown, expired,
    /// or revoked tokens, and also when the session store cannot be read
    /// (logged, not surfaced).
    fn resolve_identity(&self, token: &str) -> Option<Identity>;
    /// Revokes a session token. Revoking an unknown token is a no-op.
    fn sign_out(&self, token: &str) -> Result<(), SessionError>;
}

/// Session manager backed by a SQLite `sessions` table.
pub struct SessionManager {
    db: Arc<Database>,
}

impl SessionManager {
    /// Creates a new `SessionManager` using the provided database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Returns the current UNIX timestamp in milliseconds.
    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }
}

impl SessionManagerTrait for SessionManager {
    fn sign_in(
        &self,
        user_id: &str,
        email: Option<&str>,
        ttl_ms: Option<i64>,
    ) -> Result<AuthSession, SessionError> {
        let now = Self::now_millis();
        let session = AuthSession {
            token: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            email: email.map(str::to_string),
            created_at: now,
            expires_at: ttl_ms.map(|ttl| now + ttl),
        };

        self.db
            .connection()
            .execute(
                "INSERT INTO sessions (token, user_id, email, created_at, expires_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    session.token,
                    session.user_id,
                    session.email,
                    session.created_at,
                    session.expires_at
                ],
            )
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(session)
    }

    fn resolve_identity(&self, token: &str) -> Option<Identity> {
        let row = self
            .db
            .connection()
            .query_row(
                "SELECT user_id, email, expires_at FROM sessions WHERE token = ?1",
                params![token],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                    ))
                },
            );

        match row {
            Ok((user_id, email, expires_at)) => {
                if let Some(deadline) = expires_at {
                    if Self::now_millis() >= deadline {
                        return None;
                    }
                }
                Some(Identity { id: user_id, email })
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                warn!(error = %e, "session lookup failed; treating request as unauthenticated");
                None
            }
        }
    }

    fn sign_out(&self, token: &str) -> Result<(), SessionError> {
        self.db
            .connection()
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
