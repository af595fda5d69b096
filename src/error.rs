//! Crate-wide error taxonomy.
//!
//! Every operation failure is one of five codes, returned synchronously to
//! the caller. No failure commits partial state: the [`Store`](crate::Store)
//! transaction that produced it is rolled back whole.

use derive_more::Display;

/// Why a game operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GameError {
    /// Caller identity could not be resolved. Checked before anything else.
    #[display("unauthenticated: caller identity could not be resolved")]
    Unauthenticated,
    /// Referenced session or player does not exist.
    #[display("not found: {_0}")]
    NotFound(String),
    /// Caller exists but is not allowed to perform this action.
    #[display("forbidden: {_0}")]
    Forbidden(String),
    /// Structurally invalid or rule-violating request.
    #[display("bad request: {_0}")]
    BadRequest(String),
    /// The record the operation would create already exists.
    #[display("conflict: {_0}")]
    Conflict(String),
}

impl std::error::Error for GameError {}

impl GameError {
    /// Shorthand for a [`GameError::NotFound`] about a session.
    pub fn session_not_found(id: &str) -> Self {
        GameError::NotFound(format!("session {id}"))
    }

    /// Shorthand for a [`GameError::BadRequest`].
    pub fn bad_request(msg: impl Into<String>) -> Self {
        GameError::BadRequest(msg.into())
    }

    /// Shorthand for a [`GameError::Forbidden`].
    pub fn forbidden(msg: impl Into<String>) -> Self {
        GameError::Forbidden(msg.into())
    }
}
