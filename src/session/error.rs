use crate::session::state::{Stage, View};
use thiserror::Error;

/// Errors reported by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with email '{0}' already exists")]
    EmailTaken(String),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("Password must be at least {min_length} characters long")]
    WeakPassword { min_length: usize },

    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Sign in first")]
    NotAuthenticated,

    #[error("Already signed in")]
    AlreadyAuthenticated,

    #[error("This action is only available on the {expected} page (currently: {actual})")]
    WrongView { expected: View, actual: Stage },

    #[error("Select a location first")]
    NoLocationSelected,
}

/// A history index that no longer points at an entry, typically because the
/// list changed after the index was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("History index {index} is out of range (history holds {len} reports)")]
pub struct InvalidHistoryIndex {
    pub index: usize,
    pub len: usize,
}
