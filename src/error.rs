//!
//! Defines error types for the access-control crate.
//!
//! Engine decisions never produce an `AcmError`: a denied or malformed request
//! is reported through the decision result and the audit sink. These errors
//! cover bootstrapping, catalog parsing and shared-store locking.

/// Represents errors raised outside the decision path.
#[derive(Debug, thiserror::Error)]
pub enum AcmError {
    /// A string did not name one of the four rights (or OWN where allowed).
    #[error("Unknown right: {0}")]
    UnknownRight(String),
    /// A string did not name a role in the role catalog.
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    /// A bootstrap role assignment names a subject outside the subject universe.
    #[error("Role assignment for unknown subject: {0}")]
    UnknownSubject(String),
    /// The bootstrap configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// Reading the configuration file failed.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// A thread panicked while holding a shared store's lock.
    #[error("Access-control store lock poisoned")]
    LockPoisoned,
}
