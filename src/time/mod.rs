//! Wall-clock time for expiry decisions.
//!
//! The engine reads a [`Clock`] at most once per operation and compares every
//! grant in that operation against the same instant.

pub mod clock;

// Re-export for convenience
pub use clock::*;
