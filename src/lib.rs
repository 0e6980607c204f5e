#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! Hybrid-ACM is an access-control kernel combining role-based (RBAC) and
//! discretionary (DAC) access control.
//!
//! Roles grant fixed default rights. DAC grants extend rights per
//! (subject, object, right), optionally expiring, and carry an ownership
//! marker. Role defaults always win over DAC, and universally read-only
//! objects refuse everything except READ no matter what.
//!
//! ```
//! use hybrid_acm::{AcmConfig, Engine};
//!
//! let (policy, mut store) = AcmConfig::example().build()?;
//! let engine = Engine::with_policy(policy);
//!
//! assert!(engine.check_authorization(&mut store, "JANE", "something.doc", "WRITE").granted);
//! assert!(!engine.check_authorization(&mut store, "JANE", "log.txt", "WRITE").granted);
//!
//! assert!(engine.grant_permission(&mut store, "BOB", "something.doc", "WRITE", 0));
//! assert!(engine.check_authorization(&mut store, "BOB", "something.doc", "WRITE").granted);
//! # Ok::<(), hybrid_acm::AcmError>(())
//! ```

// Catalog types (Role, Right, GrantRight, Timestamp, RightsMask).
pub mod types;

// Identifiers, DAC grants and decision records.
pub mod primitives;

pub use primitives::*;

// Module for Rights Algebra logic.
pub mod rights;

pub mod policy;

pub mod store;

pub mod audit;

pub mod time;

pub mod config;

pub mod error;

// Module for the authorization engine.
pub mod engine;

pub use audit::{AuditEvent, AuditKind, AuditSink, FileAuditSink, MemoryAuditSink, TracingAuditSink};
pub use config::AcmConfig;
pub use engine::Engine;
pub use error::AcmError;
pub use policy::Policy;
pub use store::{AccessControlStore, SharedStore};
pub use time::{Clock, SystemClock};
pub use types::{GrantRight, Right, Role, Timestamp};
