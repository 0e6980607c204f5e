use std::borrow::Borrow;
use std::fmt;

use crate::types::{GrantRight, Timestamp};

// --- Universal identifiers --------------------------------------------------

/// Name of a subject in a store's closed subject universe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub String);

/// Name of an object in a store's closed object universe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                $name(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        // Lets `&str` look-ups hit sets and maps keyed by the id.
        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(value.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(SubjectId);
string_id!(ObjectId);

// --- DAC grants ---------------------------------------------------------------

/// A discretionary grant of one right (or ownership) on one object to one subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DacGrant {
    pub subject: SubjectId,
    pub object: ObjectId,
    pub right: GrantRight,
    /// `None` is permanent. Otherwise valid strictly before this instant.
    pub expires_at: Option<Timestamp>,
}

impl DacGrant {
    pub fn permanent(subject: SubjectId, object: ObjectId, right: GrantRight) -> Self {
        DacGrant { subject, object, right, expires_at: None }
    }

    pub fn expiring(subject: SubjectId, object: ObjectId, right: GrantRight, expires_at: Timestamp) -> Self {
        DacGrant { subject, object, right, expires_at: Some(expires_at) }
    }

    /// True when `now` has reached or passed the expiry instant.
    #[inline]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        matches!(self.expires_at, Some(expiry) if expiry <= now)
    }

    /// True when the grant is for exactly this (subject, object, right) triple.
    #[inline]
    pub fn matches(&self, subject: &str, object: &str, right: GrantRight) -> bool {
        self.subject.as_str() == subject && self.object.as_str() == object && self.right == right
    }
}

// --- Decisions ----------------------------------------------------------------

/// Why a [`Decision`] came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Subject, object or right failed validation.
    Malformed,
    /// Non-READ right requested on a universally read-only object.
    ReadOnly,
    /// The subject's role grants the right by default.
    RoleDefault,
    /// A live DAC grant covers the request.
    DacGrant,
    /// Nothing grants the right.
    NoGrant,
}

/// Result of an authorization check. Fields echo the request as submitted,
/// including inputs that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Decision {
    pub granted: bool,
    pub subject: String,
    pub object: String,
    pub right: String,
    pub reason: DecisionReason,
}

impl Decision {
    pub(crate) fn new(subject: &str, object: &str, right: &str, reason: DecisionReason) -> Self {
        Decision {
            granted: matches!(reason, DecisionReason::RoleDefault | DecisionReason::DacGrant),
            subject: subject.to_string(),
            object: object.to_string(),
            right: right.to_string(),
            reason,
        }
    }
}
