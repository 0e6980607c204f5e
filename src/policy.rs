//! Static policy consulted by the engine: role default rights and the set of
//! universally read-only objects.

use std::collections::BTreeSet;

use crate::primitives::ObjectId;
use crate::rights;
use crate::types::{Right, RightsMask, Role};

/// Object read-only in the reference configuration.
pub const DEFAULT_READ_ONLY_OBJECT: &str = "log.txt";

/// Policy constants. Immutable once an engine holds it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Policy {
    /// Objects on which no right other than READ may ever be exercised.
    pub universal_read_only: BTreeSet<ObjectId>,
}

impl Default for Policy {
    fn default() -> Self {
        Policy::with_read_only([DEFAULT_READ_ONLY_OBJECT])
    }
}

impl Policy {
    pub fn with_read_only<I, S>(objects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Policy {
            universal_read_only: objects.into_iter().map(|o| ObjectId(o.into())).collect(),
        }
    }

    pub fn is_read_only(&self, object: &str) -> bool {
        self.universal_read_only.contains(object)
    }

    /// Default rights for `role`; an unassigned subject (`None`) holds nothing.
    pub fn default_rights(&self, role: Option<Role>) -> RightsMask {
        role.map(rights::role_default_rights).unwrap_or(0)
    }

    /// True when `role` grants `right` without any DAC grant.
    pub fn role_grants(&self, role: Option<Role>, right: Right) -> bool {
        rights::sufficient(self.default_rights(role), right.mask())
    }
}
