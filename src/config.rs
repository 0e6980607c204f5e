//! Bootstrap configuration: everything needed to build a [`Policy`] and a fresh
//! [`AccessControlStore`].

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::AcmError;
use crate::policy::{Policy, DEFAULT_READ_ONLY_OBJECT};
use crate::primitives::{ObjectId, SubjectId};
use crate::store::AccessControlStore;
use crate::types::Role;

/// Serialized description of a subject/object universe and its initial roles.
///
/// ```json
/// {
///   "subjects": ["JANE", "BOB"],
///   "objects": ["log.txt", "doc"],
///   "roles": { "JANE": "ADMIN", "BOB": "USER" },
///   "read_only": ["log.txt"]
/// }
/// ```
///
/// Grants are never part of a configuration; a store always starts with none.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcmConfig {
    pub subjects: Vec<SubjectId>,
    pub objects: Vec<ObjectId>,
    #[serde(default)]
    pub roles: BTreeMap<SubjectId, Role>,
    /// Universally read-only objects. Defaults to the reference `log.txt`.
    #[serde(default = "default_read_only")]
    pub read_only: Vec<ObjectId>,
}

fn default_read_only() -> Vec<ObjectId> {
    vec![ObjectId::from(DEFAULT_READ_ONLY_OBJECT)]
}

impl AcmConfig {
    pub fn from_json(json: &str) -> Result<Self, AcmError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AcmError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The reference universe: four subjects, three objects, `log.txt` read-only.
    pub fn example() -> Self {
        AcmConfig {
            subjects: ["JANE", "JOE", "BOB", "JOHN"].map(SubjectId::from).to_vec(),
            objects: ["log.txt", "photo.jpg", "something.doc"].map(ObjectId::from).to_vec(),
            roles: BTreeMap::from([
                (SubjectId::from("JANE"), Role::Admin),
                (SubjectId::from("JOE"), Role::Auditor),
                (SubjectId::from("BOB"), Role::User),
                (SubjectId::from("JOHN"), Role::User),
            ]),
            read_only: default_read_only(),
        }
    }

    /// Builds the policy and an empty-grant store.
    pub fn build(self) -> Result<(Policy, AccessControlStore), AcmError> {
        let policy = Policy { universal_read_only: self.read_only.into_iter().collect() };
        let store = AccessControlStore::new(self.subjects, self.objects, self.roles)?;
        tracing::debug!(
            subjects = store.subjects().count(),
            objects = store.objects().count(),
            read_only = policy.universal_read_only.len(),
            "Built access-control store"
        );
        Ok((policy, store))
    }
}
