//! The mutable access-control state: subject and object universes, role
//! assignments, and the DAC grant collection.
//!
//! Mutators are crate-private. Everything outside the crate changes a store
//! through [`crate::engine::Engine`].

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::AcmError;
use crate::primitives::{DacGrant, ObjectId, SubjectId};
use crate::types::{GrantRight, Role, Timestamp};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControlStore {
    subjects: BTreeSet<SubjectId>,
    objects: BTreeSet<ObjectId>,
    roles: HashMap<SubjectId, Role>,
    grants: Vec<DacGrant>,
}

impl AccessControlStore {
    /// Builds a store with an empty grant collection.
    ///
    /// Fails with [`AcmError::UnknownSubject`] if `roles` assigns a role to a
    /// subject outside `subjects`.
    pub fn new<S, O, R>(subjects: S, objects: O, roles: R) -> Result<Self, AcmError>
    where
        S: IntoIterator<Item = SubjectId>,
        O: IntoIterator<Item = ObjectId>,
        R: IntoIterator<Item = (SubjectId, Role)>,
    {
        let subjects: BTreeSet<SubjectId> = subjects.into_iter().collect();
        let mut assigned = HashMap::new();
        for (subject, role) in roles {
            if !subjects.contains(&subject) {
                return Err(AcmError::UnknownSubject(subject.0));
            }
            assigned.insert(subject, role);
        }
        Ok(AccessControlStore {
            subjects,
            objects: objects.into_iter().collect(),
            roles: assigned,
            grants: Vec::new(),
        })
    }

    pub fn is_subject(&self, subject: &str) -> bool {
        self.subjects.contains(subject)
    }

    pub fn is_object(&self, object: &str) -> bool {
        self.objects.contains(object)
    }

    pub fn subjects(&self) -> impl Iterator<Item = &SubjectId> {
        self.subjects.iter()
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectId> {
        self.objects.iter()
    }

    /// The subject's current role, `None` if never assigned.
    pub fn role_of(&self, subject: &str) -> Option<Role> {
        self.roles.get(subject).copied()
    }

    /// Every grant currently held, including expired grants no lookup has touched yet.
    pub fn grants(&self) -> &[DacGrant] {
        &self.grants
    }

    pub fn grant_count(&self, subject: &str, object: &str, right: GrantRight) -> usize {
        self.grants.iter().filter(|g| g.matches(subject, object, right)).count()
    }

    pub(crate) fn set_role(&mut self, subject: SubjectId, role: Role) {
        self.roles.insert(subject, role);
    }

    pub(crate) fn contains_grant(&self, grant: &DacGrant) -> bool {
        self.grants.contains(grant)
    }

    pub(crate) fn insert_grant(&mut self, grant: DacGrant) {
        self.grants.push(grant);
    }

    /// Removes every grant for the triple regardless of expiry. Returns how many went.
    pub(crate) fn remove_matching(&mut self, subject: &str, object: &str, right: GrantRight) -> usize {
        let before = self.grants.len();
        self.grants.retain(|g| !g.matches(subject, object, right));
        before - self.grants.len()
    }

    /// Drops grants for the triple that have expired at `now`. Returns how many went.
    pub(crate) fn purge_expired(&mut self, subject: &str, object: &str, right: GrantRight, now: Timestamp) -> usize {
        let before = self.grants.len();
        self.grants.retain(|g| !(g.matches(subject, object, right) && g.is_expired(now)));
        before - self.grants.len()
    }

    /// True if a grant for the triple is live at `now`.
    pub(crate) fn has_live_grant(&self, subject: &str, object: &str, right: GrantRight, now: Timestamp) -> bool {
        self.grants.iter().any(|g| g.matches(subject, object, right) && !g.is_expired(now))
    }
}

/// A store shared between threads behind one lock.
///
/// Hold the guard for the whole of an engine operation so the lazy expiry purge
/// inside `check_authorization` cannot interleave with a grant or revoke.
#[derive(Debug, Clone, Default)]
pub struct SharedStore(Arc<Mutex<AccessControlStore>>);

impl SharedStore {
    pub fn new(store: AccessControlStore) -> Self {
        SharedStore(Arc::new(Mutex::new(store)))
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, AccessControlStore>, AcmError> {
        self.0.lock().map_err(|_| AcmError::LockPoisoned)
    }
}
