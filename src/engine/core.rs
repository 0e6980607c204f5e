//!
//! Authorization engine: the precedence rules combining role defaults, DAC
//! grants and the universal read-only override, plus the grant, revoke,
//! ownership and role-assignment operations that mutate a store.
//!
//! Every operation reads the clock once and uses that instant throughout.
//! No operation fails for bad input; it reports through its result and the
//! audit sink instead.

use crate::audit::{AuditEvent, AuditKind, AuditSink, TracingAuditSink};
use crate::policy::Policy;
use crate::primitives::{DacGrant, Decision, DecisionReason, ObjectId, SubjectId};
use crate::store::AccessControlStore;
use crate::time::{Clock, SystemClock};
use crate::types::{GrantRight, Right, Role, Timestamp};

/// The authorization engine. Holds policy and collaborators, never state:
/// the [`AccessControlStore`] is passed to every operation, so one engine can
/// serve any number of independent stores.
#[derive(Debug, Clone)]
pub struct Engine<A: AuditSink, C: Clock> {
    policy: Policy,
    audit: A,
    clock: C,
}

impl<A, C> Engine<A, C>
where
    A: AuditSink,
    C: Clock,
{
    pub fn new(policy: Policy, audit: A, clock: C) -> Self {
        Engine { policy, audit, clock }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn report(&self, kind: AuditKind, at: Timestamp, subject: &str, object: Option<&str>, action: &str) {
        self.audit.record(&AuditEvent::new(kind, at, subject, object, action));
    }

    /// Decides whether `subject` may exercise `right` on `object`.
    ///
    /// Order of evaluation:
    /// 1. subject, object and right are validated; every invalid field is reported;
    /// 2. expired DAC grants for the exact triple are purged from `store`;
    /// 3. a non-READ right on a read-only object is denied, whatever the role or grants;
    /// 4. a right in the subject's role defaults is granted;
    /// 5. a remaining DAC grant for the triple is granted;
    /// 6. anything else is denied.
    pub fn check_authorization(
        &self,
        store: &mut AccessControlStore,
        subject: &str,
        object: &str,
        right: &str,
    ) -> Decision {
        let now = self.clock.now();

        let mut malformed = false;
        if !store.is_subject(subject) {
            self.report(AuditKind::InvalidSubject, now, subject, Some(object), right);
            malformed = true;
        }
        if !store.is_object(object) {
            self.report(AuditKind::InvalidObject, now, subject, Some(object), right);
            malformed = true;
        }
        // OWN parses as a grant right but never as a `Right`, so it lands here.
        let parsed = match right.parse::<Right>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.report(AuditKind::InvalidRight, now, subject, Some(object), right);
                None
            }
        };
        let requested = match parsed {
            Some(requested) if !malformed => requested,
            _ => return Decision::new(subject, object, right, DecisionReason::Malformed),
        };

        let role = store.role_of(subject);
        let dac_right = GrantRight::Right(requested);

        let purged = store.purge_expired(subject, object, dac_right, now);
        if purged > 0 {
            tracing::debug!("Purged {} expired grant(s) of {} on {} for {}", purged, requested, object, subject);
        }

        if self.policy.is_read_only(object) && requested != Right::Read {
            self.report(AuditKind::ReadOnlyViolation, now, subject, Some(object), right);
            return Decision::new(subject, object, right, DecisionReason::ReadOnly);
        }

        if self.policy.role_grants(role, requested) {
            tracing::debug!(
                "{} granted {} on {} by default rights of role {:?}",
                subject,
                requested,
                object,
                role
            );
            return Decision::new(subject, object, right, DecisionReason::RoleDefault);
        }

        if store.has_live_grant(subject, object, dac_right, now) {
            tracing::debug!("{} granted {} on {} by DAC grant", subject, requested, object);
            return Decision::new(subject, object, right, DecisionReason::DacGrant);
        }

        self.report(AuditKind::Denied, now, subject, Some(object), right);
        Decision::new(subject, object, right, DecisionReason::NoGrant)
    }

    /// Assigns `role` to `subject`, replacing any previous role.
    ///
    /// Returns `false` for an unknown role, an unknown subject (checked in that
    /// order) or a subject that already holds `role`. DAC grants are untouched.
    pub fn assign_role(&self, store: &mut AccessControlStore, subject: &str, role: &str) -> bool {
        let now = self.clock.now();

        let parsed = match role.parse::<Role>() {
            Ok(parsed) => parsed,
            Err(_) => {
                self.report(AuditKind::InvalidRole, now, subject, None, role);
                return false;
            }
        };
        if !store.is_subject(subject) {
            self.report(AuditKind::InvalidSubject, now, subject, None, role);
            return false;
        }
        if store.role_of(subject) == Some(parsed) {
            self.report(AuditKind::RedundantRoleAssignment, now, subject, None, role);
            return false;
        }

        tracing::debug!("Assigning role {} to {} (was {:?})", parsed, subject, store.role_of(subject));
        store.set_role(SubjectId::from(subject), parsed);
        true
    }

    /// Grants `right` (one of the four rights, or `OWN`) on `object` to `subject`.
    ///
    /// `expiry_secs == 0` makes the grant permanent; otherwise it lapses
    /// `expiry_secs` seconds from now. Validation stops at the first invalid
    /// field (subject, object, right) and reports only that one. An identical
    /// grant already in the store is rejected as redundant.
    pub fn grant_permission(
        &self,
        store: &mut AccessControlStore,
        subject: &str,
        object: &str,
        right: &str,
        expiry_secs: u64,
    ) -> bool {
        let now = self.clock.now();

        if !store.is_subject(subject) {
            self.report(AuditKind::InvalidSubject, now, subject, Some(object), right);
            return false;
        }
        if !store.is_object(object) {
            self.report(AuditKind::InvalidObject, now, subject, Some(object), right);
            return false;
        }
        let granted = match right.parse::<GrantRight>() {
            Ok(granted) => granted,
            Err(_) => {
                self.report(AuditKind::InvalidRight, now, subject, Some(object), right);
                return false;
            }
        };

        let (subject_id, object_id) = (SubjectId::from(subject), ObjectId::from(object));
        let grant = if expiry_secs == 0 {
            DacGrant::permanent(subject_id, object_id, granted)
        } else {
            DacGrant::expiring(subject_id, object_id, granted, now.plus_secs(expiry_secs))
        };

        if store.contains_grant(&grant) {
            self.report(AuditKind::RedundantGrant, now, subject, Some(object), right);
            return false;
        }

        tracing::debug!("Granting {} on {} to {} (expires {:?})", granted, object, subject, grant.expires_at);
        store.insert_grant(grant);
        true
    }

    /// Removes every grant of `right` on `object` held by `subject`, expired or
    /// not. Revoking nothing is fine. Returns how many grants were removed.
    pub fn revoke_permission(&self, store: &mut AccessControlStore, subject: &str, object: &str, right: &str) -> usize {
        let Ok(revoked) = right.parse::<GrantRight>() else {
            tracing::debug!("Revoke of unknown right {} on {} for {} matches nothing", right, object, subject);
            return 0;
        };
        let removed = store.remove_matching(subject, object, revoked);
        tracing::debug!("Revoked {} grant(s) of {} on {} from {}", removed, revoked, object, subject);
        removed
    }

    /// True if `subject` holds a live OWN grant on `object`.
    ///
    /// Expired OWN grants seen here are purged, the same as in
    /// [`Engine::check_authorization`].
    pub fn is_owner(&self, store: &mut AccessControlStore, subject: &str, object: &str) -> bool {
        let now = self.clock.now();
        let purged = store.purge_expired(subject, object, GrantRight::OWN, now);
        if purged > 0 {
            tracing::debug!("Purged {} expired OWN grant(s) on {} for {}", purged, object, subject);
        }
        store.has_live_grant(subject, object, GrantRight::OWN, now)
    }
}

impl Engine<TracingAuditSink, SystemClock> {
    /// Engine reporting through `tracing` and reading the system clock.
    pub fn with_policy(policy: Policy) -> Self {
        Self::new(policy, TracingAuditSink, SystemClock)
    }
}

impl Default for Engine<TracingAuditSink, SystemClock> {
    fn default() -> Self {
        Self::with_policy(Policy::default())
    }
}
