use proptest::prelude::*;
use hybrid_acm::{
    rights,
    time::ManualClock,
    AccessControlStore, AcmConfig, Engine, GrantRight, MemoryAuditSink, Right, Role, Timestamp,
};

const SUBJECTS: [&str; 4] = ["JANE", "JOE", "BOB", "JOHN"];
const OBJECTS: [&str; 3] = ["log.txt", "photo.jpg", "something.doc"];
const WRITABLE: [&str; 2] = ["photo.jpg", "something.doc"];

fn setup() -> (Engine<MemoryAuditSink, ManualClock>, AccessControlStore, ManualClock) {
    let (policy, store) = AcmConfig::example().build().unwrap();
    let clock = ManualClock::starting_at(Timestamp(1_000_000));
    (Engine::new(policy, MemoryAuditSink::new(), clock.clone()), store, clock)
}

fn any_role() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

fn any_right() -> impl Strategy<Value = Right> {
    prop::sample::select(Right::ALL.to_vec())
}

fn any_grant_right() -> impl Strategy<Value = GrantRight> {
    prop_oneof![any_right().prop_map(GrantRight::from), Just(GrantRight::OWN)]
}

#[derive(Debug, Clone)]
enum Op {
    Grant { subject: &'static str, object: &'static str, right: GrantRight, expiry_secs: u64 },
    Revoke { subject: &'static str, object: &'static str, right: GrantRight },
    Assign { subject: &'static str, role: Role },
    Check { subject: &'static str, object: &'static str, right: Right },
    Owner { subject: &'static str, object: &'static str },
    Tick { secs: u64 },
}

fn any_op() -> impl Strategy<Value = Op> {
    let subject = prop::sample::select(SUBJECTS.to_vec());
    let object = prop::sample::select(OBJECTS.to_vec());
    prop_oneof![
        (subject.clone(), object.clone(), any_grant_right(), 0u64..5)
            .prop_map(|(subject, object, right, expiry_secs)| Op::Grant { subject, object, right, expiry_secs }),
        (subject.clone(), object.clone(), any_grant_right())
            .prop_map(|(subject, object, right)| Op::Revoke { subject, object, right }),
        (subject.clone(), any_role()).prop_map(|(subject, role)| Op::Assign { subject, role }),
        (subject.clone(), object.clone(), any_right())
            .prop_map(|(subject, object, right)| Op::Check { subject, object, right }),
        (subject, object).prop_map(|(subject, object)| Op::Owner { subject, object }),
        (0u64..3).prop_map(|secs| Op::Tick { secs }),
    ]
}

fn run(engine: &Engine<MemoryAuditSink, ManualClock>, store: &mut AccessControlStore, clock: &ManualClock, op: &Op) {
    match *op {
        Op::Grant { subject, object, right, expiry_secs } => {
            engine.grant_permission(store, subject, object, right.as_str(), expiry_secs);
        }
        Op::Revoke { subject, object, right } => {
            engine.revoke_permission(store, subject, object, right.as_str());
        }
        Op::Assign { subject, role } => {
            engine.assign_role(store, subject, role.as_str());
        }
        Op::Check { subject, object, right } => {
            engine.check_authorization(store, subject, object, right.as_str());
        }
        Op::Owner { subject, object } => {
            engine.is_owner(store, subject, object);
        }
        Op::Tick { secs } => clock.advance_secs(secs),
    }
}

proptest! {
    /// A role's default rights are granted on every writable object without DAC.
    #[test]
    fn prop_role_defaults_granted(role in any_role(), object in prop::sample::select(WRITABLE.to_vec())) {
        let (engine, mut store, _) = setup();
        engine.assign_role(&mut store, "BOB", role.as_str());
        for right in rights::rights_in(rights::role_default_rights(role)) {
            prop_assert!(engine.check_authorization(&mut store, "BOB", object, right.as_str()).granted);
        }
    }

    /// No sequence of operations makes a non-READ right on a read-only object pass.
    #[test]
    fn prop_read_only_never_violated(
        ops in prop::collection::vec(any_op(), 0..40),
        subject in prop::sample::select(SUBJECTS.to_vec()),
        right in any_right(),
    ) {
        let (engine, mut store, clock) = setup();
        for op in &ops {
            run(&engine, &mut store, &clock, op);
        }
        let granted = engine.check_authorization(&mut store, subject, "log.txt", right.as_str()).granted;
        if right != Right::Read {
            prop_assert!(!granted);
        }
    }

    /// The store never holds two identical grants.
    #[test]
    fn prop_no_duplicate_grants(ops in prop::collection::vec(any_op(), 0..60)) {
        let (engine, mut store, clock) = setup();
        for op in &ops {
            run(&engine, &mut store, &clock, op);
        }
        let grants = store.grants();
        for (i, a) in grants.iter().enumerate() {
            prop_assert!(!grants[i + 1..].contains(a), "duplicate grant {:?}", a);
        }
    }

    /// A DAC grant enables a right the role does not cover, and revoking it removes it.
    #[test]
    fn prop_grant_then_revoke(
        right in any_right(),
        object in prop::sample::select(WRITABLE.to_vec()),
        expiry_secs in 0u64..100,
    ) {
        let (engine, mut store, _) = setup();
        prop_assert!(engine.grant_permission(&mut store, "JOHN", object, right.as_str(), expiry_secs));
        prop_assert!(engine.check_authorization(&mut store, "JOHN", object, right.as_str()).granted);
        engine.revoke_permission(&mut store, "JOHN", object, right.as_str());
        prop_assert!(!engine.check_authorization(&mut store, "JOHN", object, right.as_str()).granted);
    }

    /// A timed grant holds until its expiry and is gone after, without a revoke.
    #[test]
    fn prop_timed_grant_expires(expiry_secs in 1u64..10_000, extra_millis in 0u64..10_000) {
        let (engine, mut store, clock) = setup();
        prop_assert!(engine.grant_permission(&mut store, "BOB", "photo.jpg", "SHARE", expiry_secs));
        clock.advance_millis(expiry_secs * 1_000 - 1);
        prop_assert!(engine.check_authorization(&mut store, "BOB", "photo.jpg", "SHARE").granted);
        clock.advance_millis(1 + extra_millis);
        prop_assert!(!engine.check_authorization(&mut store, "BOB", "photo.jpg", "SHARE").granted);
        prop_assert!(store.grants().is_empty());
    }

    /// Re-assigning the current role is rejected and changes nothing.
    #[test]
    fn prop_redundant_assign(role in any_role()) {
        let (engine, mut store, _) = setup();
        engine.assign_role(&mut store, "JOHN", role.as_str());
        prop_assert!(!engine.assign_role(&mut store, "JOHN", role.as_str()));
        prop_assert_eq!(store.role_of("JOHN"), Some(role));
    }

    /// Identical grants insert once.
    #[test]
    fn prop_duplicate_grant_rejected(right in any_grant_right(), expiry_secs in 0u64..100) {
        let (engine, mut store, _) = setup();
        prop_assert!(engine.grant_permission(&mut store, "JOE", "photo.jpg", right.as_str(), expiry_secs));
        prop_assert!(!engine.grant_permission(&mut store, "JOE", "photo.jpg", right.as_str(), expiry_secs));
        prop_assert_eq!(store.grant_count("JOE", "photo.jpg", right), 1);
    }
}
