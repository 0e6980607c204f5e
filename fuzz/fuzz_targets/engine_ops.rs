#![no_main]

// Harness: engine_ops
// Focus: arbitrary grant/revoke/assign/check/owner sequences with clock jumps.
// Asserts: read-only objects never grant a non-READ right; no duplicate grants.

use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use hybrid_acm::{
    time::ManualClock,
    AcmConfig, Engine, MemoryAuditSink, Right, Timestamp,
};

const SUBJECTS: [&str; 5] = ["JANE", "JOE", "BOB", "JOHN", "place"];
const OBJECTS: [&str; 4] = ["log.txt", "photo.jpg", "something.doc", "place"];
const RIGHTS: [&str; 6] = ["READ", "WRITE", "EXECUTE", "SHARE", "OWN", "place"];
const ROLES: [&str; 4] = ["ADMIN", "AUDITOR", "USER", "place"];

#[derive(Arbitrary, Debug, Clone)]
enum Op {
    Grant { subject: u8, object: u8, right: u8, expiry_secs: u8 },
    Revoke { subject: u8, object: u8, right: u8 },
    Assign { subject: u8, role: u8 },
    Check { subject: u8, object: u8, right: u8 },
    Owner { subject: u8, object: u8 },
    Tick { millis: u16 },
}

fn pick<'a>(table: &[&'a str], i: u8) -> &'a str {
    table[i as usize % table.len()]
}

fuzz_target!(|ops: Vec<Op>| {
    let (policy, mut store) = AcmConfig::example().build().unwrap();
    let clock = ManualClock::starting_at(Timestamp(0));
    let engine = Engine::new(policy, MemoryAuditSink::new(), clock.clone());

    for op in ops {
        match op {
            Op::Grant { subject, object, right, expiry_secs } => {
                engine.grant_permission(
                    &mut store,
                    pick(&SUBJECTS, subject),
                    pick(&OBJECTS, object),
                    pick(&RIGHTS, right),
                    u64::from(expiry_secs),
                );
            }
            Op::Revoke { subject, object, right } => {
                engine.revoke_permission(&mut store, pick(&SUBJECTS, subject), pick(&OBJECTS, object), pick(&RIGHTS, right));
            }
            Op::Assign { subject, role } => {
                engine.assign_role(&mut store, pick(&SUBJECTS, subject), pick(&ROLES, role));
            }
            Op::Check { subject, object, right } => {
                let object = pick(&OBJECTS, object);
                let right = pick(&RIGHTS, right);
                let decision = engine.check_authorization(&mut store, pick(&SUBJECTS, subject), object, right);
                if decision.granted && engine.policy().is_read_only(object) {
                    assert_eq!(right, Right::Read.as_str());
                }
            }
            Op::Owner { subject, object } => {
                engine.is_owner(&mut store, pick(&SUBJECTS, subject), pick(&OBJECTS, object));
            }
            Op::Tick { millis } => clock.advance_millis(u64::from(millis)),
        }

        let grants = store.grants();
        for (i, grant) in grants.iter().enumerate() {
            assert!(!grants[i + 1..].contains(grant));
        }
    }
});
