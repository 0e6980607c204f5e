use std::sync::Arc;
use std::thread;

use hybrid_acm::{AcmConfig, Engine, MemoryAuditSink, SharedStore, Timestamp};
use hybrid_acm::time::ManualClock;

#[test]
fn concurrent_grants_stay_unique() {
    let (policy, store) = AcmConfig::example().build().unwrap();
    let shared = SharedStore::new(store);
    let engine = Arc::new(Engine::new(policy, MemoryAuditSink::new(), ManualClock::starting_at(Timestamp(0))));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shared = shared.clone();
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let mut inserted = 0;
                for right in ["READ", "WRITE", "EXECUTE", "SHARE", "OWN"] {
                    let mut store = shared.lock().unwrap();
                    if engine.grant_permission(&mut store, "BOB", "photo.jpg", right, 0) {
                        inserted += 1;
                    }
                }
                inserted
            })
        })
        .collect();

    let inserted: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(inserted, 5, "each grant is inserted by exactly one thread");
    assert_eq!(shared.lock().unwrap().grants().len(), 5);
    assert_eq!(engine.audit().len(), 7 * 5);
}

#[test]
fn check_and_revoke_serialize_on_the_lock() {
    let (policy, store) = AcmConfig::example().build().unwrap();
    let shared = SharedStore::new(store);
    let clock = ManualClock::starting_at(Timestamp(0));
    let engine = Arc::new(Engine::new(policy, MemoryAuditSink::new(), clock.clone()));

    {
        let mut store = shared.lock().unwrap();
        assert!(engine.grant_permission(&mut store, "JOHN", "something.doc", "WRITE", 1));
    }
    clock.advance_secs(1);

    let checker = {
        let (shared, engine) = (shared.clone(), Arc::clone(&engine));
        thread::spawn(move || {
            let mut store = shared.lock().unwrap();
            engine.check_authorization(&mut store, "JOHN", "something.doc", "WRITE").granted
        })
    };
    let revoker = {
        let (shared, engine) = (shared.clone(), Arc::clone(&engine));
        thread::spawn(move || {
            let mut store = shared.lock().unwrap();
            engine.revoke_permission(&mut store, "JOHN", "something.doc", "WRITE")
        })
    };

    assert!(!checker.join().unwrap());
    // Whichever ran first removed the expired grant; the other saw nothing.
    assert!(revoker.join().unwrap() <= 1);
    assert!(shared.lock().unwrap().grants().is_empty());
}
