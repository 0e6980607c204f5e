//! Scenario runner: replays the reference test table against a store and prints
//! one PASSED/FAILED row per step. Failed requests show the audit line they
//! produced as `LOGGED@nnn`.
//!
//! Usage: `acm-scenarios [config.json] [audit.log]`. The config defaults to the
//! reference universe. With an audit log, events are appended to it as JSON
//! lines and `LOGGED@nnn` continues from the lines already in the file;
//! without one, numbering starts at this run's first event.
//! Set `RUST_LOG=hybrid_acm=debug` to see the engine's reasoning.

use std::process::ExitCode;
use std::thread::sleep;
use std::time::Duration;

use hybrid_acm::{
    AccessControlStore, AcmConfig, AcmError, Engine, FileAuditSink, MemoryAuditSink, SystemClock,
    TracingAuditSink,
};
use tracing_subscriber::EnvFilter;

const DOC: &str = "something.doc";

struct Runner {
    engine: Engine<(MemoryAuditSink, (TracingAuditSink, Option<FileAuditSink>)), SystemClock>,
    store: AccessControlStore,
    audit: MemoryAuditSink,
    /// Events already in the audit log before this run.
    logged_offset: usize,
    step: u32,
    failures: u32,
}

impl Runner {
    fn row(&mut self, subject: &str, target: &str, action: &str, result: bool, expected: bool, logged_before: usize) {
        self.step += 1;
        let verdict = if result == expected {
            "PASSED"
        } else {
            self.failures += 1;
            "FAILED"
        };
        let logged = if self.audit.len() > logged_before {
            format!("  LOGGED@{:03}", self.logged_offset + self.audit.len())
        } else {
            String::new()
        };
        println!(
            "{:^10} | {:^18} | {:^16} | {:^5} | TEST-{:03} {}{}",
            subject, target, action, result, self.step, verdict, logged
        );
    }

    fn authorization(&mut self, subject: &str, object: &str, right: &str, expected: bool) {
        let before = self.audit.len();
        let result = self.engine.check_authorization(&mut self.store, subject, object, right).granted;
        self.row(subject, object, right, result, expected, before);
    }

    fn assign(&mut self, subject: &str, role: &str, expected: bool) {
        let before = self.audit.len();
        let result = self.engine.assign_role(&mut self.store, subject, role);
        self.row(subject, role, "ASSIGN", result, expected, before);
    }

    fn grant(&mut self, subject: &str, object: &str, right: &str, expected: bool) {
        let before = self.audit.len();
        let result = self.engine.grant_permission(&mut self.store, subject, object, right, 0);
        self.row(subject, object, &format!("GRANT {}", right), result, expected, before);
    }

    fn is_owner(&mut self, subject: &str, object: &str, expected: bool) {
        let before = self.audit.len();
        let result = self.engine.is_owner(&mut self.store, subject, object);
        self.row(subject, object, "OWNER?", result, expected, before);
    }

    fn grant_silently(&mut self, subject: &str, object: &str, right: &str, expiry_secs: u64) {
        self.engine.grant_permission(&mut self.store, subject, object, right, expiry_secs);
    }

    fn revoke(&mut self, subject: &str, object: &str, right: &str) {
        self.engine.revoke_permission(&mut self.store, subject, object, right);
    }

    fn reassign(&mut self, subject: &str, role: &str) {
        self.engine.assign_role(&mut self.store, subject, role);
    }
}

fn run(config: AcmConfig, log: Option<FileAuditSink>) -> Result<u32, AcmError> {
    let (policy, store) = config.build()?;
    let logged_offset = match &log {
        Some(sink) => sink.recorded()?,
        None => 0,
    };
    let audit = MemoryAuditSink::new();
    let mut r = Runner {
        engine: Engine::new(policy, (audit.clone(), (TracingAuditSink, log)), SystemClock),
        store,
        audit,
        logged_offset,
        step: 0,
        failures: 0,
    };

    // RBAC
    for right in ["READ", "WRITE", "EXECUTE", "SHARE"] {
        r.authorization("JANE", DOC, right, true);
    }
    for (right, expected) in [("READ", true), ("WRITE", false), ("EXECUTE", false), ("SHARE", false)] {
        r.authorization("JOE", DOC, right, expected);
    }
    for right in ["READ", "WRITE", "EXECUTE", "SHARE"] {
        r.authorization("JOHN", DOC, right, false);
    }

    // DAC
    r.grant_silently("JOHN", DOC, "WRITE", 0);
    r.authorization("JOHN", DOC, "WRITE", true);
    r.revoke("JOHN", DOC, "WRITE");
    r.authorization("JOHN", DOC, "WRITE", false);

    r.grant_silently("JOHN", DOC, "WRITE", 3);
    r.authorization("JOHN", DOC, "WRITE", true);
    println!("Testing Cooldown (4 seconds)...");
    sleep(Duration::from_secs(4));
    r.authorization("JOHN", DOC, "WRITE", false);

    r.grant_silently("JOHN", DOC, "WRITE", 10);
    r.authorization("JOHN", DOC, "WRITE", true);
    r.revoke("JOHN", DOC, "WRITE");
    r.authorization("JOHN", DOC, "WRITE", false);

    // Role assignment
    r.reassign("JANE", "AUDITOR");
    for (right, expected) in [("READ", true), ("WRITE", false), ("EXECUTE", false), ("SHARE", false)] {
        r.authorization("JANE", DOC, right, expected);
    }
    r.reassign("JOHN", "ADMIN");
    for right in ["READ", "WRITE", "EXECUTE", "SHARE"] {
        r.authorization("JOHN", DOC, right, true);
    }

    // Malformed requests
    r.authorization("place", DOC, "READ", false);
    r.authorization("JOHN", "place", "READ", false);
    r.authorization("JOHN", DOC, "place", false);
    r.assign("place", "ADMIN", false);
    r.assign("JANE", "place", false);
    r.authorization("JANE", DOC, "READ", true);
    r.authorization("JANE", DOC, "WRITE", false);
    r.grant("place", DOC, "WRITE", false);
    r.grant("JANE", "place", "WRITE", false);
    r.grant("JANE", DOC, "place", false);
    r.authorization("JANE", DOC, "READ", true);
    r.authorization("JANE", DOC, "WRITE", false);

    // Redundant requests
    r.grant("JANE", DOC, "READ", true);
    r.grant("JANE", DOC, "READ", false);
    r.assign("JANE", "AUDITOR", false);

    // Read-only
    r.reassign("JANE", "ADMIN");
    for (right, expected) in [("READ", true), ("WRITE", false), ("EXECUTE", false), ("SHARE", false)] {
        r.authorization("JANE", "log.txt", right, expected);
    }
    r.authorization("JOE", "log.txt", "READ", true);
    r.authorization("JOE", "log.txt", "WRITE", false);

    // Ownership
    r.grant("JOE", DOC, "OWN", true);
    r.is_owner("JOE", DOC, true);
    r.revoke("JOE", DOC, "OWN");
    r.is_owner("JOE", DOC, false);

    Ok(r.failures)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => AcmConfig::from_file(&path),
        None => Ok(AcmConfig::example()),
    };
    let log = args.next().map(FileAuditSink::open).transpose();

    match config.and_then(|config| run(config, log?)) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            eprintln!("{} step(s) failed", failures);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
