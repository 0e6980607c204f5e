//! Audit reporting.
//!
//! An [`AuditSink`] receives one [`AuditEvent`] for every denial, malformed
//! request and rejected mutation. Recording is fire-and-forget: a sink may
//! drop events, but it must not fail or block the engine.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::error::AcmError;
use crate::types::Timestamp;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    InvalidSubject,
    InvalidObject,
    InvalidRight,
    InvalidRole,
    ReadOnlyViolation,
    RedundantGrant,
    RedundantRoleAssignment,
    Denied,
}

impl AuditKind {
    /// True for the malformed-request kinds.
    pub fn is_malformed(self) -> bool {
        matches!(
            self,
            AuditKind::InvalidSubject | AuditKind::InvalidObject | AuditKind::InvalidRight | AuditKind::InvalidRole
        )
    }

    fn describe(self) -> &'static str {
        match self {
            AuditKind::InvalidSubject => "malformed request: unknown subject",
            AuditKind::InvalidObject => "malformed request: unknown object",
            AuditKind::InvalidRight => "malformed request: unknown right",
            AuditKind::InvalidRole => "malformed request: unknown role",
            AuditKind::ReadOnlyViolation => "non-read access to read-only object",
            AuditKind::RedundantGrant => "redundant permission grant",
            AuditKind::RedundantRoleAssignment => "redundant role assignment",
            AuditKind::Denied => "access denied",
        }
    }
}

/// One reported event. Fields hold the request exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub kind: AuditKind,
    pub at: Timestamp,
    pub subject: String,
    /// Absent for role assignments.
    pub object: Option<String>,
    /// The right (or OWN) for grant/check requests, the role for assignments.
    pub action: String,
}

impl AuditEvent {
    pub fn new(kind: AuditKind, at: Timestamp, subject: &str, object: Option<&str>, action: &str) -> Self {
        AuditEvent {
            id: Uuid::new_v4(),
            kind,
            at,
            subject: subject.to_string(),
            object: object.map(str::to_string),
            action: action.to_string(),
        }
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} subject={}", self.kind.describe(), self.subject)?;
        if let Some(object) = &self.object {
            write!(f, " object={}", object)?;
        }
        write!(f, " action={}", self.action)
    }
}

/// Receiver of audit events.
pub trait AuditSink: Send + Sync + std::fmt::Debug {
    fn record(&self, event: &AuditEvent);
}

impl<S: AuditSink + ?Sized> AuditSink for Arc<S> {
    fn record(&self, event: &AuditEvent) {
        (**self).record(event)
    }
}

/// An absent sink drops everything.
impl<S: AuditSink> AuditSink for Option<S> {
    fn record(&self, event: &AuditEvent) {
        if let Some(sink) = self {
            sink.record(event);
        }
    }
}

/// Tee: every event goes to both sinks, left first.
impl<A: AuditSink, B: AuditSink> AuditSink for (A, B) {
    fn record(&self, event: &AuditEvent) {
        self.0.record(event);
        self.1.record(event);
    }
}

/// Default sink: writes each event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        match event.kind {
            kind if kind.is_malformed() || kind == AuditKind::ReadOnlyViolation => {
                tracing::warn!(event_id = %event.id, at = event.at.0, "{}", event)
            }
            _ => tracing::info!(event_id = %event.id, at = event.at.0, "{}", event),
        }
    }
}

/// Keeps events in memory. Clones share one buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryAuditSink(Arc<Mutex<Vec<AuditEvent>>>);

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        match self.0.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn kinds(&self) -> Vec<AuditKind> {
        self.events().into_iter().map(|e| e.kind).collect()
    }

    pub fn len(&self) -> usize {
        match self.0.lock() {
            Ok(events) => events.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        match self.0.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) {
        match self.0.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

/// Appends one JSON object per line to a file.
///
/// Write failures are logged and dropped.
#[derive(Debug)]
pub struct FileAuditSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AcmError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(FileAuditSink { path, file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of events in the file, counting those written by earlier runs.
    pub fn recorded(&self) -> Result<usize, AcmError> {
        let _guard = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(std::fs::read_to_string(&self.path)?.lines().count())
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &AuditEvent) {
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Failed to encode audit event {}: {}", event.id, e);
                return;
            }
        };
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(file, "{}", line) {
            tracing::warn!("Failed to append audit event to {}: {}", self.path.display(), e);
        }
    }
}
