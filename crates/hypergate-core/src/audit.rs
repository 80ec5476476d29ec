// crates/hypergate-core/src/audit.rs
// ============================================================================
// Module: Audit Logging
// Description: Structured audit events for resolution and action handling.
// Purpose: Emit JSON-line audit records without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Two events are recorded per request: one for resolution and, when an
//! action matched, one for its outcome. Sinks decide where the JSON lines
//! go; deployments route them into their own pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Resolution outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// An action matched.
    Matched,
    /// Nothing matched the path.
    NotFound,
    /// The path matched but not the method.
    NotAllowed,
}

/// Action outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Executed and written.
    Ok,
    /// Permission check refused the caller.
    PermissionDenied,
    /// Parameter or form decoding failed.
    ParamError,
    /// The execute function failed.
    ExecutionError,
    /// The result could not be written.
    WriteError,
}

/// Resolution audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Resolution outcome.
    pub outcome: ResolutionOutcome,
    /// Matched action key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Allowed methods for `not_allowed`.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub allowed: BTreeSet<String>,
}

impl ResolutionAuditEvent {
    /// Creates a resolution event with the current timestamp.
    #[must_use]
    pub fn new(
        method: &str,
        path: &str,
        outcome: ResolutionOutcome,
        action: Option<String>,
        allowed: BTreeSet<String>,
    ) -> Self {
        Self {
            event: "resolution",
            timestamp_ms: now_ms(),
            method: method.to_string(),
            path: path.to_string(),
            outcome,
            action,
            allowed,
        }
    }
}

/// Action audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ActionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Action key `{resource}#{name}`.
    pub action: String,
    /// Action outcome.
    pub outcome: ActionOutcome,
    /// Media type of the written document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Caller subject, when authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl ActionAuditEvent {
    /// Creates an action event with the current timestamp.
    #[must_use]
    pub fn new(
        action: String,
        outcome: ActionOutcome,
        media_type: Option<String>,
        subject: Option<String>,
    ) -> Self {
        Self {
            event: "action",
            timestamp_ms: now_ms(),
            action,
            outcome,
            media_type,
            subject,
        }
    }
}

/// Milliseconds since the epoch; zero when the clock is before it.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for request events.
pub trait AuditSink: Send + Sync {
    /// Records a resolution event.
    fn record_resolution(&self, event: &ResolutionAuditEvent);

    /// Records an action event.
    fn record_action(&self, _event: &ActionAuditEvent) {}
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_resolution(&self, event: &ResolutionAuditEvent) {
        write_stderr(event);
    }

    fn record_action(&self, event: &ActionAuditEvent) {
        write_stderr(event);
    }
}

/// Writes one JSON line to stderr, dropping unserializable events.
fn write_stderr<E: Serialize>(event: &E) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(std::io::stderr(), "{payload}");
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one JSON line.
    fn append<E: Serialize>(&self, event: &E) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_resolution(&self, event: &ResolutionAuditEvent) {
        self.append(event);
    }

    fn record_action(&self, event: &ActionAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_resolution(&self, _event: &ResolutionAuditEvent) {}

    fn record_action(&self, _event: &ActionAuditEvent) {}
}
