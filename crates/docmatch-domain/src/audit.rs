//! Audit events emitted by the engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    /// A resolution started
    AnalysisStart,
    /// A resolution finished
    AnalysisComplete,
    /// A resolution aborted with an unrecoverable error
    AnalysisError,
}

impl AuditEventKind {
    /// Get the event name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventKind::AnalysisStart => "analysis_start",
            AuditEventKind::AnalysisComplete => "analysis_complete",
            AuditEventKind::AnalysisError => "analysis_error",
        }
    }
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-way notification for the audit collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event kind
    pub kind: AuditEventKind,
    /// Identifier of the document being resolved
    pub resource_id: String,
    /// Event details (template, confidence, field count, error message)
    pub details: BTreeMap<String, String>,
    /// Unix timestamp (seconds)
    pub timestamp: u64,
}

impl AuditEvent {
    /// Create an event with no details
    pub fn new(kind: AuditEventKind, resource_id: impl Into<String>, timestamp: u64) -> Self {
        Self {
            kind,
            resource_id: resource_id.into(),
            details: BTreeMap::new(),
            timestamp,
        }
    }

    /// Attach a detail entry
    pub fn with_detail(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.details.insert(key.into(), value.to_string());
        self
    }
}
