//! Audit sinks

use docmatch_domain::traits::AuditSink;
use docmatch_domain::AuditEvent;
use std::sync::Mutex;
use tracing::info;

/// Sink that turns every audit event into a structured `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        let details = event
            .details
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        info!(
            target: "docmatch::audit",
            kind = event.kind.as_str(),
            resource_id = %event.resource_id,
            timestamp = event.timestamp,
            "{}",
            details
        );
    }
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, oldest first
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmatch_domain::AuditEventKind;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemoryAuditSink::new();
        sink.record(AuditEvent::new(AuditEventKind::AnalysisStart, "doc-1", 1));
        sink.record(AuditEvent::new(AuditEventKind::AnalysisComplete, "doc-1", 2));
        let kinds: Vec<_> = sink.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![AuditEventKind::AnalysisStart, AuditEventKind::AnalysisComplete]
        );
    }

    #[test]
    fn test_tracing_sink_accepts_events() {
        TracingAuditSink.record(
            AuditEvent::new(AuditEventKind::AnalysisError, "doc-2", 3).with_detail("error", "boom"),
        );
    }
}
