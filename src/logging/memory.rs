use super::{AuditLevel, AuditLog};
use std::sync::Mutex;

/// One captured audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub level: AuditLevel,
    pub message: String,
}

/// In-memory audit log, used to inspect what a cycle reported.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records captured so far.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Messages only, in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }

    /// Whether any captured message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.records().iter().any(|r| r.message.contains(needle))
    }
}

impl AuditLog for MemoryAuditLog {
    fn record(&self, level: AuditLevel, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push(AuditRecord {
                level,
                message: message.to_string(),
            });
        }
    }
}
