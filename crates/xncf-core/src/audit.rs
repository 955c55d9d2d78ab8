//! # Audit trail
//!
//! Every install call leaves one [`AuditEntry`]: an operation label naming the
//! outcome and the raw scan summary. Where the entry goes is up to the
//! [`AuditSink`] the installer was built with.
use std::fmt::Debug;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Log target used by [`LogAuditSink`]
pub const AUDIT_LOG_TARGET: &str = "xncf::audit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub operation: String,
    pub result: String,
}

/// Destination for audit entries
pub trait AuditSink: Send + Sync + Debug {
    fn record(&self, entry: AuditEntry);
}

/// Writes audit entries to the `log` facade under [`AUDIT_LOG_TARGET`]
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAuditSink;

impl AuditSink for LogAuditSink {
    fn record(&self, entry: AuditEntry) {
        log::info!(target: AUDIT_LOG_TARGET, "{}: {}", entry.operation, entry.result);
    }
}

/// Keeps audit entries in memory, for inspection
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, entry: AuditEntry) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}
