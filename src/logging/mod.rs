//! Audit logging.
//!
//! The replication core never logs through a process-wide handle. Every
//! component that emits audit records is handed an [`AuditLog`] when it is
//! constructed; the binary wires in [`TracingAuditLog`] and tests use
//! [`MemoryAuditLog`].

mod memory;

pub use memory::{AuditRecord, MemoryAuditLog};

use std::fs::OpenOptions;
use std::path::Path;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const AUDIT_TARGET: &str = "replica::audit";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Severity of an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Warn,
    Error,
}

/// Sink for leveled audit records.
pub trait AuditLog: Send + Sync {
    fn record(&self, level: AuditLevel, message: &str);

    fn info(&self, message: &str) {
        self.record(AuditLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(AuditLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(AuditLevel::Error, message);
    }
}

/// Forwards audit records to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn record(&self, level: AuditLevel, message: &str) {
        match level {
            AuditLevel::Info => tracing::info!(target: AUDIT_TARGET, "{}", message),
            AuditLevel::Warn => tracing::warn!(target: AUDIT_TARGET, "{}", message),
            AuditLevel::Error => tracing::error!(target: AUDIT_TARGET, "{}", message),
        }
    }
}

/// Install the global subscriber: stdout always, plus an appending log file
/// when `log_file` is set.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|source| LoggingError::LogFile {
                    path: path.display().to_string(),
                    source,
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::LogFile {
                    path: path.display().to_string(),
                    source,
                })?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(guard)
}
