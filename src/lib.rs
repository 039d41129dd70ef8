pub mod config;
pub mod logging;
pub mod reconciliation;
pub mod scanner;
pub mod schedule;
pub mod scheduler;
pub mod signals;
pub mod synchronizer;
pub mod utils;

// Re-export commonly used types
pub use config::{read_config, ConfigError, EndpointRole, ReplicaConfig, SyncEndpoint, ValidatedConfig};
pub use logging::{init_logging, AuditLevel, AuditLog, MemoryAuditLog, TracingAuditLog};
pub use reconciliation::{
    build_reconciliation_plan, diff_dirs, diff_files, execute_reconciliation, CycleReport,
    ExecuteError, ExecuteOptions, FailurePolicy, ReconciliationPlan,
};
pub use scanner::{scan_tree, snapshot_tree, DirectorySnapshot, PathListing};
pub use schedule::{parse_interval, IntervalUnit, ScheduleError, ScheduleSpec};
pub use scheduler::{run_forever, run_once};
pub use signals::{setup_signal_handlers, ShutdownSignal};
pub use synchronizer::Synchronizer;
