mod execute;
mod plan;

pub use execute::{
    execute_reconciliation, CycleReport, ExecuteError, ExecuteOptions, FailurePolicy,
    MutationAction, MutationFailure,
};
pub use plan::{build_reconciliation_plan, diff_dirs, diff_files, DirDiff, FileDiff, ReconciliationPlan};
