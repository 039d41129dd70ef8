use super::plan::ReconciliationPlan;
use crate::config::SyncEndpoint;
use crate::logging::AuditLog;
use crate::utils::{format_paths, is_not_found, now_iso};
use filetime::FileTime;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("Failed to {action} {path}: {source}")]
    Mutation {
        action: MutationAction,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single kind of change applied to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationAction {
    RemoveFile,
    CreateDir,
    RemoveDir,
    CopyFile,
    UpdateFile,
}

impl MutationAction {
    /// Removals of something that is already gone count as skipped, not failed.
    fn tolerates_missing(self) -> bool {
        matches!(self, MutationAction::RemoveFile | MutationAction::RemoveDir)
    }
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MutationAction::RemoveFile => "remove file",
            MutationAction::CreateDir => "create folder",
            MutationAction::RemoveDir => "remove folder",
            MutationAction::CopyFile => "copy file",
            MutationAction::UpdateFile => "update file",
        };
        f.write_str(text)
    }
}

/// What to do when one item of a step fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the cycle at the first failure; the next cycle retries.
    #[default]
    AbortCycle,
    /// Log the failure and carry on with the remaining items and steps.
    Continue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    pub failure_policy: FailurePolicy,
    pub dry_run: bool,
}

/// An item that failed under [`FailurePolicy::Continue`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationFailure {
    pub action: MutationAction,
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of one reconciliation cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleReport {
    pub started_at: String,
    pub finished_at: String,
    pub dry_run: bool,
    pub plan: ReconciliationPlan,
    pub files_removed: Vec<PathBuf>,
    pub dirs_created: Vec<PathBuf>,
    pub dirs_removed: Vec<PathBuf>,
    pub files_copied: Vec<PathBuf>,
    pub files_updated: Vec<PathBuf>,
    /// Items already gone when their removal ran
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<MutationFailure>,
}

impl CycleReport {
    /// Number of destination entries actually changed.
    pub fn changed(&self) -> usize {
        self.files_removed.len()
            + self.dirs_created.len()
            + self.dirs_removed.len()
            + self.files_copied.len()
            + self.files_updated.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Per-cycle bookkeeping shared by the steps.
struct StepContext<'a> {
    policy: FailurePolicy,
    log: &'a dyn AuditLog,
    report: CycleReport,
}

impl StepContext<'_> {
    /// Record the outcome of one item. Returns `Ok(true)` when the item was
    /// applied, `Ok(false)` when it was skipped or its failure contained.
    fn settle(
        &mut self,
        action: MutationAction,
        relative: &Path,
        result: std::io::Result<()>,
    ) -> Result<bool, ExecuteError> {
        let err = match result {
            Ok(()) => return Ok(true),
            Err(err) => err,
        };

        if action.tolerates_missing() && is_not_found(&err) {
            self.log.info(&format!(
                "Cannot {} {}: it no longer exists, skipping",
                action,
                relative.display()
            ));
            self.report.skipped.push(relative.to_path_buf());
            return Ok(false);
        }

        match self.policy {
            FailurePolicy::AbortCycle => Err(ExecuteError::Mutation {
                action,
                path: relative.to_path_buf(),
                source: err,
            }),
            FailurePolicy::Continue => {
                self.log.error(&format!(
                    "Failed to {} {}: {}",
                    action,
                    relative.display(),
                    err
                ));
                self.report.failures.push(MutationFailure {
                    action,
                    path: relative.to_path_buf(),
                    error: err.to_string(),
                });
                Ok(false)
            }
        }
    }
}

/// Apply a plan to the destination.
///
/// Steps run in a fixed order so that a path changing kind between cycles
/// (file to folder or back) is cleared before it is recreated: remove files,
/// create folders, remove folders, copy new files, update changed files.
/// Each step first emits one audit record listing every path it covers.
pub async fn execute_reconciliation(
    source: &SyncEndpoint,
    destination: &SyncEndpoint,
    plan: ReconciliationPlan,
    options: ExecuteOptions,
    log: &dyn AuditLog,
) -> Result<CycleReport, ExecuteError> {
    let mut ctx = StepContext {
        policy: options.failure_policy,
        log,
        report: CycleReport {
            started_at: now_iso(),
            dry_run: options.dry_run,
            ..Default::default()
        },
    };

    if options.dry_run {
        announce(log, "Would delete", &plan.files_to_remove, "files");
        announce(log, "Would create", &plan.dirs_to_add, "folders");
        announce(log, "Would delete", &plan.dirs_to_remove, "folders");
        announce(log, "Would copy", &plan.files_to_add, "files");
        announce(log, "Would update", &plan.files_to_update, "files");
        ctx.report.plan = plan;
        ctx.report.finished_at = now_iso();
        return Ok(ctx.report);
    }

    announce(log, "Deleted", &plan.files_to_remove, "files");
    for relative in &plan.files_to_remove {
        let result = fs::remove_file(destination.resolve(relative)).await;
        if ctx.settle(MutationAction::RemoveFile, relative, result)? {
            ctx.report.files_removed.push(relative.clone());
        }
    }

    announce(log, "Created", &plan.dirs_to_add, "folders");
    for relative in &plan.dirs_to_add {
        let result = fs::create_dir_all(destination.resolve(relative)).await;
        if ctx.settle(MutationAction::CreateDir, relative, result)? {
            ctx.report.dirs_created.push(relative.clone());
        }
    }

    // Parents come before children, so a nested folder may already be gone
    // with its parent; that shows up as skipped.
    announce(log, "Deleted", &plan.dirs_to_remove, "folders");
    for relative in &plan.dirs_to_remove {
        let result = fs::remove_dir_all(destination.resolve(relative)).await;
        if ctx.settle(MutationAction::RemoveDir, relative, result)? {
            ctx.report.dirs_removed.push(relative.clone());
        }
    }

    announce(log, "Copied", &plan.files_to_add, "files");
    for relative in &plan.files_to_add {
        let result = copy_preserving_times(
            &source.resolve(relative),
            &destination.resolve(relative),
            true,
        )
        .await;
        if ctx.settle(MutationAction::CopyFile, relative, result)? {
            ctx.report.files_copied.push(relative.clone());
        }
    }

    announce(log, "Updated", &plan.files_to_update, "files");
    for relative in &plan.files_to_update {
        let result = copy_preserving_times(
            &source.resolve(relative),
            &destination.resolve(relative),
            false,
        )
        .await;
        if ctx.settle(MutationAction::UpdateFile, relative, result)? {
            ctx.report.files_updated.push(relative.clone());
        }
    }

    ctx.report.plan = plan;
    ctx.report.finished_at = now_iso();
    Ok(ctx.report)
}

fn announce(log: &dyn AuditLog, verb: &str, paths: &[PathBuf], noun: &str) {
    log.info(&format!(
        "{} {} {}: {}",
        verb,
        paths.len(),
        noun,
        format_paths(paths)
    ));
}

/// Copy `from` over `to`, then give `to` the access and modification times
/// of `from`. The modification time is what the next cycle compares.
async fn copy_preserving_times(
    from: &Path,
    to: &Path,
    ensure_parent: bool,
) -> std::io::Result<()> {
    if ensure_parent {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).await?;
        }
    }

    let metadata = fs::metadata(from).await?;
    fs::copy(from, to).await?;

    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(to, atime, mtime)
}
