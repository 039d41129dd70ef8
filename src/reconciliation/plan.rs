use crate::config::SyncEndpoint;
use crate::logging::AuditLog;
use crate::scanner::{snapshot_tree, DirectorySnapshot};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The reconciliation plan: relative paths to change in the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationPlan {
    /// Directories in source but not in destination
    pub dirs_to_add: Vec<PathBuf>,

    /// Directories in destination but not in source
    pub dirs_to_remove: Vec<PathBuf>,

    /// Files in source but not in destination
    pub files_to_add: Vec<PathBuf>,

    /// Files in destination but not in source
    pub files_to_remove: Vec<PathBuf>,

    /// Files in both whose modification times differ
    pub files_to_update: Vec<PathBuf>,
}

impl ReconciliationPlan {
    /// Whether applying the plan would change nothing.
    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }

    pub fn total_changes(&self) -> usize {
        self.dirs_to_add.len()
            + self.dirs_to_remove.len()
            + self.files_to_add.len()
            + self.files_to_remove.len()
            + self.files_to_update.len()
    }
}

/// Directory partition between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirDiff {
    pub to_add: Vec<PathBuf>,
    pub to_remove: Vec<PathBuf>,
}

/// File partition between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDiff {
    pub to_add: Vec<PathBuf>,
    pub to_remove: Vec<PathBuf>,
    pub to_update: Vec<PathBuf>,
}

/// Compare directory sets by relative path.
pub fn diff_dirs(source: &DirectorySnapshot, destination: &DirectorySnapshot) -> DirDiff {
    DirDiff {
        to_add: source.dirs.difference(&destination.dirs).cloned().collect(),
        to_remove: destination.dirs.difference(&source.dirs).cloned().collect(),
    }
}

/// Compare file sets by relative path, then compare live modification times
/// of the files present on both sides.
///
/// Any mtime difference marks a file for update, including a destination
/// that is newer than its source. A common file whose metadata cannot be
/// read is logged and left for the next cycle.
pub fn diff_files(
    source_root: &Path,
    source: &DirectorySnapshot,
    destination_root: &Path,
    destination: &DirectorySnapshot,
    log: &dyn AuditLog,
) -> FileDiff {
    let to_add = source.files.difference(&destination.files).cloned().collect();
    let to_remove = destination.files.difference(&source.files).cloned().collect();

    let mut to_update = Vec::new();
    for relative in source.files.intersection(&destination.files) {
        let source_path = source_root.join(relative);
        let destination_path = destination_root.join(relative);

        match (modified_time(&source_path), modified_time(&destination_path)) {
            (Ok(source_mtime), Ok(destination_mtime)) => {
                if source_mtime != destination_mtime {
                    to_update.push(relative.clone());
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                log.warn(&format!(
                    "Could not compare modification times of {}: {}",
                    relative.display(),
                    e
                ));
            }
        }
    }

    FileDiff {
        to_add,
        to_remove,
        to_update,
    }
}

fn modified_time(path: &Path) -> std::io::Result<SystemTime> {
    std::fs::metadata(path)?.modified()
}

/// Scan both endpoints and compute the plan that converges the destination
/// toward the source.
pub fn build_reconciliation_plan(
    source: &SyncEndpoint,
    destination: &SyncEndpoint,
    log: &dyn AuditLog,
) -> ReconciliationPlan {
    let source_snapshot = snapshot_tree(&source.root, log);
    let destination_snapshot = snapshot_tree(&destination.root, log);

    let dirs = diff_dirs(&source_snapshot, &destination_snapshot);
    let files = diff_files(
        &source.root,
        &source_snapshot,
        &destination.root,
        &destination_snapshot,
        log,
    );

    ReconciliationPlan {
        dirs_to_add: dirs.to_add,
        dirs_to_remove: dirs.to_remove,
        files_to_add: files.to_add,
        files_to_remove: files.to_remove,
        files_to_update: files.to_update,
    }
}
