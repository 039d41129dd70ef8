#![allow(dead_code)]

use filetime::{set_file_mtime, FileTime};
use replica_daemon::config::SyncEndpoint;
use replica_daemon::logging::MemoryAuditLog;
use replica_daemon::synchronizer::Synchronizer;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use walkdir::WalkDir;

/// A source and a destination folder inside one temp dir.
pub struct TestTrees {
    pub temp: TempDir,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub log: Arc<MemoryAuditLog>,
}

impl TestTrees {
    pub fn synchronizer(&self) -> Synchronizer {
        Synchronizer::new(
            SyncEndpoint::source(&self.source),
            SyncEndpoint::destination(&self.destination),
            self.log.clone(),
        )
    }
}

pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Should create temp dir")
}

/// Create empty `src/` and `dst/` folders.
pub fn create_test_trees() -> TestTrees {
    let temp = create_test_dir();
    let source = temp.path().join("src");
    let destination = temp.path().join("dst");
    std::fs::create_dir_all(&source).expect("Should create source");
    std::fs::create_dir_all(&destination).expect("Should create destination");
    TestTrees {
        temp,
        source,
        destination,
        log: Arc::new(MemoryAuditLog::new()),
    }
}

/// Write a file, creating parents, with a fixed modification time.
pub fn write_file(root: &Path, relative: &str, content: &str, mtime_secs: i64) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Should create parent");
    }
    std::fs::write(&path, content).expect("Should write file");
    set_file_mtime(&path, FileTime::from_unix_time(mtime_secs, 0)).expect("Should set mtime");
}

pub fn mtime_of(path: &Path) -> FileTime {
    FileTime::from_last_modification_time(&std::fs::metadata(path).expect("Should stat file"))
}

/// Relative file paths under `root` with their modification times.
pub fn file_state(root: &Path) -> BTreeMap<PathBuf, FileTime> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_path_buf();
            (relative, mtime_of(e.path()))
        })
        .collect()
}

/// Relative directory paths under `root`.
pub fn dir_state(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect()
}

pub fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}
