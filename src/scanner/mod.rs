mod types;

pub use types::{DirectorySnapshot, PathListing};

use crate::logging::AuditLog;
use std::io::ErrorKind;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Walk `root` and collect the absolute path of every file and directory
/// beneath it, at any depth.
///
/// A missing root is not an error: it yields an empty listing and a notice.
/// Other traversal failures are logged and skipped, keeping what was found.
pub fn scan_tree(root: &Path, log: &dyn AuditLog) -> PathListing {
    let mut listing = PathListing::default();

    if !root.exists() {
        log.info(&format!("The folder path {} does not exist.", root.display()));
        return listing;
    }

    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => match classify(&entry) {
                Ok(EntryKind::Dir) => listing.dirs.push(entry.into_path()),
                Ok(EntryKind::File) => listing.files.push(entry.into_path()),
                Err(err) => log.warn(&format!(
                    "Skipping broken symbolic link {}: {}",
                    entry.path().display(),
                    err
                )),
            },
            Err(err) => {
                let not_found = err
                    .io_error()
                    .map(|e| e.kind() == ErrorKind::NotFound)
                    .unwrap_or(false);
                let at = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());

                if not_found {
                    log.info(&format!("The folder path {} does not exist: {}", at, err));
                } else {
                    log.warn(&format!("An error occurred while scanning {}: {}", at, err));
                }
            }
        }
    }

    listing
}

enum EntryKind {
    File,
    Dir,
}

/// Links are not descended into, but a link to a folder is listed as a
/// folder so it is recreated rather than copied.
fn classify(entry: &DirEntry) -> std::io::Result<EntryKind> {
    if entry.file_type().is_dir() {
        return Ok(EntryKind::Dir);
    }
    if entry.path_is_symlink() && std::fs::metadata(entry.path())?.is_dir() {
        return Ok(EntryKind::Dir);
    }
    Ok(EntryKind::File)
}

/// Scan `root` and relativize the result in one step.
pub fn snapshot_tree(root: &Path, log: &dyn AuditLog) -> DirectorySnapshot {
    DirectorySnapshot::from_listing(root, &scan_tree(root, log))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryAuditLog;
    use std::fs;

    #[test]
    fn test_scan_missing_root_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope");
        let log = MemoryAuditLog::new();

        let listing = scan_tree(&missing, &log);

        assert!(listing.is_empty());
        assert!(log.contains("does not exist"));
    }

    #[test]
    fn test_scan_returns_nested_files_and_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("sub/b.txt"), "b").unwrap();
        fs::write(root.join("sub/deeper/c.txt"), "c").unwrap();
        let log = MemoryAuditLog::new();

        let listing = scan_tree(root, &log);

        assert_eq!(
            listing.files,
            vec![
                root.join("a.txt"),
                root.join("sub/b.txt"),
                root.join("sub/deeper/c.txt"),
            ]
        );
        assert_eq!(listing.dirs, vec![root.join("sub"), root.join("sub/deeper")]);
        assert!(listing.files.iter().all(|p| p.is_absolute()));
        assert!(log.records().is_empty());
    }

    #[test]
    fn test_scan_empty_root() {
        let temp = tempfile::tempdir().unwrap();
        let log = MemoryAuditLog::new();

        assert!(scan_tree(temp.path(), &log).is_empty());
        assert!(log.records().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_keeps_partial_results_on_unreadable_dir() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("visible.txt"), "v").unwrap();
        let locked = root.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), "h").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits; nothing to observe in that case.
        let readable_anyway = fs::read_dir(&locked).is_ok();
        let log = MemoryAuditLog::new();
        let listing = scan_tree(root, &log);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(listing.files.contains(&root.join("visible.txt")));
        assert!(listing.dirs.contains(&locked));
        if !readable_anyway {
            assert!(!listing.files.contains(&locked.join("hidden.txt")));
            assert!(log.contains("An error occurred"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_lists_links_by_target_kind() {
        use std::os::unix::fs::symlink;

        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("root");
        let elsewhere = temp.path().join("elsewhere");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&elsewhere).unwrap();
        fs::write(elsewhere.join("inner.txt"), "i").unwrap();
        fs::write(root.join("real.txt"), "r").unwrap();
        symlink(&elsewhere, root.join("dir_link")).unwrap();
        symlink(root.join("real.txt"), root.join("file_link")).unwrap();
        symlink(temp.path().join("nowhere"), root.join("dangling")).unwrap();
        let log = MemoryAuditLog::new();

        let listing = scan_tree(&root, &log);

        assert_eq!(listing.dirs, vec![root.join("dir_link")]);
        assert_eq!(
            listing.files,
            vec![root.join("file_link"), root.join("real.txt")]
        );
        assert!(log.contains("Skipping broken symbolic link"));
    }

    #[test]
    fn test_snapshot_tree_is_relative() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/b.txt"), "b").unwrap();

        let snapshot = snapshot_tree(temp.path(), &MemoryAuditLog::new());

        assert!(snapshot.files.contains(Path::new("sub/b.txt")));
        assert!(snapshot.dirs.contains(Path::new("sub")));
    }
}
