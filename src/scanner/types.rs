use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Absolute paths found beneath a root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathListing {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

impl PathListing {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }
}

/// Files and directories of one tree, relative to its root.
///
/// Ordered sets keep plans deterministic and list every directory before
/// its descendants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySnapshot {
    pub files: BTreeSet<PathBuf>,
    pub dirs: BTreeSet<PathBuf>,
}

impl DirectorySnapshot {
    /// Relativize a listing against `root`.
    ///
    /// Paths outside `root` (which the scanner never produces) are dropped.
    /// No case folding or Unicode normalization is applied.
    pub fn from_listing(root: &Path, listing: &PathListing) -> Self {
        let relativize = |paths: &[PathBuf]| -> BTreeSet<PathBuf> {
            paths
                .iter()
                .filter_map(|p| p.strip_prefix(root).ok())
                .filter(|rel| !rel.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .collect()
        };

        Self {
            files: relativize(&listing.files),
            dirs: relativize(&listing.dirs),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }
}
