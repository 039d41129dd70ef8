use crate::reconciliation::FailurePolicy;
use crate::schedule::ScheduleSpec;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("No {0} folder configured")]
    MissingPath(EndpointRole),

    #[error("No replication interval configured")]
    MissingInterval,

    #[error("Source and destination are the same folder: {0}")]
    SameFolder(String),

    #[error("The {inner} folder {path} is nested inside the {outer} folder")]
    NestedFolders {
        inner: EndpointRole,
        outer: EndpointRole,
        path: String,
    },
}

/// Which side of the replication a folder is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Source,
    Destination,
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointRole::Source => f.write_str("source"),
            EndpointRole::Destination => f.write_str("destination"),
        }
    }
}

/// A replicated folder root and its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEndpoint {
    pub root: PathBuf,
    pub role: EndpointRole,
}

impl SyncEndpoint {
    pub fn new(root: impl Into<PathBuf>, role: EndpointRole) -> Self {
        Self {
            root: root.into(),
            role,
        }
    }

    pub fn source(root: impl Into<PathBuf>) -> Self {
        Self::new(root, EndpointRole::Source)
    }

    pub fn destination(root: impl Into<PathBuf>) -> Self {
        Self::new(root, EndpointRole::Destination)
    }

    /// Absolute location of a path relative to this root.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}

/// Replica settings as read from a config file or the command line.
///
/// Every field is optional so a config file and CLI flags can be layered;
/// [`ReplicaConfig::validate`] enforces what is actually required.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaConfig {
    #[serde(default)]
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub destination: Option<PathBuf>,
    #[serde(default)]
    pub interval: Option<ScheduleSpec>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Log and skip failing items instead of aborting the cycle.
    #[serde(default)]
    pub keep_going: bool,
    /// Compute and log plans without touching the destination.
    #[serde(default)]
    pub dry_run: bool,
}

/// Settings after validation; immutable for the life of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub source: SyncEndpoint,
    pub destination: SyncEndpoint,
    pub schedule: ScheduleSpec,
    pub log_file: Option<PathBuf>,
    pub failure_policy: FailurePolicy,
    pub dry_run: bool,
}

impl ReplicaConfig {
    /// Layer `overrides` on top of `self`; set values in `overrides` win.
    pub fn merge(self, overrides: ReplicaConfig) -> ReplicaConfig {
        ReplicaConfig {
            source: overrides.source.or(self.source),
            destination: overrides.destination.or(self.destination),
            interval: overrides.interval.or(self.interval),
            log_file: overrides.log_file.or(self.log_file),
            keep_going: overrides.keep_going || self.keep_going,
            dry_run: overrides.dry_run || self.dry_run,
        }
    }

    /// Check the configuration before the replication loop starts.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let source = self
            .source
            .as_deref()
            .ok_or(ConfigError::MissingPath(EndpointRole::Source))?;
        let destination = self
            .destination
            .as_deref()
            .ok_or(ConfigError::MissingPath(EndpointRole::Destination))?;
        let schedule = self.interval.ok_or(ConfigError::MissingInterval)?;

        let source = absolute_root(source)?;
        let destination = absolute_root(destination)?;

        if source == destination {
            return Err(ConfigError::SameFolder(source.display().to_string()));
        }
        if destination.starts_with(&source) {
            return Err(ConfigError::NestedFolders {
                inner: EndpointRole::Destination,
                outer: EndpointRole::Source,
                path: destination.display().to_string(),
            });
        }
        if source.starts_with(&destination) {
            return Err(ConfigError::NestedFolders {
                inner: EndpointRole::Source,
                outer: EndpointRole::Destination,
                path: source.display().to_string(),
            });
        }

        Ok(ValidatedConfig {
            source: SyncEndpoint::source(source),
            destination: SyncEndpoint::destination(destination),
            schedule,
            log_file: self.log_file.clone(),
            failure_policy: if self.keep_going {
                FailurePolicy::Continue
            } else {
                FailurePolicy::AbortCycle
            },
            dry_run: self.dry_run,
        })
    }
}

/// Resolve a root to an absolute path. The deepest existing ancestor is
/// canonicalized so a folder that does not exist yet still compares
/// correctly against one that does.
fn absolute_root(path: &Path) -> Result<PathBuf, ConfigError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(mut canonical) = std::fs::canonicalize(existing) {
            canonical.extend(missing.iter().rev());
            return Ok(canonical);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(absolute),
        }
    }
}

/// Read a JSON configuration file.
pub async fn read_config(config_path: &Path) -> Result<ReplicaConfig, ConfigError> {
    let content = fs::read_to_string(config_path).await?;
    let config: ReplicaConfig = serde_json::from_str(&content)?;
    Ok(config)
}
