use anyhow::{Context, Result};
use clap::Parser;
use replica_daemon::config::{read_config, ReplicaConfig};
use replica_daemon::logging::{init_logging, AuditLog, TracingAuditLog};
use replica_daemon::schedule::{parse_interval, ScheduleSpec};
use replica_daemon::scheduler::{run_forever, run_once};
use replica_daemon::signals::setup_signal_handlers;
use replica_daemon::synchronizer::Synchronizer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Replica Daemon - keeps a replica folder identical to a source folder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Folder to replicate from
    #[arg(long, env = "REPLICA_SOURCE", visible_alias = "location-path", alias = "location_path")]
    source: Option<PathBuf>,

    /// Replica folder kept in sync with the source
    #[arg(long, env = "REPLICA_DESTINATION", visible_alias = "destination-path", alias = "destination_path")]
    destination: Option<PathBuf>,

    /// How often to synchronize: a 1-2 digit count and a unit.
    /// Example: --interval "30 seconds" (units: seconds, minutes, hours, days, weeks)
    #[arg(
        long,
        env = "REPLICA_INTERVAL",
        visible_alias = "replication-time",
        alias = "replication_time",
        value_parser = parse_interval
    )]
    interval: Option<ScheduleSpec>,

    /// File that receives a copy of every log record
    #[arg(long, env = "REPLICA_LOG_FILE", visible_alias = "log-file-path", alias = "log_file_path")]
    log_file: Option<PathBuf>,

    /// JSON config file; command-line options take precedence
    #[arg(short, long, env = "REPLICA_CONFIG")]
    config: Option<PathBuf>,

    /// Run a single synchronization and exit
    #[arg(long)]
    once: bool,

    /// With --once, print the cycle report as JSON on stdout
    #[arg(long, requires = "once")]
    json: bool,

    /// Log what would change without touching the replica
    #[arg(long)]
    dry_run: bool,

    /// Log failing items and continue instead of aborting the cycle
    #[arg(long)]
    keep_going: bool,
}

impl Args {
    fn overrides(&self) -> ReplicaConfig {
        ReplicaConfig {
            source: self.source.clone(),
            destination: self.destination.clone(),
            interval: self.interval,
            log_file: self.log_file.clone(),
            keep_going: self.keep_going,
            dry_run: self.dry_run,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let base = match &args.config {
        Some(path) => read_config(path)
            .await
            .with_context(|| format!("failed to read config file {}", path.display()))?,
        None => ReplicaConfig::default(),
    };
    let config = base
        .merge(args.overrides())
        .validate()
        .context("invalid configuration")?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = init_logging(config.log_file.as_deref())?;

    info!(
        source = %config.source.root.display(),
        destination = %config.destination.root.display(),
        interval = %config.schedule,
        dry_run = config.dry_run,
        "Starting replica daemon"
    );

    let audit: Arc<dyn AuditLog> = Arc::new(TracingAuditLog);
    let synchronizer = Synchronizer::from_config(&config, audit);

    if args.once {
        let report = run_once(&synchronizer)
            .await
            .context("synchronization failed")?;
        info!(
            changed = report.changed(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "Synchronization complete"
        );
        if args.json {
            let rendered = serde_json::to_string_pretty(&report)
                .context("failed to render cycle report")?;
            println!("{}", rendered);
        }
        return Ok(());
    }

    let shutdown = setup_signal_handlers();
    let cycles = run_forever(&synchronizer, config.schedule, shutdown).await;

    info!(cycles, "Replica daemon stopped");
    Ok(())
}
