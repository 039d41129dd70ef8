//! Fixed-interval replication loop.

use crate::reconciliation::{CycleReport, ExecuteError};
use crate::schedule::ScheduleSpec;
use crate::signals::ShutdownSignal;
use crate::synchronizer::Synchronizer;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Run one cycle now, then one per interval until shutdown is signalled.
///
/// Ticks that fall due while a cycle is still running are dropped rather
/// than queued. A failed cycle is logged and the loop keeps going; shutdown
/// is only observed between cycles. Returns the number of cycles run.
pub async fn run_forever(
    synchronizer: &Synchronizer,
    schedule: ScheduleSpec,
    mut shutdown: watch::Receiver<ShutdownSignal>,
) -> u64 {
    let log = synchronizer.audit_log();
    let mut ticker = tokio::time::interval(schedule.as_duration());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // The first tick completes immediately.
    ticker.tick().await;
    run_logged(synchronizer).await;
    let mut cycles = 1;
    log.info(&format!(
        "Initial copying and removal is complete. Next run will occur in {}.",
        schedule
    ));

    let mut watching = true;
    loop {
        tokio::select! {
            changed = shutdown.changed(), if watching => {
                match changed {
                    Ok(()) if *shutdown.borrow() == ShutdownSignal::Shutdown => {
                        log.info("Shutdown requested, stopping replication loop");
                        break;
                    }
                    Ok(()) => {}
                    // Sender gone: nobody can ask us to stop any more.
                    Err(_) => watching = false,
                }
            }
            _ = ticker.tick() => {
                run_logged(synchronizer).await;
                cycles += 1;
            }
        }
    }

    cycles
}

/// Run a single cycle.
pub async fn run_once(synchronizer: &Synchronizer) -> Result<CycleReport, ExecuteError> {
    synchronizer.run_cycle().await
}

async fn run_logged(synchronizer: &Synchronizer) {
    let log = synchronizer.audit_log();
    match synchronizer.run_cycle().await {
        Ok(report) if report.has_failures() => log.warn(&format!(
            "Replication cycle finished with {} failed item(s)",
            report.failures.len()
        )),
        Ok(_) => {}
        Err(e) => log.error(&format!("Replication cycle failed: {}", e)),
    }
}
