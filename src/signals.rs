//! Graceful shutdown signal handling.

use tokio::sync::watch;
use tracing::{info, warn};

/// State published on the shutdown channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    None,
    Shutdown,
}

/// Create a shutdown channel and register OS signal handlers.
///
/// On SIGTERM or SIGINT (Ctrl+C), [`ShutdownSignal::Shutdown`] is published.
pub fn setup_signal_handlers() -> watch::Receiver<ShutdownSignal> {
    let (tx, rx) = watch::channel(ShutdownSignal::None);

    tokio::spawn(async move {
        wait_for_signal().await;
        let _ = tx.send(ShutdownSignal::Shutdown);
    });

    rx
}

async fn wait_for_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                    _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                }
                return;
            }
            Err(e) => warn!(error = %e, "failed to register SIGTERM handler"),
        }
    }

    match ctrl_c.await {
        Ok(()) => info!("received Ctrl+C, initiating shutdown"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
