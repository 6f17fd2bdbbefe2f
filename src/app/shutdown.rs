//! Graceful shutdown handling.

use log::{info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawns a task that cancels `cancel` on Ctrl-C.
///
/// The task also ends quietly when `cancel` is cancelled from elsewhere.
pub fn cancel_on_ctrl_c(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => {
                    info!("Received Ctrl-C, shutting down");
                    cancel.cancel();
                }
                Err(e) => warn!("Failed to listen for Ctrl-C: {e}"),
            },
            _ = cancel.cancelled() => {}
        }
    })
}

/// Cancels `cancel` and waits for the signal task to end.
pub async fn shutdown_gracefully(cancel: CancellationToken, signal_task: JoinHandle<()>) {
    cancel.cancel();
    let _ = signal_task.await;
}
