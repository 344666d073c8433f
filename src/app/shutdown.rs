//! Ctrl-C handling.

use tokio::task::JoinHandle;

use crate::MxScan;

/// Cancels `scan` when the process receives Ctrl-C.
///
/// The returned task never finishes on its own; abort it once the run is over.
pub fn cancel_on_ctrl_c(scan: MxScan) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::warn!("Received Ctrl-C, cancelling outstanding lookups");
                scan.cancel();
            }
            Err(e) => log::warn!("Failed to listen for Ctrl-C: {e}"),
        }
    })
}
