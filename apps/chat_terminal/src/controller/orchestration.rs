//! Hands UI actions to the backend command queue.

use client_core::ClientError;
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Never blocks the UI loop; a full or closed queue surfaces as a
/// `ClientError::Dispatch` so the caller can settle the request at once.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), ClientError> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "backend command queue is full");
            Err(ClientError::dispatch("command queue is full; please retry"))
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Err(ClientError::dispatch(
                "backend worker disconnected (possible startup/runtime failure)",
            ))
        }
    }
}
