use std::{
    io::{self, BufRead},
    thread,
};

use crossbeam_channel::Sender;

use crate::controller::events::UiEvent;

/// Forwards stdin lines to the UI loop. Pressing Enter submits the line,
/// the terminal equivalent of the send button.
pub fn spawn_stdin_reader(ui_tx: Sender<UiEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        forward_lines(io::stdin().lock(), &ui_tx);
        let _ = ui_tx.send(UiEvent::InputClosed);
    })
}

fn forward_lines(reader: impl BufRead, ui_tx: &Sender<UiEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!("failed to read stdin: {err}");
                break;
            }
        };
        if ui_tx.send(UiEvent::Input(line)).is_err() {
            break;
        }
    }
}
