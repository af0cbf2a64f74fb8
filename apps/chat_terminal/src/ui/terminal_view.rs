use std::{fmt::Display, io::Write};

use chrono::Local;
use client_core::{ChatMessage, ChatView, MessageList, SEND_LABEL};
use shared::domain::{ChatMode, Page, SenderKind};

const PROGRESS_CELLS: usize = 20;

#[derive(Debug, Clone)]
struct InputControls {
    enabled: bool,
    button_label: String,
}

impl Default for InputControls {
    fn default() -> Self {
        Self {
            enabled: true,
            button_label: SEND_LABEL.to_string(),
        }
    }
}

/// Renders a chat page as a line-oriented transcript.
pub struct TerminalView<W: Write> {
    out: W,
    page: Page,
    flow_input: InputControls,
    rag_input: InputControls,
    input_bar_visible: bool,
    flow_error: Option<String>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, page: Page) -> Self {
        Self {
            out,
            page,
            flow_input: InputControls::default(),
            rag_input: InputControls::default(),
            input_bar_visible: true,
            flow_error: None,
        }
    }

    pub fn input_bar_visible(&self) -> bool {
        self.input_bar_visible
    }

    /// False while a request holds the lock of `mode`, or once the input
    /// bar is gone.
    pub fn accepts_input(&self, mode: ChatMode) -> bool {
        self.input_bar_visible && self.controls(mode).enabled
    }

    pub fn button_label(&self, mode: ChatMode) -> &str {
        &self.controls(mode).button_label
    }

    pub fn flow_error(&self) -> Option<&str> {
        self.flow_error.as_deref()
    }

    /// Prints a line that is not part of the conversation.
    pub fn notice(&mut self, text: impl Display) {
        self.write_line(format_args!("  {text}"));
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn controls(&self, mode: ChatMode) -> &InputControls {
        match mode {
            ChatMode::Flow => &self.flow_input,
            ChatMode::Rag => &self.rag_input,
        }
    }

    fn write_line(&mut self, line: impl Display) {
        if let Err(err) = writeln!(self.out, "{line}") {
            tracing::warn!("failed to write to terminal: {err}");
        }
    }
}

fn progress_bar(width_percent: f64) -> String {
    let filled = if width_percent.is_finite() {
        ((width_percent / 100.0) * PROGRESS_CELLS as f64)
            .round()
            .clamp(0.0, PROGRESS_CELLS as f64) as usize
    } else {
        0
    };
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(PROGRESS_CELLS - filled)
    )
}

impl<W: Write> ChatView for TerminalView<W> {
    fn append_message(&mut self, list: MessageList, message: ChatMessage) {
        tracing::debug!(?list, sender = ?message.sender, "append message");
        let stamp = message.sent_at.with_timezone(&Local).format("%H:%M");
        if message.is_summary {
            self.write_line("-------------------- summary --------------------");
            for line in message.text.lines() {
                self.write_line(line);
            }
            self.write_line("-------------------------------------------------");
            return;
        }

        let who = match message.sender {
            SenderKind::User => "you",
            SenderKind::Bot => "bot",
        };
        let mut lines = message.text.lines();
        let first = lines.next().unwrap_or_default();
        self.write_line(format_args!("[{stamp}] {who} > {first}"));
        for line in lines {
            self.write_line(format_args!("              {line}"));
        }
    }

    fn clear_messages(&mut self, list: MessageList) {
        tracing::debug!(page = %self.page, ?list, "message list cleared");
    }

    fn scroll_to_bottom(&mut self, _list: MessageList) {
        if let Err(err) = self.out.flush() {
            tracing::warn!("failed to flush terminal: {err}");
        }
    }

    fn show_flow_error(&mut self, text: &str) {
        self.flow_error = Some(text.to_string());
        self.write_line(format_args!("  ! {text}"));
    }

    fn hide_flow_error(&mut self) {
        self.flow_error = None;
    }

    fn set_progress(&mut self, width_percent: f64, label: &str) {
        let bar = progress_bar(width_percent);
        self.write_line(format_args!("  {bar} {label} ({width_percent:.0}%)"));
    }

    fn hide_input_bar(&mut self) {
        self.input_bar_visible = false;
        self.notice("This conversation is complete. Type /back to return home.");
    }

    fn clear_input(&mut self, _mode: ChatMode) {}

    fn set_input_enabled(&mut self, mode: ChatMode, enabled: bool, button_label: &str) {
        let controls = match mode {
            ChatMode::Flow => &mut self.flow_input,
            ChatMode::Rag => &mut self.rag_input,
        };
        controls.enabled = enabled;
        controls.button_label = button_label.to_string();
        if !enabled {
            self.notice(button_label);
        }
    }
}
