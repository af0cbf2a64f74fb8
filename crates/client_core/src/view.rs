//! Rendering seam between the controller and whatever draws the page.

use chrono::{DateTime, Utc};
use shared::domain::{ChatMode, SenderKind};

pub const SEND_LABEL: &str = "Send";
pub const SENDING_LABEL: &str = "Sending...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageList {
    Flow,
    Rag,
}

impl From<ChatMode> for MessageList {
    fn from(mode: ChatMode) -> Self {
        match mode {
            ChatMode::Flow => MessageList::Flow,
            ChatMode::Rag => MessageList::Rag,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: SenderKind,
    pub text: String,
    pub is_summary: bool,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(SenderKind::User, text, false)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(SenderKind::Bot, text, false)
    }

    pub fn summary(text: impl Into<String>) -> Self {
        Self::new(SenderKind::Bot, text, true)
    }

    fn new(sender: SenderKind, text: impl Into<String>, is_summary: bool) -> Self {
        Self {
            sender,
            text: text.into(),
            is_summary,
            sent_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: u32,
    pub total: u32,
}

impl Progress {
    pub fn new(current: u32, total: u32) -> Self {
        Self { current, total }
    }

    /// Not clamped. A zero total yields a non-finite width.
    pub fn percentage(&self) -> f64 {
        f64::from(self.current) / f64::from(self.total) * 100.0
    }

    pub fn label(&self) -> String {
        format!("Step {} of {}", self.current, self.total)
    }
}

/// Elements of a chat page. Implementations for pages that lack an element
/// treat the matching call as a no-op.
pub trait ChatView {
    fn append_message(&mut self, list: MessageList, message: ChatMessage);
    fn clear_messages(&mut self, list: MessageList);
    fn scroll_to_bottom(&mut self, list: MessageList);

    fn show_flow_error(&mut self, text: &str);
    fn hide_flow_error(&mut self);

    fn set_progress(&mut self, width_percent: f64, label: &str);

    /// Hides the input bar for good; the flow has ended.
    fn hide_input_bar(&mut self);

    fn clear_input(&mut self, mode: ChatMode);
    /// Toggles the (input, send button) pair of `mode`.
    fn set_input_enabled(&mut self, mode: ChatMode, enabled: bool, button_label: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_a_plain_ratio() {
        assert_eq!(Progress::new(2, 5).percentage(), 40.0);
        assert_eq!(Progress::new(5, 5).percentage(), 100.0);
        assert_eq!(Progress::new(2, 5).label(), "Step 2 of 5");
    }

    #[test]
    fn progress_is_not_clamped() {
        assert_eq!(Progress::new(6, 5).percentage(), 120.0);
        assert!(!Progress::new(1, 0).percentage().is_finite());
    }

    #[test]
    fn summary_messages_come_from_the_bot() {
        let message = ChatMessage::summary("done");
        assert_eq!(message.sender, SenderKind::Bot);
        assert!(message.is_summary);
        assert!(!ChatMessage::user("hi").is_summary);
    }
}
