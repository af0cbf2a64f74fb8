//! In-memory view and backend doubles shared by the unit tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use shared::{
    domain::{ChatMode, Page},
    protocol::{FlowReply, FlowRequest, RagDebugInfo, RagReply, RagRequest},
};

use crate::{
    error::ClientError,
    transport::ChatBackend,
    view::{ChatMessage, ChatView, MessageList, SEND_LABEL},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub enabled: bool,
    pub button_label: String,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            enabled: true,
            button_label: SEND_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingView {
    pub flow_messages: Vec<ChatMessage>,
    pub rag_messages: Vec<ChatMessage>,
    pub cleared: Vec<MessageList>,
    pub scrolls: Vec<MessageList>,
    pub flow_error: Option<String>,
    pub flow_error_visible: bool,
    pub progress_width: Option<f64>,
    pub step_label: Option<String>,
    pub input_bar_hidden: bool,
    pub flow_input: InputState,
    pub rag_input: InputState,
    /// Every (mode, enabled, label) the lock passed through, in order.
    pub lock_history: Vec<(ChatMode, bool, String)>,
    pub inputs_cleared: Vec<ChatMode>,
}

impl RecordingView {
    pub fn messages(&self, list: MessageList) -> &[ChatMessage] {
        match list {
            MessageList::Flow => &self.flow_messages,
            MessageList::Rag => &self.rag_messages,
        }
    }

    pub fn texts(&self, list: MessageList) -> Vec<&str> {
        self.messages(list).iter().map(|m| m.text.as_str()).collect()
    }
}

impl ChatView for RecordingView {
    fn append_message(&mut self, list: MessageList, message: ChatMessage) {
        match list {
            MessageList::Flow => self.flow_messages.push(message),
            MessageList::Rag => self.rag_messages.push(message),
        }
    }

    fn clear_messages(&mut self, list: MessageList) {
        self.cleared.push(list);
        match list {
            MessageList::Flow => self.flow_messages.clear(),
            MessageList::Rag => self.rag_messages.clear(),
        }
    }

    fn scroll_to_bottom(&mut self, list: MessageList) {
        self.scrolls.push(list);
    }

    fn show_flow_error(&mut self, text: &str) {
        self.flow_error = Some(text.to_string());
        self.flow_error_visible = true;
    }

    fn hide_flow_error(&mut self) {
        self.flow_error_visible = false;
    }

    fn set_progress(&mut self, width_percent: f64, label: &str) {
        self.progress_width = Some(width_percent);
        self.step_label = Some(label.to_string());
    }

    fn hide_input_bar(&mut self) {
        self.input_bar_hidden = true;
    }

    fn clear_input(&mut self, mode: ChatMode) {
        self.inputs_cleared.push(mode);
    }

    fn set_input_enabled(&mut self, mode: ChatMode, enabled: bool, button_label: &str) {
        let state = InputState {
            enabled,
            button_label: button_label.to_string(),
        };
        match mode {
            ChatMode::Flow => self.flow_input = state,
            ChatMode::Rag => self.rag_input = state,
        }
        self.lock_history
            .push((mode, enabled, button_label.to_string()));
    }
}

/// Backend that replays queued replies and records what it was sent.
#[derive(Default)]
pub struct ScriptedBackend {
    flow_replies: Mutex<VecDeque<Result<FlowReply, ClientError>>>,
    rag_replies: Mutex<VecDeque<Result<RagReply, ClientError>>>,
    pub flow_requests: Mutex<Vec<FlowRequest>>,
    pub rag_requests: Mutex<Vec<RagRequest>>,
    pub pages_loaded: Mutex<Vec<Page>>,
    pub status_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn with_flow(replies: Vec<Result<FlowReply, ClientError>>) -> Self {
        let backend = Self::default();
        backend
            .flow_replies
            .lock()
            .expect("flow replies")
            .extend(replies);
        backend
    }

    pub fn with_rag(replies: Vec<Result<RagReply, ClientError>>) -> Self {
        let backend = Self::default();
        backend
            .rag_replies
            .lock()
            .expect("rag replies")
            .extend(replies);
        backend
    }

    pub fn flow_request_count(&self) -> usize {
        self.flow_requests.lock().expect("flow requests").len()
    }

    pub fn rag_request_count(&self) -> usize {
        self.rag_requests.lock().expect("rag requests").len()
    }
}

/// A decode failure, as produced by a non-JSON reply body.
pub fn decode_failure(route: &'static str) -> ClientError {
    let source = serde_json::from_str::<serde_json::Value>("<html>")
        .expect_err("html is not json");
    ClientError::Decode { route, source }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn load_page(&self, page: Page) -> Result<(), ClientError> {
        self.pages_loaded.lock().expect("pages").push(page);
        Ok(())
    }

    async fn next_flow_question(&self, request: &FlowRequest) -> Result<FlowReply, ClientError> {
        self.flow_requests
            .lock()
            .expect("flow requests")
            .push(request.clone());
        self.flow_replies
            .lock()
            .expect("flow replies")
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::dispatch("no scripted flow reply left")))
    }

    async fn rag_chat(&self, request: &RagRequest) -> Result<RagReply, ClientError> {
        self.rag_requests
            .lock()
            .expect("rag requests")
            .push(request.clone());
        self.rag_replies
            .lock()
            .expect("rag replies")
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::dispatch("no scripted rag reply left")))
    }

    async fn rag_status(&self) -> Result<RagDebugInfo, ClientError> {
        self.status_calls.fetch_add(1, Ordering::Relaxed);
        Ok(RagDebugInfo {
            rag_bot_initialized: true,
            ..RagDebugInfo::default()
        })
    }
}
