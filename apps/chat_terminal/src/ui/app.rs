//! Page loop. Each page run owns a fresh session and view, the way a full
//! browser page load would.

use std::io::Write;

use anyhow::{bail, Result};
use client_core::{
    begin_flow_message, begin_rag_message, finish_flow_request, finish_rag_request,
    initialize_page, ChatMessage, ChatView, ClientError, MessageList, PendingFlowRequest,
    PendingRagRequest, SessionState,
};
use crossbeam_channel::{Receiver, Sender};
use shared::{
    domain::{ChatMode, Page},
    protocol::RagDebugInfo,
};

use crate::{
    backend_bridge::commands::BackendCommand,
    config::Settings,
    controller::{
        events::{describe_failure, UiEvent},
        orchestration::dispatch_backend_command,
    },
    ui::terminal_view::TerminalView,
};

const HOME_MENU: &str = "\
Choose a chat mode:
  1) Guided flow   - answer a few questions step by step
  2) Document Q&A  - ask anything about the company documents
Type 1 or 2, or q to quit.";

const FLOW_HELP: &str = "Answer each question and press Enter. /back returns home, /quit exits.";
const RAG_HELP: &str =
    "Ask a question and press Enter. /status checks the document system, /back returns home, /quit exits.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    To(Page),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ChatCommand {
    Back,
    Quit,
    Help,
    Status,
    Unknown(String),
    Message(String),
}

fn parse_home_choice(line: &str) -> Option<Navigation> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" | "flow" | "flow-chat" => Some(Navigation::To(Page::FlowChat)),
        "2" | "rag" | "rag-chat" => Some(Navigation::To(Page::RagChat)),
        "q" | "quit" | "/quit" | "exit" => Some(Navigation::Quit),
        _ => None,
    }
}

fn parse_chat_command(line: &str) -> ChatCommand {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return ChatCommand::Message(line.to_string());
    }
    match trimmed {
        "/back" | "/home" => ChatCommand::Back,
        "/quit" | "/exit" => ChatCommand::Quit,
        "/help" => ChatCommand::Help,
        "/status" => ChatCommand::Status,
        other => ChatCommand::Unknown(other.to_string()),
    }
}

pub struct TerminalApp<W: Write> {
    settings: Settings,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    out: W,
}

impl<W: Write> TerminalApp<W> {
    pub fn new(
        settings: Settings,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        out: W,
    ) -> Self {
        Self {
            settings,
            cmd_tx,
            ui_rx,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run(&mut self, start: Page) -> Result<()> {
        let mut page = start;
        loop {
            tracing::info!(page = %page, "opening page");
            let navigation = match page {
                Page::Home => self.run_home()?,
                Page::FlowChat | Page::RagChat => self.run_chat_page(page)?,
            };
            match navigation {
                Navigation::To(next) => page = next,
                Navigation::Quit => return Ok(()),
            }
        }
    }

    fn run_home(&mut self) -> Result<Navigation> {
        writeln!(self.out, "{HOME_MENU}")?;
        while let Ok(event) = self.ui_rx.recv() {
            match event {
                UiEvent::Input(line) => match parse_home_choice(&line) {
                    Some(navigation) => return Ok(navigation),
                    None => writeln!(self.out, "  Type 1, 2 or q.")?,
                },
                UiEvent::InputClosed => return Ok(Navigation::Quit),
                UiEvent::BackendFailed(message) => bail!(describe_failure(&message)),
                other => tracing::debug!(event = other.name(), "ignoring event on home page"),
            }
        }
        Ok(Navigation::Quit)
    }

    fn run_chat_page(&mut self, page: Page) -> Result<Navigation> {
        let Some(mode) = page.mode() else {
            return Ok(Navigation::To(Page::Home));
        };
        let mut session = SessionState::new();
        let mut view = TerminalView::new(&mut self.out, page);

        match mode {
            ChatMode::Flow => view.notice(FLOW_HELP),
            ChatMode::Rag => {
                view.notice(RAG_HELP);
                view.append_message(
                    MessageList::Rag,
                    ChatMessage::bot(self.settings.rag_welcome.clone()),
                );
            }
        }

        if let Err(err) = dispatch_backend_command(&self.cmd_tx, BackendCommand::LoadPage { page }) {
            tracing::warn!(page = %page, "page load not dispatched: {err}");
        }
        if let Some(pending) = initialize_page(page, &mut session, &mut view) {
            submit_flow(&self.cmd_tx, &mut session, &mut view, pending);
        }

        while let Ok(event) = self.ui_rx.recv() {
            match event {
                UiEvent::Input(line) => match parse_chat_command(&line) {
                    ChatCommand::Back => return Ok(Navigation::To(Page::Home)),
                    ChatCommand::Quit => return Ok(Navigation::Quit),
                    ChatCommand::Help => match mode {
                        ChatMode::Flow => {
                            view.notice(FLOW_HELP);
                            if let Some(error) = view.flow_error().map(str::to_string) {
                                view.notice(format!("! {error}"));
                            }
                        }
                        ChatMode::Rag => view.notice(RAG_HELP),
                    },
                    ChatCommand::Status if mode == ChatMode::Rag => {
                        if let Err(err) =
                            dispatch_backend_command(&self.cmd_tx, BackendCommand::RagStatus)
                        {
                            view.notice(describe_failure(&err.to_string()));
                        }
                    }
                    ChatCommand::Status | ChatCommand::Unknown(_) => {
                        view.notice("Unknown command; type /help for the list.")
                    }
                    ChatCommand::Message(text) => {
                        if !view.input_bar_visible() {
                            view.notice("This conversation is complete. Type /back to return home.");
                            continue;
                        }
                        if !view.accepts_input(mode) {
                            let label = view.button_label(mode).to_string();
                            view.notice(format!("{label} please wait for the reply."));
                            continue;
                        }
                        match mode {
                            ChatMode::Flow => {
                                if let Some(pending) =
                                    begin_flow_message(&mut session, &mut view, &text)
                                {
                                    submit_flow(&self.cmd_tx, &mut session, &mut view, pending);
                                }
                            }
                            ChatMode::Rag => {
                                if let Some(pending) =
                                    begin_rag_message(&mut session, &mut view, &text)
                                {
                                    submit_rag(&self.cmd_tx, &mut session, &mut view, pending);
                                }
                            }
                        }
                    }
                },
                UiEvent::FlowReplied { ticket, result } => {
                    let outcome = finish_flow_request(&mut session, &mut view, ticket, result);
                    tracing::debug!(?outcome, "flow reply handled");
                }
                UiEvent::RagReplied { ticket, result } => {
                    let outcome = finish_rag_request(&mut session, &mut view, ticket, result);
                    tracing::debug!(?outcome, "rag reply handled");
                }
                UiEvent::RagStatus(result) => render_status(&mut view, result),
                UiEvent::PageLoaded {
                    page: loaded,
                    result: Err(err),
                } => tracing::warn!(page = %loaded, "page load failed: {err}"),
                UiEvent::PageLoaded { page: loaded, .. } => {
                    tracing::debug!(page = %loaded, "page loaded")
                }
                UiEvent::Info(message) => tracing::debug!("{message}"),
                UiEvent::InputClosed => return Ok(Navigation::Quit),
                UiEvent::BackendFailed(message) => bail!(describe_failure(&message)),
            }
        }
        Ok(Navigation::Quit)
    }
}

fn submit_flow<V: ChatView>(
    cmd_tx: &Sender<BackendCommand>,
    session: &mut SessionState,
    view: &mut V,
    pending: PendingFlowRequest,
) {
    let PendingFlowRequest { ticket, request } = pending;
    let cmd = BackendCommand::NextFlowQuestion { ticket, request };
    if let Err(err) = dispatch_backend_command(cmd_tx, cmd) {
        finish_flow_request(session, view, ticket, Err(err));
    }
}

fn submit_rag<V: ChatView>(
    cmd_tx: &Sender<BackendCommand>,
    session: &mut SessionState,
    view: &mut V,
    pending: PendingRagRequest,
) {
    let PendingRagRequest { ticket, request } = pending;
    let cmd = BackendCommand::RagChat { ticket, request };
    if let Err(err) = dispatch_backend_command(cmd_tx, cmd) {
        finish_rag_request(session, view, ticket, Err(err));
    }
}

fn render_status<W: Write>(view: &mut TerminalView<W>, result: Result<RagDebugInfo, ClientError>) {
    let info = match result {
        Ok(info) => info,
        Err(err) => {
            view.notice(describe_failure(&err.to_string()));
            return;
        }
    };
    if let Some(error) = info.error {
        view.notice(format!("Document system error: {error}"));
        return;
    }

    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    view.notice(format!(
        "vector store on disk: {}, store loaded: {}, bot ready: {}, memory ready: {}",
        yes_no(info.vector_store_exists),
        yes_no(info.vector_store_available),
        yes_no(info.rag_bot_initialized),
        yes_no(info.memory_initialized),
    ));
    if let (Some(query), Some(found)) = (info.test_query, info.documents_found) {
        view.notice(format!("test query '{query}' matched {found} document(s)"));
    }
    if let Some(sample) = info.sample_content {
        view.notice(format!("sample: {sample}"));
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
