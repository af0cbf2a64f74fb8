//! Request/response handlers over an explicit session and view.
//!
//! Every user action is split in two: `begin_*` validates input, renders the
//! optimistic state and hands back the request to send; `finish_*` applies
//! the reply. Nothing here performs I/O, so a front-end is free to run
//! several requests at once; replies that lost the race are discarded.

use shared::{
    domain::{ChatMode, Page, StepId},
    protocol::{FlowReply, FlowRequest, RagReply, RagRequest},
};
use tracing::{debug, info, warn};

use crate::{
    error::ClientError,
    session::{FlowPhase, RequestTicket, SessionState},
    view::{ChatMessage, ChatView, MessageList, Progress, SEND_LABEL, SENDING_LABEL},
};

pub const FLOW_FAILURE_TEXT: &str = "Failed to get next question. Please try again.";
pub const RAG_FAILURE_TEXT: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFlowRequest {
    pub ticket: RequestTicket,
    pub request: FlowRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRagRequest {
    pub ticket: RequestTicket,
    pub request: RagRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Question { step_id: StepId },
    Summary,
    Rejected(String),
    Failed,
    /// A newer request superseded this one; nothing was applied.
    Stale,
    /// The flow already ended with its summary; nothing was applied.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RagOutcome {
    Answered,
    Rejected,
    Failed,
    Stale,
}

/// Sets the session up for `page` and returns the request a flow page has to
/// issue right away.
pub fn initialize_page<V: ChatView>(
    page: Page,
    session: &mut SessionState,
    view: &mut V,
) -> Option<PendingFlowRequest> {
    session.mode = page.mode();
    match page {
        Page::Home => None,
        Page::FlowChat => {
            view.clear_messages(MessageList::Flow);
            Some(begin_flow_question(session, None, None))
        }
        // The welcome message ships with the page itself.
        Page::RagChat => None,
    }
}

/// Starts a flow round trip without touching the input lock.
pub fn begin_flow_question(
    session: &mut SessionState,
    answer: Option<String>,
    step_id: Option<StepId>,
) -> PendingFlowRequest {
    let ticket = session.issue_ticket(ChatMode::Flow, false);
    if !session.is_flow_finished() {
        session.flow_phase = FlowPhase::AwaitingQuestion;
    }
    PendingFlowRequest {
        ticket,
        request: FlowRequest::new(answer, step_id),
    }
}

/// Handles a submitted flow answer. Returns `None` when there is nothing to
/// send: blank input, or a flow that already ended with its summary.
pub fn begin_flow_message<V: ChatView>(
    session: &mut SessionState,
    view: &mut V,
    raw_input: &str,
) -> Option<PendingFlowRequest> {
    let message = raw_input.trim();
    if message.is_empty() {
        return None;
    }
    if session.is_flow_finished() {
        debug!("flow already summarized; ignoring input");
        return None;
    }

    view.append_message(MessageList::Flow, ChatMessage::user(message));
    view.clear_input(ChatMode::Flow);
    set_loading(view, ChatMode::Flow, true);

    let step_id = session.current_step_id.clone();
    let mut pending = begin_flow_question(session, Some(message.to_string()), step_id);
    pending.ticket.holds_lock = true;
    Some(pending)
}

pub fn finish_flow_request<V: ChatView>(
    session: &mut SessionState,
    view: &mut V,
    ticket: RequestTicket,
    result: Result<FlowReply, ClientError>,
) -> FlowOutcome {
    if !session.is_current(&ticket) {
        debug!(generation = ticket.generation, "discarding superseded flow reply");
        return FlowOutcome::Stale;
    }

    let outcome = if session.is_flow_finished() {
        debug!(generation = ticket.generation, "flow already summarized; ignoring reply");
        FlowOutcome::Finished
    } else {
        apply_flow_reply(session, view, result)
    };
    if ticket.holds_lock {
        set_loading(view, ChatMode::Flow, false);
    }
    outcome
}

fn apply_flow_reply<V: ChatView>(
    session: &mut SessionState,
    view: &mut V,
    result: Result<FlowReply, ClientError>,
) -> FlowOutcome {
    let reply = match result {
        Ok(reply) => reply,
        Err(err) => {
            warn!("flow request failed: {err}");
            session.flow_phase = session.settled_flow_phase();
            view.show_flow_error(FLOW_FAILURE_TEXT);
            return FlowOutcome::Failed;
        }
    };

    match reply {
        FlowReply::Rejected(message) => {
            info!(error = %message, "flow answer rejected");
            session.flow_phase = session.settled_flow_phase();
            view.show_flow_error(&message);
            FlowOutcome::Rejected(message)
        }
        FlowReply::Summary(summary) => {
            view.hide_flow_error();
            view.append_message(MessageList::Flow, ChatMessage::summary(summary));
            view.hide_input_bar();
            session.flow_phase = FlowPhase::SummaryShown;
            view.scroll_to_bottom(MessageList::Flow);
            info!("flow finished");
            FlowOutcome::Summary
        }
        FlowReply::Question(question) => {
            view.hide_flow_error();
            view.append_message(MessageList::Flow, ChatMessage::bot(question.question));
            update_progress(view, Progress::new(question.step_number, question.total_steps));
            session.current_step_id = Some(question.step_id.clone());
            session.flow_phase = FlowPhase::QuestionShown;
            view.scroll_to_bottom(MessageList::Flow);
            debug!(
                step_id = %question.step_id,
                step = question.step_number,
                total = question.total_steps,
                "flow question shown"
            );
            FlowOutcome::Question {
                step_id: question.step_id,
            }
        }
    }
}

pub fn begin_rag_message<V: ChatView>(
    session: &mut SessionState,
    view: &mut V,
    raw_input: &str,
) -> Option<PendingRagRequest> {
    let message = raw_input.trim();
    if message.is_empty() {
        return None;
    }

    view.append_message(MessageList::Rag, ChatMessage::user(message));
    view.clear_input(ChatMode::Rag);
    set_loading(view, ChatMode::Rag, true);

    Some(PendingRagRequest {
        ticket: session.issue_ticket(ChatMode::Rag, true),
        request: RagRequest::new(message),
    })
}

pub fn finish_rag_request<V: ChatView>(
    session: &mut SessionState,
    view: &mut V,
    ticket: RequestTicket,
    result: Result<RagReply, ClientError>,
) -> RagOutcome {
    if !session.is_current(&ticket) {
        debug!(generation = ticket.generation, "discarding superseded rag reply");
        return RagOutcome::Stale;
    }

    let (text, outcome) = match result {
        Ok(RagReply::Answer(answer)) => (answer, RagOutcome::Answered),
        Ok(RagReply::Rejected(error)) => (format!("Error: {error}"), RagOutcome::Rejected),
        Err(err) => {
            warn!("rag request failed: {err}");
            (RAG_FAILURE_TEXT.to_string(), RagOutcome::Failed)
        }
    };
    view.append_message(MessageList::Rag, ChatMessage::bot(text));
    view.scroll_to_bottom(MessageList::Rag);

    if ticket.holds_lock {
        set_loading(view, ChatMode::Rag, false);
    }
    outcome
}

pub fn update_progress<V: ChatView>(view: &mut V, progress: Progress) {
    view.set_progress(progress.percentage(), &progress.label());
}

fn set_loading<V: ChatView>(view: &mut V, mode: ChatMode, loading: bool) {
    if loading {
        view.set_input_enabled(mode, false, SENDING_LABEL);
    } else {
        view.set_input_enabled(mode, true, SEND_LABEL);
    }
}

#[cfg(test)]
#[path = "tests/handlers_tests.rs"]
mod tests;
