//! Per-page session state.

use std::sync::atomic::{AtomicU64, Ordering};

use shared::domain::{ChatMode, StepId};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowPhase {
    #[default]
    AwaitingQuestion,
    QuestionShown,
    /// Terminal until the page is loaded again.
    SummaryShown,
}

/// Identifies one request. Only the most recently issued ticket of a mode
/// within the same session may apply its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub session_id: u64,
    pub mode: ChatMode,
    pub generation: u64,
    /// Whether the request took the loading lock of its mode.
    pub holds_lock: bool,
}

/// Everything the controller remembers between events. A new page load
/// starts from a fresh value with a fresh session id, so replies addressed
/// to an earlier page never match.
#[derive(Debug, Clone)]
pub struct SessionState {
    session_id: u64,
    pub mode: Option<ChatMode>,
    pub current_step_id: Option<StepId>,
    pub flow_phase: FlowPhase,
    flow_generation: u64,
    rag_generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            mode: None,
            current_step_id: None,
            flow_phase: FlowPhase::default(),
            flow_generation: 0,
            rag_generation: 0,
        }
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn is_flow_finished(&self) -> bool {
        self.flow_phase == FlowPhase::SummaryShown
    }

    pub fn issue_ticket(&mut self, mode: ChatMode, holds_lock: bool) -> RequestTicket {
        let generation = match mode {
            ChatMode::Flow => {
                self.flow_generation += 1;
                self.flow_generation
            }
            ChatMode::Rag => {
                self.rag_generation += 1;
                self.rag_generation
            }
        };
        RequestTicket {
            session_id: self.session_id,
            mode,
            generation,
            holds_lock,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        if ticket.session_id != self.session_id {
            return false;
        }
        let latest = match ticket.mode {
            ChatMode::Flow => self.flow_generation,
            ChatMode::Rag => self.rag_generation,
        };
        ticket.generation == latest
    }

    /// Phase to fall back to when a flow request produced no new question.
    pub(crate) fn settled_flow_phase(&self) -> FlowPhase {
        if self.current_step_id.is_some() {
            FlowPhase::QuestionShown
        } else {
            FlowPhase::AwaitingQuestion
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_per_mode_is_current() {
        let mut session = SessionState::new();
        let first = session.issue_ticket(ChatMode::Flow, true);
        let rag = session.issue_ticket(ChatMode::Rag, true);
        assert!(session.is_current(&first));

        let second = session.issue_ticket(ChatMode::Flow, true);
        assert!(!session.is_current(&first));
        assert!(session.is_current(&second));
        assert!(session.is_current(&rag));
    }

    #[test]
    fn tickets_do_not_cross_sessions() {
        let mut old = SessionState::new();
        let ticket = old.issue_ticket(ChatMode::Flow, false);

        let mut fresh = SessionState::new();
        let _ = fresh.issue_ticket(ChatMode::Flow, false);
        assert_ne!(old.session_id(), fresh.session_id());
        assert!(!fresh.is_current(&ticket));
    }

    #[test]
    fn settled_phase_follows_step_id() {
        let mut session = SessionState::new();
        assert_eq!(session.settled_flow_phase(), FlowPhase::AwaitingQuestion);
        session.current_step_id = Some(StepId::new("email"));
        assert_eq!(session.settled_flow_phase(), FlowPhase::QuestionShown);
    }
}
