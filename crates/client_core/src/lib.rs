//! Client-side controller for the guided flow and RAG chat pages.
//!
//! The controller never talks to a concrete UI: pages are rendered through
//! [`ChatView`], the server is reached through [`ChatBackend`], and all state
//! that survives between events lives in an explicit [`SessionState`].

pub mod controller;
pub mod error;
pub mod handlers;
pub mod session;
pub mod transport;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::ChatController;
pub use error::ClientError;
pub use handlers::{
    begin_flow_message, begin_flow_question, begin_rag_message, finish_flow_request,
    finish_rag_request, initialize_page, update_progress, FlowOutcome, PendingFlowRequest,
    PendingRagRequest, RagOutcome, FLOW_FAILURE_TEXT, RAG_FAILURE_TEXT,
};
pub use session::{FlowPhase, RequestTicket, SessionState};
pub use transport::{ChatBackend, HttpChatBackend};
pub use view::{ChatMessage, ChatView, MessageList, Progress, SEND_LABEL, SENDING_LABEL};
