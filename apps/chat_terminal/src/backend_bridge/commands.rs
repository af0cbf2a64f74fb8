//! Backend commands queued from the UI loop to the backend worker.

use client_core::RequestTicket;
use shared::{
    domain::Page,
    protocol::{FlowRequest, RagRequest},
};

#[derive(Debug)]
pub enum BackendCommand {
    /// Awaited in order, so requests queued after it see its cookies.
    LoadPage {
        page: Page,
    },
    NextFlowQuestion {
        ticket: RequestTicket,
        request: FlowRequest,
    },
    RagChat {
        ticket: RequestTicket,
        request: RagRequest,
    },
    RagStatus,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadPage { .. } => "load_page",
            BackendCommand::NextFlowQuestion { .. } => "next_flow_question",
            BackendCommand::RagChat { .. } => "rag_chat",
            BackendCommand::RagStatus => "rag_status",
        }
    }
}
