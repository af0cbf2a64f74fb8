//! Sequential controller: one page, one backend, one view.

use shared::{
    domain::{Page, StepId},
    protocol::RagDebugInfo,
};
use tracing::{info, warn};

use crate::{
    error::ClientError,
    handlers::{
        begin_flow_message, begin_flow_question, begin_rag_message, finish_flow_request,
        finish_rag_request, initialize_page, FlowOutcome, PendingFlowRequest, RagOutcome,
    },
    session::SessionState,
    transport::ChatBackend,
    view::ChatView,
};

/// Drives a single page load. Each call awaits its round trip before
/// returning, so requests issued through one controller never overlap.
pub struct ChatController<B, V> {
    page: Page,
    backend: B,
    view: V,
    session: SessionState,
}

impl<B: ChatBackend, V: ChatView> ChatController<B, V> {
    pub fn new(page: Page, backend: B, view: V) -> Self {
        Self {
            page,
            backend,
            view,
            session: SessionState::new(),
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Loads the page and runs its setup. Returns the outcome of the first
    /// flow question on the flow page.
    pub async fn initialize(&mut self) -> Option<FlowOutcome> {
        info!(page = %self.page, "initializing page");
        if self.page != Page::Home {
            if let Err(err) = self.backend.load_page(self.page).await {
                warn!(page = %self.page, "page load failed: {err}");
            }
        }

        let pending = initialize_page(self.page, &mut self.session, &mut self.view)?;
        Some(self.round_trip_flow(pending).await)
    }

    pub async fn get_next_flow_question(
        &mut self,
        answer: Option<String>,
        step_id: Option<StepId>,
    ) -> FlowOutcome {
        if self.session.is_flow_finished() {
            info!("flow already summarized; not requesting another question");
            return FlowOutcome::Finished;
        }
        let pending = begin_flow_question(&mut self.session, answer, step_id);
        self.round_trip_flow(pending).await
    }

    /// `None` when the input was blank or the flow has already ended.
    pub async fn send_flow_message(&mut self, input: &str) -> Option<FlowOutcome> {
        let pending = begin_flow_message(&mut self.session, &mut self.view, input)?;
        Some(self.round_trip_flow(pending).await)
    }

    /// `None` when the input was blank.
    pub async fn send_rag_message(&mut self, input: &str) -> Option<RagOutcome> {
        let pending = begin_rag_message(&mut self.session, &mut self.view, input)?;
        let result = self.backend.rag_chat(&pending.request).await;
        Some(finish_rag_request(
            &mut self.session,
            &mut self.view,
            pending.ticket,
            result,
        ))
    }

    pub async fn rag_status(&self) -> Result<RagDebugInfo, ClientError> {
        self.backend.rag_status().await
    }

    async fn round_trip_flow(&mut self, pending: PendingFlowRequest) -> FlowOutcome {
        let result = self.backend.next_flow_question(&pending.request).await;
        finish_flow_request(&mut self.session, &mut self.view, pending.ticket, result)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
