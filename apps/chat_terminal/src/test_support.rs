use std::sync::Mutex;

use async_trait::async_trait;
use client_core::{ChatBackend, ClientError};
use shared::{
    domain::{Page, StepId},
    protocol::{FlowQuestion, FlowReply, FlowRequest, RagDebugInfo, RagReply, RagRequest},
};

/// Two-step flow and an echoing RAG bot.
#[derive(Default)]
pub struct EchoBackend {
    pub pages: Mutex<Vec<Page>>,
}

fn question(step_id: &str, text: &str, step_number: u32) -> FlowReply {
    FlowReply::Question(FlowQuestion {
        question: text.to_string(),
        step_number,
        total_steps: 2,
        step_id: StepId::new(step_id),
    })
}

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn load_page(&self, page: Page) -> Result<(), ClientError> {
        self.pages.lock().expect("pages").push(page);
        Ok(())
    }

    async fn next_flow_question(&self, request: &FlowRequest) -> Result<FlowReply, ClientError> {
        let reply = match request.step_id.as_ref().map(StepId::as_str) {
            None => question("name", "Hello! What's your name?", 1),
            Some("name") => question("email", "What's your email address?", 2),
            Some(_) => FlowReply::Summary("Thanks for the details.".to_string()),
        };
        Ok(reply)
    }

    async fn rag_chat(&self, request: &RagRequest) -> Result<RagReply, ClientError> {
        if request.message == "boom" {
            return Ok(RagReply::Rejected("RAG system is not initialized.".to_string()));
        }
        Ok(RagReply::Answer(format!("echo: {}", request.message)))
    }

    async fn rag_status(&self) -> Result<RagDebugInfo, ClientError> {
        Ok(RagDebugInfo {
            vector_store_exists: true,
            rag_bot_initialized: true,
            vector_store_available: true,
            memory_initialized: true,
            test_query: Some("dress code".to_string()),
            documents_found: Some(2),
            ..RagDebugInfo::default()
        })
    }
}
