use serde::{Deserialize, Serialize};

use crate::{
    domain::{SenderKind, StepId},
    error::ShapeError,
};

pub fn flow_next_question_route() -> &'static str {
    "/api/flow/next-question"
}

pub fn rag_chat_route() -> &'static str {
    "/api/rag/chat"
}

pub fn rag_debug_route() -> &'static str {
    "/api/debug/rag"
}

/// Body of `POST /api/flow/next-question`.
///
/// Both fields are sent together or not at all; the first request of a flow
/// is the empty object `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<StepId>,
}

impl FlowRequest {
    pub fn start() -> Self {
        Self::default()
    }

    pub fn new(answer: Option<String>, step_id: Option<StepId>) -> Self {
        match (answer, step_id) {
            (Some(answer), Some(step_id)) => Self {
                answer: Some(answer),
                step_id: Some(step_id),
            },
            _ => Self::default(),
        }
    }

    pub fn is_start(&self) -> bool {
        self.answer.is_none() && self.step_id.is_none()
    }
}

/// Raw reply of the flow endpoint before it is classified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowResponseBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub step_number: Option<u32>,
    #[serde(default)]
    pub total_steps: Option<u32>,
    #[serde(default)]
    pub step_id: Option<StepId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowQuestion {
    pub question: String,
    pub step_number: u32,
    pub total_steps: u32,
    pub step_id: StepId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowReply {
    /// Validation or application error; the flow stays on the current step.
    Rejected(String),
    /// Terminal reply closing the flow.
    Summary(String),
    Question(FlowQuestion),
}

impl TryFrom<FlowResponseBody> for FlowReply {
    type Error = ShapeError;

    fn try_from(body: FlowResponseBody) -> Result<Self, Self::Error> {
        // Empty strings count as absent, so `{"error": ""}` falls through.
        if let Some(error) = non_empty(body.error) {
            return Ok(FlowReply::Rejected(error));
        }
        if let Some(summary) = non_empty(body.summary) {
            return Ok(FlowReply::Summary(summary));
        }

        let question = body
            .question
            .ok_or(ShapeError::IncompleteQuestion { missing: "question" })?;
        let step_number = body
            .step_number
            .ok_or(ShapeError::IncompleteQuestion {
                missing: "step_number",
            })?;
        let total_steps = body
            .total_steps
            .ok_or(ShapeError::IncompleteQuestion {
                missing: "total_steps",
            })?;
        let step_id = body
            .step_id
            .ok_or(ShapeError::IncompleteQuestion { missing: "step_id" })?;

        Ok(FlowReply::Question(FlowQuestion {
            question,
            step_number,
            total_steps,
            step_id,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagHistoryEntry {
    pub role: SenderKind,
    pub content: String,
}

/// Body of `POST /api/rag/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<RagHistoryEntry>,
}

impl RagRequest {
    /// History is never carried between requests; the server keeps its own.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagResponseBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RagReply {
    Rejected(String),
    Answer(String),
}

impl TryFrom<RagResponseBody> for RagReply {
    type Error = ShapeError;

    fn try_from(body: RagResponseBody) -> Result<Self, Self::Error> {
        if let Some(error) = non_empty(body.error) {
            return Ok(RagReply::Rejected(error));
        }
        body.response
            .map(RagReply::Answer)
            .ok_or(ShapeError::MissingRagResponse)
    }
}

/// Reply of the `GET /api/debug/rag` diagnostic endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagDebugInfo {
    #[serde(default)]
    pub vector_store_exists: bool,
    #[serde(default)]
    pub rag_bot_initialized: bool,
    #[serde(default)]
    pub vector_store_available: bool,
    #[serde(default)]
    pub memory_initialized: bool,
    #[serde(default)]
    pub test_query: Option<String>,
    #[serde(default)]
    pub documents_found: Option<u32>,
    #[serde(default)]
    pub sample_content: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
