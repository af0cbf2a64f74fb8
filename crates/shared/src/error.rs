use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level error reported by the server in a JSON `error` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    pub error: String,
}

impl ServerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// A JSON body that decoded but matches none of the documented reply shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("flow reply is neither an error, a summary nor a question (missing `{missing}`)")]
    IncompleteQuestion { missing: &'static str },
    #[error("rag reply carries neither `error` nor `response`")]
    MissingRagResponse,
}
