//! Events delivered to the UI loop by the stdin reader and the backend worker.

use client_core::{ClientError, RequestTicket};
use shared::{
    domain::Page,
    protocol::{FlowReply, RagDebugInfo, RagReply},
};

#[derive(Debug)]
pub enum UiEvent {
    /// One submitted line of input.
    Input(String),
    InputClosed,
    Info(String),
    PageLoaded {
        page: Page,
        result: Result<(), ClientError>,
    },
    FlowReplied {
        ticket: RequestTicket,
        result: Result<FlowReply, ClientError>,
    },
    RagReplied {
        ticket: RequestTicket,
        result: Result<RagReply, ClientError>,
    },
    RagStatus(Result<RagDebugInfo, ClientError>),
    BackendFailed(String),
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Input(_) => "input",
            UiEvent::InputClosed => "input_closed",
            UiEvent::Info(_) => "info",
            UiEvent::PageLoaded { .. } => "page_loaded",
            UiEvent::FlowReplied { .. } => "flow_replied",
            UiEvent::RagReplied { .. } => "rag_replied",
            UiEvent::RagStatus(_) => "rag_status",
            UiEvent::BackendFailed(_) => "backend_failed",
        }
    }
}

/// Turns a low-level failure message into something a user can act on.
pub fn describe_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("backend worker startup failure")
        || lower.contains("failed to build backend runtime")
    {
        "Backend worker startup failure; restart the client and retry.".to_string()
    } else if lower.contains("error sending request")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Server unreachable; check the server URL and network, then retry.".to_string()
    } else if lower.contains("not valid json") {
        "The server sent a reply that could not be understood.".to_string()
    } else {
        format!("Request failed: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_unreachable_server() {
        assert_eq!(
            describe_failure(
                "request to /api/debug/rag failed: error sending request for url (http://127.0.0.1:9/api/debug/rag)"
            ),
            "Server unreachable; check the server URL and network, then retry."
        );
    }

    #[test]
    fn classifies_worker_startup() {
        assert!(describe_failure("backend worker startup failure: failed to build runtime: oops")
            .starts_with("Backend worker startup failure"));
    }

    #[test]
    fn falls_back_to_raw_message() {
        assert_eq!(describe_failure("teapot"), "Request failed: teapot");
    }
}
