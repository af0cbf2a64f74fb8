use shared::error::ShapeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("request to {route} failed: {source}")]
    Transport {
        route: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("reply from {route} is not valid JSON: {source}")]
    Decode {
        route: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected reply from {route}: {source}")]
    UnexpectedShape {
        route: &'static str,
        #[source]
        source: ShapeError,
    },
    #[error("request could not be dispatched: {reason}")]
    Dispatch { reason: String },
}

impl ClientError {
    pub fn dispatch(reason: impl Into<String>) -> Self {
        Self::Dispatch {
            reason: reason.into(),
        }
    }

    /// Route the failed request was addressed to, when it got that far.
    pub fn route(&self) -> Option<&'static str> {
        match self {
            ClientError::Transport { route, .. }
            | ClientError::Decode { route, .. }
            | ClientError::UnexpectedShape { route, .. } => Some(*route),
            ClientError::InvalidUrl { .. }
            | ClientError::HttpClient(_)
            | ClientError::Dispatch { .. } => None,
        }
    }
}
