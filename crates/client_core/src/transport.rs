//! HTTP transport to the chat server.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::Page,
    protocol::{
        flow_next_question_route, rag_chat_route, rag_debug_route, FlowReply, FlowRequest,
        FlowResponseBody, RagDebugInfo, RagReply, RagRequest, RagResponseBody,
    },
};
use tracing::{debug, warn};
use url::Url;

use crate::error::ClientError;

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Fetches a page the way a browser navigation would. The body is
    /// discarded; the call exists for its server-side effects (the flow page
    /// resets the server's flow session) and for the session cookie.
    async fn load_page(&self, page: Page) -> Result<(), ClientError>;
    async fn next_flow_question(&self, request: &FlowRequest) -> Result<FlowReply, ClientError>;
    async fn rag_chat(&self, request: &RagRequest) -> Result<RagReply, ClientError>;
    async fn rag_status(&self) -> Result<RagDebugInfo, ClientError>;
}

#[async_trait]
impl<T> ChatBackend for Arc<T>
where
    T: ChatBackend + ?Sized,
{
    async fn load_page(&self, page: Page) -> Result<(), ClientError> {
        (**self).load_page(page).await
    }

    async fn next_flow_question(&self, request: &FlowRequest) -> Result<FlowReply, ClientError> {
        (**self).next_flow_question(request).await
    }

    async fn rag_chat(&self, request: &RagRequest) -> Result<RagReply, ClientError> {
        (**self).rag_chat(request).await
    }

    async fn rag_status(&self) -> Result<RagDebugInfo, ClientError> {
        (**self).rag_status().await
    }
}

/// `ChatBackend` over reqwest. Cookies are kept for the lifetime of the
/// client so the server can track flow progress between requests.
#[derive(Clone)]
pub struct HttpChatBackend {
    http: Client,
    base_url: Url,
}

impl HttpChatBackend {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(server_url).map_err(|source| ClientError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(ClientError::HttpClient)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(route.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{}", self.base_url, route),
                source,
            })
    }

    /// Posts `body` and decodes the reply whatever its status code; the
    /// server reports application errors inside the JSON body.
    async fn post_json<B, R>(&self, route: &'static str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let res = self
            .http
            .post(self.endpoint(route)?)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport { route, source })?;
        self.decode(route, res).await
    }

    async fn get_json<R: DeserializeOwned>(&self, route: &'static str) -> Result<R, ClientError> {
        let res = self
            .http
            .get(self.endpoint(route)?)
            .send()
            .await
            .map_err(|source| ClientError::Transport { route, source })?;
        self.decode(route, res).await
    }

    async fn decode<R: DeserializeOwned>(
        &self,
        route: &'static str,
        res: reqwest::Response,
    ) -> Result<R, ClientError> {
        let status = res.status();
        if !status.is_success() {
            warn!(route, status = status.as_u16(), "server replied with non-success status");
        }
        let bytes = res
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { route, source })?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode { route, source })
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn load_page(&self, page: Page) -> Result<(), ClientError> {
        let route = page.path();
        let res = self
            .http
            .get(self.endpoint(route)?)
            .send()
            .await
            .map_err(|source| ClientError::Transport { route, source })?;
        debug!(page = %page, status = res.status().as_u16(), "page loaded");
        Ok(())
    }

    async fn next_flow_question(&self, request: &FlowRequest) -> Result<FlowReply, ClientError> {
        let route = flow_next_question_route();
        let body: FlowResponseBody = self.post_json(route, request).await?;
        FlowReply::try_from(body).map_err(|source| ClientError::UnexpectedShape { route, source })
    }

    async fn rag_chat(&self, request: &RagRequest) -> Result<RagReply, ClientError> {
        let route = rag_chat_route();
        let body: RagResponseBody = self.post_json(route, request).await?;
        RagReply::try_from(body).map_err(|source| ClientError::UnexpectedShape { route, source })
    }

    async fn rag_status(&self) -> Result<RagDebugInfo, ClientError> {
        self.get_json(rag_debug_route()).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
