//! HTTP client for the assistant backend
//!
//! All calls are JSON over HTTP with a per-request timeout. Failures are
//! classified into transport, server (non-2xx) and malformed-body errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use super::service::{ChatService, WorkspaceService};
use super::types::{
    ChatRequest, ChatResponse, ErrorBody, HealthResponse, HistoryResponse, ListDirectoryResponse,
    PathRequest, ReadFileResponse,
};
use crate::chat::SessionId;
use crate::config::Config;
use crate::error::ApiError;
use crate::workspace::TreeNode;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend client implementing both service traits
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    base: Url,
}

impl HttpClient {
    /// Create a client for `base_url` with the default timeout
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base =
            Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;

        // Routes are joined relative to the base, which needs a trailing slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { http, base })
    }

    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::with_timeout(&config.server_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Query the health endpoint; returns the server's banner message
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<String, ApiError> {
        let resp: HealthResponse = self.request(Method::GET, "", None::<&()>).await?;
        Ok(resp.message)
    }

    /// Fetch the raw server-side history of a conversation
    #[instrument(skip(self))]
    pub async fn history(&self, session_id: &str) -> Result<Vec<serde_json::Value>, ApiError> {
        let route = format!("api/conversation/history/{session_id}");
        let resp: HistoryResponse = self.request(Method::GET, &route, None::<&()>).await?;
        Ok(resp.messages)
    }

    fn endpoint(&self, route: &str) -> Result<Url, ApiError> {
        self.base
            .join(route)
            .map_err(|_| ApiError::InvalidUrl(format!("{}{}", self.base, route)))
    }

    /// Send a request and return the raw body of a 2xx response
    async fn send_raw<B: Serialize + ?Sized>(
        &self,
        method: Method,
        route: &str,
        body: Option<&B>,
    ) -> Result<(Url, Vec<u8>), ApiError> {
        let url = self.endpoint(route)?;
        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|b| b.message())
                .unwrap_or_else(|_| {
                    let text = String::from_utf8_lossy(&bytes).trim().to_string();
                    if text.is_empty() {
                        status.canonical_reason().unwrap_or("unknown error").to_string()
                    } else {
                        text
                    }
                });
            return Err(ApiError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        Ok((url, bytes.to_vec()))
    }

    async fn request<B, T>(&self, method: Method, route: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (url, bytes) = self.send_raw(method, route, body).await?;
        if bytes.is_empty() {
            return Err(ApiError::Malformed {
                url: url.to_string(),
                reason: "empty body".to_string(),
            });
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl WorkspaceService for HttpClient {
    #[instrument(skip(self))]
    async fn list_directory(&self, path: &str) -> Result<Vec<TreeNode>, ApiError> {
        let resp: ListDirectoryResponse = self
            .request(Method::POST, "api/files/list", Some(&PathRequest { path }))
            .await?;
        Ok(resp.items)
    }

    #[instrument(skip(self))]
    async fn read_file(&self, path: &str) -> Result<String, ApiError> {
        let resp: ReadFileResponse = self
            .request(Method::POST, "api/files/read", Some(&PathRequest { path }))
            .await?;
        Ok(resp.content)
    }
}

#[async_trait]
impl ChatService for HttpClient {
    #[instrument(skip(self, message), fields(len = message.len()))]
    async fn send_turn(&self, session_id: &SessionId, message: &str) -> Result<String, ApiError> {
        let wire_id = session_id.wire();
        let resp: ChatResponse = self
            .request(
                Method::POST,
                "api/chat",
                Some(&ChatRequest {
                    message,
                    session_id: &wire_id,
                }),
            )
            .await?;
        Ok(resp.response)
    }

    #[instrument(skip(self))]
    async fn delete_conversation(&self, session_id: &SessionId) -> Result<(), ApiError> {
        let route = format!("api/conversation/{}", session_id.wire());
        // Body is irrelevant; only the status matters
        self.send_raw(Method::DELETE, &route, None::<&()>).await?;
        Ok(())
    }
}
