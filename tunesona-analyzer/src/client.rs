//! Music API query client
//!
//! Every Source Fetcher talks to the API through [`QueryClient`], a single
//! `request(path, query) -> JSON` call shape. [`HttpQueryClient`] is the
//! reqwest implementation; tests substitute scripted clients.
//!
//! # Authentication
//! - With a developer token configured: `Authorization: Bearer <developer token>`
//!   plus `Music-User-Token: <credential>`
//! - Without one: `Authorization: Bearer <credential>`

use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use tunesona_common::config::ApiConfig;
use tunesona_common::Credential;

/// Header carrying the user token alongside a developer token
pub const MUSIC_USER_TOKEN_HEADER: &str = "Music-User-Token";

/// User-Agent header
const USER_AGENT: &str = concat!("tunesona-analyzer/", env!("CARGO_PKG_VERSION"));

/// Transport-level failure of a query
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// Server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body was not JSON
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Capability for issuing one authenticated API query
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// GET `path` with `query`, returning the decoded JSON body
    ///
    /// # Errors
    /// Returns `ClientError` for non-2xx status, transport failure or bad JSON
    async fn request(
        &self,
        credential: &Credential,
        path: &str,
        query: &[(String, String)],
    ) -> Result<serde_json::Value, ClientError>;
}

/// reqwest-backed query client bound to one API host
pub struct HttpQueryClient {
    http_client: Client,
    base_url: String,
    developer_token: Option<String>,
}

impl HttpQueryClient {
    /// Build a client from the `[api]` config section
    ///
    /// The timeout lives here, in the network layer; the pipeline imposes none.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            developer_token: config
                .developer_token
                .clone()
                .filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl QueryClient for HttpQueryClient {
    async fn request(
        &self,
        credential: &Credential,
        path: &str,
        query: &[(String, String)],
    ) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, params = query.len(), "Querying music API");

        let mut request = self
            .http_client
            .get(&url)
            .query(query)
            .header(header::ACCEPT, "application/json");

        request = match &self.developer_token {
            Some(developer_token) => request
                .bearer_auth(developer_token)
                .header(MUSIC_USER_TOKEN_HEADER, &credential.token),
            None => request.bearer_auth(&credential.token),
        };

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Request to {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("Reading body of {} failed: {}", path, e)))?;

        serde_json::from_str(&body)
            .map_err(|e| ClientError::Decode(format!("Invalid JSON from {}: {}", path, e)))
    }
}

// ============================================================================
// Scripted client for tests
// ============================================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned responses keyed by path and records every call
    #[derive(Default)]
    pub struct ScriptedClient {
        responses: HashMap<String, Result<serde_json::Value, ClientError>>,
        pub calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl ScriptedClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, path: &str, body: serde_json::Value) -> Self {
            self.responses.insert(path.to_string(), Ok(body));
            self
        }

        pub fn fail(mut self, path: &str, err: ClientError) -> Self {
            self.responses.insert(path.to_string(), Err(err));
            self
        }

        pub fn recorded_calls(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QueryClient for ScriptedClient {
        async fn request(
            &self,
            _credential: &Credential,
            path: &str,
            query: &[(String, String)],
        ) -> Result<serde_json::Value, ClientError> {
            self.calls
                .lock()
                .unwrap()
                .push((path.to_string(), query.to_vec()));
            self.responses.get(path).cloned().unwrap_or(Err(ClientError::Status {
                status: 404,
                message: "Not Found".to_string(),
            }))
        }
    }
}
