//! HTTP client for the Newsify backend.
//!
//! All endpoints are plain JSON over HTTP; the interesting part is the
//! [`NewsBackend`] trait seam, which lets the reducer and the TUI be tested
//! against a stub instead of a live server.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use super::types::{
    ChatReply, ChatRequest, ErrorBody, Headline, HeadlinesResponse, HistoryEntry, HistoryResponse,
    SessionEntry, SessionsResponse,
};

/// Errors that can occur talking to the backend.
/// Variants carry enough info to render a useful inline message.
#[derive(Debug)]
pub enum BackendError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse the backend's response body.
    Parse(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "backend error (HTTP {status}): {message}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The six backend operations the client consumes.
///
/// `category` is the lowercased category name; `session_id` is an opaque id.
#[async_trait]
pub trait NewsBackend: Send + Sync {
    /// Returns the name of the backend (for logging).
    fn name(&self) -> &str;

    async fn headlines(&self, category: &str) -> Result<Vec<Headline>, BackendError>;

    async fn sessions(&self) -> Result<Vec<SessionEntry>, BackendError>;

    async fn delete_sessions(&self) -> Result<(), BackendError>;

    async fn history(&self, session_id: &str) -> Result<Vec<HistoryEntry>, BackendError>;

    async fn send_message(&self, session_id: &str, message: &str)
    -> Result<String, BackendError>;

    async fn reset_history(&self, session_id: &str) -> Result<(), BackendError>;
}

/// Reqwest-backed implementation against a real Newsify backend.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: String, request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into a `BackendError::Api`, extracting the
    /// backend's `error`/`details` field when the body is JSON.
    async fn api_error(response: reqwest::Response) -> BackendError {
        let status = response.status().as_u16();
        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .unwrap_or_default()
            .message_or(&raw);
        warn!("Backend returned HTTP {status}: {message}");
        BackendError::Api { status, message }
    }
}

#[async_trait]
impl NewsBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn headlines(&self, category: &str) -> Result<Vec<Headline>, BackendError> {
        debug!("GET /api/headlines?category={category}");
        let response = self
            .client
            .get(self.url("/api/headlines"))
            .query(&[("category", category)])
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: HeadlinesResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        Ok(body.headlines)
    }

    async fn sessions(&self) -> Result<Vec<SessionEntry>, BackendError> {
        debug!("GET /sessions");
        let response = self
            .client
            .get(self.url("/sessions"))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: SessionsResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        Ok(body.sessions)
    }

    async fn delete_sessions(&self) -> Result<(), BackendError> {
        debug!("DELETE /sessions");
        let response = self
            .client
            .delete(self.url("/sessions"))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<HistoryEntry>, BackendError> {
        debug!("GET /history/{session_id}");
        let response = self
            .client
            .get(self.url(&format!("/history/{session_id}")))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: HistoryResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        Ok(body.history)
    }

    async fn send_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<String, BackendError> {
        debug!("POST /chat (session={session_id}, {} bytes)", message.len());
        let request = ChatRequest {
            message,
            session_id,
        };

        let response = self
            .client
            .post(self.url("/chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: ChatReply = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        Ok(body.reply)
    }

    async fn reset_history(&self, session_id: &str) -> Result<(), BackendError> {
        debug!("DELETE /history/{session_id}");
        let response = self
            .client
            .delete(self.url(&format!("/history/{session_id}")))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new(
            "http://localhost:8000/".to_string(),
            Duration::from_secs(5),
        );
        assert_eq!(backend.url("/chat"), "http://localhost:8000/chat");
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Api {
            status: 503,
            message: "upstream down".to_string(),
        };
        assert_eq!(err.to_string(), "backend error (HTTP 503): upstream down");

        let err = BackendError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "network error: connection refused");
    }
}
