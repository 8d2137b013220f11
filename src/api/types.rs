//! Serde mirrors of the Newsify backend's JSON payloads.
//!
//! The backend schema is an opaque external dependency; these types cover
//! only the fields the client reads or writes. Everything else in a response
//! body is ignored by serde.

use serde::{Deserialize, Serialize};

/// A single headline entry from `GET /api/headlines`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Response envelope for `GET /api/headlines?category=<name>`.
#[derive(Deserialize, Debug)]
pub struct HeadlinesResponse {
    pub headlines: Vec<Headline>,
}

/// A session as listed by `GET /sessions`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub id: String,
    #[serde(default)]
    pub preview: String,
}

impl SessionEntry {
    /// A locally created session that the backend hasn't seen yet.
    pub fn local(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            preview: String::from("New Chat"),
        }
    }
}

/// Response envelope for `GET /sessions`.
#[derive(Deserialize, Debug)]
pub struct SessionsResponse {
    #[serde(default)]
    pub sessions: Vec<SessionEntry>,
}

/// One user/bot exchange from `GET /history/{sessionId}`.
/// The backend stores history pairwise; the client flattens each entry
/// into two messages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub user: String,
    pub bot: String,
}

/// Response envelope for `GET /history/{sessionId}`.
#[derive(Deserialize, Debug)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Request body for `POST /chat`.
#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    #[serde(rename = "sessionId")]
    pub session_id: &'a str,
}

/// Success body for `POST /chat`.
#[derive(Deserialize, Debug)]
pub struct ChatReply {
    pub reply: String,
}

/// Error body shape the backend uses on failed requests.
/// Either field may be present; both may be absent on proxy errors.
#[derive(Deserialize, Debug, Default)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub details: Option<String>,
}

impl ErrorBody {
    /// Best human-readable message from an error body, falling back to the
    /// raw body text when neither field is present.
    pub fn message_or(self, raw: &str) -> String {
        self.error
            .or(self.details)
            .unwrap_or_else(|| raw.trim().to_string())
    }
}
