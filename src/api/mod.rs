pub mod client;
pub mod types;

pub use client::{BackendError, HttpBackend, NewsBackend};
pub use types::{ChatReply, ChatRequest, Headline, HistoryEntry, SessionEntry};
