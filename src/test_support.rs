//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{BackendError, Headline, HistoryEntry, NewsBackend, SessionEntry};
use crate::core::state::{App, DEFAULT_SESSION_ID};

/// A no-op backend for tests that don't need real HTTP calls.
pub struct StubBackend;

#[async_trait]
impl NewsBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    async fn headlines(&self, _category: &str) -> Result<Vec<Headline>, BackendError> {
        Ok(Vec::new())
    }

    async fn sessions(&self) -> Result<Vec<SessionEntry>, BackendError> {
        Ok(Vec::new())
    }

    async fn delete_sessions(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn history(&self, _session_id: &str) -> Result<Vec<HistoryEntry>, BackendError> {
        Ok(Vec::new())
    }

    async fn send_message(
        &self,
        _session_id: &str,
        _message: &str,
    ) -> Result<String, BackendError> {
        Ok(String::new())
    }

    async fn reset_history(&self, _session_id: &str) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Creates a test App on the default session with a StubBackend.
pub fn test_app() -> App {
    App::new(Arc::new(StubBackend), DEFAULT_SESSION_ID.to_string())
}
