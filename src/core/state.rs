//! # Application State
//!
//! Core business state for Newsify. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn NewsBackend>   // HTTP backend seam
//! ├── view: View                      // Landing or Chat
//! ├── category: Category              // selected headline category
//! ├── headlines: Vec<Headline>        // ticker content
//! ├── sessions: Vec<SessionEntry>     // sidebar content
//! ├── active_session_id: String       // always in sessions or the default
//! ├── messages: Vec<Message>          // current conversation
//! ├── pending_query: Option<String>   // headline carried from the landing view
//! ├── is_loading: bool                // waiting for a chat reply
//! └── status_message: String          // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use crate::api::{Headline, NewsBackend, SessionEntry};
use crate::core::config::ResolvedConfig;

/// Session used when nothing is cached and nothing was selected.
pub const DEFAULT_SESSION_ID: &str = "demo-session";

/// Headline categories offered on the landing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    General,
    Technology,
    Sports,
    Business,
    Health,
    Entertainment,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::General,
        Category::Technology,
        Category::Sports,
        Category::Business,
        Category::Health,
        Category::Entertainment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Technology => "Technology",
            Category::Sports => "Sports",
            Category::Business => "Business",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
        }
    }

    /// Value sent in the `category` query parameter.
    pub fn query_value(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Technology => "technology",
            Category::Sports => "sports",
            Category::Business => "business",
            Category::Health => "health",
            Category::Entertainment => "entertainment",
        }
    }

    /// Cycles to the next category (wraps around).
    pub fn next(self) -> Category {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Cycles to the previous category (wraps around).
    pub fn prev(self) -> Category {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Parses a case-insensitive category name (config / CLI input).
    pub fn from_name(name: &str) -> Option<Category> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.query_value() == name.to_lowercase())
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// Emoji reactions a message can collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Reaction {
    ThumbsUp,
    Heart,
    Laugh,
}

impl Reaction {
    pub const ALL: [Reaction; 3] = [Reaction::ThumbsUp, Reaction::Heart, Reaction::Laugh];

    pub fn emoji(self) -> &'static str {
        match self {
            Reaction::ThumbsUp => "👍",
            Reaction::Heart => "❤",
            Reaction::Laugh => "😂",
        }
    }
}

/// A single chat message. Ids are allocated per session and unique within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub timestamp: i64,
    /// Read-receipt flag. A user message starts unread and flips when the
    /// bot's reply to it arrives; received messages are read by definition.
    pub read: bool,
    /// Reaction counts, keyed by emoji kind. BTreeMap keeps render order stable.
    pub reactions: BTreeMap<Reaction, u32>,
}

impl Message {
    pub fn reaction_count(&self, reaction: Reaction) -> u32 {
        self.reactions.get(&reaction).copied().unwrap_or(0)
    }
}

/// Which top-level view is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Chat,
}

pub struct App {
    pub backend: Arc<dyn NewsBackend>,
    pub view: View,

    // Landing view
    pub category: Category,
    pub headlines: Vec<Headline>,
    pub headlines_loading: bool,
    /// Replaces the ticker content when a headlines fetch fails.
    pub landing_error: Option<String>,

    // Chat view
    pub sessions: Vec<SessionEntry>,
    /// Invariant: refers to an entry in `sessions` or equals `DEFAULT_SESSION_ID`.
    pub active_session_id: String,
    pub messages: Vec<Message>,
    /// Next message id for the active session. Reset whenever the message
    /// list is replaced, so ids stay unique within a session.
    pub next_message_id: u64,
    /// Headline title carried over from the landing view; consumed by
    /// exactly one automatic send once history has loaded.
    pub pending_query: Option<String>,
    /// True while a `POST /chat` reply is outstanding.
    pub is_loading: bool,
    /// True while a `GET /history/{id}` fetch is outstanding.
    pub history_loading: bool,

    pub status_message: String,
}

impl App {
    pub fn new(backend: Arc<dyn NewsBackend>, active_session_id: String) -> Self {
        Self {
            backend,
            view: View::Landing,
            category: Category::default(),
            headlines: Vec::new(),
            headlines_loading: false,
            landing_error: None,
            sessions: Vec::new(),
            active_session_id,
            messages: Vec::new(),
            next_message_id: 0,
            pending_query: None,
            is_loading: false,
            history_loading: false,
            status_message: String::from("Welcome to Newsify!"),
        }
    }

    pub fn from_config(backend: Arc<dyn NewsBackend>, config: &ResolvedConfig) -> Self {
        let session_id = config
            .session_id
            .clone()
            .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());
        let mut app = Self::new(backend, session_id);
        app.category = config.default_category;
        app
    }

    /// Appends a message, allocating its id. Returns the new id.
    pub fn push_message(&mut self, role: Role, content: String, read: bool) -> u64 {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(Message {
            id,
            role,
            content,
            timestamp: Utc::now().timestamp(),
            read,
            reactions: BTreeMap::new(),
        });
        id
    }

    pub fn message_mut(&mut self, id: u64) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// Replaces the conversation wholesale (session switch, reset, history
    /// load). Resets the id counter so ids restart per session.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.next_message_id = 0;
    }

    /// True if the id is in the session list or is the default session.
    pub fn is_known_session(&self, id: &str) -> bool {
        id == DEFAULT_SESSION_ID || self.sessions.iter().any(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Welcome to Newsify!");
        assert_eq!(app.view, View::Landing);
        assert_eq!(app.active_session_id, DEFAULT_SESSION_ID);
        assert!(!app.is_loading);
        assert!(app.messages.is_empty());
    }

    #[test]
    fn test_category_cycle_wraps() {
        assert_eq!(Category::General.next(), Category::Technology);
        assert_eq!(Category::Entertainment.next(), Category::General);
        assert_eq!(Category::General.prev(), Category::Entertainment);
    }

    #[test]
    fn test_category_query_value_is_lowercase() {
        for category in Category::ALL {
            assert_eq!(category.query_value(), category.label().to_lowercase());
        }
    }

    #[test]
    fn test_category_from_name_case_insensitive() {
        assert_eq!(Category::from_name("Sports"), Some(Category::Sports));
        assert_eq!(Category::from_name("TECHNOLOGY"), Some(Category::Technology));
        assert_eq!(Category::from_name("weather"), None);
    }

    #[test]
    fn test_push_message_allocates_unique_ids() {
        let mut app = test_app();
        let a = app.push_message(Role::User, "one".into(), false);
        let b = app.push_message(Role::Bot, "two".into(), true);
        assert_ne!(a, b);
        assert_eq!(app.messages.len(), 2);
    }

    #[test]
    fn test_clear_messages_resets_id_counter() {
        let mut app = test_app();
        app.push_message(Role::User, "one".into(), false);
        app.clear_messages();
        let id = app.push_message(Role::User, "again".into(), false);
        assert_eq!(id, 0);
    }

    #[test]
    fn test_is_known_session() {
        let mut app = test_app();
        assert!(app.is_known_session(DEFAULT_SESSION_ID));
        assert!(!app.is_known_session("session-x"));
        app.sessions.push(crate::api::SessionEntry::local("session-x"));
        assert!(app.is_known_session("session-x"));
    }
}
