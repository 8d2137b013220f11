//! # Actions
//!
//! Everything that can happen in Newsify becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The backend answers? That's `Action::ReplyReceived { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns the `Effect` the caller must execute. No I/O here; the
//! TUI adapter spawns the network tasks an `Effect` asks for and feeds their
//! results back in as new actions.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Completed network calls carry the session id (or category) they were
//! issued for. `update()` compares that against the current one and drops
//! stale responses, which is the whole race-condition story: a slow history
//! fetch finishing after a session switch must not clobber the new session.

use log::{debug, warn};

use crate::api::{Headline, HistoryEntry, SessionEntry};
use crate::core::session;
use crate::core::state::{App, Category, Reaction, Role, View, DEFAULT_SESSION_ID};

/// Fallback bubble text when a chat error carries no message of its own.
pub const GENERIC_SEND_ERROR: &str = "Error fetching response";

#[derive(Debug, Clone)]
pub enum Action {
    Quit,

    // Landing view
    SelectCategory(Category),
    HeadlinesLoaded {
        category: Category,
        result: Result<Vec<Headline>, String>,
    },
    /// Enter the chat view, optionally carrying a clicked headline to
    /// auto-send once history has loaded.
    OpenChat { query: Option<String> },
    BackToLanding,

    // Chat view
    Submit(String),
    ReplyReceived {
        session_id: String,
        result: Result<String, String>,
    },
    HistoryLoaded {
        session_id: String,
        result: Result<Vec<HistoryEntry>, String>,
    },
    SessionsLoaded {
        result: Result<Vec<SessionEntry>, String>,
    },
    SwitchSession(String),
    NewSession,
    ResetSession,
    ResetDone { session_id: String, ok: bool },
    ClearAllSessions,
    ClearAllDone { ok: bool },
    React { message_id: u64, reaction: Reaction },
}

/// Side effects `update()` asks the caller to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    FetchHeadlines(Category),
    FetchHistory { session_id: String },
    SendChat { session_id: String, message: String },
    ResetHistory { session_id: String },
    DeleteAllSessions,
    /// Start the typing-reveal animation on a freshly appended bot message.
    RevealReply { message_id: u64 },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Quit => Effect::Quit,

        Action::SelectCategory(category) => {
            app.category = category;
            app.headlines_loading = true;
            app.landing_error = None;
            Effect::FetchHeadlines(category)
        }

        Action::HeadlinesLoaded { category, result } => {
            if category != app.category {
                debug!(
                    "Dropping stale headlines for {:?} (current: {:?})",
                    category, app.category
                );
                return Effect::None;
            }
            app.headlines_loading = false;
            match result {
                Ok(headlines) => {
                    app.headlines = headlines;
                    app.landing_error = None;
                }
                Err(e) => {
                    warn!("Headlines fetch failed: {e}");
                    app.headlines.clear();
                    app.landing_error = Some(e);
                }
            }
            Effect::None
        }

        Action::OpenChat { query } => {
            app.view = View::Chat;
            app.pending_query = query;
            app.clear_messages();
            app.is_loading = false;
            app.history_loading = true;
            app.status_message.clear();
            Effect::FetchHistory {
                session_id: app.active_session_id.clone(),
            }
        }

        Action::BackToLanding => {
            app.view = View::Landing;
            app.pending_query = None;
            app.headlines_loading = true;
            Effect::FetchHeadlines(app.category)
        }

        Action::Submit(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Effect::None;
            }
            if app.is_loading {
                app.status_message = String::from("Still waiting on the last reply");
                return Effect::None;
            }
            send_user_message(app, trimmed.to_string())
        }

        Action::ReplyReceived { session_id, result } => {
            if session_id != app.active_session_id {
                debug!(
                    "Dropping stale reply for session {session_id} (active: {})",
                    app.active_session_id
                );
                return Effect::None;
            }
            app.is_loading = false;
            let content = match result {
                Ok(reply) => {
                    // Read receipt: the reply acknowledges the user message
                    // it answers.
                    if let Some(msg) = app
                        .messages
                        .iter_mut()
                        .rev()
                        .find(|m| m.role == Role::User && !m.read)
                    {
                        msg.read = true;
                    }
                    app.status_message.clear();
                    reply
                }
                Err(e) => {
                    warn!("Chat send failed: {e}");
                    if e.is_empty() {
                        GENERIC_SEND_ERROR.to_string()
                    } else {
                        e
                    }
                }
            };
            let message_id = app.push_message(Role::Bot, content, true);
            Effect::RevealReply { message_id }
        }

        Action::HistoryLoaded { session_id, result } => {
            if session_id != app.active_session_id {
                debug!(
                    "Dropping stale history for session {session_id} (active: {})",
                    app.active_session_id
                );
                return Effect::None;
            }
            app.history_loading = false;
            match result {
                Ok(entries) => {
                    app.clear_messages();
                    for entry in entries {
                        app.push_message(Role::User, entry.user, true);
                        app.push_message(Role::Bot, entry.bot, true);
                    }
                }
                Err(e) => {
                    // A failed history fetch leaves the list empty.
                    warn!("History fetch failed for {session_id}: {e}");
                    app.status_message = format!("History unavailable: {e}");
                }
            }

            // The headline carried from the landing view is sent exactly
            // once, after history has settled (take() guarantees once).
            match app.pending_query.take() {
                Some(query) => send_user_message(app, query),
                None => Effect::None,
            }
        }

        Action::SessionsLoaded { result } => {
            match result {
                Ok(sessions) => {
                    app.sessions = sessions;
                    // The poll may not know about a locally created session
                    // yet; re-insert it so the active id stays listed.
                    if !app.is_known_session(&app.active_session_id) {
                        let mut entry = SessionEntry::local(app.active_session_id.clone());
                        let preview = session::derive_preview(&app.messages);
                        if !preview.is_empty() {
                            entry.preview = preview;
                        }
                        app.sessions.push(entry);
                    }
                }
                Err(e) => {
                    // Polling noise; log and keep the last known list.
                    debug!("Sessions fetch failed: {e}");
                }
            }
            Effect::None
        }

        Action::SwitchSession(id) => {
            if id == app.active_session_id {
                return Effect::None;
            }
            app.active_session_id = id.clone();
            app.clear_messages();
            app.pending_query = None;
            app.is_loading = false;
            app.history_loading = true;
            app.status_message.clear();
            Effect::FetchHistory { session_id: id }
        }

        Action::NewSession => {
            let id = session::new_session_id();
            app.sessions.push(SessionEntry::local(id.clone()));
            app.active_session_id = id;
            app.clear_messages();
            app.pending_query = None;
            app.is_loading = false;
            app.history_loading = false;
            app.status_message = String::from("New chat started");
            Effect::None
        }

        Action::ResetSession => {
            app.status_message = String::from("Clearing session...");
            Effect::ResetHistory {
                session_id: app.active_session_id.clone(),
            }
        }

        Action::ResetDone { session_id, ok } => {
            if session_id != app.active_session_id {
                debug!(
                    "Dropping stale reset for session {session_id} (active: {})",
                    app.active_session_id
                );
                return Effect::None;
            }
            if ok {
                app.clear_messages();
                app.status_message = String::from("Session cleared");
            } else {
                app.push_message(Role::Bot, String::from("Error clearing session"), true);
                app.status_message.clear();
            }
            Effect::None
        }

        Action::ClearAllSessions => Effect::DeleteAllSessions,

        Action::ClearAllDone { ok } => {
            if !ok {
                app.status_message = String::from("Error clearing history. Try again.");
                return Effect::None;
            }
            app.sessions.clear();
            app.active_session_id = DEFAULT_SESSION_ID.to_string();
            app.clear_messages();
            app.pending_query = None;
            app.is_loading = false;
            app.history_loading = true;
            app.status_message = String::from("History deleted");
            Effect::FetchHistory {
                session_id: DEFAULT_SESSION_ID.to_string(),
            }
        }

        Action::React {
            message_id,
            reaction,
        } => {
            if let Some(msg) = app.message_mut(message_id) {
                *msg.reactions.entry(reaction).or_insert(0) += 1;
            }
            Effect::None
        }
    }
}

/// Optimistically appends a user message and requests the send.
/// Also promotes the message text to the session preview if the active
/// session still carries the "New Chat" placeholder.
fn send_user_message(app: &mut App, text: String) -> Effect {
    app.push_message(Role::User, text.clone(), false);

    let active = app.active_session_id.clone();
    if let Some(entry) = app.sessions.iter_mut().find(|s| s.id == active)
        && (entry.preview.is_empty() || entry.preview == "New Chat")
    {
        entry.preview = session::preview_of(&text);
    }

    app.is_loading = true;
    Effect::SendChat {
        session_id: active,
        message: text,
    }
}
