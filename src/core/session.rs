//! # Session Cache
//!
//! Sessions live on the backend; the only thing persisted locally is the id
//! of the last active session, in `~/.newsify/session`, so a restart reopens
//! the same conversation.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::core::state::{Message, Role};

/// Maximum preview length before truncation.
const PREVIEW_MAX_LEN: usize = 60;

/// Returns `~/.newsify/`, creating it if needed.
pub fn data_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".newsify");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Generate a new locally unique session id.
pub fn new_session_id() -> String {
    format!("session-{}", uuid::Uuid::new_v4())
}

/// Sidebar preview text for a message: first line, truncated.
pub fn preview_of(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    if first_line.len() > PREVIEW_MAX_LEN {
        let cut = first_line
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|&i| i <= PREVIEW_MAX_LEN - 3)
            .last()
            .unwrap_or(0);
        format!("{}...", &first_line[..cut])
    } else {
        first_line.to_string()
    }
}

/// Derive a preview from the first user message in a conversation.
/// Returns an empty string when there is none.
pub fn derive_preview(messages: &[Message]) -> String {
    messages
        .iter()
        .find(|m| m.role == Role::User)
        .map(|m| preview_of(&m.content))
        .unwrap_or_default()
}

fn session_cache_path() -> io::Result<PathBuf> {
    Ok(data_dir()?.join("session"))
}

/// Atomically write `contents` to `path` (via `.tmp` + rename).
fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Persist the active session id for the next run. Failures are logged, not
/// surfaced; losing the cache only costs reopening the default session.
pub fn remember_session(id: &str) {
    let path = match session_cache_path() {
        Ok(p) => p,
        Err(e) => {
            warn!("Cannot cache session id: {e}");
            return;
        }
    };
    if let Err(e) = atomic_write(&path, id) {
        warn!("Failed to cache session id: {e}");
    } else {
        debug!("Cached session id: {id}");
    }
}

/// The session id cached by the previous run, if any.
pub fn last_session_id() -> Option<String> {
    let path = session_cache_path().ok()?;
    let contents = fs::read_to_string(path).ok()?;
    let id = contents.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn user_msg(text: &str) -> Message {
        Message {
            id: 0,
            role: Role::User,
            content: text.to_string(),
            timestamp: 0,
            read: false,
            reactions: BTreeMap::new(),
        }
    }

    fn bot_msg(text: &str) -> Message {
        Message {
            id: 1,
            role: Role::Bot,
            content: text.to_string(),
            timestamp: 0,
            read: true,
            reactions: BTreeMap::new(),
        }
    }

    #[test]
    fn test_new_session_ids_are_unique() {
        let a = new_session_id();
        let b = new_session_id();
        assert_ne!(a, b);
        assert!(a.starts_with("session-"));
    }

    #[test]
    fn test_preview_uses_first_line() {
        assert_eq!(preview_of("First line\nSecond line"), "First line");
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let long = "a".repeat(80);
        let preview = preview_of(&long);
        assert!(preview.len() <= PREVIEW_MAX_LEN + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_preview_trims_whitespace() {
        assert_eq!(preview_of("   hello   "), "hello");
    }

    #[test]
    fn test_derive_preview_from_first_user_message() {
        let messages = vec![bot_msg("welcome"), user_msg("What is new?"), bot_msg("...")];
        assert_eq!(derive_preview(&messages), "What is new?");
    }

    #[test]
    fn test_derive_preview_empty_without_user_messages() {
        let messages = vec![bot_msg("welcome")];
        assert_eq!(derive_preview(&messages), "");
    }
}
