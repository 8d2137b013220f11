//! # Session Sidebar Component
//!
//! Overlay for browsing sessions fetched from the backend.
//! Opened with Ctrl+O, dismissed with Esc.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SidebarState` lives in `TuiState` while the overlay is open
//! - `Sidebar` is created each frame with borrowed state
//!
//! Delete-all is destructive, so `D` must be pressed twice; any other key
//! cancels the pending confirmation.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};

use crate::api::SessionEntry;
use crate::tui::event::TuiEvent;

/// Persistent state for the sidebar overlay.
pub struct SidebarState {
    pub sessions: Vec<SessionEntry>,
    pub active_id: String,
    pub selected: usize,
    pub confirm_clear: bool,
    pub list_state: ListState,
}

impl SidebarState {
    pub fn new(sessions: Vec<SessionEntry>, active_id: &str) -> Self {
        let selected = sessions
            .iter()
            .position(|s| s.id == active_id)
            .unwrap_or(0);
        let mut list_state = ListState::default();
        if !sessions.is_empty() {
            list_state.select(Some(selected));
        }
        Self {
            sessions,
            active_id: active_id.to_string(),
            selected,
            confirm_clear: false,
            list_state,
        }
    }

    /// Refresh the listed sessions after a poll without losing the cursor.
    pub fn sync(&mut self, sessions: Vec<SessionEntry>, active_id: &str) {
        let selected_id = self.sessions.get(self.selected).map(|s| s.id.clone());
        self.sessions = sessions;
        self.active_id = active_id.to_string();

        self.selected = selected_id
            .and_then(|id| self.sessions.iter().position(|s| s.id == id))
            .unwrap_or(0)
            .min(self.sessions.len().saturating_sub(1));

        if self.sessions.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(self.selected));
        }
    }

    /// Handle a key event, returning a SidebarEvent if the overlay should act.
    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<SidebarEvent> {
        // Reset the delete-all confirmation on any non-delete key
        let is_clear_key = matches!(event, TuiEvent::InputChar('D'));
        if !is_clear_key {
            self.confirm_clear = false;
        }

        match event {
            TuiEvent::Escape => Some(SidebarEvent::Dismiss),
            TuiEvent::CursorUp => {
                if !self.sessions.is_empty() {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown => {
                if !self.sessions.is_empty() {
                    self.selected = (self.selected + 1).min(self.sessions.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => self
                .sessions
                .get(self.selected)
                .map(|session| SidebarEvent::Open(session.id.clone())),
            TuiEvent::InputChar('n') => Some(SidebarEvent::CreateNew),
            TuiEvent::InputChar('D') => {
                if self.sessions.is_empty() {
                    return None;
                }
                if self.confirm_clear {
                    self.confirm_clear = false;
                    Some(SidebarEvent::ClearAll)
                } else {
                    self.confirm_clear = true;
                    None
                }
            }
            _ => None,
        }
    }
}

/// Events emitted by the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEvent {
    Open(String),
    CreateNew,
    /// Delete all chat history on the backend (confirmed).
    ClearAll,
    Dismiss,
}

/// Transient render wrapper for the sidebar overlay.
pub struct Sidebar<'a> {
    state: &'a mut SidebarState,
}

impl<'a> Sidebar<'a> {
    pub fn new(state: &'a mut SidebarState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        // Center the overlay (70% width, 70% height)
        let overlay = centered_rect(70, 70, area);

        // Clear underlying content
        frame.render_widget(Clear, overlay);

        let help_text = if self.state.confirm_clear {
            " Press D again to delete ALL history | Esc Cancel "
        } else {
            " n New  D Delete History  Enter Open  Esc Back "
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Chats ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        if self.state.sessions.is_empty() {
            let empty = Paragraph::new("No sessions yet.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, overlay);
            return;
        }

        let items: Vec<ListItem> = self
            .state
            .sessions
            .iter()
            .enumerate()
            .map(|(i, session)| {
                let is_active = session.id == self.state.active_id;
                let preview = if session.preview.is_empty() {
                    session.id.as_str()
                } else {
                    session.preview.as_str()
                };

                // Layout: "● <preview>                <id-suffix>"
                let inner_width = overlay.width.saturating_sub(4) as usize;
                let suffix = short_id(&session.id);
                let marker = if is_active { "● " } else { "  " };
                let preview_width =
                    inner_width.saturating_sub(marker.len() + suffix.len() + 2);
                let preview = truncate_str(preview, preview_width);
                let padded_preview = format!("{:<width$}", preview, width = preview_width);

                let style = if i == self.state.selected {
                    if self.state.confirm_clear {
                        Style::default()
                            .fg(Color::Red)
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    } else {
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    }
                } else if is_active {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Gray)
                };

                let line = Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(padded_preview, style),
                    Span::styled("  ", style),
                    Span::styled(suffix, style.add_modifier(Modifier::DIM)),
                ]);

                ListItem::new(line)
            })
            .collect();

        let list = List::new(items).block(block);

        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

/// Last path-ish segment of a session id, for compact display.
fn short_id(id: &str) -> String {
    if id.len() <= 12 {
        id.to_string()
    } else {
        format!("…{}", &id[id.len().saturating_sub(8)..])
    }
}

/// Truncate a string to fit within `max_width` chars, adding "..." if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        ".".repeat(max_width)
    } else {
        let cut: String = s.chars().take(max_width - 3).collect();
        format!("{}...", cut)
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<SessionEntry> {
        (0..n)
            .map(|i| SessionEntry {
                id: format!("session-{i}"),
                preview: format!("Chat {i}"),
            })
            .collect()
    }

    #[test]
    fn test_opens_on_active_session() {
        let state = SidebarState::new(entries(3), "session-2");
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn test_enter_opens_selected() {
        let mut state = SidebarState::new(entries(3), "session-0");
        state.handle_event(&TuiEvent::CursorDown);

        let event = state.handle_event(&TuiEvent::Submit);
        assert_eq!(event, Some(SidebarEvent::Open("session-1".to_string())));
    }

    #[test]
    fn test_clear_all_requires_confirmation() {
        let mut state = SidebarState::new(entries(2), "session-0");

        assert_eq!(state.handle_event(&TuiEvent::InputChar('D')), None);
        assert!(state.confirm_clear);

        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('D')),
            Some(SidebarEvent::ClearAll)
        );
        assert!(!state.confirm_clear);
    }

    #[test]
    fn test_any_other_key_cancels_confirmation() {
        let mut state = SidebarState::new(entries(2), "session-0");
        state.handle_event(&TuiEvent::InputChar('D'));
        assert!(state.confirm_clear);

        state.handle_event(&TuiEvent::CursorDown);
        assert!(!state.confirm_clear);
        assert_eq!(state.handle_event(&TuiEvent::InputChar('D')), None);
    }

    #[test]
    fn test_clear_all_on_empty_list_is_noop() {
        let mut state = SidebarState::new(Vec::new(), "demo-session");
        assert_eq!(state.handle_event(&TuiEvent::InputChar('D')), None);
        assert!(!state.confirm_clear);
    }

    #[test]
    fn test_new_session_event() {
        let mut state = SidebarState::new(Vec::new(), "demo-session");
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('n')),
            Some(SidebarEvent::CreateNew)
        );
    }

    #[test]
    fn test_sync_keeps_cursor_on_same_session() {
        let mut state = SidebarState::new(entries(3), "session-0");
        state.handle_event(&TuiEvent::CursorDown); // on session-1

        // Poll result: session-0 disappeared
        let refreshed = vec![
            SessionEntry {
                id: "session-1".to_string(),
                preview: "Chat 1".to_string(),
            },
            SessionEntry {
                id: "session-2".to_string(),
                preview: "Chat 2".to_string(),
            },
        ];
        state.sync(refreshed, "session-1");
        assert_eq!(state.selected, 0);
        assert_eq!(state.sessions[state.selected].id, "session-1");
    }

    #[test]
    fn test_sync_to_empty_list_clears_cursor() {
        let mut state = SidebarState::new(entries(2), "session-0");
        state.sync(Vec::new(), "demo-session");
        assert_eq!(state.list_state.selected(), None);
    }
}
