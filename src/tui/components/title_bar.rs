//! # TitleBar Component
//!
//! Top status bar showing the active session, transient status messages,
//! and the "↓ New" indicator when content sits below the scroll position.
//!
//! TitleBar is purely presentational — all three fields are props, copied
//! from core and TUI state each frame. The priority order keeps the most
//! important information visible on narrow terminals:
//!
//! 1. `"Newsify (session: demo-session) | Clearing session... | ↓ New"`
//! 2. `"Newsify (session: demo-session) | Clearing session..."`
//! 3. `"Newsify (session: demo-session)"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

/// Top status bar component.
pub struct TitleBar {
    /// Active session id
    pub session_id: String,
    /// Transient status (e.g. "Clearing session...")
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(session_id: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            session_id,
            status_message,
            has_unseen_content,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title_text = if self.has_unseen_content {
            format!(
                "Newsify (session: {}) | {} | ↓ New",
                self.session_id, self.status_message
            )
        } else if self.status_message.is_empty() {
            format!("Newsify (session: {})", self.session_id)
        } else {
            format!(
                "Newsify (session: {}) | {}",
                self.session_id, self.status_message
            )
        };

        frame.render_widget(Span::raw(title_text), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered_text(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_with_unseen_content() {
        let mut title_bar =
            TitleBar::new("demo-session".to_string(), "Clearing...".to_string(), true);
        let text = rendered_text(&mut title_bar);
        assert!(text.contains("Newsify"));
        assert!(text.contains("demo-session"));
        assert!(text.contains("Clearing..."));
        assert!(text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let mut title_bar = TitleBar::new(
            "session-abc".to_string(),
            "Session cleared".to_string(),
            false,
        );
        let text = rendered_text(&mut title_bar);
        assert!(text.contains("session-abc"));
        assert!(text.contains("Session cleared"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new("demo-session".to_string(), String::new(), false);
        let text = rendered_text(&mut title_bar);
        assert!(text.contains("Newsify"));
        assert!(!text.contains('|'));
    }
}
