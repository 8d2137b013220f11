//! # Landing Page Component
//!
//! Category tabs over a rotating headline ticker, shown until the user
//! enters the chat view.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `LandingState` lives in `TuiState`
//! - `Landing` is created each frame with borrowed state and props
//!
//! The ticker auto-rotates on a frame counter while nothing is selected;
//! Up/Down takes manual control, Enter asks the chatbot about the selected
//! headline.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Tabs, Wrap};

use crate::api::Headline;
use crate::core::state::Category;
use crate::tui::component::Component;
use crate::tui::event::TuiEvent;

/// Frames between automatic ticker advances (~3s at the animation cadence).
const ROTATE_EVERY_FRAMES: usize = 36;
/// Headlines shown at once in the ticker window.
const TICKER_WINDOW: usize = 5;

/// Persistent state for the landing view.
pub struct LandingState {
    /// Manually selected headline index; None = auto-rotate.
    pub selected: Option<usize>,
}

impl Default for LandingState {
    fn default() -> Self {
        Self::new()
    }
}

impl LandingState {
    pub fn new() -> Self {
        Self { selected: None }
    }

    /// Handle a key event against the current headline count, returning a
    /// LandingEvent when the view should act.
    pub fn handle_event(&mut self, event: &TuiEvent, headline_count: usize) -> Option<LandingEvent> {
        match event {
            TuiEvent::NextTab | TuiEvent::CursorRight => {
                self.selected = None;
                Some(LandingEvent::NextCategory)
            }
            TuiEvent::PrevTab | TuiEvent::CursorLeft => {
                self.selected = None;
                Some(LandingEvent::PrevCategory)
            }
            TuiEvent::CursorUp => {
                if headline_count > 0 {
                    self.selected = Some(match self.selected {
                        Some(i) => i.saturating_sub(1),
                        None => 0,
                    });
                }
                None
            }
            TuiEvent::CursorDown => {
                if headline_count > 0 {
                    self.selected = Some(match self.selected {
                        Some(i) => (i + 1).min(headline_count - 1),
                        None => 0,
                    });
                }
                None
            }
            TuiEvent::Escape => {
                if self.selected.is_some() {
                    self.selected = None;
                    None
                } else {
                    Some(LandingEvent::Quit)
                }
            }
            TuiEvent::InputChar('q') => Some(LandingEvent::Quit),
            TuiEvent::InputChar('c') => Some(LandingEvent::OpenChat),
            TuiEvent::Submit => match self.selected {
                Some(i) if i < headline_count => Some(LandingEvent::AskAbout(i)),
                _ => Some(LandingEvent::OpenChat),
            },
            _ => None,
        }
    }

    /// Clamp the selection after a new headline list arrives.
    pub fn clamp_selection(&mut self, headline_count: usize) {
        match self.selected {
            Some(_) if headline_count == 0 => self.selected = None,
            Some(i) if i >= headline_count => self.selected = Some(headline_count - 1),
            _ => {}
        }
    }
}

/// Events emitted by the landing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandingEvent {
    NextCategory,
    PrevCategory,
    /// Open the chat view with the selected headline as the first message.
    AskAbout(usize),
    /// Open the chat view without a query.
    OpenChat,
    Quit,
}

/// Transient render wrapper for the landing view.
pub struct Landing<'a> {
    pub state: &'a mut LandingState,
    pub category: Category,
    pub headlines: &'a [Headline],
    pub loading: bool,
    pub error: Option<&'a str>,
    /// Animation frame counter driving the auto-rotation.
    pub frame_index: usize,
}

impl<'a> Landing<'a> {
    /// First ticker row shown this frame. Rotation only runs while the user
    /// hasn't taken manual control.
    fn rotation_offset(&self) -> usize {
        if self.state.selected.is_some() || self.headlines.len() <= TICKER_WINDOW {
            return 0;
        }
        (self.frame_index / ROTATE_EVERY_FRAMES) % self.headlines.len()
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                "NEWSIFY",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Your AI-powered assistant to explore the latest news",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let header = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(header, area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Category::ALL
            .iter()
            .map(|c| Line::from(c.label()))
            .collect();
        let selected = Category::ALL
            .iter()
            .position(|c| *c == self.category)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(tabs, area);
    }

    fn render_ticker(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title(" Headlines ")
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::horizontal(1));

        if let Some(error) = self.error {
            let message = Paragraph::new(format!("Error: {error}"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        if self.headlines.is_empty() {
            let text = if self.loading {
                "Loading latest headlines..."
            } else {
                "No headlines right now."
            };
            let message = Paragraph::new(text)
                .style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let visible = area.height.saturating_sub(2) as usize;
        // Keep a manual selection in view; otherwise auto-rotate.
        let offset = match self.state.selected {
            Some(i) if visible > 0 && i >= visible => i + 1 - visible,
            Some(_) => 0,
            None => self.rotation_offset(),
        };
        let mut lines: Vec<Line> = Vec::new();
        for slot in 0..visible.min(self.headlines.len()) {
            let idx = (offset + slot) % self.headlines.len();
            let headline = &self.headlines[idx];
            let is_selected = self.state.selected == Some(idx);
            let style = if is_selected {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if is_selected { "▸ " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(headline.title.clone(), style),
                Span::styled(
                    if is_selected { "  [Ask Newsify]" } else { "" },
                    Style::default().fg(Color::Yellow),
                ),
            ]));
        }

        let ticker = Paragraph::new(lines).block(block);
        frame.render_widget(ticker, area);
    }

    /// Description panel for the selected headline (the web client's hover
    /// tooltip).
    fn render_description(&self, frame: &mut Frame, area: Rect) {
        let description = self
            .state
            .selected
            .and_then(|i| self.headlines.get(i))
            .map(|h| h.description.as_str())
            .filter(|d| !d.is_empty());

        let Some(description) = description else {
            return;
        };

        let panel = Paragraph::new(description)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .title(" About this story ")
                    .border_type(ratatui::widgets::BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .padding(Padding::horizontal(1)),
            );
        frame.render_widget(panel, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let footer = Paragraph::new(
            " Tab Category  ↑/↓ Select  Enter Ask Newsify  c Chatbot  q Quit ",
        )
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
        frame.render_widget(footer, area);
    }
}

impl<'a> Component for Landing<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.clamp_selection(self.headlines.len());

        let ticker_height = (TICKER_WINDOW as u16 + 2).min(area.height.saturating_sub(8));
        let [header_area, tabs_area, ticker_area, description_area, footer_area] =
            Layout::vertical([
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(ticker_height),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .flex(Flex::Start)
            .areas(area);

        self.render_header(frame, header_area);
        self.render_tabs(frame, tabs_area);
        self.render_ticker(frame, ticker_area);
        self.render_description(frame, description_area);
        self.render_footer(frame, footer_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn headlines(n: usize) -> Vec<Headline> {
        (0..n)
            .map(|i| Headline {
                title: format!("Headline {i}"),
                description: format!("Description {i}"),
            })
            .collect()
    }

    #[test]
    fn test_tab_changes_category() {
        let mut state = LandingState::new();
        let event = state.handle_event(&TuiEvent::NextTab, 3);
        assert_eq!(event, Some(LandingEvent::NextCategory));

        let event = state.handle_event(&TuiEvent::PrevTab, 3);
        assert_eq!(event, Some(LandingEvent::PrevCategory));
    }

    #[test]
    fn test_category_change_resets_selection() {
        let mut state = LandingState::new();
        state.handle_event(&TuiEvent::CursorDown, 3);
        assert_eq!(state.selected, Some(0));

        state.handle_event(&TuiEvent::NextTab, 3);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_selection_clamps_at_ends() {
        let mut state = LandingState::new();
        state.handle_event(&TuiEvent::CursorUp, 3);
        assert_eq!(state.selected, Some(0));
        state.handle_event(&TuiEvent::CursorUp, 3);
        assert_eq!(state.selected, Some(0));

        state.handle_event(&TuiEvent::CursorDown, 3);
        state.handle_event(&TuiEvent::CursorDown, 3);
        state.handle_event(&TuiEvent::CursorDown, 3);
        assert_eq!(state.selected, Some(2));
    }

    #[test]
    fn test_enter_on_selection_asks_about_it() {
        let mut state = LandingState::new();
        state.handle_event(&TuiEvent::CursorDown, 3);
        state.handle_event(&TuiEvent::CursorDown, 3);

        let event = state.handle_event(&TuiEvent::Submit, 3);
        assert_eq!(event, Some(LandingEvent::AskAbout(1)));
    }

    #[test]
    fn test_enter_without_selection_opens_plain_chat() {
        let mut state = LandingState::new();
        let event = state.handle_event(&TuiEvent::Submit, 3);
        assert_eq!(event, Some(LandingEvent::OpenChat));
    }

    #[test]
    fn test_escape_clears_selection_before_quitting() {
        let mut state = LandingState::new();
        state.handle_event(&TuiEvent::CursorDown, 3);

        assert_eq!(state.handle_event(&TuiEvent::Escape, 3), None);
        assert_eq!(state.selected, None);
        assert_eq!(
            state.handle_event(&TuiEvent::Escape, 3),
            Some(LandingEvent::Quit)
        );
    }

    #[test]
    fn test_clamp_selection_after_shorter_list() {
        let mut state = LandingState::new();
        state.selected = Some(5);
        state.clamp_selection(2);
        assert_eq!(state.selected, Some(1));

        state.clamp_selection(0);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_render_shows_headlines_and_brand() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = LandingState::new();
        let list = headlines(3);

        let mut landing = Landing {
            state: &mut state,
            category: Category::General,
            headlines: &list,
            loading: false,
            error: None,
            frame_index: 0,
        };

        terminal
            .draw(|f| {
                landing.render(f, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text = buffer.content().iter().map(|c| c.symbol()).collect::<String>();
        assert!(text.contains("NEWSIFY"));
        assert!(text.contains("Headline 0"));
        assert!(text.contains("General"));
    }

    #[test]
    fn test_render_error_replaces_ticker() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = LandingState::new();

        let mut landing = Landing {
            state: &mut state,
            category: Category::General,
            headlines: &[],
            loading: false,
            error: Some("HTTP 500"),
            frame_index: 0,
        };

        terminal
            .draw(|f| {
                landing.render(f, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text = buffer.content().iter().map(|c| c.symbol()).collect::<String>();
        assert!(text.contains("Error: HTTP 500"));
    }
}
