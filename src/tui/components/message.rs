use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::core::state::{Message, Reaction, Role};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Pulse intensity threshold above which the border transitions from normal to BOLD.
const PULSE_BOLD_THRESHOLD: f32 = 0.6;
/// Pulse intensity threshold above which the border transitions from DIM to normal.
const PULSE_NORMAL_THRESHOLD: f32 = 0.2;

/// A stateless component that renders a single chat message bubble.
///
/// `MessageBubble` is a **transient component**: created fresh each frame
/// with the data it needs. Selection state is passed in from the parent
/// `MessageList`, which tracks it persistently.
///
/// # Styling
///
/// - **User** (green): messages from the human, with a ✓/✓✓ read receipt
/// - **Bot** (blue): replies from the assistant
///
/// Reaction counts and the send time render in the bottom border line, so
/// they never change the bubble height.
///
/// # Typing reveal
///
/// While a reply animates in, `reveal` limits how many characters of the
/// content are shown. Height is always computed from the full content, so
/// the bubble claims its final size up front and the text grows into it.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
    /// Whether this message is selected in cursor mode (or hovered).
    pub is_selected: bool,
    /// Number of characters to display, `None` for all of them.
    pub reveal: Option<usize>,
    /// Current pulse intensity (0.0 to 1.0) while the reveal is running.
    pub pulse_intensity: f32,
}

impl<'a> MessageBubble<'a> {
    pub fn new(
        message: &'a Message,
        is_selected: bool,
        reveal: Option<usize>,
        pulse_intensity: f32,
    ) -> Self {
        Self {
            message,
            is_selected,
            reveal,
            pulse_intensity,
        }
    }

    /// Calculate the height required for this message given a width.
    ///
    /// Uses `textwrap` with options matching Ratatui's `Paragraph` wrapping,
    /// so the parent can lay out the scroll view without rendering. Always
    /// measured against the full content; the typing reveal doesn't shrink
    /// the bubble.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return 1;
        }

        let content = message.content.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    /// Content truncated to the reveal length, on a char boundary.
    fn visible_content(&self) -> &str {
        let content = self.message.content.trim();
        match self.reveal {
            None => content,
            Some(n) => match content.char_indices().nth(n) {
                Some((byte_idx, _)) => &content[..byte_idx],
                None => content,
            },
        }
    }

    /// Bottom border line: read receipt, reactions, send time.
    fn meta_line(&self) -> Line<'static> {
        let mut spans: Vec<Span> = Vec::new();

        if self.message.role == Role::User {
            let receipt = if self.message.read { "✓✓" } else { "✓" };
            let receipt_style = if self.message.read {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {receipt} "), receipt_style));
        }

        for reaction in Reaction::ALL {
            let count = self.message.reaction_count(reaction);
            if count > 0 {
                spans.push(Span::styled(
                    format!(" {} {} ", reaction.emoji(), count),
                    Style::default().fg(Color::Yellow),
                ));
            }
        }

        spans.push(Span::styled(
            format!(" {} ", format_timestamp(self.message.timestamp)),
            Style::default().fg(Color::DarkGray),
        ));

        Line::from(spans)
    }
}

// Widget impl so the bubble can render inside a ScrollView.
impl<'a> Widget for MessageBubble<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let role = match self.message.role {
            Role::User => "you",
            Role::Bot => "newsify",
        };

        let style = match self.message.role {
            Role::User => Style::default().fg(Color::Green),
            Role::Bot => Style::default().fg(Color::Blue),
        };

        // Selection gets a cyan border; everything else is dimmed.
        let mut border_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        // Three-phase breathing while the reply reveals: DIM → normal → BOLD
        if self.pulse_intensity > PULSE_BOLD_THRESHOLD {
            border_style = border_style
                .remove_modifier(Modifier::DIM)
                .add_modifier(Modifier::BOLD);
        } else if self.pulse_intensity > PULSE_NORMAL_THRESHOLD {
            border_style = border_style.remove_modifier(Modifier::DIM);
        }

        let block = Block::bordered()
            .title(role)
            .title_bottom(self.meta_line().right_aligned())
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let paragraph = Paragraph::new(self.visible_content())
            .style(style)
            .wrap(Wrap { trim: true });

        paragraph.render(inner_area, buf);
    }
}

/// Format a Unix timestamp as a local "14:05" style time.
fn format_timestamp(ts: i64) -> String {
    let dt: DateTime<Local> = DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_default()
        .with_timezone(&Local);
    dt.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn make_message(role: Role, content: &str) -> Message {
        Message {
            id: 0,
            role,
            content: content.to_string(),
            timestamp: 0,
            read: false,
            reactions: BTreeMap::new(),
        }
    }

    // ==========================================================================
    // calculate_height tests
    // ==========================================================================

    #[test]
    fn calculate_height_empty_content_returns_border_height() {
        let message = make_message(Role::User, "");
        assert_eq!(
            MessageBubble::calculate_height(&message, 80),
            VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_whitespace_only_treated_as_empty() {
        let message = make_message(Role::User, "   \n\t  ");
        assert_eq!(
            MessageBubble::calculate_height(&message, 80),
            VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let message = make_message(Role::User, "Hello world");
        assert_eq!(MessageBubble::calculate_height(&message, 0), 1);
    }

    #[test]
    fn calculate_height_single_line_fits() {
        let message = make_message(Role::User, "Hello");
        assert_eq!(
            MessageBubble::calculate_height(&message, 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        let message = make_message(Role::User, "Hello world");
        // width 9 → content_width = 5 → "Hello" | "world" = 2 lines
        assert_eq!(
            MessageBubble::calculate_height(&message, 9),
            2 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_breaks_long_words() {
        let message = make_message(Role::User, "abcdefghij");
        // width 8 → content_width = 4 → "abcd" | "efgh" | "ij" = 3 lines
        assert_eq!(
            MessageBubble::calculate_height(&message, 8),
            3 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_ignores_reveal() {
        let message = make_message(Role::Bot, "a somewhat longer reply that wraps");
        let full = MessageBubble::calculate_height(&message, 20);
        // Height never depends on how much of the text is revealed yet.
        assert!(full > VERTICAL_OVERHEAD + 1);
    }

    // ==========================================================================
    // Reveal slicing
    // ==========================================================================

    #[test]
    fn visible_content_respects_reveal_count() {
        let message = make_message(Role::Bot, "Hello world");
        let bubble = MessageBubble::new(&message, false, Some(5), 0.0);
        assert_eq!(bubble.visible_content(), "Hello");
    }

    #[test]
    fn visible_content_reveal_past_end_shows_all() {
        let message = make_message(Role::Bot, "Hi");
        let bubble = MessageBubble::new(&message, false, Some(100), 0.0);
        assert_eq!(bubble.visible_content(), "Hi");
    }

    #[test]
    fn visible_content_reveal_is_char_safe() {
        let message = make_message(Role::Bot, "héllo wörld");
        let bubble = MessageBubble::new(&message, false, Some(3), 0.0);
        assert_eq!(bubble.visible_content(), "hél");
    }

    #[test]
    fn visible_content_none_shows_all() {
        let message = make_message(Role::Bot, "full text");
        let bubble = MessageBubble::new(&message, false, None, 0.0);
        assert_eq!(bubble.visible_content(), "full text");
    }

    // ==========================================================================
    // Meta line
    // ==========================================================================

    #[test]
    fn meta_line_shows_single_check_for_unread_user_message() {
        let message = make_message(Role::User, "hi");
        let bubble = MessageBubble::new(&message, false, None, 0.0);
        let text: String = bubble
            .meta_line()
            .spans
            .iter()
            .map(|s| s.content.clone().into_owned())
            .collect();
        assert!(text.contains('✓'));
        assert!(!text.contains("✓✓"));
    }

    #[test]
    fn meta_line_shows_double_check_once_read() {
        let mut message = make_message(Role::User, "hi");
        message.read = true;
        let bubble = MessageBubble::new(&message, false, None, 0.0);
        let text: String = bubble
            .meta_line()
            .spans
            .iter()
            .map(|s| s.content.clone().into_owned())
            .collect();
        assert!(text.contains("✓✓"));
    }

    #[test]
    fn meta_line_omits_receipt_for_bot_messages() {
        let message = make_message(Role::Bot, "hi");
        let bubble = MessageBubble::new(&message, false, None, 0.0);
        let text: String = bubble
            .meta_line()
            .spans
            .iter()
            .map(|s| s.content.clone().into_owned())
            .collect();
        assert!(!text.contains('✓'));
    }

    #[test]
    fn meta_line_includes_nonzero_reactions() {
        let mut message = make_message(Role::Bot, "hi");
        message.reactions.insert(Reaction::Heart, 2);
        let bubble = MessageBubble::new(&message, false, None, 0.0);
        let text: String = bubble
            .meta_line()
            .spans
            .iter()
            .map(|s| s.content.clone().into_owned())
            .collect();
        assert!(text.contains("❤ 2"));
        assert!(!text.contains("👍"));
    }
}
