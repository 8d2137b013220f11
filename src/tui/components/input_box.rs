//! # InputBox Component
//!
//! Captures the message being typed and submits it on Enter.
//!
//! ## Responsibilities
//!
//! - Capture text input (chars, bracketed paste)
//! - Handle editing (backspace, delete, cursor movement)
//! - Handle submission (Enter); whitespace-only buffers don't submit
//! - Display a placeholder when empty and dim itself in cursor mode
//!
//! The buffer and cursor are internal state; `dimmed` is a prop synced from
//! the parent each frame. When the wrapped content exceeds the visible
//! lines, the view pins to the bottom (where the cursor almost always is).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Borders (1 left + 1 right).
const HORIZONTAL_OVERHEAD: u16 = 2;
/// Cap on visible content lines before the view pins to the bottom.
const MAX_VISIBLE_LINES: u16 = 5;

const PLACEHOLDER: &str = "Ask about the latest news...";

/// High-level events emitted by the InputBox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// User submitted the text (Enter with a non-blank buffer)
    Submit(String),
    /// Text content or cursor changed
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (internal state)
    pub buffer: String,
    /// Rendered dim when the chat view is in cursor mode (prop)
    pub dimmed: bool,
    /// Cursor position as a byte offset into `buffer`
    cursor_pos: usize,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            dimmed: false,
            cursor_pos: 0,
        }
    }

    /// Required height for the current buffer, clamped to the visible cap.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let width = inner_width(area_width);
        let lines = wrap_line_count(&self.buffer, width);
        lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor_pos, text);
        self.cursor_pos += text.len();
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);

        let border_style = if self.dimmed {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::Green)
        };
        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title("Input");

        if self.buffer.is_empty() {
            let placeholder = Paragraph::new(PLACEHOLDER)
                .style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )
                .block(block);
            frame.render_widget(placeholder, area);
            if !self.dimmed {
                frame.set_cursor_position((area.x + 1, area.y + 1));
            }
            return;
        }

        let lines = wrapped_lines(&self.buffer, width);
        let total_lines = lines.len() as u16;
        let skip = total_lines.saturating_sub(MAX_VISIBLE_LINES) as usize;
        let visible = lines[skip..].join("\n");

        let input = Paragraph::new(visible)
            .style(Style::default().fg(Color::Green))
            .block(block);
        frame.render_widget(input, area);

        if !self.dimmed {
            let (col, row) = cursor_position(&self.buffer, self.cursor_pos, width);
            let row = row.saturating_sub(skip as u16);
            frame.set_cursor_position((
                area.x + 1 + col.min(width.saturating_sub(1)),
                area.y + 1 + row.min(MAX_VISIBLE_LINES - 1),
            ));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor_pos, *c);
                self.cursor_pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert(text);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor_pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor_pos);
                    self.buffer.drain(prev..self.cursor_pos);
                    self.cursor_pos = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor_pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor_pos);
                    self.buffer.drain(self.cursor_pos..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor_pos > 0 {
                    self.cursor_pos = prev_char_boundary(&self.buffer, self.cursor_pos);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if self.cursor_pos < self.buffer.len() {
                    self.cursor_pos = next_char_boundary(&self.buffer, self.cursor_pos);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorHome => {
                (self.cursor_pos != 0).then(|| {
                    self.cursor_pos = 0;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                (self.cursor_pos != self.buffer.len()).then(|| {
                    self.cursor_pos = self.buffer.len();
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                if !self.buffer.trim().is_empty() {
                    let text = std::mem::take(&mut self.buffer);
                    self.cursor_pos = 0;
                    Some(InputEvent::Submit(text))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

fn wrap_options<'a>(width: u16) -> textwrap::Options<'a> {
    textwrap::Options::new(width.max(1) as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

fn wrapped_lines(buffer: &str, width: u16) -> Vec<String> {
    textwrap::wrap(buffer, wrap_options(width))
        .into_iter()
        .map(|l| l.into_owned())
        .collect()
}

fn wrap_line_count(buffer: &str, width: u16) -> u16 {
    if buffer.is_empty() {
        return 1;
    }
    wrapped_lines(buffer, width).len().max(1) as u16
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    let mut p = pos - 1;
    while p > 0 && !s.is_char_boundary(p) {
        p -= 1;
    }
    p
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    let mut p = pos + 1;
    while p < s.len() && !s.is_char_boundary(p) {
        p += 1;
    }
    p
}

/// Map a byte offset in the buffer to a (column, row) in the wrapped view.
///
/// Wrapped lines are substrings of the buffer (whitespace at break points is
/// dropped), so each line's byte range can be recovered by searching forward
/// from the previous line's end.
fn cursor_position(buffer: &str, pos: usize, width: u16) -> (u16, u16) {
    if buffer.is_empty() || width == 0 {
        return (0, 0);
    }

    let lines = wrapped_lines(buffer, width);
    let mut search = 0usize;
    let mut last_row = 0u16;
    for (row, line) in lines.iter().enumerate() {
        let start = buffer[search..]
            .find(line.as_str())
            .map(|i| search + i)
            .unwrap_or(search);
        let end = start + line.len();
        search = end;
        last_row = row as u16;

        if pos < start {
            // Cursor sits in whitespace dropped at the wrap point.
            return (0, row as u16);
        }
        if pos <= end {
            let col = UnicodeWidthStr::width(&buffer[start..pos]) as u16;
            return (col, row as u16);
        }
    }

    // Past the last line's end (trailing whitespace).
    let last_width = lines
        .last()
        .map(|l| UnicodeWidthStr::width(l.as_str()) as u16)
        .unwrap_or(0);
    (last_width, last_row)
}
