//! # MessageList Component
//!
//! Scrollable view of the active conversation.
//!
//! ## Responsibilities
//!
//! - Display the message bubbles
//! - Manage scrolling logic (stick-to-bottom, clamping)
//! - Hit testing support for mouse interactions
//! - Cache per-message heights so layout is O(new messages) per frame
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the message slice
//! (props). Since `Component::render` takes `&mut self`, the layout cache
//! and scroll state can be updated during the render pass, in line with
//! Ratatui's `StatefulWidget` pattern.
//!
//! Bubble heights are computed from the full message content, so the typing
//! reveal never invalidates the cache; a bubble claims its final size the
//! frame it appears.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Padding, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageBubble;
use crate::tui::event::TuiEvent;

/// Height of the transient "Typing..." indicator bubble.
const TYPING_INDICATOR_HEIGHT: u16 = 3;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Furthest scroll position reached (for "new content" indicator)
    pub max_scroll_reached: u16,
    /// Currently selected message index (hover or keyboard navigation)
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            max_scroll_reached: 0,
            selected_index: None,
            viewport_height: 0,
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    /// Prevents overscrolling past the last message.
    pub fn clamp_scroll(&mut self) {
        let total_content_height: u16 = self.layout.heights.iter().sum();
        let max_y = total_content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll the viewport so the selected message is fully visible.
    /// If the message is taller than the viewport, align its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected_index else {
            return;
        };
        if idx >= self.layout.prefix_heights.len() {
            return;
        }

        let item_top = if idx == 0 {
            0
        } else {
            self.layout.prefix_heights[idx - 1]
        };
        let item_bottom = self.layout.prefix_heights[idx];
        let offset_y = self.scroll_state.offset().y;

        if item_top < offset_y {
            // Selected message is above viewport — scroll up to show its top
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
            self.stick_to_bottom = false;
        } else if item_bottom > offset_y + self.viewport_height {
            // Selected message is below viewport — scroll down to show its bottom
            let new_y = item_bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            // Re-pin if we've landed at the absolute bottom
            let total: u16 = self.layout.heights.iter().sum();
            let max_y = total.saturating_sub(self.viewport_height);
            self.stick_to_bottom = new_y >= max_y;
        }
    }

    /// True when content extends below the current scroll position.
    /// Based on the previous frame's layout, which is fine for an indicator.
    pub fn has_unseen_content(&self) -> bool {
        let total: u16 = self.layout.heights.iter().sum();
        if total <= self.viewport_height {
            return false;
        }
        let max_scroll = total.saturating_sub(self.viewport_height);
        self.scroll_state.offset().y < max_scroll
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    /// Called on scroll-down events so that scrolling past the end re-pins to bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let total_content_height: u16 = self.layout.heights.iter().sum();
        let max_y = total_content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    /// True while a chat reply is outstanding (shows the typing indicator).
    pub is_loading: bool,
    /// Reveal progress of the animating bot message: (message id, chars shown).
    pub typing: Option<(u64, usize)>,
    pub pulse_value: f32,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [Message],
        is_loading: bool,
        typing: Option<(u64, usize)>,
        pulse_value: f32,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            is_loading,
            typing,
            pulse_value,
            spinner_frame,
        }
    }

    fn render_empty_placeholder(&self, frame: &mut Frame, area: Rect) {
        let placeholder = Paragraph::new("Dive into the latest news!")
            .style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
            .alignment(Alignment::Center)
            .block(Block::default().padding(Padding::top(area.height / 2)));
        frame.render_widget(placeholder, area);
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.messages.is_empty() && !self.is_loading {
            // Stale heights would confuse hit testing after a reset.
            self.state.layout = LayoutCache::new();
            self.render_empty_placeholder(frame, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let num_items = self.messages.len();

        // 1. Update the layout cache (internal mutation)
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(num_items, content_width);
        layout.heights.truncate(reusable.min(layout.heights.len()));

        for message in self.messages.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(MessageBubble::calculate_height(message, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(num_items, content_width);

        let total_height: u16 = self.state.layout.heights.iter().sum();

        // The typing indicator occupies canvas space below the last message
        // while a reply is outstanding.
        let indicator_height = if self.is_loading {
            TYPING_INDICATOR_HEIGHT
        } else {
            0
        };
        let canvas_height = total_height + indicator_height;

        // 2. Clamp scroll offset to prevent overscrolling past content.
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible bubbles into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range.clone() {
            let message = &self.messages[i];
            let height = self.state.layout.heights[i];
            let is_selected = self.state.selected_index == Some(i);

            let reveal = match self.typing {
                Some((id, shown)) if id == message.id => Some(shown),
                _ => None,
            };
            let pulse = if reveal.is_some() {
                self.pulse_value
            } else {
                0.0
            };

            let bubble = MessageBubble::new(message, is_selected, reveal, pulse);
            let bubble_rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(bubble, bubble_rect);

            y_offset += height;
        }

        // Transient typing indicator bubble (not a Message; never selectable)
        if self.is_loading {
            let dots = ".".repeat(1 + self.spinner_frame % 3);
            let indicator = Paragraph::new(format!("Typing{dots}"))
                .style(
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::ITALIC),
                )
                .block(
                    Block::bordered()
                        .title("newsify")
                        .border_type(ratatui::widgets::BorderType::Rounded)
                        .border_style(Style::default().fg(Color::Blue).add_modifier(Modifier::DIM))
                        .padding(Padding::horizontal(1)),
                );
            let indicator_rect = Rect::new(0, total_height, content_width, indicator_height);
            scroll_view.render_widget(indicator, indicator_rect);
        }

        // Auto-scroll logic (mutation)
        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        // Render the ScrollView into the full viewport area
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        // Update auxiliary state
        let current_offset = self.state.scroll_state.offset().y;
        self.state.max_scroll_reached = self.state.max_scroll_reached.max(current_offset);
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`:
/// event handling requires persistent state (scroll position, stick_to_bottom),
/// and `MessageList` is recreated each frame with fresh props.
impl EventHandler for MessageListState {
    type Event = (); // Scrolling is handled internally; no events emitted

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            _ => None,
        }
    }
}

/// Cached per-message heights. Heights depend only on message content and
/// width, so the cache survives until the width changes or the conversation
/// is replaced.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
        }
    }

    /// How many cached heights can be reused for the next frame.
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }

        // Fewer messages than cached → the conversation was replaced
        // (session switch or reset). Invalidate everything.
        if message_count < self.message_count {
            return 0;
        }

        self.message_count
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16) {
        self.message_count = message_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
    }

    /// Indices of messages overlapping the viewport, with a half-viewport
    /// buffer on each side.
    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
