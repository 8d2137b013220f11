//! Top-level frame composition: picks the view, stacks the chrome, and
//! overlays the sidebar. Hit testing lives here because it must mirror the
//! chat layout exactly.

use crate::core::state::{App, View};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{Landing, MessageList, Sidebar, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    match app.view {
        View::Landing => draw_landing(frame, app, tui, spinner_frame),
        View::Chat => draw_chat(frame, app, tui, spinner_frame),
    }

    // Sidebar overlay sits on top of whatever view is active
    if let Some(sidebar_state) = &mut tui.sidebar {
        Sidebar::new(sidebar_state).render(frame, frame.area());
    }
}

fn draw_landing(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let mut landing = Landing {
        state: &mut tui.landing,
        category: app.category,
        headlines: &app.headlines,
        loading: app.headlines_loading,
        error: app.landing_error.as_deref(),
        frame_index: spinner_frame,
    };
    landing.render(frame, frame.area());
}

fn draw_chat(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let input_height = tui.input_box.calculate_height(frame.area().width);
    let [title_area, main_area, input_area] = chat_layout(frame.area(), input_height);

    // Title bar reads the scroll state from the previous frame; one frame of
    // lag is invisible at the redraw cadence.
    let mut title_bar = TitleBar::new(
        app.active_session_id.clone(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content(),
    );
    title_bar.render(frame, title_area);

    let typing = tui.typing.as_ref().map(|t| (t.message_id, t.shown));
    let mut message_list = MessageList::new(
        &mut tui.message_list,
        &app.messages,
        app.is_loading,
        typing,
        tui.pulse_value,
        spinner_frame,
    );
    message_list.render(frame, main_area);

    tui.input_box.render(frame, input_area);
}

/// The chat view's vertical layout: title bar, messages, input box.
fn chat_layout(area: Rect, input_height: u16) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(area)
}

/// Hit test: given a screen row, find which message index (if any) is there.
///
/// Mirrors `chat_layout` so screen coordinates translate into scroll-view
/// content coordinates.
pub fn hit_test_message(
    screen_y: u16,
    frame_area: Rect,
    scroll_offset_y: u16,
    prefix_heights: &[u16],
    input_height: u16,
) -> Option<usize> {
    let [_title_area, main_area, _input_area] = chat_layout(frame_area, input_height);

    if screen_y < main_area.y || screen_y >= main_area.y + main_area.height {
        return None;
    }

    let content_y = (screen_y - main_area.y) + scroll_offset_y;
    let idx = prefix_heights.partition_point(|&end| end <= content_y);
    (idx < prefix_heights.len()).then_some(idx)
}
