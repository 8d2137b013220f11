//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (landing ticker, pending reply, typing reveal): draws
//!   every ~80ms for smooth animation.
//! - **Idle** (conversation, no input): sleeps up to 500ms, only redraws on
//!   events or terminal resize.
//!
//! ## Network tasks
//!
//! Every `Effect` the reducer returns is executed here as a `tokio::spawn`
//! task that reports its outcome back over an `std::sync::mpsc` channel of
//! `Action`s. Each completed call carries the session id or category it was
//! issued for, and the reducer drops it if the user has moved on — the loop
//! itself never has to cancel anything.

mod component;
mod components;
mod event;
pub mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::api::{HttpBackend, NewsBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::session;
use crate::core::state::{App, Category, Reaction, View};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    InputBox, InputEvent, LandingEvent, LandingState, MessageListState, SidebarEvent, SidebarState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal input mode for the chat view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigate messages with arrow keys, react with 1/2/3.
    /// Typing auto-switches to Input.
    Cursor,
    /// Text editing in the input box. Esc switches to Cursor.
    Input,
}

/// Progress of the reply reveal animation.
pub struct TypingState {
    pub message_id: u64,
    pub shown: usize,
    started: Instant,
}

impl TypingState {
    fn new(message_id: u64) -> Self {
        Self {
            message_id,
            shown: 0,
            started: Instant::now(),
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub landing: LandingState,
    pub message_list: MessageListState,
    pub input_box: InputBox,
    // Modal input mode
    pub input_mode: InputMode,
    // Animation state
    pub pulse_value: f32,
    /// Reply reveal in progress (None = idle)
    pub typing: Option<TypingState>,
    // Sidebar overlay (None = hidden)
    pub sidebar: Option<SidebarState>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            landing: LandingState::new(),
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            input_mode: InputMode::Input, // User expects to type immediately
            pulse_value: 0.0,
            typing: None,
            sidebar: None,
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn NewsBackend> = Arc::new(HttpBackend::new(
        config.backend_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    ));
    let mut app = App::from_config(backend, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Kick off the initial headlines fetch through the reducer so loading
    // state stays consistent with every later fetch.
    let initial_category = app.category;
    let effect = update(&mut app, Action::SelectCategory(initial_category));
    apply_effect(effect, &app, &mut tui, &tx);

    // Animation timer
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame
    let mut last_sessions_poll: Option<Instant> = None;
    let mut persisted_session_id = app.active_session_id.clone();

    loop {
        // Sync InputBox props with TUI state
        tui.input_box.dimmed = matches!(tui.input_mode, InputMode::Cursor);

        // Advance the reply reveal; drop it if its message is gone
        advance_typing(&app, &mut tui, config.typing_chars_per_sec);

        // Periodic session poll while the chat view is active
        if app.view == View::Chat {
            let due = last_sessions_poll
                .is_none_or(|t| t.elapsed() >= Duration::from_secs(config.session_poll_secs));
            if due {
                last_sessions_poll = Some(Instant::now());
                spawn_sessions_fetch(app.backend.clone(), tx.clone());
            }
        }

        // Determine if animations are running
        let animating = app.view == View::Landing
            || app.is_loading
            || app.history_loading
            || tui.typing.is_some();

        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 5.0).sin() * 0.5 + 0.5;
            let spinner_frame = (elapsed * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for tui_event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Resize just needs a redraw (already flagged above)
            if matches!(tui_event, TuiEvent::Resize) {
                continue;
            }

            // Ctrl+C always quits regardless of mode
            if matches!(tui_event, TuiEvent::ForceQuit) {
                should_quit |= dispatch(&mut app, &mut tui, Action::Quit, &tx);
                continue;
            }

            // Ctrl+O opens the sidebar (chat view only)
            if matches!(tui_event, TuiEvent::OpenSidebar) {
                if app.view == View::Chat && tui.sidebar.is_none() {
                    tui.sidebar = Some(SidebarState::new(
                        app.sessions.clone(),
                        &app.active_session_id,
                    ));
                    // Refresh the list right away; the poll will keep it fresh
                    spawn_sessions_fetch(app.backend.clone(), tx.clone());
                }
                continue;
            }

            // When the sidebar is open, route all events to it
            if let Some(ref mut sidebar) = tui.sidebar {
                if let Some(sidebar_event) = sidebar.handle_event(&tui_event) {
                    match sidebar_event {
                        SidebarEvent::Open(id) => {
                            should_quit |=
                                dispatch(&mut app, &mut tui, Action::SwitchSession(id), &tx);
                            tui.sidebar = None;
                        }
                        SidebarEvent::CreateNew => {
                            should_quit |= dispatch(&mut app, &mut tui, Action::NewSession, &tx);
                            tui.sidebar = None;
                        }
                        SidebarEvent::ClearAll => {
                            should_quit |=
                                dispatch(&mut app, &mut tui, Action::ClearAllSessions, &tx);
                            tui.sidebar = None;
                        }
                        SidebarEvent::Dismiss => {
                            tui.sidebar = None;
                        }
                    }
                }
                continue;
            }

            match app.view {
                View::Landing => {
                    let headline_count = app.headlines.len();
                    if let Some(landing_event) =
                        tui.landing.handle_event(&tui_event, headline_count)
                    {
                        let action = match landing_event {
                            LandingEvent::NextCategory => {
                                Some(Action::SelectCategory(app.category.next()))
                            }
                            LandingEvent::PrevCategory => {
                                Some(Action::SelectCategory(app.category.prev()))
                            }
                            LandingEvent::AskAbout(idx) => {
                                let query = app.headlines.get(idx).map(|h| h.title.clone());
                                tui.input_mode = InputMode::Input;
                                Some(Action::OpenChat { query })
                            }
                            LandingEvent::OpenChat => {
                                tui.input_mode = InputMode::Input;
                                Some(Action::OpenChat { query: None })
                            }
                            LandingEvent::Quit => Some(Action::Quit),
                        };
                        if let Some(action) = action {
                            should_quit |= dispatch(&mut app, &mut tui, action, &tx);
                        }
                    }
                }

                View::Chat => {
                    // Chords available in both input modes
                    match tui_event {
                        TuiEvent::NewSession => {
                            should_quit |= dispatch(&mut app, &mut tui, Action::NewSession, &tx);
                            continue;
                        }
                        TuiEvent::ResetSession => {
                            should_quit |= dispatch(&mut app, &mut tui, Action::ResetSession, &tx);
                            continue;
                        }
                        TuiEvent::BackToLanding => {
                            should_quit |=
                                dispatch(&mut app, &mut tui, Action::BackToLanding, &tx);
                            continue;
                        }
                        _ => {}
                    }

                    // Mouse hover/click select messages regardless of mode
                    if let TuiEvent::MouseMove(_col, row) = tui_event {
                        let frame_area = terminal.get_frame().area();
                        let scroll_offset = tui.message_list.scroll_state.offset().y;
                        let input_height = tui.input_box.calculate_height(frame_area.width);
                        tui.message_list.selected_index = ui::hit_test_message(
                            row,
                            frame_area,
                            scroll_offset,
                            &tui.message_list.layout.prefix_heights,
                            input_height,
                        );
                        continue;
                    }
                    if let TuiEvent::MouseClick(_col, row) = tui_event {
                        let frame_area = terminal.get_frame().area();
                        let scroll_offset = tui.message_list.scroll_state.offset().y;
                        let input_height = tui.input_box.calculate_height(frame_area.width);
                        let hit = ui::hit_test_message(
                            row,
                            frame_area,
                            scroll_offset,
                            &tui.message_list.layout.prefix_heights,
                            input_height,
                        );
                        if hit.is_some() {
                            tui.message_list.selected_index = hit;
                            tui.input_mode = InputMode::Cursor;
                        }
                        continue;
                    }

                    // Scroll events always go to the message list
                    if matches!(
                        tui_event,
                        TuiEvent::ScrollUp
                            | TuiEvent::ScrollDown
                            | TuiEvent::ScrollPageUp
                            | TuiEvent::ScrollPageDown
                    ) {
                        tui.message_list.handle_event(&tui_event);
                        continue;
                    }

                    // Modal event dispatch
                    match tui.input_mode {
                        InputMode::Input => {
                            // Esc → switch to Cursor mode on the last message
                            if matches!(tui_event, TuiEvent::Escape) {
                                tui.input_mode = InputMode::Cursor;
                                tui.message_list.selected_index = if app.messages.is_empty() {
                                    None
                                } else {
                                    Some(app.messages.len() - 1)
                                };
                                continue;
                            }

                            // InputBox handles everything else
                            if let Some(input_event) = tui.input_box.handle_event(&tui_event)
                                && let InputEvent::Submit(text) = input_event
                            {
                                should_quit |=
                                    dispatch(&mut app, &mut tui, Action::Submit(text), &tx);
                            }
                        }
                        InputMode::Cursor => match tui_event {
                            // Esc returns to the input box
                            TuiEvent::Escape => {
                                tui.input_mode = InputMode::Input;
                                tui.message_list.selected_index = None;
                            }
                            // Up/Down navigate messages
                            TuiEvent::CursorUp => {
                                if !app.messages.is_empty() {
                                    let idx = tui
                                        .message_list
                                        .selected_index
                                        .map(|i| i.saturating_sub(1))
                                        .unwrap_or(app.messages.len() - 1);
                                    tui.message_list.selected_index = Some(idx);
                                    tui.message_list.scroll_to_selected();
                                }
                            }
                            TuiEvent::CursorDown => {
                                if let Some(idx) = tui.message_list.selected_index
                                    && idx + 1 < app.messages.len()
                                {
                                    tui.message_list.selected_index = Some(idx + 1);
                                    tui.message_list.scroll_to_selected();
                                }
                            }
                            // 1/2/3 react to the selected message
                            TuiEvent::InputChar(c @ ('1' | '2' | '3')) => {
                                let reaction = match c {
                                    '1' => Reaction::ThumbsUp,
                                    '2' => Reaction::Heart,
                                    _ => Reaction::Laugh,
                                };
                                if let Some(idx) = tui.message_list.selected_index
                                    && let Some(message) = app.messages.get(idx)
                                {
                                    let action = Action::React {
                                        message_id: message.id,
                                        reaction,
                                    };
                                    should_quit |= dispatch(&mut app, &mut tui, action, &tx);
                                }
                            }
                            // Typing auto-switches to Input mode and forwards the event
                            TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                                tui.input_mode = InputMode::Input;
                                tui.message_list.selected_index = None;
                                tui.input_box.handle_event(&tui_event);
                            }
                            // Enter switches to Input mode
                            TuiEvent::Submit => {
                                tui.input_mode = InputMode::Input;
                                tui.message_list.selected_index = None;
                            }
                            _ => {}
                        },
                    }
                }
            }
        }

        if should_quit {
            break;
        }

        // Handle completed background calls
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, &mut tui, action, &tx) {
                should_quit = true;
                break;
            }
            // Keep an open sidebar in step with the session list
            if let Some(ref mut sidebar) = tui.sidebar {
                sidebar.sync(app.sessions.clone(), &app.active_session_id);
            }
        }

        if should_quit {
            break;
        }

        // Cache the active session id whenever it changes, so the next run
        // reopens the same conversation.
        if app.active_session_id != persisted_session_id {
            persisted_session_id = app.active_session_id.clone();
            session::remember_session(&persisted_session_id);
        }
    }

    ratatui::restore();
    Ok(())
}

/// Run an action through the reducer and execute the resulting effect.
/// Returns true when the app should quit.
fn dispatch(app: &mut App, tui: &mut TuiState, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    // Actions that replace the conversation also reset list presentation
    // state (scroll position, selection, reveal animation).
    let replaces_conversation = matches!(
        action,
        Action::OpenChat { .. }
            | Action::SwitchSession(_)
            | Action::NewSession
            | Action::ClearAllDone { ok: true }
    );

    let effect = update(app, action);

    if replaces_conversation {
        tui.message_list = MessageListState::new();
        tui.typing = None;
    }

    if effect == Effect::Quit {
        return true;
    }
    apply_effect(effect, app, tui, tx);
    false
}

/// Execute a non-quit effect: spawn the network task or start an animation.
fn apply_effect(effect: Effect, app: &App, tui: &mut TuiState, tx: &mpsc::Sender<Action>) {
    let backend = app.backend.clone();
    match effect {
        Effect::None | Effect::Quit => {}
        Effect::FetchHeadlines(category) => spawn_headlines_fetch(backend, category, tx.clone()),
        Effect::FetchHistory { session_id } => {
            spawn_history_fetch(backend, session_id, tx.clone())
        }
        Effect::SendChat {
            session_id,
            message,
        } => spawn_chat_send(backend, session_id, message, tx.clone()),
        Effect::ResetHistory { session_id } => spawn_reset(backend, session_id, tx.clone()),
        Effect::DeleteAllSessions => spawn_delete_all(backend, tx.clone()),
        Effect::RevealReply { message_id } => {
            tui.typing = Some(TypingState::new(message_id));
        }
    }
}

/// Advance the reveal by elapsed time; finish when the end of the message is
/// reached, cancel when the message list was replaced underneath it.
fn advance_typing(app: &App, tui: &mut TuiState, chars_per_sec: u32) {
    let mut finished = false;
    if let Some(typing) = &mut tui.typing {
        match app.messages.iter().find(|m| m.id == typing.message_id) {
            Some(message) => {
                let total = message.content.trim().chars().count();
                let shown =
                    (typing.started.elapsed().as_secs_f32() * chars_per_sec as f32) as usize;
                if shown >= total {
                    finished = true;
                } else {
                    typing.shown = shown;
                }
            }
            None => finished = true,
        }
    }
    if finished {
        tui.typing = None;
    }
}

// ============================================================================
// Background tasks (one per Effect; results come back as Actions)
// ============================================================================

fn spawn_headlines_fetch(
    backend: Arc<dyn NewsBackend>,
    category: Category,
    tx: mpsc::Sender<Action>,
) {
    info!("Fetching headlines for {:?}", category);
    tokio::spawn(async move {
        let result = backend
            .headlines(category.query_value())
            .await
            .map_err(|e| e.to_string());
        if tx
            .send(Action::HeadlinesLoaded { category, result })
            .is_err()
        {
            warn!("Failed to send headlines result: receiver dropped");
        }
    });
}

fn spawn_history_fetch(backend: Arc<dyn NewsBackend>, session_id: String, tx: mpsc::Sender<Action>) {
    info!("Fetching history for session {session_id}");
    tokio::spawn(async move {
        let result = backend
            .history(&session_id)
            .await
            .map_err(|e| e.to_string());
        if tx
            .send(Action::HistoryLoaded { session_id, result })
            .is_err()
        {
            warn!("Failed to send history result: receiver dropped");
        }
    });
}

fn spawn_chat_send(
    backend: Arc<dyn NewsBackend>,
    session_id: String,
    message: String,
    tx: mpsc::Sender<Action>,
) {
    info!("Sending chat message ({} bytes)", message.len());
    tokio::spawn(async move {
        let result = backend
            .send_message(&session_id, &message)
            .await
            .map_err(|e| e.to_string());
        if tx
            .send(Action::ReplyReceived { session_id, result })
            .is_err()
        {
            warn!("Failed to send chat reply: receiver dropped");
        }
    });
}

fn spawn_sessions_fetch(backend: Arc<dyn NewsBackend>, tx: mpsc::Sender<Action>) {
    debug!("Fetching session list");
    tokio::spawn(async move {
        let result = backend.sessions().await.map_err(|e| e.to_string());
        if tx.send(Action::SessionsLoaded { result }).is_err() {
            warn!("Failed to send session list: receiver dropped");
        }
    });
}

fn spawn_reset(backend: Arc<dyn NewsBackend>, session_id: String, tx: mpsc::Sender<Action>) {
    info!("Resetting history for session {session_id}");
    tokio::spawn(async move {
        let ok = match backend.reset_history(&session_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Reset failed for {session_id}: {e}");
                false
            }
        };
        if tx.send(Action::ResetDone { session_id, ok }).is_err() {
            warn!("Failed to send reset result: receiver dropped");
        }
    });
}

fn spawn_delete_all(backend: Arc<dyn NewsBackend>, tx: mpsc::Sender<Action>) {
    info!("Deleting all sessions");
    tokio::spawn(async move {
        let ok = match backend.delete_sessions().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Delete-all failed: {e}");
                false
            }
        };
        if tx.send(Action::ClearAllDone { ok }).is_err() {
            warn!("Failed to send delete-all result: receiver dropped");
        }
    });
}
