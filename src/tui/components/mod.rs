//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Two patterns, mirroring the rest of the TUI:
//!
//! - **Stateless (props-based)**: created fresh each frame with the data
//!   they render — `TitleBar`, `MessageBubble`.
//! - **Stateful (event-driven)**: persistent state in `TuiState`, wrapped by
//!   a transient render struct each frame, emitting high-level events —
//!   `InputBox`, `MessageList`, `Landing`, `Sidebar`.
//!
//! Each component file is self-contained: state types, event types,
//! rendering, event handling, and tests live together.

pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
pub mod sidebar;
pub mod title_bar;

pub use input_box::{InputBox, InputEvent};
pub use landing::{Landing, LandingEvent, LandingState};
pub use message_list::{MessageList, MessageListState};
pub use sidebar::{Sidebar, SidebarEvent, SidebarState};
pub use title_bar::TitleBar;
