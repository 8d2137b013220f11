//! # Core Application Logic
//!
//! This module contains Newsify's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                   ┌────────────┼────────────┐
//!                   ▼            ▼            ▼
//!            ┌────────────┐ ┌─────────┐ ┌──────────┐
//!            │    TUI     │ │   API   │ │  config/ │
//!            │  Adapter   │ │ client  │ │  session │
//!            │ (ratatui)  │ │(reqwest)│ │  cache   │
//!            └────────────┘ └─────────┘ └──────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct — all application state in one place
//! - [`action`]: The `Action` enum and `update()` — everything that can happen
//! - [`config`]: Settings with the defaults → file → env → CLI hierarchy
//! - [`session`]: The locally cached session id and preview helpers

pub mod action;
pub mod config;
pub mod session;
pub mod state;
