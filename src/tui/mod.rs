// ABOUTME: TUI module — ratatui full-screen interface for hookchat.
// ABOUTME: Session sidebar, chat display, input handling, settings prompt, and status bar.

pub mod input;
pub mod state;
pub mod ui;
pub mod widgets;

pub use state::*;
