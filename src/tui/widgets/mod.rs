// ABOUTME: TUI widget modules — chat lines, session sidebar, status bar, and settings prompt.
// ABOUTME: Each widget turns controller state into styled ratatui Lines.

pub mod chat;
pub mod settings;
pub mod sidebar;
pub mod status;
