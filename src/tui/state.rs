// ABOUTME: TUI state types — editable text buffers, focus, scroll, sidebar cursor, and notices.
// ABOUTME: Pure view state; sessions and messages live in the chat controller.

use std::time::{Duration, Instant};

use crate::controller::Notice;

/// How long a notice stays in the status bar.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Which part of the screen receives key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Sidebar,
    Settings,
}

/// A UTF-8 text buffer with a character-indexed cursor.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TextBuffer {
    pub text: String,
    pub cursor_pos: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text` with the cursor at the end.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor_pos: text.chars().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_pos = 0;
    }

    /// Take the trimmed text if non-empty, clearing the buffer.
    pub fn submit(&mut self) -> Option<String> {
        let trimmed = self.text.trim().to_string();
        if trimmed.is_empty() {
            return None;
        }
        self.clear();
        Some(trimmed)
    }

    /// Clamp the cursor position to the valid character range.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.char_len());
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.text, self.cursor_pos)
    }

    pub fn insert_char(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.text.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert_char(c);
        }
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }
        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.text, self.cursor_pos - 1);
        self.text.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.char_len() {
            return;
        }
        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.text, self.cursor_pos + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn move_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.char_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_pos = self.char_len();
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    pub fn line_count(&self) -> usize {
        self.lines().len()
    }

    /// Zero-based line index of the cursor.
    pub fn cursor_line(&self) -> usize {
        self.text
            .chars()
            .take(self.cursor_pos)
            .filter(|c| *c == '\n')
            .count()
    }

    /// Zero-based character column of the cursor within its line.
    pub fn cursor_column(&self) -> usize {
        self.text
            .chars()
            .take(self.cursor_pos)
            .collect::<Vec<_>>()
            .iter()
            .rev()
            .take_while(|c| **c != '\n')
            .count()
    }

    /// Move the cursor to the previous line. Returns false on the first line.
    pub fn move_up(&mut self) -> bool {
        self.clamp_cursor();
        let line = self.cursor_line();
        if line == 0 {
            return false;
        }
        let col = self.cursor_column();
        self.move_to(line - 1, col);
        true
    }

    /// Move the cursor to the next line. Returns false on the last line.
    pub fn move_down(&mut self) -> bool {
        self.clamp_cursor();
        let line = self.cursor_line();
        if line + 1 >= self.line_count() {
            return false;
        }
        let col = self.cursor_column();
        self.move_to(line + 1, col);
        true
    }

    fn move_to(&mut self, line: usize, col: usize) {
        let lines = self.lines();
        let before: usize = lines.iter().take(line).map(|l| l.chars().count() + 1).sum();
        let line_len = lines.get(line).map_or(0, |l| l.chars().count());
        self.cursor_pos = before + col.min(line_len);
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }

    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}

/// Full TUI view state.
pub struct TuiState {
    pub input: TextBuffer,
    pub settings_input: TextBuffer,
    pub focus: Focus,
    /// Lines scrolled up from the bottom of the chat (0 = pinned to bottom).
    pub scroll_offset: u16,
    /// Highlighted row in the sidebar.
    pub sidebar_index: usize,
    /// Whether the last render had room for the sidebar.
    pub sidebar_visible: bool,
    pub notice: Option<(Notice, Instant)>,
    pub session_start: Instant,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            input: TextBuffer::new(),
            settings_input: TextBuffer::new(),
            focus: Focus::Input,
            scroll_offset: 0,
            sidebar_index: 0,
            sidebar_visible: true,
            notice: None,
            session_start: Instant::now(),
        }
    }

    /// Show a notice, replacing any current one.
    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some((notice, Instant::now()));
    }

    /// Drop the notice once its time is up.
    pub fn expire_notice(&mut self, now: Instant) {
        if let Some((_, shown_at)) = &self.notice
            && now.duration_since(*shown_at) >= NOTICE_TTL
        {
            self.notice = None;
        }
    }

    /// Open the settings prompt pre-filled with the current URL.
    pub fn open_settings(&mut self, current_url: &str) {
        self.settings_input = TextBuffer::with_text(current_url);
        self.focus = Focus::Settings;
    }

    pub fn close_settings(&mut self) {
        self.settings_input.clear();
        self.focus = Focus::Input;
    }

    /// Keep the sidebar cursor within `len` rows.
    pub fn clamp_sidebar(&mut self, len: usize) {
        self.sidebar_index = self.sidebar_index.min(len.saturating_sub(1));
    }

    /// Record whether the sidebar is on screen. Hiding it takes focus away from it.
    pub fn set_sidebar_visible(&mut self, visible: bool) {
        self.sidebar_visible = visible;
        if !visible && self.focus == Focus::Sidebar {
            self.focus = Focus::Input;
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NoticeLevel;

    #[test]
    fn new_state_focuses_input() {
        let state = TuiState::new();
        assert_eq!(state.focus, Focus::Input);
        assert!(state.input.is_empty());
        assert_eq!(state.scroll_offset, 0);
        assert!(state.notice.is_none());
    }

    #[test]
    fn submit_trims_and_clears() {
        let mut buf = TextBuffer::with_text("  hello world  ");
        assert_eq!(buf.submit(), Some("hello world".to_string()));
        assert_eq!(buf.text, "");
        assert_eq!(buf.cursor_pos, 0);
    }

    #[test]
    fn submit_whitespace_keeps_buffer() {
        let mut buf = TextBuffer::with_text("   ");
        assert_eq!(buf.submit(), None);
        assert_eq!(buf.text, "   ");
    }

    #[test]
    fn utf8_editing_is_safe() {
        let mut buf = TextBuffer::new();
        buf.insert_char('a');
        buf.insert_char('🙂');
        buf.insert_char('é');
        assert_eq!(buf.text, "a🙂é");
        assert_eq!(buf.cursor_pos, 3);

        buf.move_left();
        buf.backspace();
        assert_eq!(buf.text, "aé");
        assert_eq!(buf.cursor_pos, 1);

        buf.delete();
        assert_eq!(buf.text, "a");
        assert_eq!(buf.cursor_pos, 1);
    }

    #[test]
    fn clamp_cursor_handles_out_of_range_positions() {
        let mut buf = TextBuffer::with_text("hi🙂");
        buf.cursor_pos = 999;
        buf.clamp_cursor();
        assert_eq!(buf.cursor_pos, 3);
        assert_eq!(buf.cursor_byte_index(), buf.text.len());
    }

    #[test]
    fn cursor_line_and_column() {
        let mut buf = TextBuffer::with_text("abc\nde");
        assert_eq!(buf.cursor_line(), 1);
        assert_eq!(buf.cursor_column(), 2);
        buf.cursor_pos = 2;
        assert_eq!(buf.cursor_line(), 0);
        assert_eq!(buf.cursor_column(), 2);
    }

    #[test]
    fn vertical_movement_clamps_column() {
        let mut buf = TextBuffer::with_text("abcdef\nxy");
        // End of "xy" is column 2; moving up keeps column 2.
        assert!(buf.move_up());
        assert_eq!(buf.cursor_pos, 2);
        buf.move_end();
        buf.cursor_pos = 6;
        assert!(buf.move_down());
        assert_eq!(buf.cursor_pos, 9);
        assert!(!buf.move_down());
    }

    #[test]
    fn settings_prefill_and_close() {
        let mut state = TuiState::new();
        state.open_settings("http://x/hook");
        assert_eq!(state.focus, Focus::Settings);
        assert_eq!(state.settings_input.text, "http://x/hook");
        assert_eq!(state.settings_input.cursor_pos, 13);
        state.close_settings();
        assert_eq!(state.focus, Focus::Input);
        assert!(state.settings_input.is_empty());
    }

    #[test]
    fn notice_expires_after_ttl() {
        let mut state = TuiState::new();
        state.show_notice(Notice {
            level: NoticeLevel::Info,
            title: "t".to_string(),
            description: "d".to_string(),
        });
        let shown_at = state.notice.as_ref().unwrap().1;
        state.expire_notice(shown_at + Duration::from_secs(1));
        assert!(state.notice.is_some());
        state.expire_notice(shown_at + NOTICE_TTL);
        assert!(state.notice.is_none());
    }

    #[test]
    fn hiding_sidebar_returns_focus_to_input() {
        let mut state = TuiState::new();
        state.focus = Focus::Sidebar;
        state.set_sidebar_visible(false);
        assert_eq!(state.focus, Focus::Input);
        assert!(!state.sidebar_visible);

        state.open_settings("");
        state.set_sidebar_visible(false);
        assert_eq!(state.focus, Focus::Settings);
    }

    #[test]
    fn clamp_sidebar_handles_shrinking_list() {
        let mut state = TuiState::new();
        state.sidebar_index = 5;
        state.clamp_sidebar(2);
        assert_eq!(state.sidebar_index, 1);
        state.clamp_sidebar(0);
        assert_eq!(state.sidebar_index, 0);
    }
}
