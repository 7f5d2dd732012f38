// ABOUTME: Keyboard input handling for the TUI — translates key events into actions.
// ABOUTME: Routes keys by focus: message input, sidebar navigation, or the settings prompt.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::controller::ChatController;
use crate::tui::state::{Focus, TextBuffer, TuiState};

const PAGE_SCROLL: u16 = 10;

/// The result of processing a key event.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// No action needed.
    None,
    /// User submitted a message.
    Send(String),
    /// User asked for a fresh conversation.
    NewSession,
    /// User picked a session in the sidebar.
    SelectSession(String),
    /// User deleted a session from the sidebar.
    DeleteSession(String),
    /// User saved a new webhook URL in settings.
    SaveWebhookUrl(String),
    /// User wants to quit.
    Quit,
}

/// Process a key event against the current TUI state and return the resulting action.
pub fn handle_key(state: &mut TuiState, controller: &ChatController, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+C and Ctrl+Q always quit.
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        return InputResult::Quit;
    }

    if state.focus == Focus::Settings {
        return handle_settings_key(state, key);
    }

    if handle_scroll_key(state, key.code) {
        return InputResult::None;
    }

    if ctrl {
        match key.code {
            KeyCode::Char('n') => {
                state.focus = Focus::Input;
                state.scroll_to_bottom();
                return InputResult::NewSession;
            }
            KeyCode::Char('s') => {
                state.open_settings(controller.webhook_url());
                return InputResult::None;
            }
            _ => {}
        }
    }

    if state.focus == Focus::Sidebar && !state.sidebar_visible {
        state.focus = Focus::Input;
    }

    if key.code == KeyCode::Tab {
        if !state.sidebar_visible {
            return InputResult::None;
        }
        state.focus = match state.focus {
            Focus::Sidebar => Focus::Input,
            _ => {
                state.sidebar_index = controller
                    .current_session_id()
                    .and_then(|id| controller.sessions().iter().position(|s| s.id == id))
                    .unwrap_or(0);
                Focus::Sidebar
            }
        };
        return InputResult::None;
    }

    match state.focus {
        Focus::Sidebar => handle_sidebar_key(state, controller, key),
        _ => handle_input_key(state, controller, key),
    }
}

/// Insert pasted text into whichever buffer has focus.
pub fn handle_paste(state: &mut TuiState, text: &str) {
    match state.focus {
        Focus::Settings => state.settings_input.insert_str(&text.replace('\n', "")),
        Focus::Input => state.input.insert_str(text),
        Focus::Sidebar => {}
    }
}

fn handle_scroll_key(state: &mut TuiState, key: KeyCode) -> bool {
    match key {
        KeyCode::PageUp => {
            state.scroll_offset = state.scroll_offset.saturating_add(PAGE_SCROLL);
            true
        }
        KeyCode::PageDown => {
            state.scroll_offset = state.scroll_offset.saturating_sub(PAGE_SCROLL);
            true
        }
        _ => false,
    }
}

fn handle_input_key(state: &mut TuiState, controller: &ChatController, key: KeyEvent) -> InputResult {
    match key.code {
        // Up/Down move within multiline input first, then scroll the chat.
        KeyCode::Up => {
            if !state.input.move_up() {
                state.scroll_offset = state.scroll_offset.saturating_add(1);
            }
            InputResult::None
        }
        KeyCode::Down => {
            if !state.input.move_down() {
                state.scroll_offset = state.scroll_offset.saturating_sub(1);
            }
            InputResult::None
        }
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
            state.input.insert_char('\n');
            InputResult::None
        }
        KeyCode::Enter => {
            if controller.is_loading() {
                return InputResult::None;
            }
            match state.input.submit() {
                Some(text) => {
                    state.scroll_to_bottom();
                    InputResult::Send(text)
                }
                None => InputResult::None,
            }
        }
        KeyCode::Esc => {
            if controller.is_loading() {
                InputResult::None
            } else {
                InputResult::Quit
            }
        }
        _ => {
            edit_buffer(&mut state.input, key.code);
            InputResult::None
        }
    }
}

fn handle_sidebar_key(state: &mut TuiState, controller: &ChatController, key: KeyEvent) -> InputResult {
    let sessions = controller.sessions();
    state.clamp_sidebar(sessions.len());

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.sidebar_index = state.sidebar_index.saturating_sub(1);
            InputResult::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.sidebar_index + 1 < sessions.len() {
                state.sidebar_index += 1;
            }
            InputResult::None
        }
        KeyCode::Enter => match sessions.get(state.sidebar_index) {
            Some(session) => {
                state.focus = Focus::Input;
                state.scroll_to_bottom();
                InputResult::SelectSession(session.id.clone())
            }
            None => InputResult::None,
        },
        KeyCode::Delete | KeyCode::Char('d') => match sessions.get(state.sidebar_index) {
            Some(session) => InputResult::DeleteSession(session.id.clone()),
            None => InputResult::None,
        },
        KeyCode::Esc => {
            state.focus = Focus::Input;
            InputResult::None
        }
        _ => InputResult::None,
    }
}

fn handle_settings_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Enter => {
            let url = state.settings_input.text.trim().to_string();
            state.close_settings();
            InputResult::SaveWebhookUrl(url)
        }
        KeyCode::Esc => {
            state.close_settings();
            InputResult::None
        }
        _ => {
            edit_buffer(&mut state.settings_input, key.code);
            InputResult::None
        }
    }
}

/// Apply a plain editing key to a text buffer.
fn edit_buffer(buffer: &mut TextBuffer, code: KeyCode) {
    match code {
        KeyCode::Char(c) => buffer.insert_char(c),
        KeyCode::Backspace => buffer.backspace(),
        KeyCode::Delete => buffer.delete(),
        KeyCode::Left => buffer.move_left(),
        KeyCode::Right => buffer.move_right(),
        KeyCode::Home => buffer.move_home(),
        KeyCode::End => buffer.move_end(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerSettings;
    use crate::session::SessionStore;
    use crate::webhook::HttpMethod;

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn make_ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn controller() -> ChatController {
        ChatController::new(
            SessionStore::new(),
            "http://localhost/hook".to_string(),
            ControllerSettings {
                method: HttpMethod::Post,
                user_id: "u".to_string(),
                greeting: "hi".to_string(),
            },
            None,
        )
    }

    #[test]
    fn typing_appends_to_input() {
        let mut state = TuiState::new();
        let c = controller();
        let result = handle_key(&mut state, &c, make_key(KeyCode::Char('h')));
        assert_eq!(result, InputResult::None);
        handle_key(&mut state, &c, make_key(KeyCode::Char('i')));
        assert_eq!(state.input.text, "hi");
        assert_eq!(state.input.cursor_pos, 2);
    }

    #[test]
    fn enter_submits_input() {
        let mut state = TuiState::new();
        let c = controller();
        state.input = TextBuffer::with_text("hello");
        state.scroll_offset = 4;
        let result = handle_key(&mut state, &c, make_key(KeyCode::Enter));
        assert_eq!(result, InputResult::Send("hello".to_string()));
        assert!(state.input.is_empty());
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn enter_on_empty_does_nothing() {
        let mut state = TuiState::new();
        let c = controller();
        assert_eq!(
            handle_key(&mut state, &c, make_key(KeyCode::Enter)),
            InputResult::None
        );
    }

    #[test]
    fn enter_while_loading_keeps_text() {
        let mut state = TuiState::new();
        let mut c = controller();
        c.begin_send("in flight").unwrap();
        state.input = TextBuffer::with_text("next");
        let result = handle_key(&mut state, &c, make_key(KeyCode::Enter));
        assert_eq!(result, InputResult::None);
        assert_eq!(state.input.text, "next");
    }

    #[test]
    fn shift_enter_inserts_newline() {
        let mut state = TuiState::new();
        let c = controller();
        state.input = TextBuffer::with_text("hello");
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT);
        assert_eq!(handle_key(&mut state, &c, key), InputResult::None);
        assert_eq!(state.input.text, "hello\n");
        assert_eq!(state.input.cursor_pos, 6);
    }

    #[test]
    fn ctrl_c_and_ctrl_q_quit() {
        let mut state = TuiState::new();
        let c = controller();
        assert_eq!(handle_key(&mut state, &c, make_ctrl('c')), InputResult::Quit);
        assert_eq!(handle_key(&mut state, &c, make_ctrl('q')), InputResult::Quit);
    }

    #[test]
    fn esc_quits_only_when_idle() {
        let mut state = TuiState::new();
        let mut c = controller();
        assert_eq!(handle_key(&mut state, &c, make_key(KeyCode::Esc)), InputResult::Quit);
        c.begin_send("wait").unwrap();
        assert_eq!(handle_key(&mut state, &c, make_key(KeyCode::Esc)), InputResult::None);
    }

    #[test]
    fn ctrl_n_requests_new_session() {
        let mut state = TuiState::new();
        let c = controller();
        assert_eq!(handle_key(&mut state, &c, make_ctrl('n')), InputResult::NewSession);
    }

    #[test]
    fn page_keys_scroll() {
        let mut state = TuiState::new();
        let c = controller();
        handle_key(&mut state, &c, make_key(KeyCode::PageUp));
        assert_eq!(state.scroll_offset, 10);
        handle_key(&mut state, &c, make_key(KeyCode::PageDown));
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn up_at_first_line_scrolls_chat() {
        let mut state = TuiState::new();
        let c = controller();
        state.input = TextBuffer::with_text("hello");
        handle_key(&mut state, &c, make_key(KeyCode::Up));
        assert_eq!(state.scroll_offset, 1);
    }

    #[test]
    fn up_on_second_line_moves_cursor() {
        let mut state = TuiState::new();
        let c = controller();
        state.input = TextBuffer::with_text("abc\ndef");
        state.input.cursor_pos = 5;
        handle_key(&mut state, &c, make_key(KeyCode::Up));
        assert_eq!(state.input.cursor_pos, 1);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn tab_focuses_sidebar_on_current_session() {
        let mut state = TuiState::new();
        let mut c = controller();
        let first = c.current_session_id().unwrap().to_string();
        c.new_session();
        c.select_session(&first).unwrap();

        handle_key(&mut state, &c, make_key(KeyCode::Tab));
        assert_eq!(state.focus, Focus::Sidebar);
        assert_eq!(state.sidebar_index, 1);

        handle_key(&mut state, &c, make_key(KeyCode::Tab));
        assert_eq!(state.focus, Focus::Input);
    }

    #[test]
    fn sidebar_navigation_selects_and_deletes() {
        let mut state = TuiState::new();
        let mut c = controller();
        c.new_session();
        let ids: Vec<String> = c.sessions().iter().map(|s| s.id.clone()).collect();

        handle_key(&mut state, &c, make_key(KeyCode::Tab));
        assert_eq!(state.sidebar_index, 0);
        handle_key(&mut state, &c, make_key(KeyCode::Down));
        handle_key(&mut state, &c, make_key(KeyCode::Down));
        assert_eq!(state.sidebar_index, 1);

        assert_eq!(
            handle_key(&mut state, &c, make_key(KeyCode::Char('d'))),
            InputResult::DeleteSession(ids[1].clone())
        );
        assert_eq!(
            handle_key(&mut state, &c, make_key(KeyCode::Enter)),
            InputResult::SelectSession(ids[1].clone())
        );
        assert_eq!(state.focus, Focus::Input);
    }

    #[test]
    fn tab_is_ignored_while_sidebar_hidden() {
        let mut state = TuiState::new();
        let c = controller();
        state.sidebar_visible = false;

        assert_eq!(handle_key(&mut state, &c, make_key(KeyCode::Tab)), InputResult::None);
        assert_eq!(state.focus, Focus::Input);

        // 'd' must be typed, never turned into a delete.
        assert_eq!(
            handle_key(&mut state, &c, make_key(KeyCode::Char('d'))),
            InputResult::None
        );
        assert_eq!(state.input.text, "d");
        assert_eq!(c.sessions().len(), 1);
    }

    #[test]
    fn stale_sidebar_focus_falls_back_to_input_when_hidden() {
        let mut state = TuiState::new();
        let c = controller();
        state.focus = Focus::Sidebar;
        state.sidebar_visible = false;

        assert_eq!(
            handle_key(&mut state, &c, make_key(KeyCode::Delete)),
            InputResult::None
        );
        assert_eq!(state.focus, Focus::Input);
    }

    #[test]
    fn sidebar_typing_does_not_reach_input() {
        let mut state = TuiState::new();
        let c = controller();
        handle_key(&mut state, &c, make_key(KeyCode::Tab));
        handle_key(&mut state, &c, make_key(KeyCode::Char('x')));
        assert!(state.input.is_empty());
    }

    #[test]
    fn settings_edit_and_save() {
        let mut state = TuiState::new();
        let c = controller();
        handle_key(&mut state, &c, make_ctrl('s'));
        assert_eq!(state.focus, Focus::Settings);
        assert_eq!(state.settings_input.text, "http://localhost/hook");

        for _ in 0..4 {
            handle_key(&mut state, &c, make_key(KeyCode::Backspace));
        }
        for ch in "chat".chars() {
            handle_key(&mut state, &c, make_key(KeyCode::Char(ch)));
        }
        let result = handle_key(&mut state, &c, make_key(KeyCode::Enter));
        assert_eq!(
            result,
            InputResult::SaveWebhookUrl("http://localhost/chat".to_string())
        );
        assert_eq!(state.focus, Focus::Input);
    }

    #[test]
    fn settings_esc_cancels() {
        let mut state = TuiState::new();
        let c = controller();
        handle_key(&mut state, &c, make_ctrl('s'));
        handle_key(&mut state, &c, make_key(KeyCode::Char('x')));
        assert_eq!(handle_key(&mut state, &c, make_key(KeyCode::Esc)), InputResult::None);
        assert_eq!(state.focus, Focus::Input);
        assert!(state.input.is_empty());
    }

    #[test]
    fn paste_goes_to_focused_buffer() {
        let mut state = TuiState::new();
        handle_paste(&mut state, "line one\nline two");
        assert_eq!(state.input.text, "line one\nline two");

        state.open_settings("");
        handle_paste(&mut state, "http://a\n");
        assert_eq!(state.settings_input.text, "http://a");
    }

    #[test]
    fn unicode_editing_through_key_events() {
        let mut state = TuiState::new();
        let c = controller();
        for ch in ['é', '🙂', 'x'] {
            handle_key(&mut state, &c, make_key(KeyCode::Char(ch)));
        }
        handle_key(&mut state, &c, make_key(KeyCode::Left));
        handle_key(&mut state, &c, make_key(KeyCode::Backspace));
        assert_eq!(state.input.text, "éx");
    }
}
