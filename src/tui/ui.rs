// ABOUTME: Main TUI rendering function — assembles sidebar, header, chat, input, and status bar.
// ABOUTME: Splits the terminal frame into layout chunks and delegates to widgets.

use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::controller::ChatController;
use crate::tui::state::{Focus, TextBuffer, TuiState};
use crate::tui::widgets::chat::{render_chat_lines, typing_indicator_line};
use crate::tui::widgets::settings::settings_lines;
use crate::tui::widgets::sidebar::sidebar_lines;
use crate::tui::widgets::status::{StatusBarParams, status_line};

const SIDEBAR_WIDTH: u16 = 28;
const MAX_INPUT_HEIGHT: u16 = 8;
const INPUT_PLACEHOLDER: &str = "Ask your AI assistant anything...";
const NO_WEBHOOK_PLACEHOLDER: &str = "Configure a webhook URL first (Ctrl+S)";

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &mut TuiState, controller: &ChatController) {
    let area = frame.area();

    // Hide the sidebar on very narrow terminals.
    let (sidebar_area, main_area) = if area.width >= SIDEBAR_WIDTH * 2 {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(area);
        (Some(cols[0]), cols[1])
    } else {
        (None, area)
    };

    state.set_sidebar_visible(sidebar_area.is_some());
    if let Some(sidebar_area) = sidebar_area {
        render_sidebar(frame, state, controller, sidebar_area);
    }

    let show_settings = state.focus == Focus::Settings;
    // +2 accounts for top and bottom borders
    let input_height = (state.input.line_count() as u16 + 2).clamp(3, MAX_INPUT_HEIGHT);

    let mut constraints = vec![
        Constraint::Length(1), // Header
        Constraint::Min(3),    // Chat area
    ];
    if show_settings {
        constraints.push(Constraint::Length(2));
    }
    constraints.push(Constraint::Length(input_height));
    constraints.push(Constraint::Length(1)); // Status bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(main_area);

    // Header
    let title = controller
        .current_session()
        .map(|s| s.title.clone())
        .unwrap_or_else(|| "AI Assistant".to_string());
    let header = Line::from(vec![
        Span::styled(
            format!(" {}", title),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Powered by your webhook", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    // Chat area
    let mut chat_lines = controller
        .current_session()
        .map(|s| render_chat_lines(&s.messages))
        .unwrap_or_default();
    if controller.is_loading() {
        chat_lines.push(Line::from(""));
        chat_lines.push(typing_indicator_line(state.session_start.elapsed().as_millis()));
    }

    let chat_chunk = chunks[1];
    let chat_paragraph = Paragraph::new(chat_lines).wrap(Wrap { trim: false });
    let total_lines = chat_paragraph.line_count(chat_chunk.width) as u16;
    let max_scroll = total_lines.saturating_sub(chat_chunk.height);
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }
    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.scroll_offset);
    frame.render_widget(chat_paragraph.scroll((scroll, 0)), chat_chunk);

    let (input_chunk, status_chunk) = if show_settings {
        frame.render_widget(Paragraph::new(settings_lines(&state.settings_input.text)), chunks[2]);
        (chunks[3], chunks[4])
    } else {
        (chunks[2], chunks[3])
    };

    // Input area
    let border_color = match state.focus {
        Focus::Input => Color::Cyan,
        _ => Color::DarkGray,
    };
    let mut input_block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(border_color));
    if controller.is_loading() {
        input_block = input_block.title(Span::styled(
            " waiting for reply... ",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let input = if state.input.is_empty() {
        let placeholder = if controller.webhook_url().is_empty() {
            NO_WEBHOOK_PLACEHOLDER
        } else {
            INPUT_PLACEHOLDER
        };
        Paragraph::new(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(state.input.text.clone())
    };
    frame.render_widget(input.block(input_block), input_chunk);

    match state.focus {
        Focus::Input => set_cursor(frame, &mut state.input, input_chunk, 1),
        Focus::Settings => {
            // The URL sits on the second row of the settings prompt.
            let url_row = Rect { y: chunks[2].y.saturating_add(1), ..chunks[2] };
            set_cursor(frame, &mut state.settings_input, url_row, 0)
        }
        Focus::Sidebar => {}
    }

    // Status bar
    let status = status_line(&StatusBarParams {
        webhook_url: controller.webhook_url(),
        method: controller.method(),
        session_count: controller.sessions().len(),
        loading: controller.is_loading(),
        notice: state.notice.as_ref().map(|(notice, _)| notice),
    });
    frame.render_widget(Paragraph::new(status), status_chunk);
}

fn render_sidebar(frame: &mut Frame, state: &mut TuiState, controller: &ChatController, area: Rect) {
    let focused = state.focus == Focus::Sidebar;
    if focused {
        state.clamp_sidebar(controller.sessions().len());
    }
    let lines = sidebar_lines(
        controller.sessions(),
        controller.current_session_id(),
        focused.then_some(state.sidebar_index),
        area.width,
        Utc::now(),
    );

    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            " Chats (Tab) ",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));

    // Keep the cursor row visible: header is 2 rows, each session 3.
    let cursor_row = 2 + state.sidebar_index as u16 * 3 + 2;
    let inner_height = area.height.saturating_sub(1);
    let scroll = if focused {
        cursor_row.saturating_sub(inner_height.saturating_sub(1))
    } else {
        0
    };

    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

/// Place the terminal cursor inside `area` at the buffer's cursor.
/// `top` is the number of rows above the first text row (the border).
fn set_cursor(frame: &mut Frame, buffer: &mut TextBuffer, area: Rect, top: u16) {
    if area.width == 0 || area.height <= top {
        return;
    }
    buffer.clamp_cursor();

    let cursor_line = buffer.cursor_line();
    let cursor_col = buffer.cursor_column();

    // Compute the visual (display) width of the text before the cursor on its line.
    let lines = buffer.lines();
    let line_text = lines.get(cursor_line).unwrap_or(&"");
    let prefix: String = line_text.chars().take(cursor_col).collect();
    let visual_col = UnicodeWidthStr::width(prefix.as_str());
    let clamped_visual_col = visual_col.min(area.width.saturating_sub(1) as usize);

    let cursor_x = area.x.saturating_add(clamped_visual_col as u16);
    let cursor_y = area.y.saturating_add(top + cursor_line as u16);
    frame.set_cursor_position(Position::new(cursor_x, cursor_y));
}
