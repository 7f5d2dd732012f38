// ABOUTME: Sidebar widget — lists sessions with title, preview, and relative last-activity time.
// ABOUTME: Highlights the current session and the keyboard cursor when the sidebar has focus.

use chrono::{DateTime, Utc};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::session::Session;

/// Format how long ago `timestamp` was, relative to `now`.
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - timestamp).num_hours();
    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{} hour{} ago", hours, if hours > 1 { "s" } else { "" })
    } else {
        let days = hours / 24;
        format!("{} day{} ago", days, if days > 1 { "s" } else { "" })
    }
}

/// Render the session list. `cursor` is the highlighted row when the sidebar has focus.
pub fn sidebar_lines(
    sessions: &[Session],
    current_id: Option<&str>,
    cursor: Option<usize>,
    width: u16,
    now: DateTime<Utc>,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            " + New Chat (Ctrl+N)",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if sessions.is_empty() {
        lines.push(Line::from(Span::styled(
            " No conversations yet",
            Style::default().fg(Color::DarkGray),
        )));
        return lines;
    }

    let max = width.saturating_sub(3) as usize;
    for (idx, session) in sessions.iter().enumerate() {
        let is_current = current_id == Some(session.id.as_str());
        let is_cursor = cursor == Some(idx);

        let marker = if is_cursor { "▶ " } else { "  " };
        let mut title_style = Style::default().fg(Color::White);
        if is_current {
            title_style = title_style.add_modifier(Modifier::BOLD).fg(Color::Cyan);
        }
        if is_cursor {
            title_style = title_style.add_modifier(Modifier::REVERSED);
        }

        let preview = if session.last_message.is_empty() {
            "No messages yet"
        } else {
            session.last_message.as_str()
        };

        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(clip(&session.title, max), title_style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", clip(&preview.replace('\n', " "), max)),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", format_relative(session.timestamp, now)),
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}
