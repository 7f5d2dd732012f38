// ABOUTME: Chat widget — renders session messages into styled ratatui Lines.
// ABOUTME: User and assistant messages get distinct prefixes; a typing indicator follows while loading.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::session::Message;

/// Render a slice of session messages into styled Lines for display.
pub fn render_chat_lines(messages: &[Message]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, msg) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        let (prefix, color) = if msg.is_user {
            ("❯ ", Color::Green)
        } else {
            ("⏺ ", Color::Cyan)
        };
        let time = msg.timestamp.with_timezone(&chrono::Local).format("%H:%M").to_string();

        // First line gets the prefix, subsequent lines are plain.
        for (i, text) in msg.text.split('\n').enumerate() {
            if i == 0 {
                lines.push(Line::from(vec![
                    Span::styled(
                        prefix,
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(text.to_string()),
                    Span::styled(format!("  {}", time), Style::default().fg(Color::DarkGray)),
                ]));
            } else {
                lines.push(Line::from(Span::raw(format!("  {}", text))));
            }
        }
    }

    lines
}

/// The animated-looking line shown while waiting on the webhook.
pub fn typing_indicator_line(elapsed_ms: u128) -> Line<'static> {
    let dots = ".".repeat((elapsed_ms / 400 % 3 + 1) as usize);
    Line::from(vec![
        Span::styled(
            "⏺ ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("typing{}", dots),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ])
}
