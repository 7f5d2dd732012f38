// ABOUTME: Settings prompt widget — inline editor for the webhook URL.
// ABOUTME: Shown above the input while settings has focus.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Render the settings prompt header and the URL being edited.
pub fn settings_lines(url: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(
                "SETTINGS ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "Webhook URL from your workflow trigger (Enter to save, Esc to cancel)",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(
            if url.is_empty() {
                "https://your-n8n-instance.com/webhook/...".to_string()
            } else {
                url.to_string()
            },
            if url.is_empty() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            },
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_placeholder_when_empty() {
        let lines = settings_lines("");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].spans[0].content.contains("your-n8n-instance"));
        assert_eq!(lines[1].spans[0].style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn shows_current_url() {
        let lines = settings_lines("http://hook");
        assert_eq!(lines[1].spans[0].content, "http://hook");
    }
}
