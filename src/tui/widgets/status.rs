// ABOUTME: Status bar widget — renders webhook target, session count, loading state, and notices.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::controller::{Notice, NoticeLevel};
use crate::webhook::HttpMethod;

/// Everything the status bar shows.
pub struct StatusBarParams<'a> {
    pub webhook_url: &'a str,
    pub method: HttpMethod,
    pub session_count: usize,
    pub loading: bool,
    pub notice: Option<&'a Notice>,
}

/// Render the status bar line. A notice, when present, replaces the summary.
pub fn status_line(params: &StatusBarParams) -> Line<'static> {
    if let Some(notice) = params.notice {
        let color = match notice.level {
            NoticeLevel::Info => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        return Line::from(vec![
            Span::styled(
                format!(" {} ", notice.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(notice.description.clone(), Style::default().fg(Color::White)),
        ]);
    }

    let dim = Style::default().fg(Color::DarkGray);
    let target = if params.webhook_url.is_empty() {
        Span::styled(" no webhook configured (Ctrl+S) ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            format!(" {} {} ", params.method, params.webhook_url),
            Style::default().fg(Color::Cyan),
        )
    };

    let mut spans = vec![
        target,
        Span::styled("| ", dim),
        Span::styled(
            format!(
                "{} session{} ",
                params.session_count,
                if params.session_count == 1 { "" } else { "s" }
            ),
            Style::default().fg(Color::White),
        ),
    ];

    if params.loading {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled("waiting for reply... ", Style::default().fg(Color::Yellow)));
    }

    Line::from(spans)
}
