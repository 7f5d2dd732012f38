// ABOUTME: Webhook error type — everything that can go wrong during one exchange.
// ABOUTME: Display strings are shown verbatim to the user inside the chat.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WebhookError {
    #[error("HTTP error! status: {status} - {body}")]
    Http { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    #[error("invalid reply from webhook: {0}")]
    InvalidReply(String),

    #[error("invalid webhook URL '{0}'")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for WebhookError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WebhookError::Transport("request timed out".to_string())
        } else if e.is_builder() {
            WebhookError::InvalidUrl(
                e.url().map(|u| u.to_string()).unwrap_or_default(),
            )
        } else {
            WebhookError::Transport(e.to_string())
        }
    }
}
