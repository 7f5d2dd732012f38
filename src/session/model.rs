// ABOUTME: Session data model — conversation sessions and their chat messages.
// ABOUTME: Title generation, preview truncation, and per-session message id allocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title shown for a session until its first user message arrives.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Maximum number of characters kept in an assistant reply preview.
pub const PREVIEW_CHARS: usize = 100;

/// Number of words kept when deriving a title from the first user message.
const TITLE_WORDS: usize = 6;

/// A single chat message within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message authored by the user.
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_user: true,
            timestamp: Utc::now(),
        }
    }

    /// Create a message authored by the webhook assistant.
    pub fn assistant(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_user: false,
            timestamp: Utc::now(),
        }
    }
}

/// A locally stored conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: String,
    pub last_message: String,
    pub timestamp: DateTime<Utc>,
    pub message_count: usize,
    pub messages: Vec<Message>,
}

impl Session {
    /// Create a fresh session seeded with a single assistant greeting.
    pub fn new(greeting: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            last_message: String::new(),
            timestamp: Utc::now(),
            message_count: 1,
            messages: vec![Message::assistant("1", greeting)],
        }
    }

    /// Next free message id: one past the largest numeric id in the session.
    pub fn next_message_id(&self) -> String {
        let max = self
            .messages
            .iter()
            .filter_map(|m| m.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }

    /// Whether the user has sent anything in this session yet.
    pub fn has_user_messages(&self) -> bool {
        self.messages.iter().any(|m| m.is_user)
    }

    /// Append a user message, deriving the title if it is the first one.
    pub fn push_user(&mut self, text: &str) -> &Message {
        if !self.has_user_messages() {
            self.title = generate_title(text);
        }
        let msg = Message::user(self.next_message_id(), text);
        self.last_message = text.to_string();
        self.timestamp = msg.timestamp;
        self.push(msg)
    }

    /// Append an assistant message with the given preview text.
    pub fn push_assistant(&mut self, text: &str, preview: String) -> &Message {
        let msg = Message::assistant(self.next_message_id(), text);
        self.last_message = preview;
        self.timestamp = msg.timestamp;
        self.push(msg)
    }

    fn push(&mut self, msg: Message) -> &Message {
        self.messages.push(msg);
        self.message_count = self.messages.len();
        &self.messages[self.messages.len() - 1]
    }
}

/// Derive a session title from the first user message.
///
/// Splits on single spaces, keeps the first six pieces, and appends `...`
/// when anything was cut off.
pub fn generate_title(first_message: &str) -> String {
    let words: Vec<&str> = first_message.split(' ').collect();
    let mut title = words
        .iter()
        .take(TITLE_WORDS)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() > TITLE_WORDS {
        title.push_str("...");
    }
    title
}

/// Truncate a reply to the sidebar preview length, respecting char boundaries.
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
