// ABOUTME: Outbound webhook payload — message text, ISO timestamp, and user id.
// ABOUTME: Sent as a JSON body for POST or as query parameters for GET.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// User id sent when none is configured.
pub const DEFAULT_USER_ID: &str = "household_user";

/// HTTP method used to reach the webhook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[default]
    Post,
    Get,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Get => write!(f, "GET"),
        }
    }
}

/// The three fields every webhook call carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub message: String,
    pub timestamp: String,
    pub user_id: String,
}

impl WebhookPayload {
    pub fn new(message: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::at(message, user_id, Utc::now())
    }

    /// Build a payload stamped with an explicit time.
    pub fn at(message: impl Into<String>, user_id: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            timestamp: time.to_rfc3339_opts(SecondsFormat::Millis, true),
            user_id: user_id.into(),
        }
    }

    /// Query pairs for GET requests, in payload field order.
    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("message", self.message.as_str()),
            ("timestamp", self.timestamp.as_str()),
            ("user_id", self.user_id.as_str()),
        ]
    }
}

/// A fully addressed webhook call.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookRequest {
    pub url: String,
    pub method: HttpMethod,
    pub payload: WebhookPayload,
}
