// ABOUTME: Webhook reply extraction — picks the assistant text out of an arbitrary JSON reply.
// ABOUTME: Checks RESPONSE, response, then message; recognises the "workflow started" ack.

use serde_json::Value;

/// Acknowledgement some workflow engines return before the real answer exists.
pub const WORKFLOW_STARTED: &str = "Workflow was started";

/// Shown when the reply contains none of the expected fields.
pub const MISSING_REPLY_TEXT: &str = "I received your message but didn't get a response from the AI. \
Please check your webhook workflow configuration.";

/// Reply fields inspected, in priority order.
pub const REPLY_FIELDS: [&str; 3] = ["RESPONSE", "response", "message"];

/// What the webhook answered.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookReply {
    /// Reply text found in one of the known fields.
    Text(String),
    /// The workflow only acknowledged the trigger; no answer to show.
    WorkflowStarted,
    /// None of the known fields carried anything.
    Missing,
}

impl WebhookReply {
    /// The text to append as an assistant message, if any.
    pub fn display_text(&self) -> Option<&str> {
        match self {
            WebhookReply::Text(text) => Some(text),
            WebhookReply::Missing => Some(MISSING_REPLY_TEXT),
            WebhookReply::WorkflowStarted => None,
        }
    }
}

/// Inspect a parsed reply body and decide what the assistant said.
pub fn extract_reply(value: &Value) -> WebhookReply {
    // Workflows that respond with all items return a list; use the first.
    let value = match value {
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return WebhookReply::Missing,
        },
        other => other,
    };

    if value.get("message").and_then(Value::as_str) == Some(WORKFLOW_STARTED) {
        return WebhookReply::WorkflowStarted;
    }

    for field in REPLY_FIELDS {
        if let Some(text) = value.get(field).and_then(truthy_text) {
            tracing::debug!("reply found in '{}' field", field);
            return WebhookReply::Text(text);
        }
    }

    tracing::debug!("no reply field found in {}", value);
    WebhookReply::Missing
}

fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
