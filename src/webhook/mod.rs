// ABOUTME: Webhook module — the single outbound exchange with the workflow endpoint.
// ABOUTME: Payload construction, HTTP transport, reply sniffing, and error types.

pub mod client;
pub mod error;
pub mod payload;
pub mod reply;

pub use client::{HttpWebhook, Webhook};
pub use error::WebhookError;
pub use payload::{DEFAULT_USER_ID, HttpMethod, WebhookPayload, WebhookRequest};
pub use reply::{WebhookReply, extract_reply};
