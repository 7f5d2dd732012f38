// ABOUTME: Webhook transport — the Webhook trait and its reqwest-backed HTTP implementation.
// ABOUTME: One request per call; non-2xx statuses and non-JSON bodies become errors.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::webhook::error::WebhookError;
use crate::webhook::payload::{HttpMethod, WebhookRequest};
use crate::webhook::reply::{WebhookReply, extract_reply};

/// Anything that can deliver a message to the workflow and return its reply.
#[async_trait]
pub trait Webhook: Send + Sync {
    async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookReply, WebhookError>;
}

/// HTTP webhook client.
#[derive(Debug, Clone)]
pub struct HttpWebhook {
    client: reqwest::Client,
}

impl HttpWebhook {
    /// Create a client, optionally bounding each request by `timeout`.
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Webhook for HttpWebhook {
    async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookReply, WebhookError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|_| WebhookError::InvalidUrl(request.url.clone()))?;

        info!("sending message to webhook {} {}", request.method, url);
        debug!("request payload: {:?}", request.payload);

        let builder = match request.method {
            HttpMethod::Post => self.client.post(url).json(&request.payload),
            HttpMethod::Get => self.client.get(url).query(&request.payload.query_pairs()),
        };

        let response = builder.send().await?;
        let status = response.status();
        debug!("response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            debug!("error response body: {}", body);
            return Err(WebhookError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| WebhookError::InvalidReply(e.to_string()))?;
        debug!("full response: {}", value);

        Ok(extract_reply(&value))
    }
}
