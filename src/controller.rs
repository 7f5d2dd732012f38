// ABOUTME: Chat controller — owns session state and reconciles webhook replies into sessions.
// ABOUTME: Session CRUD, send bookkeeping, transient notices, and persistence after each change.

use std::collections::VecDeque;

use thiserror::Error;
use tracing::{info, warn};

use crate::session::model::preview;
use crate::session::{KvStore, Session, SessionError, SessionStore, save_state};
use crate::webhook::{HttpMethod, WebhookError, WebhookPayload, WebhookReply, WebhookRequest};

/// Preview stored on a session after a failed exchange.
pub const CONNECTION_FAILED_PREVIEW: &str = "Connection failed";

#[derive(Debug, Error, PartialEq)]
pub enum ControllerError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("a message is already being sent")]
    RequestInFlight,
    #[error("no webhook URL configured")]
    WebhookNotConfigured,
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient notification for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn info(title: &str, description: &str) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    fn error(title: &str, description: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// A send that has been recorded locally and now needs the webhook call.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSend {
    pub session_id: String,
    pub request: WebhookRequest,
}

/// How a finished exchange was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// An assistant message was appended with this text.
    Replied(String),
    /// The workflow only acknowledged the trigger.
    Acknowledged,
    /// The exchange failed; the error message was appended.
    Failed(String),
    /// The originating session no longer exists.
    Dropped,
}

/// Settings the controller needs besides persisted state.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub method: HttpMethod,
    pub user_id: String,
    pub greeting: String,
}

pub struct ChatController {
    store: SessionStore,
    webhook_url: String,
    settings: ControllerSettings,
    loading: bool,
    notices: VecDeque<Notice>,
    kv: Option<KvStore>,
}

impl ChatController {
    /// Create a controller over an existing store. With `kv` set, every
    /// mutation is written through to disk.
    pub fn new(
        mut store: SessionStore,
        webhook_url: String,
        settings: ControllerSettings,
        kv: Option<KvStore>,
    ) -> Self {
        store.ensure_current(&settings.greeting);
        Self {
            store,
            webhook_url,
            settings,
            loading: false,
            notices: VecDeque::new(),
            kv,
        }
    }

    pub fn sessions(&self) -> &[Session] {
        self.store.sessions()
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.store.current()
    }

    pub fn current_session_id(&self) -> Option<&str> {
        self.store.current_id()
    }

    pub fn session(&self, id: &str) -> Option<&Session> {
        self.store.get(id)
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    pub fn method(&self) -> HttpMethod {
        self.settings.method
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a send is currently possible.
    pub fn can_send(&self) -> bool {
        !self.loading && !self.webhook_url.is_empty()
    }

    pub fn new_session(&mut self) -> String {
        let id = self.store.create_session(&self.settings.greeting).id.clone();
        info!("created session {}", id);
        self.persist();
        id
    }

    pub fn select_session(&mut self, id: &str) -> Result<(), ControllerError> {
        self.store.select(id)?;
        self.persist();
        Ok(())
    }

    pub fn delete_session(&mut self, id: &str) -> Result<(), ControllerError> {
        self.store.delete(id, &self.settings.greeting)?;
        info!("deleted session {}", id);
        self.persist();
        Ok(())
    }

    pub fn set_webhook_url(&mut self, url: &str) {
        self.webhook_url = url.trim().to_string();
        info!("webhook URL set to {}", self.webhook_url);
        self.notices.push_back(Notice::info(
            "Settings saved",
            "Your webhook URL has been updated successfully.",
        ));
        self.persist();
    }

    /// Record the user's message locally and produce the request to send.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingSend, ControllerError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ControllerError::EmptyMessage);
        }
        if self.loading {
            return Err(ControllerError::RequestInFlight);
        }
        if self.webhook_url.is_empty() {
            self.notices.push_back(Notice::error(
                "Configuration needed",
                "Please configure your webhook URL in settings first.",
            ));
            return Err(ControllerError::WebhookNotConfigured);
        }

        self.store.ensure_current(&self.settings.greeting);
        let session = self
            .store
            .current_mut()
            .ok_or_else(|| SessionError::NotFound(String::new()))?;
        session.push_user(text);
        let session_id = session.id.clone();
        self.store.touch(&session_id);

        self.loading = true;
        self.persist();

        Ok(PendingSend {
            session_id,
            request: WebhookRequest {
                url: self.webhook_url.clone(),
                method: self.settings.method,
                payload: WebhookPayload::new(text, self.settings.user_id.clone()),
            },
        })
    }

    /// Apply the outcome of a webhook exchange to the session that started it.
    pub fn finish_send(
        &mut self,
        session_id: &str,
        outcome: Result<WebhookReply, WebhookError>,
    ) -> Completion {
        self.loading = false;

        let method = self.settings.method;
        let Some(session) = self.store.get_mut(session_id) else {
            warn!("dropping reply for deleted session {}", session_id);
            return Completion::Dropped;
        };

        let completion = match outcome {
            Ok(WebhookReply::WorkflowStarted) => {
                info!("workflow started, no reply to show yet");
                return Completion::Acknowledged;
            }
            Ok(reply) => {
                let text = reply.display_text().unwrap_or_default().to_string();
                session.push_assistant(&text, preview(&text));
                Completion::Replied(text)
            }
            Err(e) => {
                warn!("webhook exchange failed: {}", e);
                let text = format!(
                    "Connection failed: {}. Please check that your workflow is running \
and the webhook is configured for {} requests.",
                    e, method
                );
                session.push_assistant(&text, CONNECTION_FAILED_PREVIEW.to_string());
                self.notices.push_back(Notice::error(
                    "Connection error",
                    "Failed to connect to your workflow. Check the log for details.",
                ));
                Completion::Failed(text)
            }
        };

        self.store.touch(session_id);
        self.persist();
        completion
    }

    /// Take all queued notices, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn persist(&mut self) {
        if let Some(kv) = self.kv.as_mut()
            && let Err(e) = save_state(kv, &self.store, &self.webhook_url)
        {
            warn!("failed to save state: {:#}", e);
        }
    }
}
