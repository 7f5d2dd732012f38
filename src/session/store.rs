// ABOUTME: In-memory session store — ordered session list plus the current-session pointer.
// ABOUTME: Keeps most-recently-active sessions first and the pointer always valid.

use thiserror::Error;

use crate::session::model::Session;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("session '{0}' not found")]
    NotFound(String),
}

/// Ordered list of sessions, most recently active first.
#[derive(Debug, Default, Clone)]
pub struct SessionStore {
    sessions: Vec<Session>,
    current: Option<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously persisted sessions and pointer.
    ///
    /// The pointer is not validated here; call `ensure_current` afterwards.
    pub fn from_parts(sessions: Vec<Session>, current: Option<String>) -> Self {
        Self { sessions, current }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_deref().and_then(|id| self.get(id))
    }

    pub fn current_mut(&mut self) -> Option<&mut Session> {
        let id = self.current.clone()?;
        self.get_mut(&id)
    }

    /// Create a new session at the front of the list and make it current.
    pub fn create_session(&mut self, greeting: &str) -> &Session {
        let session = Session::new(greeting);
        self.current = Some(session.id.clone());
        self.sessions.insert(0, session);
        &self.sessions[0]
    }

    /// Point the current-session pointer at an existing session.
    pub fn select(&mut self, id: &str) -> Result<(), SessionError> {
        if self.get(id).is_none() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        self.current = Some(id.to_string());
        Ok(())
    }

    /// Remove a session. If it was current, fall back to the first remaining
    /// session, or a freshly created one when the list becomes empty.
    pub fn delete(&mut self, id: &str, greeting: &str) -> Result<Session, SessionError> {
        let idx = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        let removed = self.sessions.remove(idx);

        if self.current.as_deref() == Some(id) {
            self.current = None;
            match self.sessions.first() {
                Some(first) => self.current = Some(first.id.clone()),
                None => {
                    self.create_session(greeting);
                }
            }
        }
        Ok(removed)
    }

    /// Move a session to the front of the list after activity.
    pub fn touch(&mut self, id: &str) {
        if let Some(idx) = self.sessions.iter().position(|s| s.id == id)
            && idx > 0
        {
            let session = self.sessions.remove(idx);
            self.sessions.insert(0, session);
        }
    }

    /// Repair the pointer: keep it if valid, else use the first session, else
    /// create a new one. Returns true when a session had to be created.
    pub fn ensure_current(&mut self, greeting: &str) -> bool {
        if self.current().is_some() {
            return false;
        }
        match self.sessions.first() {
            Some(first) => {
                self.current = Some(first.id.clone());
                false
            }
            None => {
                self.create_session(greeting);
                true
            }
        }
    }
}
