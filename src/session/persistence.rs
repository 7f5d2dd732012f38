// ABOUTME: Local key-value persistence — sessions, current pointer, and webhook URL as JSON strings.
// ABOUTME: Backed by a single JSON file written atomically via tmp + rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, warn};

use crate::session::model::Session;
use crate::session::store::SessionStore;

pub const SESSIONS_KEY: &str = "chat-sessions";
pub const CURRENT_SESSION_KEY: &str = "current-session-id";
pub const WEBHOOK_URL_KEY: &str = "webhook-url";

/// A tiny string-to-string store persisted as one JSON object.
#[derive(Debug)]
pub struct KvStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl KvStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading state file {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("parsing state file {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Write the store to disk (atomic write via tmp + rename).
    pub fn flush(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&tmp_path, &content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Client state restored from the key-value store.
#[derive(Debug)]
pub struct PersistedState {
    pub store: SessionStore,
    pub webhook_url: String,
}

/// Restore sessions, pointer, and webhook URL.
///
/// A missing URL is seeded from `default_url` and written back. An unreadable
/// session list is discarded. The pointer is repaired so it always references
/// an existing session.
pub fn load_state(kv: &mut KvStore, default_url: &str, greeting: &str) -> PersistedState {
    let webhook_url = match kv.get(WEBHOOK_URL_KEY) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            if !default_url.is_empty() {
                kv.set(WEBHOOK_URL_KEY, default_url);
            }
            default_url.to_string()
        }
    };

    let sessions: Vec<Session> = match kv.get(SESSIONS_KEY) {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!("discarding unreadable session list: {}", e);
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let current = kv.get(CURRENT_SESSION_KEY).map(str::to_string);
    let mut store = SessionStore::from_parts(sessions, current);
    if store.ensure_current(greeting) {
        debug!("no saved sessions, created a new one");
    }

    PersistedState { store, webhook_url }
}

/// Copy the client state into the key-value store and flush it.
pub fn save_state(kv: &mut KvStore, store: &SessionStore, webhook_url: &str) -> anyhow::Result<()> {
    if !store.is_empty() {
        kv.set(SESSIONS_KEY, serde_json::to_string(store.sessions())?);
    }
    if let Some(id) = store.current_id() {
        kv.set(CURRENT_SESSION_KEY, id);
    }
    if !webhook_url.is_empty() {
        kv.set(WEBHOOK_URL_KEY, webhook_url);
    }
    kv.flush()
}
