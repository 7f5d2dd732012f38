// ABOUTME: Session module — chat sessions, the ordered session store, and local persistence.
// ABOUTME: Sessions and the webhook URL survive restarts via a key-value state file.

pub mod model;
pub mod persistence;
pub mod store;

pub use model::{Message, Session, generate_title};
pub use persistence::{KvStore, PersistedState, load_state, save_state};
pub use store::{SessionError, SessionStore};
