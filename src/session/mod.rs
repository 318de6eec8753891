//! Session identity
//!
//! Resolves the stable id the backend uses to correlate turns into one
//! conversation. The id is read from (or written to) a pluggable key-value
//! storage so it survives restarts; when that storage is unavailable the
//! session degrades to an id that lives only for the current process.

use std::sync::{Arc, OnceLock};

use uuid::Uuid;

use crate::error::AppResult;

pub mod storage;

pub use storage::{FileSessionStorage, MemorySessionStorage};

/// Storage key holding the session id
pub const SESSION_KEY: &str = "sessionId";

/// Durable string key-value storage
#[cfg_attr(test, mockall::automock)]
pub trait SessionStorage: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Stores a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
}

pub struct SessionIdentity {
    storage: Arc<dyn SessionStorage>,
    session_id: OnceLock<String>,
}

impl SessionIdentity {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            session_id: OnceLock::new(),
        }
    }

    /// Identity backed by process memory only
    pub fn ephemeral() -> Self {
        Self::new(Arc::new(MemorySessionStorage::new()))
    }

    /// Returns the session id, creating and persisting one on first use.
    ///
    /// Never fails: storage errors fall back to a fresh id that is kept for the
    /// lifetime of this `SessionIdentity`.
    pub fn get_or_create_session_id(&self) -> String {
        self.session_id.get_or_init(|| self.resolve()).clone()
    }

    fn resolve(&self) -> String {
        match self.storage.get(SESSION_KEY) {
            Ok(Some(id)) if !id.is_empty() => {
                tracing::debug!(session_id = %id, "Restored session id");
                return id;
            }
            Ok(_) => {}
            Err(e) => {
                let id = Uuid::new_v4().to_string();
                tracing::warn!(
                    error = %e,
                    session_id = %id,
                    "Session storage unreadable, using ephemeral session id"
                );
                return id;
            }
        }

        let id = Uuid::new_v4().to_string();
        match self.storage.set(SESSION_KEY, &id) {
            Ok(()) => tracing::info!(session_id = %id, "Created new session id"),
            Err(e) => tracing::warn!(
                error = %e,
                session_id = %id,
                "Failed to persist session id, using ephemeral session id"
            ),
        }
        id
    }
}
