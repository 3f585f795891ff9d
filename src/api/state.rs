use std::sync::Arc;

use crate::auth::SessionManager;
use crate::config::Config;
use crate::db::{MemoryStore, Store};

/// Shared application state, built once at startup and cloned into handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let sessions = SessionManager::new(&config);
        Self {
            store,
            config: Arc::new(config),
            sessions: Arc::new(sessions),
        }
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(config: Config) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }
}
