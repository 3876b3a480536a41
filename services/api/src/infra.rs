use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_intake::config::IntakeConfig;
use talent_intake::workflows::intake::{
    ConversationState, FileSessionStore, InMemorySessionStore, SessionStore, StoreError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Session persistence selected at startup.
#[derive(Debug, Clone)]
pub(crate) enum SessionBackend {
    File(FileSessionStore),
    Memory(InMemorySessionStore),
}

impl SessionBackend {
    pub(crate) fn from_config(config: &IntakeConfig, force_memory: bool) -> Self {
        if config.storage_enabled && !force_memory {
            Self::File(FileSessionStore::new(config.storage_dir.clone()))
        } else {
            Self::Memory(InMemorySessionStore::default())
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory(_) => "memory",
        }
    }
}

impl SessionStore for SessionBackend {
    fn load(&self, key: &str) -> Result<Option<ConversationState>, StoreError> {
        match self {
            Self::File(store) => store.load(key),
            Self::Memory(store) => store.load(key),
        }
    }

    fn save(&self, key: &str, state: &ConversationState) -> Result<(), StoreError> {
        match self {
            Self::File(store) => store.save(key, state),
            Self::Memory(store) => store.save(key, state),
        }
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Self::File(store) => store.delete(key),
            Self::Memory(store) => store.delete(key),
        }
    }
}
