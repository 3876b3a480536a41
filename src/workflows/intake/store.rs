use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::domain::ConversationState;

/// Fixed key used when a single local session is persisted.
pub const DEFAULT_SESSION_KEY: &str = "talent_intake_session";

const MAX_KEY_LEN: usize = 128;

/// Persistence boundary for conversation state, keyed by session identifier.
pub trait SessionStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<ConversationState>, StoreError>;
    fn save(&self, key: &str, state: &ConversationState) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn load(&self, key: &str) -> Result<Option<ConversationState>, StoreError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, state: &ConversationState) -> Result<(), StoreError> {
        (**self).save(key, state)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("persisted session '{key}' could not be parsed")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize session: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("session storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("session store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid session key '{0}'")]
    InvalidKey(String),
}

fn encode_state(state: &ConversationState) -> Result<String, StoreError> {
    serde_json::to_string(state).map_err(StoreError::Serialize)
}

fn decode_state(key: &str, blob: &str) -> Result<ConversationState, StoreError> {
    serde_json::from_str(blob).map_err(|source| StoreError::Malformed {
        key: key.to_string(),
        source,
    })
}

/// Process-local store holding serialized blobs, mirroring what a browser keeps in local storage.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemorySessionStore {
    /// Place a raw blob under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: &str, blob: impl Into<String>) -> Result<(), StoreError> {
        self.with_blobs(|blobs| {
            blobs.insert(key.to_string(), blob.into());
        })
    }

    fn with_blobs<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .blobs
            .lock()
            .map_err(|_| StoreError::Unavailable("session store mutex poisoned".to_string()))?;
        Ok(f(&mut guard))
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, key: &str) -> Result<Option<ConversationState>, StoreError> {
        let blob = self.with_blobs(|blobs| blobs.get(key).cloned())?;
        blob.map(|raw| decode_state(key, &raw)).transpose()
    }

    fn save(&self, key: &str, state: &ConversationState) -> Result<(), StoreError> {
        let blob = encode_state(state)?;
        self.with_blobs(|blobs| {
            blobs.insert(key.to_string(), blob);
        })
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.with_blobs(|blobs| {
            blobs.remove(key);
        })
    }
}

/// One JSON document per session under a storage directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys map to file names one-to-one, so only non-empty ASCII alphanumerics, `-` and
    /// `_` are accepted.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key.len() <= MAX_KEY_LEN
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, key: &str) -> Result<Option<ConversationState>, StoreError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(raw) => decode_state(key, &raw).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn save(&self, key: &str, state: &ConversationState) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let blob = encode_state(state)?;
        fs::create_dir_all(&self.dir)?;

        let tmp_path = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(blob.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}
