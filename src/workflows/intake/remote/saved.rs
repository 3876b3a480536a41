use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::super::store::StoreError;

/// File name used for the remembered remote session id inside the storage directory.
pub const SAVED_SESSION_ID_FILE: &str = "talentscout_session_id";

/// The remote session id a terminal chat reattaches to on its next start.
#[derive(Debug, Clone)]
pub struct SavedSessionId {
    path: PathBuf,
}

impl SavedSessionId {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SAVED_SESSION_ID_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or blank file means there is nothing to resume.
    pub fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let id = raw.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    pub fn save(&self, session_id: &str) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, session_id)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_survives_a_restart() {
        let dir = tempfile::tempdir().expect("tempdir");
        let saved = SavedSessionId::in_dir(dir.path().join("state"));
        assert_eq!(saved.load().expect("load"), None);

        saved.save("3f2c-session").expect("save");
        assert!(saved.path().ends_with(SAVED_SESSION_ID_FILE));

        let reopened = SavedSessionId::in_dir(dir.path().join("state"));
        assert_eq!(reopened.load().expect("load"), Some("3f2c-session".to_string()));

        reopened.save("next-session").expect("overwrite");
        assert_eq!(saved.load().expect("load"), Some("next-session".to_string()));

        saved.clear().expect("clear");
        saved.clear().expect("second clear is a no-op");
        assert_eq!(saved.load().expect("load"), None);
    }

    #[test]
    fn blank_file_means_nothing_saved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let saved = SavedSessionId::in_dir(dir.path());
        fs::write(saved.path(), "  \n").expect("write");

        assert_eq!(saved.load().expect("load"), None);
    }
}
