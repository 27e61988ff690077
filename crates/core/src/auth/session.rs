use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::User;

/// Token and user object kept between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Bearer token issued by the backend.
    pub access_token: String,
    /// User the token belongs to.
    pub user: User,
}

/// JSON file holding the current session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a session file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the stored session, returning `None` if there is none.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read session {}", self.path.display()))?;
        let session = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse session {}", self.path.display()))?;
        Ok(Some(session))
    }

    /// Write `session`, creating parent directories if needed.
    pub fn persist(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create session directory {}", parent.display())
            })?;
        }
        let serialized =
            serde_json::to_string_pretty(session).context("failed to serialize session")?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write session {}", self.path.display()))
    }

    /// Remove the stored session if present.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("failed to remove session {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ROLE_USER;
    use tempfile::tempdir;

    #[test]
    fn persist_load_clear() -> Result<()> {
        let dir = tempdir()?;
        let store = SessionStore::new(dir.path().join("state").join("session.json"));
        assert_eq!(store.load()?, None);

        let session = StoredSession {
            access_token: "jwt".to_string(),
            user: User {
                id: 3,
                email: "bia@example.com".to_string(),
                name: "Bia".to_string(),
                roles: vec![ROLE_USER.to_string()],
            },
        };
        store.persist(&session)?;
        assert!(store.exists());
        assert_eq!(store.load()?, Some(session));

        store.clear()?;
        assert!(!store.exists());
        store.clear()?;
        Ok(())
    }

    #[test]
    fn corrupt_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let store = SessionStore::new(dir.path().join("session.json"));
        fs::write(store.path(), "{not json")?;
        assert!(store.load().is_err());
        Ok(())
    }
}
