use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::model::User;

/// Authenticated identity plus the bearer credential the store issued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// File-backed store so the session survives restarts. Injected into the
/// API client rather than reached through ambient global state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved session. A missing file means "logged out"; an
    /// unreadable one is discarded with a warning rather than blocking
    /// startup.
    pub fn load(&self) -> ApiResult<Option<Session>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(ApiError::Session(err.to_string())),
        };
        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "discarding unreadable session file"
                );
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| ApiError::Session(err.to_string()))?;
        }
        let content = serde_json::to_string_pretty(session)
            .map_err(|err| ApiError::Session(err.to_string()))?;
        fs::write(&self.path, content).map_err(|err| ApiError::Session(err.to_string()))?;
        tracing::debug!(path = %self.path.display(), "saved session");
        Ok(())
    }

    pub fn clear(&self) -> ApiResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ApiError::Session(err.to_string())),
        }
    }
}
