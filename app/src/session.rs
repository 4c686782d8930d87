//! Local session storage.
//!
//! The console keeps the login token and profile in a small JSON file
//! between invocations. The token is taken at face value: no expiry or
//! refresh handling.

use crate::error::{FleetError, Result};
use crate::models::UserProfile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(rename = "usuario")]
    pub user: UserProfile,
}

impl Session {
    /// Name shown in greetings; `Administrador` when the profile has none.
    pub fn display_name(&self) -> &str {
        if self.user.name.trim().is_empty() {
            "Administrador"
        } else {
            &self.user.name
        }
    }
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(&e))?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| FleetError::Session(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| self.io_error(&e))?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    /// Returns `None` when no session has been stored.
    pub fn load(&self) -> Result<Option<Session>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| FleetError::Session(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(&e)),
        }
    }

    /// Loads the session or fails with [`FleetError::NotAuthenticated`].
    pub fn require(&self) -> Result<Session> {
        self.load()?
            .filter(|s| !s.token.is_empty())
            .ok_or(FleetError::NotAuthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.load(), Ok(Some(session)) if !session.token.is_empty())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(&e)),
        }
    }

    fn io_error(&self, e: &std::io::Error) -> FleetError {
        FleetError::Session(format!("{}: {e}", self.path.display()))
    }
}
