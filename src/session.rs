// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Session context: access/refresh tokens plus a small user profile.
//!
//! The in-memory [`Session`] is what the transport reads from; the
//! [`SessionFile`] is the only thing the client keeps between runs.

use crate::error::ClientError;
use crate::models::{AuthResponse, UserProfile};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Finboard", "finboard"));

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    pub access: String,
    pub refresh: String,
    pub user: UserProfile,
}

impl From<AuthResponse> for Credentials {
    fn from(r: AuthResponse) -> Self {
        Credentials {
            access: r.access,
            refresh: r.refresh,
            user: r.user,
        }
    }
}

/// Shared handle to the current session. Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<Credentials>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(creds: Credentials) -> Self {
        let s = Self::new();
        s.init(creds);
        s
    }

    pub fn init(&self, creds: Credentials) {
        tracing::debug!(user = %creds.user.username, "session initialised");
        *self.inner.write() = Some(creds);
    }

    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.read().as_ref().map(|c| c.access.clone())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.inner.read().as_ref().map(|c| c.user.clone())
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.inner.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_some()
    }
}

pub fn default_session_path() -> Result<PathBuf, ClientError> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or_else(|| {
        ClientError::Session("Could not determine platform-specific data dir".into())
    })?;
    Ok(proj.data_dir().join("session.json"))
}

/// On-disk copy of the session. No expiry handling: it lives until logout.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored credentials; a missing file is simply no session.
    pub fn load(&self) -> Result<Option<Credentials>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| ClientError::Session(format!("read {}: {}", self.path.display(), e)))?;
        let creds = serde_json::from_str(&raw).map_err(|e| {
            ClientError::Session(format!("parse {}: {}", self.path.display(), e))
        })?;
        Ok(Some(creds))
    }

    pub fn save(&self, creds: &Credentials) -> Result<(), ClientError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| ClientError::Session(format!("create {}: {}", dir.display(), e)))?;
        }
        let body = serde_json::to_string_pretty(creds)?;
        fs::write(&self.path, body)
            .map_err(|e| ClientError::Session(format!("write {}: {}", self.path.display(), e)))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Session(format!(
                "remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Build the runtime session from whatever is stored.
    pub fn open(&self) -> Result<Session, ClientError> {
        let session = Session::new();
        if let Some(creds) = self.load()? {
            session.init(creds);
        }
        Ok(session)
    }
}
