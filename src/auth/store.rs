//! Persistent credential storage.
//!
//! The bearer token and the identity it authorizes are saved and cleared as
//! one record, so the store can never hold a token without its identity or
//! the other way around. Only the session manager writes here; everything
//! else reads session state through the manager's accessors.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};

use crate::models::UserIdentity;

/// Session file name inside the storage directory
const SESSION_FILE: &str = "session.json";

/// Keyring service name
const SERVICE_NAME: &str = "newsroom";

/// Keyring entry holding the serialized credential
const KEYRING_USER: &str = "session";

/// Bearer token plus the identity it authorizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub identity: UserIdentity,
    pub saved_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(token: String, identity: UserIdentity) -> Self {
        Self {
            token,
            identity,
            saved_at: Utc::now(),
        }
    }
}

pub trait SessionStore: Send + Sync {
    /// Load the persisted credential, if any.
    fn load(&self) -> Result<Option<Credential>>;

    /// Replace the persisted credential.
    fn save(&self, credential: &Credential) -> Result<()>;

    /// Remove the persisted credential. Clearing an empty store succeeds.
    fn clear(&self) -> Result<()>;
}

/// File-backed store: `session.json` under the app storage directory.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(storage_dir: PathBuf) -> Self {
        Self {
            path: storage_dir.join(SESSION_FILE),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Credential>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read session file")?;
        let credential =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(credential))
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        let contents = serde_json::to_string_pretty(credential)?;
        std::fs::write(&self.path, contents).context("Failed to write session file")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}

/// OS-keychain store via `keyring`, for desktop shells where the session
/// should not sit in a plain file.
pub struct KeyringSessionStore;

impl KeyringSessionStore {
    fn entry() -> Result<Entry> {
        Entry::new(SERVICE_NAME, KEYRING_USER).context("Failed to create keyring entry")
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<Credential>> {
        let entry = Self::entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(
                serde_json::from_str(&raw).context("Failed to parse stored credential")?,
            )),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read credential from keychain"),
        }
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let raw = serde_json::to_string(credential)?;
        Self::entry()?
            .set_password(&raw)
            .context("Failed to store credential in keychain")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}

/// In-memory store for tests and embedded consumers.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Credential>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Credential>> {
        Ok(self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
