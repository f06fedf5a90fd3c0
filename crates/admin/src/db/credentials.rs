//! Credential map storage.
//!
//! The credential map is keyed by login email. Two backends exist:
//!
//! - [`MemoryCredentialStore`] keeps the map for the process lifetime.
//! - [`JsonFileCredentialStore`] keeps it in a single JSON file that is read
//!   in full on every lookup and rewritten in full on every change.
//!
//! File layout:
//!
//! ```json
//! {
//!   "admin@example.com": {
//!     "password_hash": "$argon2id$v=19$...",
//!     "name": "Admin User",
//!     "role": "admin"
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use zhunan_crm_core::UserRole;

/// Errors that can occur during credential storage operations.
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    /// Reading or writing the credential file failed.
    #[error("credential file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credential file is not a valid credential map.
    #[error("credential file {path} is corrupted: {source}")]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An entry with this email already exists.
    #[error("credential already exists: {0}")]
    Conflict(String),

    /// No entry with this email exists.
    #[error("credential not found: {0}")]
    NotFound(String),
}

/// One account in the credential map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialEntry {
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Display name.
    pub name: String,
    pub role: UserRole,
}

/// Credential map keyed by email.
pub type CredentialMap = BTreeMap<String, CredentialEntry>;

/// Storage backend for the credential map.
pub trait CredentialStore: Send {
    /// Fetch the entry for `email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, email: &str) -> Result<Option<CredentialEntry>, CredentialStoreError>;

    /// Insert a new entry.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if `email` is already present, or a storage error.
    fn insert(&mut self, email: &str, entry: CredentialEntry) -> Result<(), CredentialStoreError>;

    /// Replace the password hash of an existing entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `email` is absent, or a storage error.
    fn set_password_hash(
        &mut self,
        email: &str,
        password_hash: String,
    ) -> Result<(), CredentialStoreError>;

    /// Snapshot of every entry, ordered by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn entries(&self) -> Result<CredentialMap, CredentialStoreError>;

    /// Returns true if the map holds no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn is_empty(&self) -> Result<bool, CredentialStoreError> {
        Ok(self.entries()?.is_empty())
    }
}

fn insert_into(
    map: &mut CredentialMap,
    email: &str,
    entry: CredentialEntry,
) -> Result<(), CredentialStoreError> {
    if map.contains_key(email) {
        return Err(CredentialStoreError::Conflict(email.to_owned()));
    }
    map.insert(email.to_owned(), entry);
    Ok(())
}

fn set_hash_in(
    map: &mut CredentialMap,
    email: &str,
    password_hash: String,
) -> Result<(), CredentialStoreError> {
    let entry = map
        .get_mut(email)
        .ok_or_else(|| CredentialStoreError::NotFound(email.to_owned()))?;
    entry.password_hash = password_hash;
    Ok(())
}

// =============================================================================
// In-memory backend
// =============================================================================

/// Credential map held in memory for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    entries: CredentialMap,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, email: &str) -> Result<Option<CredentialEntry>, CredentialStoreError> {
        Ok(self.entries.get(email).cloned())
    }

    fn insert(&mut self, email: &str, entry: CredentialEntry) -> Result<(), CredentialStoreError> {
        insert_into(&mut self.entries, email, entry)
    }

    fn set_password_hash(
        &mut self,
        email: &str,
        password_hash: String,
    ) -> Result<(), CredentialStoreError> {
        set_hash_in(&mut self.entries, email, password_hash)
    }

    fn entries(&self) -> Result<CredentialMap, CredentialStoreError> {
        Ok(self.entries.clone())
    }
}

// =============================================================================
// JSON file backend
// =============================================================================

/// Credential map persisted as a single JSON file.
///
/// No caching: each call reads the whole file, and each change rewrites it.
/// A missing file reads as an empty map and is created on the first write.
#[derive(Debug, Clone)]
pub struct JsonFileCredentialStore {
    path: PathBuf,
}

impl JsonFileCredentialStore {
    /// Use the credential file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<CredentialMap, CredentialStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CredentialMap::new());
            }
            Err(source) => {
                return Err(CredentialStoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| CredentialStoreError::Corrupted {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, map: &CredentialMap) -> Result<(), CredentialStoreError> {
        let io_error = |source| CredentialStoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let content = serde_json::to_string_pretty(map).map_err(|source| {
            CredentialStoreError::Corrupted {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, content).map_err(io_error)?;

        tracing::debug!(path = %self.path.display(), entries = map.len(), "Credential file written");
        Ok(())
    }
}

impl CredentialStore for JsonFileCredentialStore {
    fn get(&self, email: &str) -> Result<Option<CredentialEntry>, CredentialStoreError> {
        Ok(self.load()?.remove(email))
    }

    fn insert(&mut self, email: &str, entry: CredentialEntry) -> Result<(), CredentialStoreError> {
        let mut map = self.load()?;
        insert_into(&mut map, email, entry)?;
        self.save(&map)
    }

    fn set_password_hash(
        &mut self,
        email: &str,
        password_hash: String,
    ) -> Result<(), CredentialStoreError> {
        let mut map = self.load()?;
        set_hash_in(&mut map, email, password_hash)?;
        self.save(&map)
    }

    fn entries(&self) -> Result<CredentialMap, CredentialStoreError> {
        self.load()
    }
}
