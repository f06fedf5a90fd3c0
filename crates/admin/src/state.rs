//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::config::CrmConfig;
use crate::db::{CredentialStore, JsonFileCredentialStore, MemoryCredentialStore};
use crate::seed;
use crate::services::auth::{AuthError, SessionStore};
use crate::services::customers::{CustomerRegistry, RegistryError};
use crate::services::inventory::InventoryRegistry;
use crate::services::purifiers::PurifierRegistry;

/// Startup failures.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("credential setup failed: {0}")]
    Auth(#[from] AuthError),

    #[error("customer seeding failed: {0}")]
    Registry(#[from] RegistryError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Each registry sits behind a
/// read/write lock and the single process-wide session behind a mutex, so
/// each operation runs to completion before the next one touches the data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CrmConfig,
    customers: RwLock<CustomerRegistry>,
    purifiers: RwLock<PurifierRegistry>,
    inventory: RwLock<InventoryRegistry>,
    session: Mutex<SessionStore>,
}

impl AppState {
    /// Create application state from already-built components.
    ///
    /// Purifiers start empty and the inventory starts from the filter catalog.
    #[must_use]
    pub fn new(config: CrmConfig, customers: CustomerRegistry, session: SessionStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                customers: RwLock::new(customers),
                purifiers: RwLock::new(PurifierRegistry::new()),
                inventory: RwLock::new(seed::inventory_catalog()),
                session: Mutex::new(session),
            }),
        }
    }

    /// Build the state a server process starts with: sample customers, and
    /// the credential backend chosen by `config` seeded with default accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential map cannot be read or seeded, or
    /// the sample customers cannot be numbered.
    pub fn from_config(config: CrmConfig) -> Result<Self, StateError> {
        let credentials: Box<dyn CredentialStore> = match &config.credentials_file {
            Some(path) => {
                tracing::info!(path = %path.display(), "Using credential file");
                Box::new(JsonFileCredentialStore::new(path))
            }
            None => {
                tracing::info!("Using in-memory credentials");
                Box::new(MemoryCredentialStore::new())
            }
        };
        let session = SessionStore::with_default_users(credentials)?;
        let customers = seed::sample_registry(config.seed_customers, &mut rand::rng())?;

        tracing::info!(customers = customers.len(), "Application state ready");
        Ok(Self::new(config, customers, session))
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &CrmConfig {
        &self.inner.config
    }

    /// The customer registry lock.
    #[must_use]
    pub fn customers(&self) -> &RwLock<CustomerRegistry> {
        &self.inner.customers
    }

    /// The purifier registry lock. Take it after the customer lock when
    /// holding both.
    #[must_use]
    pub fn purifiers(&self) -> &RwLock<PurifierRegistry> {
        &self.inner.purifiers
    }

    /// The inventory lock.
    #[must_use]
    pub fn inventory(&self) -> &RwLock<InventoryRegistry> {
        &self.inner.inventory
    }

    /// The session store lock.
    #[must_use]
    pub fn session(&self) -> &Mutex<SessionStore> {
        &self.inner.session
    }
}
