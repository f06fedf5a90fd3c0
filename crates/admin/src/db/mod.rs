//! Storage for the credential map.
//!
//! Customers live only in memory (see [`crate::services::customers`]); the
//! credential map is the one piece of state that can outlive the process.
//!
//! Backends:
//!
//! - `MemoryCredentialStore` - process-lifetime map
//! - `JsonFileCredentialStore` - single JSON file, read and rewritten whole

pub mod credentials;

pub use credentials::{
    CredentialEntry, CredentialMap, CredentialStore, CredentialStoreError,
    JsonFileCredentialStore, MemoryCredentialStore,
};
