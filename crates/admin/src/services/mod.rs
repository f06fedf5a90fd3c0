//! Business logic services for the admin app.
//!
//! # Services
//!
//! - `auth` - Session store and password hashing
//! - `customers` - In-memory customer registry
//! - `inventory` - Consumable stock counts
//! - `purifiers` - Installed water purifiers and filter replacement schedule

pub mod auth;
pub mod customers;
pub mod inventory;
pub mod purifiers;

pub use auth::{AuthError, AuthOutcome, LoginSuccess, SessionStore};
pub use customers::{CustomerRegistry, RegistryError};
pub use inventory::{InventoryError, InventoryRegistry};
pub use purifiers::{PurifierError, PurifierRegistry, ReplacementDue};
