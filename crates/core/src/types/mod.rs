//! Core types for Zhunan CRM.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod customer;
pub mod email;
pub mod id;
pub mod inventory;
pub mod page;
pub mod purifier;
pub mod user;

pub use customer::{Customer, CustomerUpdate, Gender, NewCustomer};
pub use email::{Email, EmailError};
pub use id::*;
pub use inventory::InventoryItem;
pub use page::{Page, total_pages};
pub use purifier::{
    Consumable, ConsumableKind, ConsumableReplacement, ConsumableStatus, Lifespan, LifespanUnit,
    MaintenanceRecord, NewPurifier, WaterPurifier,
};
pub use user::{CurrentUser, UserRole};
