//! Zhunan CRM Core - Shared types library.
//!
//! This crate provides the types shared by every Zhunan CRM component:
//! - `admin` - Customer registry, session store and the admin HTTP API
//! - `cli` - Command-line tools for credentials and sample data
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage, no HTTP. This keeps it lightweight and usable anywhere.
//!
//! # Modules
//!
//! - [`types`] - IDs, emails, customer records, inventory, purifiers, roles, pages
//! - [`validation`] - Form rules with their zh-TW error messages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::ValidationError;
