//! Zhunan CRM admin library.
//!
//! This crate provides the customer registry, the session store and the
//! admin HTTP API as a library, allowing them to be tested and reused.
//!
//! # Components
//!
//! - [`services::customers::CustomerRegistry`] - in-memory customer records
//! - [`services::purifiers::PurifierRegistry`] - purifiers and filter schedules
//! - [`services::inventory::InventoryRegistry`] - the store's filter stock
//! - [`services::auth::SessionStore`] - the single process-wide session
//! - [`db`] - credential map backends
//! - [`routes::app`] - the axum application

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
