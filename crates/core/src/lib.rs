//! MediShop Core - Shared types library.
//!
//! This crate provides the domain types used across the MediShop storefront:
//! - `client` - Session store, backend API client and view models
//! - `cli` - Terminal front end driving the view models
//!
//! # Architecture
//!
//! The core crate contains only types and pure calculations - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, catalog entities, orders and backend
//!   outcome codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
