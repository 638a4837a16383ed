//! MediShop storefront client library.
//!
//! This crate holds everything between the terminal front end and the
//! remote pharmacy backend:
//!
//! - [`session`] - durable login state (flag, user ID, username)
//! - [`api`] - one typed call per backend capability
//! - [`views`] - view models for the login, catalog, cart and order screens
//! - [`state`] - the application context handed to every view
//!
//! The backend owns every product, cart and order record. The client keeps
//! only the session on disk; everything else lives in view-model memory for
//! the duration of one view activation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod notice;
pub mod session;
pub mod state;
pub mod views;
