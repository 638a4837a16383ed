//! Core types for MediShop.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod catalog;
pub mod id;
pub mod order;
pub mod outcome;
pub mod price;

pub use catalog::{CartLine, Category, CategoryError, Product};
pub use id::*;
pub use order::{Order, OrderDate, OrderDateError, OrderLine};
pub use outcome::{LoginOutcome, MutationOutcome, PlaceOrderOutcome, ResultCode};
pub use price::{Discount, Price, cart_total};
