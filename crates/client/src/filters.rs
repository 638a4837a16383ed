//! Display helpers shared by the view models and front ends.

use chrono::{NaiveDate, NaiveDateTime};
use medishop_core::Discount;

/// First character of `name`, uppercased. Empty when `name` is empty.
///
/// Usage: avatar badge in the navigation bar.
#[must_use]
pub fn initial(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Long-form date, e.g. `January 1, 2025`.
#[must_use]
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// ISO calendar date, e.g. `2025-01-04`.
#[must_use]
pub fn iso_date(at: NaiveDateTime) -> String {
    at.date().format("%Y-%m-%d").to_string()
}

/// Badge text for a discount, e.g. `10% OFF`. `None` when there is no discount.
#[must_use]
pub fn discount_badge(discount: Discount) -> Option<String> {
    if discount.is_none() {
        None
    } else {
        Some(format!("{}% OFF", discount.percent()))
    }
}

/// Greeting shown above the catalog.
#[must_use]
pub fn greeting(username: &str) -> String {
    if username.is_empty() {
        "Welcome!".to_string()
    } else {
        format!("Welcome, {username}!")
    }
}
