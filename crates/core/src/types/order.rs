//! Past orders and their derived delivery dates.

use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::Price;

/// Days between an order being placed and its displayed delivery date.
pub const DELIVERY_DAYS: i64 = 3;

/// Errors that can occur when parsing an [`OrderDate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderDateError {
    /// The input string is empty.
    #[error("order date cannot be empty")]
    Empty,
    /// The input matches none of the accepted formats.
    #[error("unrecognized order date: {0}")]
    Unrecognized(String),
}

/// Timestamp at which an order was placed.
///
/// The backend sends dates as strings. Accepted formats:
///
/// - RFC 3339 (`2025-01-01T10:30:00+05:30`), kept at its own wall-clock time
/// - naive ISO date-time (`2025-01-01T10:30:00`, fractional seconds allowed)
/// - bare date (`2025-01-01`), taken as midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderDate(NaiveDateTime);

impl OrderDate {
    /// Create an order date from a naive timestamp.
    #[must_use]
    pub const fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// Parse an order date from any accepted format.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or in no accepted format.
    pub fn parse(s: &str) -> Result<Self, OrderDateError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(OrderDateError::Empty);
        }

        if let Ok(at) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(at.naive_local()));
        }
        if let Ok(at) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self(at));
        }
        if let Ok(at) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
            return Ok(Self(at));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|d| Self(d.and_time(chrono::NaiveTime::MIN)))
            .map_err(|_| OrderDateError::Unrecognized(s.to_string()))
    }

    /// The underlying timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar date of the order.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// Display-only delivery timestamp, three days after the order.
    #[must_use]
    pub fn delivered_on(&self) -> NaiveDateTime {
        self.0 + Duration::days(DELIVERY_DAYS)
    }
}

impl fmt::Display for OrderDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

impl FromStr for OrderDate {
    type Err = OrderDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for OrderDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OrderDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A line item inside a past order.
///
/// Orders carry a subset of product fields only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product name.
    pub name: String,
    /// Price charged.
    pub amount: Price,
    /// Free-text description (`decription` on the wire).
    #[serde(default, alias = "decription")]
    pub description: String,
    /// Product image URL, if any.
    #[serde(default, rename = "imgUrl")]
    pub image_url: Option<String>,
}

/// A past order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// When the order was placed.
    pub date: OrderDate,
    /// Items in the order, in backend order.
    #[serde(default)]
    pub products: Vec<OrderLine>,
}

impl Order {
    /// Display-only delivery timestamp.
    #[must_use]
    pub fn delivered_on(&self) -> NaiveDateTime {
        self.date.delivered_on()
    }
}
