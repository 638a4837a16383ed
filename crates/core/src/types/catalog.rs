//! Catalog entities: products, cart lines and category tabs.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Discount, Price, ProductId};

/// A product as returned by the backend.
///
/// The client only ever holds read-only snapshots; the backend owns the
/// record. Cart payloads spell `description` as `decription`, so both keys
/// are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default, alias = "decription")]
    pub description: String,
    /// List price before discount.
    pub amount: Price,
    /// Discount percentage in `[0, 100]`.
    #[serde(default)]
    pub discount: Discount,
    /// Product image URL, if any.
    #[serde(default, rename = "imgUrl")]
    pub image_url: Option<String>,
    /// Units in stock.
    #[serde(default)]
    pub quantity: u32,
}

impl Product {
    /// Unrounded price after discount.
    #[must_use]
    pub fn discounted_price(&self) -> Price {
        self.amount.apply_discount(self.discount)
    }

    /// Whether a discount badge should be shown.
    #[must_use]
    pub const fn has_discount(&self) -> bool {
        !self.discount.is_none()
    }
}

/// One line of a user's cart.
///
/// The backend may return several lines for the same product; the client
/// keeps them as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product in the cart.
    pub product: Product,
}

/// Error returned when parsing an unknown [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// Product category tabs offered by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Tablets,
    Patanjali,
    Tonic,
    Cardiac,
    Vitamins,
}

impl Category {
    /// Every category tab, in display order.
    pub const ALL: [Self; 5] = [
        Self::Tablets,
        Self::Patanjali,
        Self::Tonic,
        Self::Cardiac,
        Self::Vitamins,
    ];

    /// The value the backend expects in the category search path.
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Tablets => "Tablet",
            // Backend spelling
            Self::Patanjali => "Patnjali",
            Self::Tonic => "Tonic",
            Self::Cardiac => "Cardiac",
            Self::Vitamins => "Vitamins",
        }
    }

    /// Tab label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Tablets => "Tablets",
            Self::Patanjali => "Patanjali",
            Self::Tonic => "Tonic",
            Self::Cardiac => "Cardiac",
            Self::Vitamins => "Vitamins",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| {
                c.label().eq_ignore_ascii_case(wanted) || c.backend_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| CategoryError(s.to_string()))
    }
}
