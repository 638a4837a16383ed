//! Type-safe price representation using decimal arithmetic.
//!
//! Prices keep full decimal precision through every calculation. Rounding
//! to two places happens only when a price is rendered, so cart totals are
//! computed from unrounded per-item values.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::CartLine;

/// Currency symbol used when rendering prices.
pub const CURRENCY_SYMBOL: &str = "₹";

/// A monetary amount in the store's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The unrounded amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price after a percentage discount: `amount - amount * discount / 100`.
    #[must_use]
    pub fn apply_discount(self, discount: Discount) -> Self {
        Self(self.0 - self.0 * Decimal::from(discount.percent()) / Decimal::ONE_HUNDRED)
    }

    /// Amount rounded half away from zero to two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Amount formatted to two decimal places without a currency symbol.
    #[must_use]
    pub fn to_fixed(&self) -> String {
        format!("{:.2}", self.rounded())
    }

    /// Format for display (e.g., "₹19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_SYMBOL}{}", self.to_fixed())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// A whole-number discount percentage in `[0, 100]`.
///
/// Values outside the range are clamped when constructed or deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Discount(u8);

impl Discount {
    /// No discount.
    pub const NONE: Self = Self(0);

    /// Create a discount, clamping to `[0, 100]`.
    #[must_use]
    pub fn new(percent: i64) -> Self {
        Self::from(percent)
    }

    /// The percentage value.
    #[must_use]
    pub const fn percent(&self) -> u8 {
        self.0
    }

    /// Whether the discount changes the price at all.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for Discount {
    fn from(percent: i64) -> Self {
        Self(u8::try_from(percent.clamp(0, 100)).unwrap_or(0))
    }
}

impl From<Discount> for i64 {
    fn from(discount: Discount) -> Self {
        Self::from(discount.0)
    }
}

/// Sum of discounted prices over a set of cart lines.
///
/// Order of the lines does not affect the result.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Price {
    lines.iter().map(|line| line.product.discounted_price()).sum()
}
