//! Blocking user-facing notices.
//!
//! Every user action ends in at most one notice naming what happened in
//! plain language. The [`NoticeKind`] records which branch of the error
//! taxonomy produced it, so front ends can style them and tests can assert
//! on them without matching text.

use core::fmt;

use serde::Serialize;

/// Which outcome produced a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The action succeeded.
    Success,
    /// The backend answered with a domain-level failure code.
    BusinessFailure,
    /// A valid but empty result that deserves the user's attention.
    EmptyResult,
    /// The request never produced a usable response.
    NetworkFailure,
    /// The action was refused locally before any request.
    Validation,
}

/// A message shown to the user after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: &'static str,
}

impl Notice {
    const fn new(kind: NoticeKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    // Login
    pub const LOGIN_SERVER_ERROR: Self = Self::new(NoticeKind::BusinessFailure, "Server exception");
    pub const LOGIN_UNKNOWN_USERNAME: Self =
        Self::new(NoticeKind::BusinessFailure, "Wrong username");
    pub const LOGIN_AMBIGUOUS_USERNAME: Self =
        Self::new(NoticeKind::BusinessFailure, "Multiple usernames");
    pub const LOGIN_WRONG_PASSWORD: Self = Self::new(NoticeKind::BusinessFailure, "Wrong password");
    pub const LOGIN_FAILED: Self = Self::new(NoticeKind::BusinessFailure, "Login failed");
    pub const LOGIN_BLANK_CREDENTIALS: Self = Self::new(
        NoticeKind::Validation,
        "Please enter your username and password",
    );

    // Catalog
    pub const SEARCH_NO_MATCH: Self = Self::new(
        NoticeKind::EmptyResult,
        "This product is not available, Out of stock!",
    );
    pub const CATEGORY_EMPTY: Self =
        Self::new(NoticeKind::EmptyResult, "No products in this category.");

    // Product actions
    pub const LOGIN_REQUIRED: Self = Self::new(NoticeKind::Validation, "Please login first");
    pub const ADDED_TO_CART: Self = Self::new(NoticeKind::Success, "Added to cart successfully");
    pub const NOT_ADDED_TO_CART: Self = Self::new(NoticeKind::BusinessFailure, "Not added, sorry!");
    pub const ADD_TO_CART_FAILED: Self =
        Self::new(NoticeKind::NetworkFailure, "Failed to add to cart");
    pub const ORDER_PLACED: Self = Self::new(NoticeKind::Success, "Order placed successfully");
    pub const OUT_OF_STOCK: Self = Self::new(NoticeKind::BusinessFailure, "Product is out of stock");

    // Cart
    pub const ORDERED: Self = Self::new(NoticeKind::Success, "Ordered successfully");
    pub const ITEM_REMOVED: Self = Self::new(NoticeKind::Success, "Item removed from cart");
    pub const REMOVE_FAILED: Self =
        Self::new(NoticeKind::NetworkFailure, "Failed to remove product");

    // Shared
    pub const SOMETHING_WENT_WRONG: Self =
        Self::new(NoticeKind::BusinessFailure, "Something went wrong");
    pub const UNREACHABLE: Self = Self::new(NoticeKind::NetworkFailure, "Something went wrong");
    pub const PLACE_ORDER_FAILED: Self =
        Self::new(NoticeKind::NetworkFailure, "Failed to place order");

    /// Whether the notice reports a successful action.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.kind, NoticeKind::Success)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}
