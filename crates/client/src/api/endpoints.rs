//! Typed request paths for the backend.
//!
//! Each backend capability has a fixed path template: a literal prefix with
//! its parameters appended directly (for example `remove{user}and{product}`).
//! Parameters are always percent-encoded, so a search query containing `/`
//! or `?` cannot escape its path segment.

use medishop_core::{ProductId, UserId};
use reqwest::Method;
use url::Url;

/// One backend operation and its path parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `POST login{username}`
    Login { username: &'a str },
    /// `GET random`
    RandomProducts,
    /// `GET searchbyname{query}`
    SearchByName { query: &'a str },
    /// `GET searchbycategory{category}`
    SearchByCategory { category: &'a str },
    /// `GET checkproduct{user_id}`
    Cart { user_id: UserId },
    /// `GET addTocart{user_id}and{product_id}`
    AddToCart {
        user_id: UserId,
        product_id: ProductId,
    },
    /// `DELETE remove{user_id}and{product_id}`
    RemoveFromCart {
        user_id: UserId,
        product_id: ProductId,
    },
    /// `POST placeorder{user_id}`
    PlaceOrder { user_id: UserId },
    /// `GET checkOrderHistory{user_id}`
    OrderHistory { user_id: UserId },
}

impl Endpoint<'_> {
    /// HTTP method for the operation.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::Login { .. } | Self::PlaceOrder { .. } => Method::POST,
            Self::RemoveFromCart { .. } => Method::DELETE,
            Self::RandomProducts
            | Self::SearchByName { .. }
            | Self::SearchByCategory { .. }
            | Self::Cart { .. }
            | Self::AddToCart { .. }
            | Self::OrderHistory { .. } => Method::GET,
        }
    }

    /// Short operation name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::RandomProducts => "random_products",
            Self::SearchByName { .. } => "search_by_name",
            Self::SearchByCategory { .. } => "search_by_category",
            Self::Cart { .. } => "cart",
            Self::AddToCart { .. } => "add_to_cart",
            Self::RemoveFromCart { .. } => "remove_from_cart",
            Self::PlaceOrder { .. } => "place_order",
            Self::OrderHistory { .. } => "order_history",
        }
    }

    /// Path relative to the backend base URL, with parameters encoded.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login { username } => format!("login{}", encode(username)),
            Self::RandomProducts => "random".to_string(),
            Self::SearchByName { query } => format!("searchbyname{}", encode(query)),
            Self::SearchByCategory { category } => {
                format!("searchbycategory{}", encode(category))
            }
            Self::Cart { user_id } => format!("checkproduct{user_id}"),
            Self::AddToCart {
                user_id,
                product_id,
            } => format!("addTocart{user_id}and{product_id}"),
            Self::RemoveFromCart {
                user_id,
                product_id,
            } => format!("remove{user_id}and{product_id}"),
            Self::PlaceOrder { user_id } => format!("placeorder{user_id}"),
            Self::OrderHistory { user_id } => format!("checkOrderHistory{user_id}"),
        }
    }

    /// Absolute URL under `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn url(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(&self.path())
    }
}

fn encode(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
