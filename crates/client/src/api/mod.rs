//! Client for the pharmacy backend's REST API.
//!
//! # Architecture
//!
//! - One method per backend capability, each issuing exactly one HTTP call
//! - Paths come from the typed [`Endpoint`] templates, never from ad hoc
//!   string concatenation
//! - No caching and no retries: callers decide what a failure means
//!
//! # Example
//!
//! ```rust,ignore
//! use medishop_client::api::ApiClient;
//!
//! let client = ApiClient::new(&config)?;
//!
//! let products = client.fetch_random_products().await?;
//! let outcome = client.add_to_cart(user_id, products[0].id).await?;
//! ```

mod endpoints;

use std::sync::Arc;

use medishop_core::{
    CartLine, LoginOutcome, MutationOutcome, Order, PlaceOrderOutcome, Product, ProductId,
    ResultCode, UserId,
};
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

pub use endpoints::Endpoint;

use crate::config::ClientConfig;

/// Errors that can occur when talking to the backend.
///
/// Every variant means the request never produced a meaningful answer.
/// Well-formed answers that encode a failure are decoded into outcome types
/// instead.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An integer result code was expected but the body held something else.
    #[error("Unexpected response body: {0}")]
    UnexpectedBody(String),

    /// The request URL could not be built.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Request body variants used by the backend.
enum Body<'a> {
    Empty,
    Text(&'a str),
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the backend REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client: builder.build()?,
                base_url: config.api_url.clone(),
            }),
        })
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Issue one request and return the response body as text.
    async fn send(&self, endpoint: Endpoint<'_>, body: Body<'_>) -> Result<String, ApiError> {
        let url = endpoint.url(&self.inner.base_url)?;
        debug!(operation = endpoint.name(), method = %endpoint.method(), %url, "Backend request");

        let mut request = self.inner.client.request(endpoint.method(), url);
        if let Body::Text(text) = body {
            request = request
                .header(CONTENT_TYPE, "text/plain")
                .body(text.to_string());
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                operation = endpoint.name(),
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                body: response_text.chars().take(200).collect(),
            });
        }

        Ok(response_text)
    }

    /// Issue a request whose answer is a JSON list.
    ///
    /// A `null` or empty body is an empty list.
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint<'_>,
    ) -> Result<Vec<T>, ApiError> {
        let text = self.send(endpoint, Body::Empty).await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let items: Option<Vec<T>> = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                operation = endpoint.name(),
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })?;

        let items = items.unwrap_or_default();
        debug!(operation = endpoint.name(), count = items.len(), "Backend list received");
        Ok(items)
    }

    /// Issue a request whose answer is a result code.
    async fn fetch_result(
        &self,
        endpoint: Endpoint<'_>,
        body: Body<'_>,
    ) -> Result<ResultCode, ApiError> {
        let text = self.send(endpoint, body).await?;
        let result = decode_result(&text)?;
        debug!(operation = endpoint.name(), result = ?result, "Backend result code");
        Ok(result)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Check credentials.
    ///
    /// The password is sent as the raw `text/plain` body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer is not an integer.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginOutcome, ApiError> {
        let text = self
            .send(
                Endpoint::Login { username },
                Body::Text(password.expose_secret()),
            )
            .await?;
        // A user ID is only ever an integer
        let code = decode_result(&text)?
            .integer()
            .ok_or_else(|| ApiError::UnexpectedBody(text.chars().take(200).collect()))?;
        debug!(code, "Login result code");
        Ok(LoginOutcome::from_code(code))
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Products shown on the default catalog view.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer cannot be parsed.
    #[instrument(skip(self))]
    pub async fn fetch_random_products(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch_list(Endpoint::RandomProducts).await
    }

    /// Products whose name matches `query`. An empty list is a valid answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer cannot be parsed.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        self.fetch_list(Endpoint::SearchByName { query }).await
    }

    /// Products in `category`. An empty list is a valid answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer cannot be parsed.
    #[instrument(skip(self))]
    pub async fn filter_by_category(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        self.fetch_list(Endpoint::SearchByCategory { category }).await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Lines in the user's cart, as stored by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer cannot be parsed.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn fetch_cart(&self, user_id: UserId) -> Result<Vec<CartLine>, ApiError> {
        self.fetch_list(Endpoint::Cart { user_id }).await
    }

    /// Add a product to the user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer is not JSON.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<MutationOutcome, ApiError> {
        let result = self
            .fetch_result(
                Endpoint::AddToCart {
                    user_id,
                    product_id,
                },
                Body::Empty,
            )
            .await?;
        Ok(MutationOutcome::from_result(result))
    }

    /// Remove a product from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer is not JSON.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn remove_from_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<MutationOutcome, ApiError> {
        let result = self
            .fetch_result(
                Endpoint::RemoveFromCart {
                    user_id,
                    product_id,
                },
                Body::Empty,
            )
            .await?;
        Ok(MutationOutcome::from_result(result))
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order for one product.
    ///
    /// The product ID is sent as the raw `text/plain` body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer is not JSON.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn place_order(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<PlaceOrderOutcome, ApiError> {
        let body = product_id.to_string();
        let result = self
            .fetch_result(Endpoint::PlaceOrder { user_id }, Body::Text(&body))
            .await?;
        Ok(PlaceOrderOutcome::from_result(result))
    }

    /// The user's past orders, in backend order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer cannot be parsed.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn fetch_order_history(&self, user_id: UserId) -> Result<Vec<Order>, ApiError> {
        self.fetch_list(Endpoint::OrderHistory { user_id }).await
    }
}

/// Classify a result-code body.
///
/// Only a JSON integer carries a code. Empty bodies, `null`, `false` and `""`
/// are falsy; any other JSON value is kept as [`ResultCode::Other`].
fn decode_result(text: &str) -> Result<ResultCode, ApiError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(ResultCode::Falsy);
    }

    let value: serde_json::Value = serde_json::from_str(text)?;
    let result = match &value {
        serde_json::Value::Number(n) => n.as_i64().map_or(ResultCode::Other, ResultCode::Integer),
        serde_json::Value::Null | serde_json::Value::Bool(false) => ResultCode::Falsy,
        serde_json::Value::String(s) if s.is_empty() => ResultCode::Falsy,
        _ => ResultCode::Other,
    };
    Ok(result)
}
