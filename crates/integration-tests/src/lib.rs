//! Integration tests for the MediShop storefront client.
//!
//! [`MockBackend`] is an in-process stand-in for the pharmacy backend. It
//! listens on an ephemeral local port, answers with canned responses and
//! records every request it receives, so tests can drive the real HTTP client
//! and view models and then assert on exactly what went over the wire.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p medishop-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = MockBackend::start().await;
//! backend.on(Method::GET, "random", MockResponse::json(&json!([])));
//!
//! let state = backend.app_state();
//! let mut catalog = state.catalog_view();
//! catalog.mount().await;
//!
//! assert_eq!(backend.requests().len(), 1);
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Router;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use medishop_client::config::ClientConfig;
use medishop_client::session::MemoryStorage;
use medishop_client::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use axum::http::{Method, StatusCode};

/// A request received by the mock backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path without the leading slash, still percent-encoded.
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: StatusCode,
    body: String,
}

impl MockResponse {
    /// `200 OK` with a JSON body.
    #[must_use]
    pub fn json(value: &Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: value.to_string(),
        }
    }

    /// `200 OK` with an integer result code.
    #[must_use]
    pub fn code(code: i64) -> Self {
        Self {
            status: StatusCode::OK,
            body: code.to_string(),
        }
    }

    /// An error status with an empty body.
    #[must_use]
    pub const fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    routes: Vec<(Method, String, MockResponse)>,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process mock of the pharmacy backend.
#[derive(Debug)]
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start the mock on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state = Shared::default();
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL, with trailing slash.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Answer `method path` with `response`. Later registrations win.
    pub fn on(&self, method: Method, path: &str, response: MockResponse) {
        lock(&self.state)
            .routes
            .push((method, path.to_string(), response));
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Requests received for one path.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        lock(&self.state)
            .requests
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    /// Client configuration pointing at this mock.
    ///
    /// # Panics
    ///
    /// Panics if the mock URL is rejected, which would be a bug.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.url(), "unused-session.json").expect("Mock URL is valid")
    }

    /// Application state over this mock with an in-memory session.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        AppState::with_storage(self.config(), MemoryStorage::new())
            .expect("Failed to build app state")
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().trim_start_matches('/').to_string();
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(String::from);

    let mut state = lock(&state);
    let response = state
        .routes
        .iter()
        .rev()
        .find(|(m, p, _)| *m == method && *p == path)
        .map(|(_, _, response)| response.clone());

    state.requests.push(RecordedRequest {
        method,
        path,
        content_type,
        body,
    });

    match response {
        Some(response) => (response.status, response.body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A product as the catalog endpoints return it.
#[must_use]
pub fn product_json(id: i64, name: &str, amount: f64, discount: i64) -> Value {
    json!({
        "id": id,
        "imgUrl": format!("https://img.example/{id}.png"),
        "name": name,
        "amount": amount,
        "discount": discount,
        "description": format!("{name} description"),
        "quantity": 10,
    })
}

/// A cart line as the cart endpoint returns it, including its misspelt key.
#[must_use]
pub fn cart_line_json(id: i64, name: &str, amount: f64, discount: i64) -> Value {
    json!({
        "product": {
            "id": id,
            "imgUrl": format!("https://img.example/{id}.png"),
            "name": name,
            "amount": amount,
            "discount": discount,
            "decription": format!("{name} description"),
            "quantity": 10,
        }
    })
}

/// A past order as the history endpoint returns it.
#[must_use]
pub fn order_json(date: &str, items: &[(&str, f64)]) -> Value {
    let products: Vec<Value> = items
        .iter()
        .map(|(name, amount)| {
            json!({
                "name": name,
                "amount": amount,
                "decription": format!("{name} description"),
                "imgUrl": null,
            })
        })
        .collect();
    json!({ "date": date, "products": products })
}
