//! Cart and order history against the mock backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use medishop_client::notice::Notice;
use medishop_client::session::{KeyValueStorage, LOGGED_IN_SENTINEL, MemoryStorage, keys};
use medishop_client::state::AppState;
use medishop_client::views::{Activation, LoadState};
use medishop_core::{CartLine, ProductId, UserId, cart_total};
use medishop_integration_tests::{
    Method, MockBackend, MockResponse, StatusCode, cart_line_json, order_json,
};
use rust_decimal::Decimal;
use serde_json::json;

fn logged_in(backend: &MockBackend) -> AppState {
    let state = backend.app_state();
    state.session().login(UserId::new(42), "abc").unwrap();
    state
}

fn two_line_cart() -> serde_json::Value {
    json!([
        cart_line_json(7, "Dolo 650", 100.0, 10),
        cart_line_json(8, "Chyawanprash", 50.0, 0),
    ])
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_cart_loads_and_totals() {
    let backend = MockBackend::start().await;
    backend.on(Method::GET, "checkproduct42", MockResponse::json(&two_line_cart()));
    let state = logged_in(&backend);

    let mut cart = state.cart_view();
    assert_eq!(cart.mount().await, Activation::Proceed);

    assert_eq!(cart.state(), LoadState::Loaded);
    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.lines()[0].product.description, "Dolo 650 description");
    assert_eq!(cart.total().amount(), Decimal::new(140, 0));
    assert_eq!(cart.view().total, "₹140.00");
}

#[tokio::test]
async fn test_remove_success_drops_line_and_recomputes_total() {
    let backend = MockBackend::start().await;
    backend.on(Method::GET, "checkproduct42", MockResponse::json(&two_line_cart()));
    backend.on(Method::DELETE, "remove42and7", MockResponse::code(1));
    let state = logged_in(&backend);

    let mut cart = state.cart_view();
    cart.mount().await;

    assert_eq!(cart.remove(ProductId::new(7)).await, Notice::ITEM_REMOVED);
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].product.id, ProductId::new(8));
    assert_eq!(cart.view().total, "₹50.00");

    // Removal does not trigger a refetch
    assert_eq!(backend.requests_to("checkproduct42").len(), 1);
}

#[tokio::test]
async fn test_remove_failure_leaves_cart_unchanged() {
    let backend = MockBackend::start().await;
    backend.on(Method::GET, "checkproduct42", MockResponse::json(&two_line_cart()));
    backend.on(Method::DELETE, "remove42and7", MockResponse::code(0));
    let state = logged_in(&backend);

    let mut cart = state.cart_view();
    cart.mount().await;

    assert_eq!(
        cart.remove(ProductId::new(7)).await,
        Notice::SOMETHING_WENT_WRONG
    );
    assert_eq!(cart.lines().len(), 2);

    // No route: network failure
    assert_eq!(cart.remove(ProductId::new(8)).await, Notice::REMOVE_FAILED);
    assert_eq!(cart.lines().len(), 2);
}

#[tokio::test]
async fn test_remove_needs_integer_one() {
    let bodies = [json!(true), json!("1"), json!(1.0)];

    for body in bodies {
        let backend = MockBackend::start().await;
        backend.on(Method::GET, "checkproduct42", MockResponse::json(&two_line_cart()));
        backend.on(Method::DELETE, "remove42and7", MockResponse::json(&body));
        let state = logged_in(&backend);

        let mut cart = state.cart_view();
        cart.mount().await;

        assert_eq!(
            cart.remove(ProductId::new(7)).await,
            Notice::SOMETHING_WENT_WRONG,
            "body {body}"
        );
        assert_eq!(cart.lines().len(), 2, "body {body}");
    }
}

#[tokio::test]
async fn test_place_order_refetches_on_success() {
    let backend = MockBackend::start().await;
    backend.on(Method::GET, "checkproduct42", MockResponse::json(&two_line_cart()));
    backend.on(Method::POST, "placeorder42", MockResponse::code(1));
    let state = logged_in(&backend);

    let mut cart = state.cart_view();
    cart.mount().await;

    // The ordered line is gone on the next fetch
    backend.on(
        Method::GET,
        "checkproduct42",
        MockResponse::json(&json!([cart_line_json(8, "Chyawanprash", 50.0, 0)])),
    );

    assert_eq!(cart.place_order(ProductId::new(7)).await, Notice::ORDERED);
    assert_eq!(backend.requests_to("checkproduct42").len(), 2);
    assert_eq!(cart.lines().len(), 1);

    let order = &backend.requests_to("placeorder42")[0];
    assert_eq!(order.body, "7");
    assert_eq!(order.content_type.as_deref(), Some("text/plain"));
}

#[tokio::test]
async fn test_place_order_any_nonzero_answer_counts_as_success() {
    let backend = MockBackend::start().await;
    backend.on(Method::GET, "checkproduct42", MockResponse::json(&two_line_cart()));
    backend.on(Method::POST, "placeorder42", MockResponse::code(-1));
    let state = logged_in(&backend);

    let mut cart = state.cart_view();
    cart.mount().await;

    assert_eq!(cart.place_order(ProductId::new(7)).await, Notice::ORDERED);
    assert_eq!(backend.requests_to("checkproduct42").len(), 2);
}

#[tokio::test]
async fn test_place_order_declined_keeps_cart() {
    let backend = MockBackend::start().await;
    backend.on(Method::GET, "checkproduct42", MockResponse::json(&two_line_cart()));
    backend.on(Method::POST, "placeorder42", MockResponse::code(0));
    let state = logged_in(&backend);

    let mut cart = state.cart_view();
    cart.mount().await;

    assert_eq!(
        cart.place_order(ProductId::new(7)).await,
        Notice::SOMETHING_WENT_WRONG
    );
    assert_eq!(cart.lines().len(), 2);
    assert_eq!(backend.requests_to("checkproduct42").len(), 1);
}

#[tokio::test]
async fn test_place_order_falsy_answers_are_declined() {
    let answers = [
        MockResponse::json(&json!(null)),
        MockResponse::json(&json!(false)),
        MockResponse::json(&json!("")),
        MockResponse::status(StatusCode::OK),
    ];

    for answer in answers {
        let backend = MockBackend::start().await;
        backend.on(Method::GET, "checkproduct42", MockResponse::json(&two_line_cart()));
        backend.on(Method::POST, "placeorder42", answer);
        let state = logged_in(&backend);

        let mut cart = state.cart_view();
        cart.mount().await;

        let notice = cart.place_order(ProductId::new(7)).await;
        assert_eq!(notice, Notice::SOMETHING_WENT_WRONG);
        assert!(!notice.is_success());
        assert_eq!(backend.requests_to("checkproduct42").len(), 1);
    }
}

#[tokio::test]
async fn test_place_order_unreachable_backend() {
    let backend = MockBackend::start().await;
    backend.on(Method::GET, "checkproduct42", MockResponse::json(&two_line_cart()));
    backend.on(
        Method::POST,
        "placeorder42",
        MockResponse::status(StatusCode::INTERNAL_SERVER_ERROR),
    );
    let state = logged_in(&backend);

    let mut cart = state.cart_view();
    cart.mount().await;

    assert_eq!(
        cart.place_order(ProductId::new(7)).await,
        Notice::PLACE_ORDER_FAILED
    );
    assert_eq!(cart.lines().len(), 2);
}

#[tokio::test]
async fn test_cart_fetch_failure_is_quiet() {
    let backend = MockBackend::start().await;
    let state = logged_in(&backend);

    let mut cart = state.cart_view();
    assert_eq!(cart.mount().await, Activation::Proceed);
    assert_eq!(cart.state(), LoadState::Failed);
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_total_ignores_line_order() {
    let backend = MockBackend::start().await;
    let body = json!([
        cart_line_json(1, "A", 19.99, 15),
        cart_line_json(2, "B", 7.5, 0),
        cart_line_json(3, "C", 123.45, 33),
        cart_line_json(1, "A", 19.99, 15),
    ]);
    backend.on(Method::GET, "checkproduct42", MockResponse::json(&body));
    let state = logged_in(&backend);

    let mut cart = state.cart_view();
    cart.mount().await;

    let mut reversed: Vec<CartLine> = cart.lines().to_vec();
    reversed.reverse();
    assert_eq!(cart_total(&reversed), cart.total());

    let expected: Decimal = cart
        .lines()
        .iter()
        .map(|line| line.product.discounted_price().amount())
        .sum();
    assert_eq!(cart.total().amount(), expected);
}

#[tokio::test]
async fn test_cart_unmount_discards_late_response() {
    let backend = MockBackend::start().await;
    backend.on(Method::GET, "checkproduct42", MockResponse::json(&two_line_cart()));
    let state = logged_in(&backend);

    let mut cart = state.cart_view();
    cart.mount().await;
    assert_eq!(cart.lines().len(), 2);

    let pending = cart.begin_load().unwrap();
    backend.on(Method::GET, "checkproduct42", MockResponse::json(&json!([])));
    let result = state.api().fetch_cart(pending.user_id()).await;
    cart.unmount();
    cart.complete_load(pending, result);

    assert_eq!(cart.lines().len(), 2);
}

// ============================================================================
// Order history
// ============================================================================

#[tokio::test]
async fn test_order_history_delivery_dates() {
    let backend = MockBackend::start().await;
    let body = json!([
        order_json("2025-01-01", &[("Dolo 650", 30.0), ("Chyawanprash", 250.0)]),
        order_json("2024-12-30T18:45:00", &[("Tonic", 99.5)]),
    ]);
    backend.on(Method::GET, "checkOrderHistory42", MockResponse::json(&body));
    let state = logged_in(&backend);

    let mut history = state.order_history_view();
    assert_eq!(history.mount().await, Activation::Proceed);

    let view = history.view();
    assert_eq!(view.len(), 2);
    assert_eq!(view[0].ordered_on, "January 1, 2025");
    assert_eq!(view[0].delivered_on, "2025-01-04");
    assert_eq!(view[0].lines.len(), 2);
    assert_eq!(view[1].delivered_on, "2025-01-02");
    assert_eq!(view[1].lines[0].price, "₹99.50");
}

#[tokio::test]
async fn test_empty_order_history() {
    let backend = MockBackend::start().await;
    backend.on(Method::GET, "checkOrderHistory42", MockResponse::json(&json!([])));
    let state = logged_in(&backend);

    let mut history = state.order_history_view();
    history.mount().await;
    assert_eq!(history.state(), LoadState::Loaded);
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_order_history_null_body_is_empty() {
    let backend = MockBackend::start().await;
    backend.on(Method::GET, "checkOrderHistory42", MockResponse::json(&json!(null)));
    let state = logged_in(&backend);

    let mut history = state.order_history_view();
    history.mount().await;
    assert_eq!(history.state(), LoadState::Loaded);
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_order_history_skips_fetch_without_user_id() {
    let backend = MockBackend::start().await;

    // Logged in, but the stored user ID is not a backend ID
    let storage = MemoryStorage::new();
    storage.set(keys::LOGIN_FLAG, LOGGED_IN_SENTINEL).unwrap();
    storage.set(keys::USER_ID, "guest").unwrap();
    storage.set(keys::USERNAME, "abc").unwrap();
    let state = AppState::with_storage(backend.config(), storage).unwrap();

    let mut history = state.order_history_view();
    assert_eq!(history.mount().await, Activation::Proceed);
    assert_eq!(history.state(), LoadState::Idle);
    assert!(backend.requests().is_empty());
}
