//! Catalog commands: `products`, `add-to-cart`, `buy`.

use std::io::Write;

use medishop_client::state::AppState;
use medishop_core::{Category, ProductId};

use super::{CommandError, ensure_proceed};
use crate::render;

/// Show the catalog, optionally searched or filtered.
pub async fn products(
    state: &AppState,
    search: Option<&str>,
    category: Option<Category>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut catalog = state.catalog_view();
    ensure_proceed(catalog.mount().await)?;

    writeln!(out, "[{}] {}", catalog.user_initial(), catalog.greeting())?;

    let notice = match (search, category) {
        (_, Some(category)) => catalog.select_category(category).await,
        (Some(query), None) => catalog.search(query).await,
        (None, None) => None,
    };
    if let Some(notice) = notice {
        writeln!(out, "{notice}")?;
    }

    writeln!(out, "{}", render::category_tabs(catalog.selected_category()))?;

    if catalog.is_empty() {
        writeln!(out, "No products to show. Run `medishop products` to view all products.")?;
    } else {
        writeln!(out, "{}", render::products_table(&catalog.cards()))?;
    }
    Ok(())
}

/// Add one product to the cart.
pub async fn add_to_cart(
    state: &AppState,
    product_id: ProductId,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let notice = state.product_actions().add_to_cart(product_id).await;
    writeln!(out, "{notice}")?;
    Ok(())
}

/// Order one product directly.
pub async fn buy(
    state: &AppState,
    product_id: ProductId,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let notice = state.product_actions().order_now(product_id).await;
    writeln!(out, "{notice}")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use medishop_core::UserId;
    use medishop_integration_tests::{Method, MockBackend, MockResponse, product_json};
    use serde_json::json;

    use super::*;

    fn random_set() -> serde_json::Value {
        json!([
            product_json(1, "Dolo 650", 30.0, 0),
            product_json(2, "Chyawanprash", 250.0, 10),
        ])
    }

    #[tokio::test]
    async fn test_products_lists_random_set() {
        let backend = MockBackend::start().await;
        backend.on(Method::GET, "random", MockResponse::json(&random_set()));
        let state = backend.app_state();
        state.session().login(UserId::new(42), "abc").unwrap();

        let mut out = Vec::new();
        products(&state, None, None, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("[A] Welcome, abc!\n[All Products]"));
        assert!(text.contains("Dolo 650"));
        assert!(text.contains("₹225.00"));
        assert!(text.contains("10% OFF"));
    }

    #[tokio::test]
    async fn test_products_search_without_match() {
        let backend = MockBackend::start().await;
        backend.on(Method::GET, "random", MockResponse::json(&random_set()));
        backend.on(Method::GET, "searchbynamezzz", MockResponse::json(&json!([])));
        let state = backend.app_state();
        state.session().login(UserId::new(42), "abc").unwrap();

        let mut out = Vec::new();
        products(&state, Some("zzz"), None, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("This product is not available, Out of stock!\n"));
        assert!(text.ends_with("No products to show. Run `medishop products` to view all products.\n"));
    }

    #[tokio::test]
    async fn test_products_category_highlights_tab() {
        let backend = MockBackend::start().await;
        backend.on(Method::GET, "random", MockResponse::json(&random_set()));
        backend.on(
            Method::GET,
            "searchbycategoryTonic",
            MockResponse::json(&json!([product_json(5, "Tonic", 80.0, 0)])),
        );
        let state = backend.app_state();
        state.session().login(UserId::new(42), "abc").unwrap();

        let mut out = Vec::new();
        products(&state, None, Some(Category::Tonic), &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("[Tonic]"));
        assert!(!text.contains("[All Products]"));
        assert!(!text.contains("Chyawanprash"));
    }

    #[tokio::test]
    async fn test_products_failed_load_is_not_reported() {
        let backend = MockBackend::start().await;
        let state = backend.app_state();
        state.session().login(UserId::new(42), "abc").unwrap();

        let mut out = Vec::new();
        products(&state, None, None, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(!text.contains("Something went wrong"));
        assert!(text.ends_with("No products to show. Run `medishop products` to view all products.\n"));
    }

    #[tokio::test]
    async fn test_products_requires_login() {
        let backend = MockBackend::start().await;
        let state = backend.app_state();

        let mut out = Vec::new();
        let err = products(&state, None, None, &mut out).await.unwrap_err();

        assert!(matches!(err, CommandError::LoginRequired));
        assert!(out.is_empty());
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_cart_and_buy_print_notices() {
        let backend = MockBackend::start().await;
        backend.on(Method::GET, "addTocart42and7", MockResponse::code(1));
        backend.on(Method::POST, "placeorder42", MockResponse::code(-1));
        let state = backend.app_state();
        state.session().login(UserId::new(42), "abc").unwrap();

        let mut out = Vec::new();
        add_to_cart(&state, ProductId::new(7), &mut out).await.unwrap();
        buy(&state, ProductId::new(7), &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Added to cart successfully\nProduct is out of stock\n"
        );
    }
}
