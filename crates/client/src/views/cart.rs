//! Cart view model.

use medishop_core::{CartLine, MutationOutcome, PlaceOrderOutcome, Price, ProductId, UserId, cart_total};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::{Activation, LoadState, PendingLoad, RequestTracker, View};
use crate::api::{ApiClient, ApiError};
use crate::error::{add_breadcrumb, report_network_error};
use crate::filters;
use crate::notice::Notice;
use crate::session::SessionStore;

/// Display data for one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub price: String,
    pub list_price: Option<String>,
    pub discount_badge: Option<String>,
    pub image_url: Option<String>,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        let product = &line.product;
        Self {
            product_id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.discounted_price().display(),
            list_price: product.has_discount().then(|| product.amount.display()),
            discount_badge: filters::discount_badge(product.discount),
            image_url: product.image_url.clone(),
        }
    }
}

/// Display data for the whole cart, built fresh on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Sum of discounted prices, e.g. `₹190.00`.
    pub total: String,
    pub item_count: usize,
}

/// State behind the cart view.
#[derive(Debug, Clone)]
pub struct CartViewModel {
    api: ApiClient,
    session: SessionStore,
    user_id: Option<UserId>,
    lines: Vec<CartLine>,
    state: LoadState,
    tracker: RequestTracker,
}

impl CartViewModel {
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self {
            api,
            session,
            user_id: None,
            lines: Vec::new(),
            state: LoadState::default(),
            tracker: RequestTracker::default(),
        }
    }

    /// Run the guard and, if allowed, load the cart.
    pub async fn mount(&mut self) -> Activation {
        let activation = self.session.guard(View::Cart);
        if activation != Activation::Proceed {
            return activation;
        }

        self.tracker.mount();
        self.user_id = self.session.current_user().id();
        self.reload().await;
        activation
    }

    /// Deactivate the view. Responses still in flight are discarded.
    pub const fn unmount(&mut self) {
        self.tracker.unmount();
    }

    /// Start loading the cart. `None` when no user ID is stored.
    pub fn begin_load(&mut self) -> Option<PendingLoad> {
        let Some(user_id) = self.user_id else {
            debug!("No stored user ID, skipping cart fetch");
            return None;
        };

        self.state = LoadState::Loading;
        Some(PendingLoad {
            ticket: self.tracker.issue(),
            user_id,
        })
    }

    /// Apply a cart load started with [`begin_load`](Self::begin_load).
    ///
    /// Failures are logged and reported; the held lines stay as they were.
    pub fn complete_load(&mut self, pending: PendingLoad, result: Result<Vec<CartLine>, ApiError>) {
        if !self.tracker.is_current(pending.ticket) {
            debug!("Discarding stale cart response");
            return;
        }

        match result {
            Ok(lines) => {
                debug!(count = lines.len(), "Cart loaded");
                self.lines = lines;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                report_network_error("load cart", &e);
                self.state = LoadState::Failed;
            }
        }
    }

    /// Fetch the cart again.
    pub async fn reload(&mut self) {
        if let Some(pending) = self.begin_load() {
            let result = self.api.fetch_cart(pending.user_id()).await;
            self.complete_load(pending, result);
        }
    }

    /// Order a product from the cart.
    ///
    /// Any answer other than an explicit decline counts as success and the
    /// cart is fetched again. Nothing is removed locally.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn place_order(&mut self, product_id: ProductId) -> Notice {
        let Some(user_id) = self.user_id else {
            return Notice::LOGIN_REQUIRED;
        };

        let product = product_id.to_string();
        add_breadcrumb("order", "Order from cart", Some(&[("product_id", &product)]));

        match self.api.place_order(user_id, product_id).await {
            Ok(PlaceOrderOutcome::Declined) => {
                warn!("Order declined");
                Notice::SOMETHING_WENT_WRONG
            }
            Ok(outcome) => {
                info!(outcome = ?outcome, "Order placed from cart");
                self.reload().await;
                Notice::ORDERED
            }
            Err(e) => {
                report_network_error("place order", &e);
                Notice::PLACE_ORDER_FAILED
            }
        }
    }

    /// Remove every line for a product.
    ///
    /// The local lines change only when the backend confirms the removal.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(&mut self, product_id: ProductId) -> Notice {
        let Some(user_id) = self.user_id else {
            return Notice::LOGIN_REQUIRED;
        };

        let product = product_id.to_string();
        add_breadcrumb("cart", "Remove from cart", Some(&[("product_id", &product)]));

        match self.api.remove_from_cart(user_id, product_id).await {
            Ok(MutationOutcome::Applied) => {
                if self.tracker.is_mounted() {
                    self.lines.retain(|line| line.product.id != product_id);
                }
                info!("Removed from cart");
                Notice::ITEM_REMOVED
            }
            Ok(MutationOutcome::Rejected(result)) => {
                warn!(result = ?result, "Remove from cart rejected");
                Notice::SOMETHING_WENT_WRONG
            }
            Err(e) => {
                report_network_error("remove from cart", &e);
                Notice::REMOVE_FAILED
            }
        }
    }

    // =========================================================================
    // Display
    // =========================================================================

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of discounted prices over the held lines.
    #[must_use]
    pub fn total(&self) -> Price {
        cart_total(&self.lines)
    }

    #[must_use]
    pub fn view(&self) -> CartView {
        CartView {
            items: self.lines.iter().map(CartItemView::from).collect(),
            total: self.total().display(),
            item_count: self.lines.len(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Nothing in the cart; front ends offer a way back to the catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.is_loading() && self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use medishop_core::{Discount, Product};
    use rust_decimal::Decimal;

    use super::*;
    use crate::config::ClientConfig;

    fn line(id: i64, amount: i64, discount: i64) -> CartLine {
        CartLine {
            product: Product {
                id: ProductId::new(id),
                name: format!("Product {id}"),
                description: String::new(),
                amount: Price::new(Decimal::new(amount, 0)),
                discount: Discount::new(discount),
                image_url: None,
                quantity: 1,
            },
        }
    }

    fn mounted(user_id: i64) -> CartViewModel {
        let config = ClientConfig::new("http://127.0.0.1:9/", "/tmp/unused.json").unwrap();
        let mut vm = CartViewModel::new(ApiClient::new(&config).unwrap(), SessionStore::in_memory());
        vm.tracker.mount();
        vm.user_id = Some(UserId::new(user_id));
        vm
    }

    #[test]
    fn test_total_and_view() {
        let mut vm = mounted(42);
        let pending = vm.begin_load().unwrap();
        assert_eq!(pending.user_id(), UserId::new(42));
        vm.complete_load(pending, Ok(vec![line(1, 100, 10), line(2, 100, 0)]));

        assert_eq!(vm.total().amount(), Decimal::new(190, 0));
        let view = vm.view();
        assert_eq!(view.total, "₹190.00");
        assert_eq!(view.item_count, 2);
        assert_eq!(view.items[0].price, "₹90.00");
        assert_eq!(view.items[1].list_price, None);
    }

    #[test]
    fn test_duplicate_lines_are_kept() {
        let mut vm = mounted(42);
        let pending = vm.begin_load().unwrap();
        vm.complete_load(pending, Ok(vec![line(1, 50, 0), line(1, 50, 0)]));

        assert_eq!(vm.lines().len(), 2);
        assert_eq!(vm.total().amount(), Decimal::new(100, 0));
    }

    #[test]
    fn test_no_user_skips_load() {
        let config = ClientConfig::new("http://127.0.0.1:9/", "/tmp/unused.json").unwrap();
        let mut vm = CartViewModel::new(ApiClient::new(&config).unwrap(), SessionStore::in_memory());
        vm.tracker.mount();

        assert!(vm.begin_load().is_none());
        assert_eq!(vm.state(), LoadState::Idle);
        assert!(vm.is_empty());
    }

    #[test]
    fn test_failed_load_keeps_lines() {
        let mut vm = mounted(42);
        let pending = vm.begin_load().unwrap();
        vm.complete_load(pending, Ok(vec![line(1, 100, 0)]));

        let pending = vm.begin_load().unwrap();
        vm.complete_load(pending, Err(ApiError::UnexpectedBody("oops".to_string())));

        assert_eq!(vm.state(), LoadState::Failed);
        assert_eq!(vm.lines().len(), 1);
    }

    #[test]
    fn test_load_after_unmount_is_discarded() {
        let mut vm = mounted(42);
        let pending = vm.begin_load().unwrap();
        vm.unmount();
        vm.complete_load(pending, Ok(vec![line(1, 100, 0)]));

        assert!(vm.lines().is_empty());
    }

    #[tokio::test]
    async fn test_mount_redirects_without_session() {
        let config = ClientConfig::new("http://127.0.0.1:9/", "/tmp/unused.json").unwrap();
        let mut vm = CartViewModel::new(ApiClient::new(&config).unwrap(), SessionStore::in_memory());

        assert_eq!(vm.mount().await, Activation::Redirect(View::Login));
        assert_eq!(vm.state(), LoadState::Idle);
    }
}
