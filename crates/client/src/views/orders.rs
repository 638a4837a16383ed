//! Order history view model.

use medishop_core::{Order, OrderLine, UserId};
use serde::Serialize;
use tracing::debug;

use super::{Activation, LoadState, PendingLoad, RequestTracker, View};
use crate::api::{ApiClient, ApiError};
use crate::error::report_network_error;
use crate::filters;
use crate::session::SessionStore;

/// Display data for one line inside an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLineView {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&OrderLine> for OrderLineView {
    fn from(line: &OrderLine) -> Self {
        Self {
            name: line.name.clone(),
            description: line.description.clone(),
            price: line.amount.display(),
            image_url: line.image_url.clone(),
        }
    }
}

/// Display data for one past order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    /// Order date, e.g. `January 1, 2025`.
    pub ordered_on: String,
    /// Delivery date three days later, e.g. `2025-01-04`.
    pub delivered_on: String,
    pub lines: Vec<OrderLineView>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            ordered_on: filters::long_date(order.date.date()),
            delivered_on: filters::iso_date(order.delivered_on()),
            lines: order.products.iter().map(OrderLineView::from).collect(),
        }
    }
}

/// State behind the order history view.
#[derive(Debug, Clone)]
pub struct OrderHistoryViewModel {
    api: ApiClient,
    session: SessionStore,
    user_id: Option<UserId>,
    orders: Vec<Order>,
    state: LoadState,
    tracker: RequestTracker,
}

impl OrderHistoryViewModel {
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self {
            api,
            session,
            user_id: None,
            orders: Vec::new(),
            state: LoadState::default(),
            tracker: RequestTracker::default(),
        }
    }

    /// Run the guard and, if allowed, load the order history.
    ///
    /// Without a stored user ID the fetch is skipped silently.
    pub async fn mount(&mut self) -> Activation {
        let activation = self.session.guard(View::Orders);
        if activation != Activation::Proceed {
            return activation;
        }

        self.tracker.mount();
        self.user_id = self.session.current_user().id();
        if let Some(pending) = self.begin_load() {
            let result = self.api.fetch_order_history(pending.user_id()).await;
            self.complete_load(pending, result);
        }
        activation
    }

    pub const fn unmount(&mut self) {
        self.tracker.unmount();
    }

    /// Start loading the history. `None` when no user ID is stored.
    pub fn begin_load(&mut self) -> Option<PendingLoad> {
        let Some(user_id) = self.user_id else {
            debug!("No stored user ID, skipping order history fetch");
            return None;
        };

        self.state = LoadState::Loading;
        Some(PendingLoad {
            ticket: self.tracker.issue(),
            user_id,
        })
    }

    /// Apply a load started with [`begin_load`](Self::begin_load).
    pub fn complete_load(&mut self, pending: PendingLoad, result: Result<Vec<Order>, ApiError>) {
        if !self.tracker.is_current(pending.ticket) {
            debug!("Discarding stale order history response");
            return;
        }

        match result {
            Ok(orders) => {
                debug!(count = orders.len(), "Order history loaded");
                self.orders = orders;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                report_network_error("load order history", &e);
                self.state = LoadState::Failed;
            }
        }
    }

    /// Orders in backend order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Display data, with delivery dates computed on each call.
    #[must_use]
    pub fn view(&self) -> Vec<OrderView> {
        self.orders.iter().map(OrderView::from).collect()
    }

    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.is_loading() && self.orders.is_empty()
    }

    /// Front ends show this when there is nothing to list.
    #[must_use]
    pub const fn empty_message() -> &'static str {
        "You have no orders yet."
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use medishop_core::{OrderDate, Price};
    use rust_decimal::Decimal;

    use super::*;
    use crate::config::ClientConfig;

    fn order(date: &str, names: &[&str]) -> Order {
        Order {
            date: OrderDate::parse(date).unwrap(),
            products: names
                .iter()
                .map(|name| OrderLine {
                    name: (*name).to_string(),
                    amount: Price::new(Decimal::new(4950, 2)),
                    description: String::new(),
                    image_url: None,
                })
                .collect(),
        }
    }

    fn mounted() -> OrderHistoryViewModel {
        let config = ClientConfig::new("http://127.0.0.1:9/", "/tmp/unused.json").unwrap();
        let mut vm =
            OrderHistoryViewModel::new(ApiClient::new(&config).unwrap(), SessionStore::in_memory());
        vm.tracker.mount();
        vm.user_id = Some(UserId::new(42));
        vm
    }

    #[test]
    fn test_order_view_dates() {
        let view = OrderView::from(&order("2025-01-01", &["Dolo 650"]));
        assert_eq!(view.ordered_on, "January 1, 2025");
        assert_eq!(view.delivered_on, "2025-01-04");
        assert_eq!(view.lines[0].price, "₹49.50");
    }

    #[test]
    fn test_backend_order_is_kept() {
        let mut vm = mounted();
        let pending = vm.begin_load().unwrap();
        vm.complete_load(
            pending,
            Ok(vec![order("2025-03-01", &["b"]), order("2025-01-01", &["a"])]),
        );

        let view = vm.view();
        assert_eq!(view[0].lines[0].name, "b");
        assert_eq!(view[1].lines[0].name, "a");
        assert!(!vm.is_empty());
    }

    #[test]
    fn test_empty_history() {
        let mut vm = mounted();
        let pending = vm.begin_load().unwrap();
        vm.complete_load(pending, Ok(Vec::new()));

        assert!(vm.is_empty());
        assert_eq!(vm.state(), LoadState::Loaded);
    }

    #[test]
    fn test_failed_load() {
        let mut vm = mounted();
        let pending = vm.begin_load().unwrap();
        vm.complete_load(pending, Err(ApiError::UnexpectedBody("oops".to_string())));

        assert_eq!(vm.state(), LoadState::Failed);
        assert!(vm.is_empty());
    }

    #[tokio::test]
    async fn test_mount_redirects_without_session() {
        let config = ClientConfig::new("http://127.0.0.1:9/", "/tmp/unused.json").unwrap();
        let mut vm =
            OrderHistoryViewModel::new(ApiClient::new(&config).unwrap(), SessionStore::in_memory());

        assert_eq!(vm.mount().await, Activation::Redirect(View::Login));
    }
}
