//! Per-product actions offered on catalog cards.

use medishop_core::{MutationOutcome, PlaceOrderOutcome, ProductId, UserId};
use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::error::{add_breadcrumb, report_network_error};
use crate::notice::Notice;
use crate::session::SessionStore;

/// "Add to cart" and "order now" for a single product.
///
/// The user ID is read from the session when the action runs, not when the
/// catalog was mounted.
#[derive(Debug, Clone)]
pub struct ProductActions {
    api: ApiClient,
    session: SessionStore,
}

impl ProductActions {
    #[must_use]
    pub const fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    fn user_id(&self) -> Option<UserId> {
        self.session.current_user().id()
    }

    /// Put one unit of the product in the user's cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: ProductId) -> Notice {
        let Some(user_id) = self.user_id() else {
            return Notice::LOGIN_REQUIRED;
        };

        let product = product_id.to_string();
        add_breadcrumb("cart", "Add to cart", Some(&[("product_id", &product)]));

        match self.api.add_to_cart(user_id, product_id).await {
            Ok(MutationOutcome::Applied) => {
                info!("Added to cart");
                Notice::ADDED_TO_CART
            }
            Ok(MutationOutcome::Rejected(result)) => {
                warn!(result = ?result, "Add to cart rejected");
                Notice::NOT_ADDED_TO_CART
            }
            Err(e) => {
                report_network_error("add to cart", &e);
                Notice::ADD_TO_CART_FAILED
            }
        }
    }

    /// Order the product directly, bypassing the cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn order_now(&self, product_id: ProductId) -> Notice {
        let Some(user_id) = self.user_id() else {
            return Notice::LOGIN_REQUIRED;
        };

        let product = product_id.to_string();
        add_breadcrumb("order", "Order now", Some(&[("product_id", &product)]));

        match self.api.place_order(user_id, product_id).await {
            Ok(PlaceOrderOutcome::Placed) => {
                info!("Order placed");
                Notice::ORDER_PLACED
            }
            Ok(PlaceOrderOutcome::OutOfStock) => Notice::OUT_OF_STOCK,
            Ok(outcome) => {
                warn!(outcome = ?outcome, "Order not placed");
                Notice::SOMETHING_WENT_WRONG
            }
            Err(e) => {
                report_network_error("order now", &e);
                Notice::PLACE_ORDER_FAILED
            }
        }
    }
}
