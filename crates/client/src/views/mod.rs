//! View models for the storefront screens.
//!
//! A view model holds the non-visual state of one screen and the operations
//! behind its buttons. Rendering layers read plain display structs from it
//! and print or draw them however they like.
//!
//! # Activation
//!
//! Every view runs the session guard exactly once when activated, before it
//! issues any request. Protected views bounce logged-out users to
//! [`View::Login`]; the login view bounces logged-in users to
//! [`View::Products`].
//!
//! # Stale responses
//!
//! Requests are tracked with [`RequestTicket`]s. Issuing a new load, or
//! unmounting the view, invalidates every earlier ticket, so a slow response
//! can never overwrite a newer one or touch an inactive view.

pub mod cart;
pub mod catalog;
pub mod login;
pub mod orders;
pub mod product;

pub use cart::{CartItemView, CartView, CartViewModel};
pub use catalog::{CatalogRequest, CatalogViewModel, Listing, PendingFetch, ProductCardView};
pub use login::{LoginSubmission, LoginViewModel};
pub use orders::{OrderHistoryViewModel, OrderLineView, OrderView};
pub use product::ProductActions;

use medishop_core::UserId;
use serde::Serialize;

/// The storefront's screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Unauthenticated entry view.
    Login,
    /// Product catalog, the default protected view.
    Products,
    /// The user's cart.
    Cart,
    /// The user's past orders.
    Orders,
}

impl View {
    /// Whether the view needs a logged-in user.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

/// Result of activating a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Activation {
    /// The view may render and load its data.
    Proceed,
    /// Navigate elsewhere instead; nothing was loaded.
    Redirect(View),
}

/// Loading state of a view's result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request succeeded.
    Loaded,
    /// The last request failed; the previous result set is still shown.
    Failed,
}

impl LoadState {
    /// Whether the loading indicator should be shown.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Proof that a request was issued at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    generation: u64,
}

/// Generation counter deciding which responses a view may still apply.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    generation: u64,
    mounted: bool,
}

impl RequestTracker {
    /// Mark the view active.
    pub const fn mount(&mut self) {
        self.mounted = true;
    }

    /// Mark the view inactive and invalidate every outstanding ticket.
    pub const fn unmount(&mut self) {
        self.mounted = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Whether the view is active.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Issue a ticket, superseding every earlier one.
    pub const fn issue(&mut self) -> RequestTicket {
        self.generation = self.generation.wrapping_add(1);
        RequestTicket {
            generation: self.generation,
        }
    }

    /// Whether a response for `ticket` may still be applied.
    #[must_use]
    pub const fn is_current(&self, ticket: RequestTicket) -> bool {
        self.mounted && ticket.generation == self.generation
    }
}

/// A per-user list load that has been issued but not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLoad {
    ticket: RequestTicket,
    user_id: UserId,
}

impl PendingLoad {
    /// The user whose data is being loaded.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }
}
