//! Catalog view model: random products, name search and category tabs.
//!
//! Fetches go through three steps so that front ends can keep rendering
//! while a request is in flight:
//!
//! ```rust,ignore
//! let pending = catalog.begin(CatalogRequest::search("dolo"));
//! let result = pending.send(&api).await;
//! if let Some(notice) = catalog.complete(pending, result) {
//!     show(notice);
//! }
//! ```
//!
//! [`CatalogViewModel::fetch`] does all three in one call.

use medishop_core::{Category, Product, ProductId};
use serde::Serialize;
use tracing::{debug, info};

use super::{Activation, LoadState, ProductActions, RequestTicket, RequestTracker, View};
use crate::api::{ApiClient, ApiError};
use crate::error::report_network_error;
use crate::filters;
use crate::notice::Notice;
use crate::session::SessionStore;

/// A catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    /// The default "All Products" set.
    Random,
    /// Products whose name matches the query.
    Search(String),
    /// Products in one category tab.
    Category(Category),
}

impl CatalogRequest {
    /// Search request for raw user input. A blank query shows all products.
    #[must_use]
    pub fn search(query: &str) -> Self {
        if query.trim().is_empty() {
            Self::Random
        } else {
            Self::Search(query.to_string())
        }
    }

    const fn action(&self) -> &'static str {
        match self {
            Self::Random => "load products",
            Self::Search(_) => "search products",
            Self::Category(_) => "filter by category",
        }
    }

    async fn run(&self, api: &ApiClient) -> Result<Vec<Product>, ApiError> {
        match self {
            Self::Random => api.fetch_random_products().await,
            Self::Search(query) => api.search_products(query).await,
            Self::Category(category) => api.filter_by_category(category.backend_name()).await,
        }
    }
}

/// Which result set is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Listing {
    /// The random "All Products" set.
    #[default]
    Random,
    /// The latest search or category result.
    Results,
}

/// A catalog fetch that has been issued but not yet applied.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    ticket: RequestTicket,
    request: CatalogRequest,
}

impl PendingFetch {
    /// Perform the request.
    ///
    /// # Errors
    ///
    /// Returns the backend error unchanged; [`CatalogViewModel::complete`]
    /// decides what it means.
    pub async fn send(&self, api: &ApiClient) -> Result<Vec<Product>, ApiError> {
        self.request.run(api).await
    }
}

/// Display data for one product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCardView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Price after discount, e.g. `₹90.00`.
    pub price: String,
    /// List price, shown struck through when discounted.
    pub list_price: Option<String>,
    pub discount_badge: Option<String>,
    pub image_url: Option<String>,
    pub quantity: u32,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.discounted_price().display(),
            list_price: product.has_discount().then(|| product.amount.display()),
            discount_badge: filters::discount_badge(product.discount),
            image_url: product.image_url.clone(),
            quantity: product.quantity,
        }
    }
}

/// State behind the product catalog.
#[derive(Debug, Clone)]
pub struct CatalogViewModel {
    api: ApiClient,
    session: SessionStore,
    username: String,
    random: Vec<Product>,
    results: Vec<Product>,
    listing: Listing,
    selected_category: Option<Category>,
    state: LoadState,
    tracker: RequestTracker,
}

impl CatalogViewModel {
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self {
            api,
            session,
            username: String::new(),
            random: Vec::new(),
            results: Vec::new(),
            listing: Listing::default(),
            selected_category: None,
            state: LoadState::default(),
            tracker: RequestTracker::default(),
        }
    }

    /// Run the guard and, if allowed, load the random product set.
    pub async fn mount(&mut self) -> Activation {
        let activation = self.session.guard(View::Products);
        if activation != Activation::Proceed {
            return activation;
        }

        self.tracker.mount();
        self.username = self.session.current_user().username;
        self.fetch(CatalogRequest::Random).await;
        activation
    }

    /// Deactivate the view. Responses still in flight are discarded.
    pub const fn unmount(&mut self) {
        self.tracker.unmount();
    }

    /// Start a fetch, superseding any fetch still in flight.
    pub fn begin(&mut self, request: CatalogRequest) -> PendingFetch {
        self.state = LoadState::Loading;
        let ticket = self.tracker.issue();
        debug!(request = ?request, "Catalog fetch started");
        PendingFetch { ticket, request }
    }

    /// Apply the result of a fetch started with [`begin`](Self::begin).
    ///
    /// Returns the notice to show, if any. Results of superseded fetches,
    /// or fetches that outlived the view, are dropped. The selected tab only
    /// changes once its products are on screen.
    pub fn complete(
        &mut self,
        pending: PendingFetch,
        result: Result<Vec<Product>, ApiError>,
    ) -> Option<Notice> {
        if !self.tracker.is_current(pending.ticket) {
            debug!(request = ?pending.request, "Discarding stale catalog response");
            return None;
        }

        let products = match result {
            Ok(products) => products,
            Err(e) => {
                report_network_error(pending.request.action(), &e);
                self.state = LoadState::Failed;
                return None;
            }
        };

        self.state = LoadState::Loaded;
        info!(request = ?pending.request, count = products.len(), "Catalog loaded");

        match pending.request {
            CatalogRequest::Random => {
                self.random = products;
                self.listing = Listing::Random;
                self.selected_category = None;
                None
            }
            CatalogRequest::Search(_) => {
                let notice = products.is_empty().then_some(Notice::SEARCH_NO_MATCH);
                self.results = products;
                self.listing = Listing::Results;
                notice
            }
            CatalogRequest::Category(category) => {
                let notice = products.is_empty().then_some(Notice::CATEGORY_EMPTY);
                self.results = products;
                self.listing = Listing::Results;
                self.selected_category = Some(category);
                notice
            }
        }
    }

    /// Begin, send and complete a fetch.
    pub async fn fetch(&mut self, request: CatalogRequest) -> Option<Notice> {
        let pending = self.begin(request);
        let result = pending.send(&self.api).await;
        self.complete(pending, result)
    }

    /// The "All Products" tab.
    pub async fn view_all(&mut self) -> Option<Notice> {
        self.fetch(CatalogRequest::Random).await
    }

    /// Search by name. A blank query behaves like [`view_all`](Self::view_all).
    pub async fn search(&mut self, query: &str) -> Option<Notice> {
        self.fetch(CatalogRequest::search(query)).await
    }

    /// Select a category tab.
    pub async fn select_category(&mut self, category: Category) -> Option<Notice> {
        self.fetch(CatalogRequest::Category(category)).await
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Products currently on screen.
    #[must_use]
    pub fn displayed(&self) -> &[Product] {
        match self.listing {
            Listing::Random => &self.random,
            Listing::Results => &self.results,
        }
    }

    /// Card display data for the products on screen.
    #[must_use]
    pub fn cards(&self) -> Vec<ProductCardView> {
        self.displayed().iter().map(ProductCardView::from).collect()
    }

    #[must_use]
    pub const fn listing(&self) -> Listing {
        self.listing
    }

    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Nothing to show; front ends offer "View All Products".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.is_loading() && self.displayed().is_empty()
    }

    /// Highlighted category tab. `None` means "All Products".
    #[must_use]
    pub const fn selected_category(&self) -> Option<Category> {
        self.selected_category
    }

    #[must_use]
    pub fn greeting(&self) -> String {
        filters::greeting(&self.username)
    }

    #[must_use]
    pub fn user_initial(&self) -> String {
        filters::initial(&self.username)
    }

    /// Card actions bound to this catalog's session.
    #[must_use]
    pub fn actions(&self) -> ProductActions {
        ProductActions::new(self.api.clone(), self.session.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use medishop_core::{Discount, Price, UserId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::config::ClientConfig;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: String::new(),
            amount: Price::new(Decimal::new(100, 0)),
            discount: Discount::new(10),
            image_url: None,
            quantity: 5,
        }
    }

    fn mounted() -> CatalogViewModel {
        let config = ClientConfig::new("http://127.0.0.1:9/", "/tmp/unused.json").unwrap();
        let session = SessionStore::in_memory();
        session.login(UserId::new(1), "abc").unwrap();
        let mut vm = CatalogViewModel::new(ApiClient::new(&config).unwrap(), session);
        vm.tracker.mount();
        vm
    }

    #[test]
    fn test_blank_search_is_view_all() {
        assert_eq!(CatalogRequest::search("   "), CatalogRequest::Random);
        assert_eq!(CatalogRequest::search(""), CatalogRequest::Random);
        assert_eq!(
            CatalogRequest::search("dolo"),
            CatalogRequest::Search("dolo".to_string())
        );
    }

    #[test]
    fn test_search_results_take_precedence() {
        let mut vm = mounted();

        let pending = vm.begin(CatalogRequest::Random);
        assert!(vm.is_loading());
        assert_eq!(vm.complete(pending, Ok(vec![product(1, "a")])), None);
        assert_eq!(vm.listing(), Listing::Random);

        let pending = vm.begin(CatalogRequest::search("b"));
        assert_eq!(vm.complete(pending, Ok(vec![product(2, "b")])), None);
        assert_eq!(vm.listing(), Listing::Results);
        assert_eq!(vm.displayed()[0].id, ProductId::new(2));

        // All Products resets precedence
        let pending = vm.begin(CatalogRequest::Random);
        vm.complete(pending, Ok(vec![product(1, "a")]));
        assert_eq!(vm.displayed()[0].id, ProductId::new(1));
    }

    #[test]
    fn test_empty_results_raise_notices() {
        let mut vm = mounted();

        let pending = vm.begin(CatalogRequest::search("zzz"));
        assert_eq!(
            vm.complete(pending, Ok(Vec::new())),
            Some(Notice::SEARCH_NO_MATCH)
        );
        assert!(vm.is_empty());

        let pending = vm.begin(CatalogRequest::Category(Category::Cardiac));
        assert_eq!(
            vm.complete(pending, Ok(Vec::new())),
            Some(Notice::CATEGORY_EMPTY)
        );
        assert_eq!(vm.selected_category(), Some(Category::Cardiac));

        // An empty random set is not worth a notice
        let pending = vm.begin(CatalogRequest::Random);
        assert_eq!(vm.complete(pending, Ok(Vec::new())), None);
        assert_eq!(vm.selected_category(), None);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut vm = mounted();

        let first = vm.begin(CatalogRequest::search("first"));
        let second = vm.begin(CatalogRequest::search("second"));

        vm.complete(second, Ok(vec![product(2, "second")]));
        assert_eq!(vm.complete(first, Ok(Vec::new())), None);

        assert_eq!(vm.displayed().len(), 1);
        assert_eq!(vm.displayed()[0].name, "second");
        assert_eq!(vm.state(), LoadState::Loaded);
    }

    #[test]
    fn test_response_after_unmount_is_discarded() {
        let mut vm = mounted();
        let pending = vm.begin(CatalogRequest::Random);
        vm.unmount();

        vm.complete(pending, Ok(vec![product(1, "a")]));
        assert!(vm.displayed().is_empty());
    }

    #[test]
    fn test_failure_keeps_displayed_set() {
        let mut vm = mounted();
        let pending = vm.begin(CatalogRequest::Random);
        vm.complete(pending, Ok(vec![product(1, "a")]));

        let pending = vm.begin(CatalogRequest::search("b"));
        let err = ApiError::UnexpectedBody("oops".to_string());
        assert_eq!(vm.complete(pending, Err(err)), None);

        assert_eq!(vm.state(), LoadState::Failed);
        assert!(!vm.is_loading());
        assert_eq!(vm.displayed()[0].id, ProductId::new(1));
    }

    #[test]
    fn test_failed_fetch_keeps_selected_tab() {
        let mut vm = mounted();
        let pending = vm.begin(CatalogRequest::Category(Category::Tonic));
        vm.complete(pending, Ok(vec![product(3, "tonic")]));
        assert_eq!(vm.selected_category(), Some(Category::Tonic));

        // Tab and listing stay on the category the user is looking at
        let pending = vm.begin(CatalogRequest::Random);
        assert_eq!(vm.selected_category(), Some(Category::Tonic));
        let err = ApiError::UnexpectedBody("oops".to_string());
        vm.complete(pending, Err(err));
        assert_eq!(vm.selected_category(), Some(Category::Tonic));
        assert_eq!(vm.listing(), Listing::Results);

        let pending = vm.begin(CatalogRequest::Category(Category::Cardiac));
        let err = ApiError::UnexpectedBody("oops".to_string());
        vm.complete(pending, Err(err));
        assert_eq!(vm.selected_category(), Some(Category::Tonic));
        assert_eq!(vm.displayed()[0].name, "tonic");
    }

    #[test]
    fn test_card_view() {
        let card = ProductCardView::from(&product(1, "Dolo 650"));
        assert_eq!(card.price, "₹90.00");
        assert_eq!(card.list_price.as_deref(), Some("₹100.00"));
        assert_eq!(card.discount_badge.as_deref(), Some("10% OFF"));

        let mut plain = product(2, "Chyawanprash");
        plain.discount = Discount::NONE;
        let card = ProductCardView::from(&plain);
        assert_eq!(card.price, "₹100.00");
        assert_eq!(card.list_price, None);
        assert_eq!(card.discount_badge, None);
    }

    #[tokio::test]
    async fn test_mount_redirects_without_session() {
        let config = ClientConfig::new("http://127.0.0.1:9/", "/tmp/unused.json").unwrap();
        let mut vm = CatalogViewModel::new(ApiClient::new(&config).unwrap(), SessionStore::in_memory());

        assert_eq!(vm.mount().await, Activation::Redirect(View::Login));
        assert_eq!(vm.state(), LoadState::Idle);
    }
}
