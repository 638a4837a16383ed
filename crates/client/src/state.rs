//! Application state shared by every view.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::session::{FileStorage, KeyValueStorage, SessionStore};
use crate::views::{
    CartViewModel, CatalogViewModel, LoginViewModel, OrderHistoryViewModel, ProductActions,
};

/// Application state shared by every view.
///
/// This struct is cheaply cloneable via `Arc` and hands the same API client
/// and session store to each view model it creates.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    api: ApiClient,
    session: SessionStore,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("api", &self.inner.api)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create application state with the session kept in the configured file.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let storage = FileStorage::new(config.session_file.clone());
        Self::with_storage(config, storage)
    }

    /// Create application state over any session storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_storage(
        config: ClientConfig,
        storage: impl KeyValueStorage + 'static,
    ) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        let session = SessionStore::new(storage);

        Ok(Self {
            inner: Arc::new(AppStateInner { api, session }),
        })
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    #[must_use]
    pub fn login_view(&self) -> LoginViewModel {
        LoginViewModel::new(self.api().clone(), self.session().clone())
    }

    #[must_use]
    pub fn catalog_view(&self) -> CatalogViewModel {
        CatalogViewModel::new(self.api().clone(), self.session().clone())
    }

    #[must_use]
    pub fn cart_view(&self) -> CartViewModel {
        CartViewModel::new(self.api().clone(), self.session().clone())
    }

    #[must_use]
    pub fn order_history_view(&self) -> OrderHistoryViewModel {
        OrderHistoryViewModel::new(self.api().clone(), self.session().clone())
    }

    #[must_use]
    pub fn product_actions(&self) -> ProductActions {
        ProductActions::new(self.api().clone(), self.session().clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use medishop_core::UserId;

    use super::*;
    use crate::session::MemoryStorage;

    #[test]
    fn test_views_share_one_session() {
        let config = ClientConfig::new("http://127.0.0.1:9/", "/tmp/unused.json").unwrap();
        let state = AppState::with_storage(config, MemoryStorage::new()).unwrap();

        state.session().login(UserId::new(7), "abc").unwrap();

        let clone = state.clone();
        assert!(clone.session().is_authenticated());
        assert_eq!(clone.api().base_url().as_str(), "http://127.0.0.1:9/");
    }
}
