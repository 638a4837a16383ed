//! Durable login state.
//!
//! The session is three string values in client storage: a login flag, the
//! user's backend ID and their username. Only the login and logout actions
//! write it; every view reads it when activated.
//!
//! A [`SessionStore`] is an explicit context object. It is cheap to clone and
//! is handed to each view model rather than read from ambient global state.

mod storage;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use medishop_core::UserId;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::views::{Activation, View};

/// Storage keys for session data.
pub mod keys {
    /// Key for the login flag.
    pub const LOGIN_FLAG: &str = "login-flag";

    /// Key for the backend user ID.
    pub const USER_ID: &str = "user-id";

    /// Key for the username typed at login.
    pub const USERNAME: &str = "username";
}

/// Value stored under [`keys::LOGIN_FLAG`] while logged in.
pub const LOGGED_IN_SENTINEL: &str = "0";

/// Errors raised by session writes.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The storage backend failed.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),

    /// Login was attempted without a username.
    #[error("cannot log in without a username")]
    EmptyUsername,
}

/// Snapshot of the stored session.
///
/// `logged_in` is true only when the flag holds the sentinel and both
/// identity fields are present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub logged_in: bool,
    pub user_id: Option<String>,
    pub username: Option<String>,
}

/// Identity of the logged-in user, with empty strings for absent values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: String,
    pub username: String,
}

impl CurrentUser {
    /// The stored user ID parsed as a backend ID, if present and numeric.
    #[must_use]
    pub fn id(&self) -> Option<UserId> {
        self.user_id.parse().ok()
    }

    /// First letter of the username, uppercased, for avatar badges.
    #[must_use]
    pub fn initial(&self) -> String {
        crate::filters::initial(&self.username)
    }
}

/// Session store over any [`KeyValueStorage`].
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.session())
            .finish()
    }
}

impl SessionStore {
    /// Create a session store over the given storage backend.
    #[must_use]
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// Session store that forgets everything when dropped.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Whether a user is logged in.
    ///
    /// Storage read failures are logged and treated as logged out.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session().logged_in
    }

    /// Stored identity, with empty strings for absent values.
    #[must_use]
    pub fn current_user(&self) -> CurrentUser {
        let session = self.session();
        CurrentUser {
            user_id: session.user_id.unwrap_or_default(),
            username: session.username.unwrap_or_default(),
        }
    }

    /// Read all three session fields.
    #[must_use]
    pub fn session(&self) -> Session {
        let flag = self.read(keys::LOGIN_FLAG);
        let user_id = self.read(keys::USER_ID);
        let username = self.read(keys::USERNAME);

        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        let logged_in = flag.as_deref() == Some(LOGGED_IN_SENTINEL)
            && present(&user_id)
            && present(&username);

        Session {
            logged_in,
            user_id,
            username,
        }
    }

    /// Record a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is empty or storage cannot be written.
    pub fn login(&self, user_id: UserId, username: &str) -> Result<(), SessionError> {
        if username.is_empty() {
            return Err(SessionError::EmptyUsername);
        }

        // Identity first so a partial write never reads as logged in
        self.storage.set(keys::USER_ID, &user_id.to_string())?;
        self.storage.set(keys::USERNAME, username)?;
        self.storage.set(keys::LOGIN_FLAG, LOGGED_IN_SENTINEL)?;

        set_sentry_user(&user_id, Some(username));
        info!(user_id = %user_id, "Session started");
        Ok(())
    }

    /// Clear the session.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn logout(&self) -> Result<(), SessionError> {
        // Flag first so a partial clear never reads as logged in
        self.storage.remove(keys::LOGIN_FLAG)?;
        self.storage.remove(keys::USER_ID)?;
        self.storage.remove(keys::USERNAME)?;

        clear_sentry_user();
        info!("Session cleared");
        Ok(())
    }

    /// Authentication guard run once when a view is activated.
    ///
    /// Protected views redirect to the login view when logged out; the login
    /// view redirects to the catalog when already logged in.
    #[must_use]
    pub fn guard(&self, view: View) -> Activation {
        let authenticated = self.is_authenticated();
        let activation = match (view.requires_auth(), authenticated) {
            (true, false) => Activation::Redirect(View::Login),
            (false, true) if view == View::Login => Activation::Redirect(View::Products),
            _ => Activation::Proceed,
        };
        debug!(view = ?view, authenticated, activation = ?activation, "View guard");
        activation
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read session storage");
                None
            }
        }
    }
}
