//! Login view model.

use medishop_core::LoginOutcome;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use super::{Activation, View};
use crate::api::ApiClient;
use crate::error::{add_breadcrumb, report_network_error};
use crate::notice::Notice;
use crate::session::{SessionError, SessionStore};

/// What happened after the login form was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginSubmission {
    /// The session was written; navigate to the view.
    Redirect(View),
    /// Stay on the login view and show the notice.
    Rejected(Notice),
}

/// State behind the login form.
#[derive(Debug, Clone)]
pub struct LoginViewModel {
    api: ApiClient,
    session: SessionStore,
}

impl LoginViewModel {
    #[must_use]
    pub const fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Run the guard. Logged-in users are sent to the catalog.
    #[must_use]
    pub fn activate(&self) -> Activation {
        self.session.guard(View::Login)
    }

    /// Submit credentials.
    ///
    /// Blank fields are refused before any request is made. A positive code
    /// from the backend is the user's ID and starts the session.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session cannot be written.
    pub async fn submit(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginSubmission, SessionError> {
        if username.is_empty() || password.expose_secret().is_empty() {
            return Ok(LoginSubmission::Rejected(Notice::LOGIN_BLANK_CREDENTIALS));
        }

        add_breadcrumb("auth", "Login submitted", Some(&[("username", username)]));

        let outcome = match self.api.login(username, password).await {
            Ok(outcome) => outcome,
            Err(e) => {
                report_network_error("login", &e);
                return Ok(LoginSubmission::Rejected(Notice::UNREACHABLE));
            }
        };

        let notice = match outcome {
            LoginOutcome::Authenticated(user_id) => {
                self.session.login(user_id, username)?;
                info!(user_id = %user_id, "Login succeeded");
                return Ok(LoginSubmission::Redirect(View::Products));
            }
            LoginOutcome::ServerError => Notice::LOGIN_SERVER_ERROR,
            LoginOutcome::UnknownUsername => Notice::LOGIN_UNKNOWN_USERNAME,
            LoginOutcome::AmbiguousUsername => Notice::LOGIN_AMBIGUOUS_USERNAME,
            LoginOutcome::WrongPassword => Notice::LOGIN_WRONG_PASSWORD,
            LoginOutcome::Unrecognized(code) => {
                warn!(code, "Unrecognized login code");
                Notice::LOGIN_FAILED
            }
        };

        warn!(outcome = ?outcome, "Login rejected");
        Ok(LoginSubmission::Rejected(notice))
    }

    /// Clear the session and return to the login view.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be cleared.
    pub fn logout(&self) -> Result<View, SessionError> {
        self.session.logout()?;
        Ok(View::Login)
    }
}
