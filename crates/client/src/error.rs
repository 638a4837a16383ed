//! Unified error handling with Sentry integration.
//!
//! View models never propagate backend failures: they log them, report them
//! to Sentry and turn them into notices. `AppError` is for the failures that
//! do stop a command, such as bad configuration or unwritable session storage.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::session::SessionError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session update failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Backend request failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Log a failed backend call and capture it to Sentry.
///
/// `action` names what the user was doing, e.g. `"load cart"`.
pub fn report_network_error(action: &str, error: &ApiError) {
    let event_id = sentry::capture_error(error);
    tracing::error!(
        action,
        error = %error,
        sentry_event_id = %event_id,
        "Backend request failed"
    );
}

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: username.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Removed product", Some(&[("product_id", "7")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(SessionError::EmptyUsername);
        assert_eq!(
            err.to_string(),
            "Session error: cannot log in without a username"
        );
    }

    #[test]
    fn test_config_error_converts() {
        let err: AppError = ConfigError::MissingEnvVar("MEDISHOP_SESSION_FILE".to_string()).into();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing environment variable: MEDISHOP_SESSION_FILE"
        );
    }

    #[test]
    fn test_sentry_helpers_without_client_are_noops() {
        set_sentry_user(&42, Some("abc"));
        add_breadcrumb("cart", "Removed product", Some(&[("product_id", "7")]));
        clear_sentry_user();
    }
}
