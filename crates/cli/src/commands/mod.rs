//! Command implementations.
//!
//! Each command activates one view model, runs its action and writes the
//! outcome to `out`.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;

use std::io;

use medishop_client::error::AppError;
use medishop_client::session::SessionError;
use medishop_client::views::{Activation, View};
use thiserror::Error;

/// Errors that stop a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The view needs a logged-in user.
    #[error("Not logged in. Run `medishop login <username>` first.")]
    LoginRequired,

    /// Client error.
    #[error(transparent)]
    App(#[from] AppError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

impl From<SessionError> for CommandError {
    fn from(err: SessionError) -> Self {
        Self::App(err.into())
    }
}

/// Turn a guard redirect to the login view into an error.
fn ensure_proceed(activation: Activation) -> Result<(), CommandError> {
    match activation {
        Activation::Redirect(View::Login) => Err(CommandError::LoginRequired),
        Activation::Redirect(_) | Activation::Proceed => Ok(()),
    }
}
