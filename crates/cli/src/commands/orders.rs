//! `orders` command.

use std::io::Write;

use medishop_client::state::AppState;
use medishop_client::views::OrderHistoryViewModel;

use super::{CommandError, ensure_proceed};
use crate::render;

/// List past orders with their delivery dates.
///
/// A failed load is logged by the view model and shows as an empty history.
pub async fn list(state: &AppState, out: &mut impl Write) -> Result<(), CommandError> {
    let mut history = state.order_history_view();
    ensure_proceed(history.mount().await)?;

    if history.is_empty() {
        writeln!(out, "{}", OrderHistoryViewModel::empty_message())?;
        writeln!(out, "Run `medishop products` to start shopping.")?;
    } else {
        writeln!(out, "{}", render::orders_table(&history.view()))?;
    }
    Ok(())
}
