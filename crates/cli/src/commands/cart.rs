//! Cart commands: `cart show`, `cart order`, `cart remove`.

use std::io::Write;

use medishop_client::state::AppState;
use medishop_client::views::CartViewModel;
use medishop_core::ProductId;

use super::{CommandError, ensure_proceed};
use crate::render;

async fn mounted(state: &AppState) -> Result<CartViewModel, CommandError> {
    let mut cart = state.cart_view();
    ensure_proceed(cart.mount().await)?;
    Ok(cart)
}

fn write_cart(cart: &CartViewModel, out: &mut impl Write) -> Result<(), CommandError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty. Run `medishop products` to keep shopping.")?;
    } else {
        writeln!(out, "{}", render::cart_table(&cart.view()))?;
    }
    Ok(())
}

pub async fn show(state: &AppState, out: &mut impl Write) -> Result<(), CommandError> {
    let cart = mounted(state).await?;
    write_cart(&cart, out)
}

/// Order a product from the cart, then show the refreshed cart.
pub async fn order(
    state: &AppState,
    product_id: ProductId,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut cart = mounted(state).await?;
    let notice = cart.place_order(product_id).await;
    writeln!(out, "{notice}")?;
    write_cart(&cart, out)
}

/// Remove a product from the cart, then show what is left.
pub async fn remove(
    state: &AppState,
    product_id: ProductId,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut cart = mounted(state).await?;
    let notice = cart.remove(product_id).await;
    writeln!(out, "{notice}")?;
    write_cart(&cart, out)
}
