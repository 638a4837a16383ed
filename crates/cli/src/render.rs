//! Table rendering for view-model display data.

use medishop_client::views::{CartView, OrderView, ProductCardView};
use medishop_core::Category;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// Product cards as a table.
pub fn products_table(cards: &[ProductCardView]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Price", "MRP", "Offer", "Stock"]);

    for card in cards {
        builder.push_record([
            card.id.to_string(),
            card.name.clone(),
            card.price.clone(),
            card.list_price.clone().unwrap_or_default(),
            card.discount_badge.clone().unwrap_or_default(),
            card.quantity.to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..4), Alignment::right());
    table.to_string()
}

/// Cart lines as a table followed by the total.
pub fn cart_table(cart: &CartView) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Price", "MRP", "Offer"]);

    for item in &cart.items {
        builder.push_record([
            item.product_id.to_string(),
            item.name.clone(),
            item.price.clone(),
            item.list_price.clone().unwrap_or_default(),
            item.discount_badge.clone().unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..4), Alignment::right());
    format!("{table}\nTotal ({} items): {}", cart.item_count, cart.total)
}

/// Past orders, one row per line item.
pub fn orders_table(orders: &[OrderView]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Ordered on", "Delivered on", "Item", "Price"]);

    for order in orders {
        if order.lines.is_empty() {
            builder.push_record([
                order.ordered_on.clone(),
                order.delivered_on.clone(),
                "-".to_string(),
                String::new(),
            ]);
        }
        for line in &order.lines {
            builder.push_record([
                order.ordered_on.clone(),
                order.delivered_on.clone(),
                line.name.clone(),
                line.price.clone(),
            ]);
        }
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..4), Alignment::right());
    table.to_string()
}

/// Category tab strip with the selected tab bracketed.
pub fn category_tabs(selected: Option<Category>) -> String {
    let mark = |label: &str, active: bool| {
        if active {
            format!("[{label}]")
        } else {
            label.to_string()
        }
    };

    let mut tabs = vec![mark("All Products", selected.is_none())];
    tabs.extend(
        Category::ALL
            .iter()
            .map(|category| mark(category.label(), selected == Some(*category))),
    );
    tabs.join("  ")
}
