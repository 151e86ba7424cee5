//! # Catalog Commands
//!
//! Menu listing and product maintenance.
//!
//! Price changes only affect lines ordered afterwards; lines already on a
//! table keep the price they were ordered at.

use mesa_core::{Command, Event, Money, Product};
use tracing::{debug, info};

use super::unexpected;
use crate::error::ApiError;
use crate::state::LedgerState;

/// Lists the menu, optionally limited to one category.
pub fn list_products(ledger: &LedgerState, category: Option<&str>) -> Vec<Product> {
    debug!(?category, "list_products command");
    ledger.with_ledger(|l| {
        l.products()
            .iter()
            .filter(|p| category.map_or(true, |c| p.category.eq_ignore_ascii_case(c)))
            .cloned()
            .collect()
    })
}

pub fn get_product(ledger: &LedgerState, product_id: &str) -> Result<Product, ApiError> {
    debug!(product_id, "get_product command");
    ledger
        .with_ledger(|l| l.product(product_id).cloned())
        .ok_or_else(|| ApiError::not_found("Product", product_id))
}

/// Changes the menu price of a product.
pub fn update_product_price(
    ledger: &LedgerState,
    product_id: String,
    new_price: Money,
) -> Result<Product, ApiError> {
    debug!(%product_id, %new_price, "update_product_price command");

    match ledger.dispatch(Command::UpdateProductPrice {
        product_id,
        new_price,
    })? {
        Event::ProductUpdated(product) => {
            info!(product_id = %product.id, price = %product.price, "Product price updated");
            Ok(product)
        }
        other => Err(unexpected(other)),
    }
}

/// Marks a product as orderable or sold out.
pub fn set_product_availability(
    ledger: &LedgerState,
    product_id: String,
    available: bool,
) -> Result<Product, ApiError> {
    debug!(%product_id, available, "set_product_availability command");

    match ledger.dispatch(Command::SetProductAvailability {
        product_id,
        available,
    })? {
        Event::ProductUpdated(product) => Ok(product),
        other => Err(unexpected(other)),
    }
}
