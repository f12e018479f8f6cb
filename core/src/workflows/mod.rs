// core/src/workflows/mod.rs

//! The marketplace's multi-step operations, built on `crate::flow`.

use crate::error::MarketError;
use crate::flow::{FlowError, Workflows};

pub mod cart;
pub mod checkout;
pub mod contexts;
pub mod locks;

pub use contexts::{AddToCartCtxData, CheckoutCtxData};
pub use locks::OwnerLocks;

/// Registers every marketplace workflow with `workflows`.
pub fn register_all(workflows: &Workflows<MarketError>) -> Result<(), FlowError> {
  workflows.register(cart::add_to_cart_pipeline()?);
  workflows.register(checkout::checkout_pipeline()?);
  tracing::info!("Marketplace workflows registered.");
  Ok(())
}
