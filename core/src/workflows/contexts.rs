// core/src/workflows/contexts.rs

//! Data each workflow runs over. Handlers see these through `ContextData`.

use crate::input::CheckoutRequest;
use crate::models::{CartLine, NewOrderLine, OrderWithLines, Product, ProductId, UserId};
use crate::store::MarketStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub store: Arc<dyn MarketStore>,
  pub owner_id: UserId,
  pub product_id: ProductId,
  pub quantity: u32,
  pub product: Option<Product>,
  pub updated_line: Option<CartLine>,
}

impl AddToCartCtxData {
  pub fn new(store: Arc<dyn MarketStore>, owner_id: UserId, product_id: ProductId, quantity: u32) -> Self {
    Self {
      store,
      owner_id,
      product_id,
      quantity,
      product: None,
      updated_line: None,
    }
  }
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub store: Arc<dyn MarketStore>,
  pub owner_id: UserId,
  pub request: CheckoutRequest,
  pub cart_lines: Vec<CartLine>,
  /// Current catalog record for each cart line, same order as `cart_lines`.
  pub products: Vec<Product>,
  pub order_lines: Vec<NewOrderLine>,
  pub total_cents: u64,
  pub order: Option<OrderWithLines>,
}

impl CheckoutCtxData {
  pub fn new(store: Arc<dyn MarketStore>, owner_id: UserId, request: CheckoutRequest) -> Self {
    Self {
      store,
      owner_id,
      request,
      cart_lines: Vec::new(),
      products: Vec::new(),
      order_lines: Vec::new(),
      total_cents: 0,
      order: None,
    }
  }
}
