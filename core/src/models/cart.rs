// core/src/models/cart.rs

use super::{CartLineId, Product, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  pub id: CartLineId,
  pub owner_id: UserId,
  /// Weak reference; the product may have been deleted since the line was added.
  pub product_id: ProductId,
  pub quantity: u32,
  /// Price captured when the product was first added. Checkout does not use it.
  pub unit_price_cents: u64,
  pub added_at: DateTime<Utc>,
}

impl CartLine {
  pub fn snapshot_subtotal_cents(&self) -> u64 {
    self.unit_price_cents * u64::from(self.quantity)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
  #[serde(flatten)]
  pub line: CartLine,
  /// `None` when the referenced product no longer exists.
  pub product: Option<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
  pub owner_id: UserId,
  pub items: Vec<CartItemView>,
  pub item_count: u32,
  /// Sum over the add-time price snapshots; may differ from the checkout total.
  pub snapshot_subtotal_cents: u64,
}

impl CartView {
  pub fn new(owner_id: UserId, items: Vec<CartItemView>) -> Self {
    let item_count = items.iter().map(|item| item.line.quantity).sum();
    let snapshot_subtotal_cents = items.iter().map(|item| item.line.snapshot_subtotal_cents()).sum();
    Self {
      owner_id,
      items,
      item_count,
      snapshot_subtotal_cents,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}
