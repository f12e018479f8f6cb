// core/src/models/order.rs

use super::{OrderId, OrderLineId, ProductId, UserId};
use crate::error::MarketError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle: pending -> processing -> shipped -> delivered, or pending -> cancelled.
///
/// The store accepts any status after any other. `is_terminal` only
/// describes the convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Processing => "processing",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = MarketError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_ascii_lowercase();
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == wanted)
      .ok_or_else(|| {
        MarketError::validation(
          "status",
          format!(
            "'{}' is not one of pending, processing, shipped, delivered, cancelled",
            s
          ),
        )
      })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
  pub address: String,
  pub city: Option<String>,
  pub state: Option<String>,
  pub zip: Option<String>,
  pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: OrderId,
  pub owner_id: UserId,
  pub status: OrderStatus,
  /// Fixed at creation from the line items; never recomputed.
  pub total_cents: u64,
  pub shipping: ShippingInfo,
  /// Recorded as given; no payment is taken.
  pub payment_method: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
  pub id: OrderLineId,
  pub order_id: OrderId,
  pub product_id: ProductId,
  /// Copied from the product at purchase so it survives later product edits or deletion.
  pub seller_id: UserId,
  pub quantity: u32,
  pub price_cents: u64,
}

impl OrderLine {
  pub fn subtotal_cents(&self) -> u64 {
    self.price_cents * u64::from(self.quantity)
  }
}

/// A line as handed to the order repository, before ids exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
  pub product_id: ProductId,
  pub seller_id: UserId,
  pub quantity: u32,
  pub price_cents: u64,
}

impl NewOrderLine {
  pub fn subtotal_cents(&self) -> u64 {
    self.price_cents * u64::from(self.quantity)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithLines {
  #[serde(flatten)]
  pub order: Order,
  pub lines: Vec<OrderLine>,
}

/// One order as a single seller sees it: the header plus only that seller's lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerOrder {
  pub order_id: OrderId,
  pub status: OrderStatus,
  pub customer_id: UserId,
  pub shipping: ShippingInfo,
  pub created_at: DateTime<Utc>,
  pub lines: Vec<OrderLine>,
  pub seller_total_cents: u64,
}

impl SellerOrder {
  pub fn from_order(order: &Order, lines: Vec<OrderLine>) -> Self {
    let seller_total_cents = lines.iter().map(OrderLine::subtotal_cents).sum();
    Self {
      order_id: order.id,
      status: order.status,
      customer_id: order.owner_id,
      shipping: order.shipping.clone(),
      created_at: order.created_at,
      lines,
      seller_total_cents,
    }
  }
}
