// core/src/models/product.rs

use super::{CategoryId, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  pub description: Option<String>,
  pub price_cents: u64,
  /// Sales unit shown next to the price, e.g. "lb" or "dozen".
  pub unit: String,
  pub stock: u32,
  pub seller_id: UserId,
  pub category_id: CategoryId,
  pub image_url: Option<String>,
  pub featured: bool,
  /// Mean review rating rounded to one decimal; refreshed whenever a review is written.
  pub rating: f64,
  pub review_count: u32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Fields for a product about to be created. The store assigns the id,
/// timestamps and a zeroed rating.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub name: String,
  pub description: Option<String>,
  pub price_cents: u64,
  pub unit: String,
  pub stock: Option<u32>,
  pub seller_id: UserId,
  pub category_id: CategoryId,
  pub image_url: Option<String>,
  pub featured: bool,
}

/// A partial update. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
  pub name: Option<String>,
  /// `Some(None)` clears the description.
  pub description: Option<Option<String>>,
  pub price_cents: Option<u64>,
  pub unit: Option<String>,
  /// Absolute overwrite, distinct from the decrement checkout performs.
  pub stock: Option<u32>,
  pub category_id: Option<CategoryId>,
  /// `Some(None)` clears the image.
  pub image_url: Option<Option<String>>,
  pub featured: Option<bool>,
}

impl ProductPatch {
  pub fn is_empty(&self) -> bool {
    *self == ProductPatch::default()
  }

  pub(crate) fn apply_to(self, product: &mut Product) {
    if let Some(name) = self.name {
      product.name = name;
    }
    if let Some(description) = self.description {
      product.description = description;
    }
    if let Some(price_cents) = self.price_cents {
      product.price_cents = price_cents;
    }
    if let Some(unit) = self.unit {
      product.unit = unit;
    }
    if let Some(stock) = self.stock {
      product.stock = stock;
    }
    if let Some(category_id) = self.category_id {
      product.category_id = category_id;
    }
    if let Some(image_url) = self.image_url {
      product.image_url = image_url;
    }
    if let Some(featured) = self.featured {
      product.featured = featured;
    }
  }
}
