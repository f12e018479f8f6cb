// core/src/input.rs

//! Request shapes as they arrive from the outside, and their validation.
//!
//! Each `*Input` is deserialized loosely (signed numbers, optional fields)
//! and checked once by `validate`, so a workflow only ever sees well-formed
//! values. The first offending field is reported as a `Validation` error.

use crate::error::{MarketError, Result};
use crate::models::{CategoryId, NewProduct, NewReview, OrderStatus, ProductId, ProductPatch, ShippingInfo, UserId};
use serde::Deserialize;

fn required_text(field: &str, value: Option<&str>) -> Result<String> {
  match value.map(str::trim) {
    Some(text) if !text.is_empty() => Ok(text.to_string()),
    _ => Err(MarketError::validation(field, "is required")),
  }
}

fn optional_text(value: Option<&str>) -> Option<String> {
  value.map(str::trim).filter(|text| !text.is_empty()).map(str::to_string)
}

fn positive_quantity(field: &str, value: i64) -> Result<u32> {
  if value < 1 {
    return Err(MarketError::validation(field, "must be at least 1"));
  }
  u32::try_from(value).map_err(|_| MarketError::validation(field, "is too large"))
}

fn non_negative_u32(field: &str, value: i64) -> Result<u32> {
  if value < 0 {
    return Err(MarketError::validation(field, "must not be negative"));
  }
  u32::try_from(value).map_err(|_| MarketError::validation(field, "is too large"))
}

fn non_negative_cents(field: &str, value: i64) -> Result<u64> {
  u64::try_from(value).map_err(|_| MarketError::validation(field, "must not be negative"))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInput {
  pub address: Option<String>,
  pub city: Option<String>,
  pub state: Option<String>,
  pub zip: Option<String>,
  pub phone: Option<String>,
  pub payment_method: Option<String>,
}

/// Validated checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
  pub shipping: ShippingInfo,
  pub payment_method: Option<String>,
}

impl CheckoutInput {
  pub fn validate(&self) -> Result<CheckoutRequest> {
    let address = required_text("address", self.address.as_deref())?;
    let phone = required_text("phone", self.phone.as_deref())?;
    if !phone.chars().any(|c| c.is_ascii_digit()) {
      return Err(MarketError::validation("phone", "must contain digits"));
    }
    Ok(CheckoutRequest {
      shipping: ShippingInfo {
        address,
        city: optional_text(self.city.as_deref()),
        state: optional_text(self.state.as_deref()),
        zip: optional_text(self.zip.as_deref()),
        phone,
      },
      payment_method: optional_text(self.payment_method.as_deref()),
    })
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
  pub product_id: ProductId,
  #[serde(default = "default_quantity")]
  pub quantity: i64,
}

fn default_quantity() -> i64 {
  1
}

impl AddToCartInput {
  pub fn validate(&self) -> Result<(ProductId, u32)> {
    Ok((self.product_id, positive_quantity("quantity", self.quantity)?))
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartQuantityInput {
  pub quantity: i64,
}

impl CartQuantityInput {
  pub fn validate(&self) -> Result<u32> {
    positive_quantity("quantity", self.quantity)
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price_cents: Option<i64>,
  pub unit: Option<String>,
  pub stock: Option<i64>,
  pub category_id: Option<CategoryId>,
  pub image_url: Option<String>,
  pub featured: Option<bool>,
}

impl ProductInput {
  /// Validates a full product for creation on behalf of `seller_id`.
  pub fn validate_new(&self, seller_id: UserId) -> Result<NewProduct> {
    let name = required_text("name", self.name.as_deref())?;
    let price_cents = match self.price_cents {
      Some(cents) => non_negative_cents("priceCents", cents)?,
      None => return Err(MarketError::validation("priceCents", "is required")),
    };
    let unit = optional_text(self.unit.as_deref()).unwrap_or_else(|| "each".to_string());
    let stock = self.stock.map(|s| non_negative_u32("stock", s)).transpose()?;
    let category_id = self
      .category_id
      .ok_or_else(|| MarketError::validation("categoryId", "is required"))?;
    Ok(NewProduct {
      name,
      description: optional_text(self.description.as_deref()),
      price_cents,
      unit,
      stock,
      seller_id,
      category_id,
      image_url: optional_text(self.image_url.as_deref()),
      featured: self.featured.unwrap_or(false),
    })
  }

  /// Validates the fields present as a partial update. A blank description
  /// or image URL clears it.
  pub fn validate_patch(&self) -> Result<ProductPatch> {
    let name = match self.name.as_deref() {
      Some(raw) => Some(required_text("name", Some(raw))?),
      None => None,
    };
    let unit = match self.unit.as_deref() {
      Some(raw) => Some(required_text("unit", Some(raw))?),
      None => None,
    };
    let patch = ProductPatch {
      name,
      description: self.description.as_deref().map(|raw| optional_text(Some(raw))),
      price_cents: self.price_cents.map(|c| non_negative_cents("priceCents", c)).transpose()?,
      unit,
      stock: self.stock.map(|s| non_negative_u32("stock", s)).transpose()?,
      category_id: self.category_id,
      image_url: self.image_url.as_deref().map(|raw| optional_text(Some(raw))),
      featured: self.featured,
    };
    if patch.is_empty() {
      return Err(MarketError::validation("product", "no fields to update"));
    }
    Ok(patch)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
  pub rating: i64,
  pub comment: Option<String>,
}

impl ReviewInput {
  pub fn validate(&self, product_id: ProductId) -> Result<NewReview> {
    if !(1..=5).contains(&self.rating) {
      return Err(MarketError::validation("rating", "must be between 1 and 5"));
    }
    Ok(NewReview {
      product_id,
      rating: self.rating as u8,
      comment: optional_text(self.comment.as_deref()),
    })
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusInput {
  pub status: String,
}

impl OrderStatusInput {
  pub fn validate(&self) -> Result<OrderStatus> {
    self.status.parse()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn field_of(err: MarketError) -> String {
    match err {
      MarketError::Validation { field, .. } => field,
      other => panic!("expected a validation error, got {:?}", other),
    }
  }

  #[test]
  fn checkout_requires_address_and_phone() {
    let missing_address = CheckoutInput {
      phone: Some("555-0100".into()),
      ..Default::default()
    };
    assert_eq!(field_of(missing_address.validate().unwrap_err()), "address");

    let blank_phone = CheckoutInput {
      address: Some("1 Orchard Rd".into()),
      phone: Some("   ".into()),
      ..Default::default()
    };
    assert_eq!(field_of(blank_phone.validate().unwrap_err()), "phone");
  }

  #[test]
  fn checkout_trims_and_drops_blank_optionals() {
    let input = CheckoutInput {
      address: Some("  1 Orchard Rd ".into()),
      city: Some("".into()),
      zip: Some(" 97201 ".into()),
      phone: Some("555-0100".into()),
      payment_method: Some("card".into()),
      ..Default::default()
    };
    let request = input.validate().unwrap();
    assert_eq!(request.shipping.address, "1 Orchard Rd");
    assert_eq!(request.shipping.city, None);
    assert_eq!(request.shipping.zip.as_deref(), Some("97201"));
    assert_eq!(request.payment_method.as_deref(), Some("card"));
  }

  #[test]
  fn cart_quantity_must_be_positive() {
    let zero = AddToCartInput { product_id: 1, quantity: 0 };
    assert_eq!(field_of(zero.validate().unwrap_err()), "quantity");
    assert_eq!(field_of(CartQuantityInput { quantity: -2 }.validate().unwrap_err()), "quantity");
    assert_eq!(CartQuantityInput { quantity: 4 }.validate().unwrap(), 4);
  }

  #[test]
  fn new_product_defaults_stock_to_none_and_unit_to_each() {
    let input = ProductInput {
      name: Some("Heirloom tomatoes".into()),
      price_cents: Some(450),
      category_id: Some(2),
      ..Default::default()
    };
    let product = input.validate_new(9).unwrap();
    assert_eq!(product.stock, None);
    assert_eq!(product.unit, "each");
    assert_eq!(product.seller_id, 9);
  }

  #[test]
  fn product_rejects_negative_price_and_empty_patch() {
    let negative = ProductInput {
      name: Some("Eggs".into()),
      price_cents: Some(-1),
      category_id: Some(1),
      ..Default::default()
    };
    assert_eq!(field_of(negative.validate_new(1).unwrap_err()), "priceCents");
    assert_eq!(field_of(ProductInput::default().validate_patch().unwrap_err()), "product");
  }

  #[test]
  fn blank_description_in_a_patch_clears_it() {
    let patch = ProductInput {
      description: Some("  ".into()),
      image_url: Some("/img/eggs.jpg ".into()),
      ..Default::default()
    }
    .validate_patch()
    .unwrap();
    assert_eq!(patch.description, Some(None));
    assert_eq!(patch.image_url, Some(Some("/img/eggs.jpg".to_string())));
    assert_eq!(patch.name, None);
  }

  #[test]
  fn review_rating_is_bounded() {
    assert!(ReviewInput { rating: 0, comment: None }.validate(1).is_err());
    assert!(ReviewInput { rating: 6, comment: None }.validate(1).is_err());
    let review = ReviewInput {
      rating: 5,
      comment: Some("sweet".into()),
    }
    .validate(3)
    .unwrap();
    assert_eq!((review.product_id, review.rating), (3, 5));
  }
}
