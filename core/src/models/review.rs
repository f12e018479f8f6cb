// core/src/models/review.rs

use super::{ProductId, ReviewId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
  pub id: ReviewId,
  pub owner_id: UserId,
  pub product_id: ProductId,
  /// 1 to 5 inclusive.
  pub rating: u8,
  pub comment: Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
  pub product_id: ProductId,
  pub rating: u8,
  pub comment: Option<String>,
}

/// Arithmetic mean of `ratings` rounded to one decimal, with the count.
/// An empty slice yields `(0.0, 0)`.
pub fn aggregate_rating(ratings: &[u8]) -> (f64, u32) {
  if ratings.is_empty() {
    return (0.0, 0);
  }
  let count = ratings.len() as u32;
  let sum: u32 = ratings.iter().map(|r| u32::from(*r)).sum();
  let mean = f64::from(sum) / f64::from(count);
  ((mean * 10.0).round() / 10.0, count)
}
