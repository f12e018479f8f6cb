// core/src/models/identity.rs

use super::UserId;
use crate::error::MarketError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Customer,
  /// A seller. Farmers own products and fulfil the order lines for them.
  Farmer,
}

impl FromStr for Role {
  type Err = MarketError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "customer" => Ok(Role::Customer),
      "farmer" | "seller" => Ok(Role::Farmer),
      other => Err(MarketError::validation("role", format!("unknown role '{}'", other))),
    }
  }
}

/// The caller of an operation, as vouched for by whatever authenticates requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
  pub user_id: UserId,
  pub role: Role,
}

impl Identity {
  pub fn customer(user_id: UserId) -> Self {
    Self {
      user_id,
      role: Role::Customer,
    }
  }

  pub fn farmer(user_id: UserId) -> Self {
    Self {
      user_id,
      role: Role::Farmer,
    }
  }

  pub fn is_farmer(&self) -> bool {
    self.role == Role::Farmer
  }
}
