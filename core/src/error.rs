// core/src/error.rs
use crate::flow::FlowError;
use crate::models::ProductId;
use thiserror::Error;

/// Every failure the marketplace can hand back to a caller.
///
/// Nothing here is fatal to the process: each error is scoped to the single
/// operation that produced it and is never retried internally.
#[derive(Debug, Error)]
pub enum MarketError {
  #[error("{entity} {id} not found")]
  NotFound { entity: &'static str, id: u64 },

  #[error("Cannot check out an empty cart")]
  EmptyCart,

  #[error("Insufficient stock for product {product_id}: {available} available, {requested} requested")]
  InsufficientStock {
    product_id: ProductId,
    available: u32,
    requested: u32,
  },

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Invalid {field}: {message}")]
  Validation { field: String, message: String },

  #[error("Workflow error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal error: {0}")]
  Internal(String),
}

impl MarketError {
  pub fn not_found(entity: &'static str, id: u64) -> Self {
    MarketError::NotFound { entity, id }
  }

  pub fn product_not_found(id: ProductId) -> Self {
    Self::not_found("product", id)
  }

  pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
    MarketError::Validation {
      field: field.into(),
      message: message.into(),
    }
  }

  pub fn forbidden(message: impl Into<String>) -> Self {
    MarketError::Forbidden(message.into())
  }

  /// Short machine-readable name of the error kind.
  pub fn kind(&self) -> &'static str {
    match self {
      MarketError::NotFound { .. } => "not_found",
      MarketError::EmptyCart => "empty_cart",
      MarketError::InsufficientStock { .. } => "insufficient_stock",
      MarketError::Forbidden(_) => "forbidden",
      MarketError::Validation { .. } => "validation_error",
      MarketError::Workflow { .. } => "workflow_error",
      MarketError::Internal(_) => "internal_error",
    }
  }
}

impl From<anyhow::Error> for MarketError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<MarketError>() {
      Ok(market_err) => market_err,
      Err(other) => MarketError::Internal(other.to_string()),
    }
  }
}

pub type Result<T, E = MarketError> = std::result::Result<T, E>;
