// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use harvest::MarketError;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Market(#[from] MarketError),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  /// A body, path or query that could not be decoded at all.
  #[error("Malformed request: {0}")]
  BadRequest(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<MarketError>() {
      Ok(market_err) => AppError::Market(market_err),
      Err(other) => AppError::Internal(format!("{:#}", other)),
    }
  }
}

impl AppError {
  /// Stable, machine-readable error kind used in response bodies.
  pub fn kind(&self) -> &'static str {
    match self {
      AppError::Market(e) => e.kind(),
      AppError::Auth(_) => "unauthorized",
      AppError::BadRequest(_) => "bad_request",
      AppError::Config(_) => "config_error",
      AppError::Internal(_) => "internal_error",
    }
  }

  fn body(&self) -> Value {
    let mut body = json!({
      "error": self.kind(),
      "message": self.to_string(),
    });
    match self {
      AppError::Market(MarketError::InsufficientStock {
        product_id,
        available,
        requested,
      }) => {
        body["productId"] = json!(product_id);
        body["available"] = json!(available);
        body["requested"] = json!(requested);
      }
      AppError::Market(MarketError::Validation { field, .. }) => {
        body["field"] = json!(field);
      }
      AppError::Market(MarketError::NotFound { entity, id }) => {
        body["entity"] = json!(entity);
        body["id"] = json!(id);
      }
      _ => {}
    }
    body
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Market(e) => match e {
        MarketError::NotFound { .. } => StatusCode::NOT_FOUND,
        MarketError::EmptyCart | MarketError::InsufficientStock { .. } | MarketError::Validation { .. } => {
          StatusCode::BAD_REQUEST
        }
        MarketError::Forbidden(_) => StatusCode::FORBIDDEN,
        MarketError::Workflow { .. } | MarketError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::info!(application_error = %self, status = status.as_u16(), "Request rejected");
    }
    HttpResponse::build(status).json(self.body())
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn market_errors_map_to_http_statuses() {
    let cases = [
      (AppError::from(MarketError::not_found("order", 7)), StatusCode::NOT_FOUND),
      (AppError::from(MarketError::EmptyCart), StatusCode::BAD_REQUEST),
      (AppError::from(MarketError::validation("phone", "is required")), StatusCode::BAD_REQUEST),
      (AppError::from(MarketError::forbidden("nope")), StatusCode::FORBIDDEN),
      (AppError::Auth("missing".to_string()), StatusCode::UNAUTHORIZED),
      (AppError::Internal("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
      assert_eq!(err.status_code(), status, "{}", err);
    }
  }

  #[test]
  fn insufficient_stock_body_names_the_product() {
    let err = AppError::from(MarketError::InsufficientStock {
      product_id: 3,
      available: 2,
      requested: 5,
    });
    let body = err.body();
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["productId"], 3);
    assert_eq!(body["available"], 2);
    assert_eq!(body["requested"], 5);
  }

  #[test]
  fn anyhow_wrapping_a_market_error_keeps_its_kind() {
    let err = AppError::from(anyhow::Error::new(MarketError::EmptyCart));
    assert_eq!(err.kind(), "empty_cart");
    let err = AppError::from(anyhow::anyhow!("disk on fire"));
    assert_eq!(err.kind(), "internal_error");
  }
}
