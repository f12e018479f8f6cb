// server/src/web/handlers/review_handlers.rs

use actix_web::{web, HttpResponse};
use harvest::{ProductId, ReviewInput};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

pub async fn list_reviews_handler(
  app_state: web::Data<AppState>,
  path: web::Path<ProductId>,
) -> Result<HttpResponse, AppError> {
  let reviews = app_state.market.product_reviews(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "reviews": reviews })))
}

#[instrument(
  name = "handler::create_review",
  skip(app_state, path, body, auth_user),
  fields(user_id = auth_user.0.user_id, product_id = %path.as_ref())
)]
pub async fn create_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<ProductId>,
  body: web::Json<ReviewInput>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let receipt = app_state
    .market
    .create_review(auth_user.identity(), path.into_inner(), &body)
    .await?;
  info!(
    review_id = receipt.review.id,
    rating = receipt.product.rating,
    review_count = receipt.product.review_count,
    "Review recorded."
  );
  Ok(HttpResponse::Created().json(receipt))
}
