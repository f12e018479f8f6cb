// server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use harvest::{AddToCartInput, CartLineId, CartQuantityInput};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::get_cart", skip(app_state, auth_user), fields(user_id = auth_user.0.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = app_state.market.cart(auth_user.identity()).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload, auth_user),
    fields(user_id = auth_user.0.user_id, product_id = req_payload.product_id, quantity = req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartInput>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let line = app_state.market.add_to_cart(auth_user.identity(), &req_payload).await?;
  info!(
    "Add to cart successful for user: {}. Line ID: {}, Product ID: {}, New Quantity: {}",
    auth_user.0.user_id, line.id, line.product_id, line.quantity
  );
  Ok(HttpResponse::Ok().json(json!({
      "message": "Item added to cart successfully.",
      "cartItem": line
  })))
}

#[instrument(name = "handler::update_cart_line", skip(app_state, path, body, auth_user), fields(user_id = auth_user.0.user_id))]
pub async fn update_cart_line_handler(
  app_state: web::Data<AppState>,
  path: web::Path<CartLineId>,
  body: web::Json<CartQuantityInput>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let line = app_state
    .market
    .update_cart_line(auth_user.identity(), path.into_inner(), &body)
    .await?;
  Ok(HttpResponse::Ok().json(json!({ "cartItem": line })))
}

pub async fn remove_cart_line_handler(
  app_state: web::Data<AppState>,
  path: web::Path<CartLineId>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let line_id = path.into_inner();
  let removed = app_state.market.remove_cart_line(auth_user.identity(), line_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "removed": removed, "id": line_id })))
}

pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cleared = app_state.market.clear_cart(auth_user.identity()).await?;
  Ok(HttpResponse::Ok().json(json!({ "cleared": cleared })))
}
