// server/src/web/handlers/seller_handlers.rs

//! Product management for farmers. Every route here requires `X-User-Role: farmer`.

use actix_web::{web, HttpResponse};
use harvest::{ProductId, ProductInput};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

pub async fn list_seller_products_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let products = app_state.market.seller_products(auth_user.identity()).await?;
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::create_product", skip(app_state, body, auth_user), fields(user_id = auth_user.0.user_id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  body: web::Json<ProductInput>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product = app_state.market.create_product(auth_user.identity(), &body).await?;
  Ok(HttpResponse::Created().json(json!({ "product": product })))
}

#[instrument(
  name = "handler::update_product",
  skip(app_state, path, body, auth_user),
  fields(user_id = auth_user.0.user_id, product_id = %path.as_ref())
)]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<ProductId>,
  body: web::Json<ProductInput>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product = app_state
    .market
    .update_product(auth_user.identity(), path.into_inner(), &body)
    .await?;
  Ok(HttpResponse::Ok().json(json!({ "product": product })))
}

#[instrument(
  name = "handler::delete_product",
  skip(app_state, path, auth_user),
  fields(user_id = auth_user.0.user_id, product_id = %path.as_ref())
)]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<ProductId>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let deleted = app_state.market.delete_product(auth_user.identity(), product_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "deleted": deleted, "id": product_id })))
}
