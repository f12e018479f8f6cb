// server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use harvest::{CheckoutInput, OrderId, OrderStatusInput};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

/// `POST /orders`: checks out the caller's cart.
#[instrument(name = "handler::checkout", skip(app_state, body, auth_user), fields(user_id = auth_user.0.user_id))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  body: web::Json<CheckoutInput>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  info!("Checkout attempt by user: {}", auth_user.0.user_id);
  match app_state.market.checkout(auth_user.identity(), &body).await {
    Ok(placed) => {
      info!(
        "Checkout successful for user {}: order {} totalling {} cents.",
        auth_user.0.user_id, placed.order.id, placed.order.total_cents
      );
      Ok(HttpResponse::Created().json(json!({
          "message": "Order placed successfully.",
          "order": placed
      })))
    }
    Err(e) => {
      warn!("Checkout failed for user {}: {}", auth_user.0.user_id, e);
      Err(e.into())
    }
  }
}

pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let history = app_state.market.orders(auth_user.identity()).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": history.purchases, "sales": history.sales })))
}

pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<OrderId>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order = app_state.market.order(auth_user.identity(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": order })))
}

#[instrument(
  name = "handler::update_order_status",
  skip(app_state, path, body, auth_user),
  fields(user_id = auth_user.0.user_id, order_id = %path.as_ref(), status = %body.status)
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<OrderId>,
  body: web::Json<OrderStatusInput>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order = app_state
    .market
    .set_order_status(auth_user.identity(), path.into_inner(), &body)
    .await?;
  Ok(HttpResponse::Ok().json(json!({ "order": order })))
}
