// server/src/web/routes.rs

use actix_web::{error::InternalError, web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{cart_handlers, order_handlers, product_handlers, review_handlers, seller_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok", "time": chrono::Utc::now() }))
}

/// Body, path and query decoding failures answer in the same JSON error shape as everything else.
fn malformed(err: impl std::fmt::Display, _req: &HttpRequest) -> actix_web::Error {
  let app_err = AppError::BadRequest(err.to_string());
  let response = actix_web::ResponseError::error_response(&app_err);
  InternalError::from_response(app_err, response).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(|err, req| malformed(err, req)))
    .app_data(web::PathConfig::default().error_handler(|err, req| malformed(err, req)))
    .app_data(web::QueryConfig::default().error_handler(|err, req| malformed(err, req)))
    .service(
      web::scope("/api/v1")
        .route("/health", web::get().to(health_check_handler))
        .route("/categories", web::get().to(product_handlers::list_categories_handler))
        .service(
          web::scope("/products")
            .route("", web::get().to(product_handlers::list_products_handler))
            .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
            .route("/{product_id}/reviews", web::get().to(review_handlers::list_reviews_handler))
            .route("/{product_id}/reviews", web::post().to(review_handlers::create_review_handler)),
        )
        .service(
          web::scope("/cart")
            .route("", web::get().to(cart_handlers::get_cart_handler))
            .route("", web::post().to(cart_handlers::add_to_cart_handler))
            .route("", web::delete().to(cart_handlers::clear_cart_handler))
            .route("/{line_id}", web::put().to(cart_handlers::update_cart_line_handler))
            .route("/{line_id}", web::delete().to(cart_handlers::remove_cart_line_handler)),
        )
        .service(
          web::scope("/orders")
            .route("", web::post().to(order_handlers::checkout_handler))
            .route("", web::get().to(order_handlers::list_orders_handler))
            .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
            .route("/{order_id}/status", web::put().to(order_handlers::update_order_status_handler)),
        )
        .service(
          web::scope("/seller/products")
            .route("", web::get().to(seller_handlers::list_seller_products_handler))
            .route("", web::post().to(seller_handlers::create_product_handler))
            .route("/{product_id}", web::put().to(seller_handlers::update_product_handler))
            .route("/{product_id}", web::delete().to(seller_handlers::delete_product_handler)),
        ),
    );
}
