// server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use harvest::ProductId;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub category: Option<u64>,
  #[serde(default)]
  pub featured: bool,
}

#[instrument(name = "handler::list_products", skip_all, fields(category = ?query.category, featured = query.featured))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let products = match (query.category, query.featured) {
    (None, true) => app_state.market.featured_products().await?,
    (None, false) => app_state.market.list_products().await?,
    (Some(category_id), featured) => {
      let mut products = app_state.market.products_in_category(category_id).await?;
      if featured {
        products.retain(|p| p.featured);
      }
      products
    }
  };
  info!("Fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<ProductId>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.market.product(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "product": product })))
}

pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state.market.categories().await?;
  Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}
