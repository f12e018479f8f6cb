// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper.

use harvest::{CatalogRepository, NewProduct, Product};
use harvest_server::config::AppConfig;
use harvest_server::state::AppState;
use once_cell::sync::Lazy;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub const FARMER: &str = "100";
pub const OTHER_FARMER: &str = "200";
pub const CUSTOMER: &str = "1";

pub fn test_config(seed_demo_data: bool) -> AppConfig {
  AppConfig::from_lookup(|name| match name {
    "SEED_DEMO_DATA" => Some(seed_demo_data.to_string()),
    _ => None,
  })
  .unwrap()
}

pub async fn empty_state() -> AppState {
  setup_tracing();
  harvest_server::build_state(test_config(false)).await.unwrap()
}

/// Adds a category and a product owned by `seller_id` directly through the store.
pub async fn stock_product(state: &AppState, seller_id: u64, name: &str, price_cents: u64, stock: u32) -> Product {
  let store = state.market.store();
  let category_id = match store.list_categories().await.unwrap().first() {
    Some(category) => category.id,
    None => store.create_category("Vegetables", "vegetables").await.unwrap().id,
  };
  store
    .create_product(NewProduct {
      name: name.to_string(),
      description: None,
      price_cents,
      unit: "each".to_string(),
      stock: Some(stock),
      seller_id,
      category_id,
      image_url: None,
      featured: false,
    })
    .await
    .unwrap()
}

/// Builds an actix test service over `$state` with the app's routes.
macro_rules! test_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state.clone()))
        .configure(harvest_server::web::configure_app_routes),
    )
    .await
  };
}
