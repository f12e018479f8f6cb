// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every fixture.

use harvest::{
  CatalogRepository, CheckoutInput, Identity, Marketplace, MemoryStore, NewProduct, OrderRepository, OrderWithLines,
  Product,
};
use once_cell::sync::Lazy;
use std::sync::Arc;
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

pub const FARMER_A: u64 = 100;
pub const FARMER_B: u64 = 200;
pub const CUSTOMER: u64 = 1;
pub const OTHER_CUSTOMER: u64 = 2;

/// A fresh store and marketplace with two categories seeded.
pub struct Market {
  pub store: Arc<MemoryStore>,
  pub market: Marketplace,
  pub vegetables: u64,
  pub dairy: u64,
}

impl Market {
  pub async fn new() -> Self {
    setup_tracing();
    let store = Arc::new(MemoryStore::new());
    let vegetables = store.create_category("Vegetables", "vegetables").await.unwrap().id;
    let dairy = store.create_category("Dairy & Eggs", "dairy-eggs").await.unwrap().id;
    let market = Marketplace::new(store.clone()).unwrap();
    Self {
      store,
      market,
      vegetables,
      dairy,
    }
  }

  /// Adds a product straight through the store, bypassing role checks.
  pub async fn product(&self, seller_id: u64, name: &str, price_cents: u64, stock: u32) -> Product {
    self
      .store
      .create_product(NewProduct {
        name: name.to_string(),
        description: None,
        price_cents,
        unit: "each".to_string(),
        stock: Some(stock),
        seller_id,
        category_id: self.vegetables,
        image_url: None,
        featured: false,
      })
      .await
      .unwrap()
  }

  /// Reads an order straight from the store, without visibility rules.
  pub async fn stored_order(&self, id: u64) -> OrderWithLines {
    self.store.get_order(id).await.unwrap()
  }
}

pub fn customer() -> Identity {
  Identity::customer(CUSTOMER)
}

pub fn other_customer() -> Identity {
  Identity::customer(OTHER_CUSTOMER)
}

pub fn farmer_a() -> Identity {
  Identity::farmer(FARMER_A)
}

pub fn farmer_b() -> Identity {
  Identity::farmer(FARMER_B)
}

pub fn shipping() -> CheckoutInput {
  CheckoutInput {
    address: Some("12 Orchard Lane".to_string()),
    city: Some("Hood River".to_string()),
    state: Some("OR".to_string()),
    zip: Some("97031".to_string()),
    phone: Some("541-555-0199".to_string()),
    payment_method: Some("cash_on_delivery".to_string()),
  }
}
