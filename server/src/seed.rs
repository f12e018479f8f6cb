// server/src/seed.rs

//! Demo catalogue loaded at startup so a fresh server has something to sell.

use anyhow::Context;
use harvest::{CatalogRepository, Category, MarketStore, NewProduct};
use std::collections::HashMap;
use tracing::info;

/// Seller ids owning the demo products. Send them as `X-User-ID` with `X-User-Role: farmer`.
pub const DEMO_FARMERS: [u64; 2] = [101, 102];

struct DemoProduct {
  name: &'static str,
  description: &'static str,
  price_cents: u64,
  unit: &'static str,
  stock: u32,
  seller_id: u64,
  category: &'static str,
  featured: bool,
}

const CATEGORIES: [(&str, &str); 4] = [
  ("Vegetables", "vegetables"),
  ("Fruit", "fruit"),
  ("Dairy & Eggs", "dairy-eggs"),
  ("Bakery", "bakery"),
];

const PRODUCTS: [DemoProduct; 6] = [
  DemoProduct {
    name: "Heirloom Tomatoes",
    description: "Mixed heirloom varieties, picked ripe.",
    price_cents: 450,
    unit: "lb",
    stock: 40,
    seller_id: DEMO_FARMERS[0],
    category: "vegetables",
    featured: true,
  },
  DemoProduct {
    name: "Rainbow Carrots",
    description: "Purple, yellow and orange carrots with tops.",
    price_cents: 300,
    unit: "bunch",
    stock: 25,
    seller_id: DEMO_FARMERS[0],
    category: "vegetables",
    featured: false,
  },
  DemoProduct {
    name: "Honeycrisp Apples",
    description: "Crisp and sweet, from the north orchard.",
    price_cents: 325,
    unit: "lb",
    stock: 60,
    seller_id: DEMO_FARMERS[0],
    category: "fruit",
    featured: true,
  },
  DemoProduct {
    name: "Pasture-Raised Eggs",
    description: "Brown eggs from free-ranging hens.",
    price_cents: 650,
    unit: "dozen",
    stock: 18,
    seller_id: DEMO_FARMERS[1],
    category: "dairy-eggs",
    featured: true,
  },
  DemoProduct {
    name: "Raw Milk Cheddar",
    description: "Aged nine months.",
    price_cents: 1200,
    unit: "8 oz",
    stock: 10,
    seller_id: DEMO_FARMERS[1],
    category: "dairy-eggs",
    featured: false,
  },
  DemoProduct {
    name: "Sourdough Loaf",
    description: "Naturally leavened, baked Saturday mornings.",
    price_cents: 800,
    unit: "loaf",
    stock: 12,
    seller_id: DEMO_FARMERS[1],
    category: "bakery",
    featured: false,
  },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
  pub categories: usize,
  pub products: usize,
}

pub async fn seed_demo_data(store: &dyn MarketStore) -> anyhow::Result<SeedSummary> {
  let mut by_slug: HashMap<&str, Category> = HashMap::new();
  for (name, slug) in CATEGORIES {
    let category = store
      .create_category(name, slug)
      .await
      .with_context(|| format!("seeding category '{}'", slug))?;
    by_slug.insert(slug, category);
  }

  for demo in &PRODUCTS {
    let category = by_slug
      .get(demo.category)
      .with_context(|| format!("demo product '{}' names unknown category '{}'", demo.name, demo.category))?;
    store
      .create_product(NewProduct {
        name: demo.name.to_string(),
        description: Some(demo.description.to_string()),
        price_cents: demo.price_cents,
        unit: demo.unit.to_string(),
        stock: Some(demo.stock),
        seller_id: demo.seller_id,
        category_id: category.id,
        image_url: None,
        featured: demo.featured,
      })
      .await
      .with_context(|| format!("seeding product '{}'", demo.name))?;
  }

  let summary = SeedSummary {
    categories: CATEGORIES.len(),
    products: PRODUCTS.len(),
  };
  info!(categories = summary.categories, products = summary.products, "Demo data seeded.");
  Ok(summary)
}
