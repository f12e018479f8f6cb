// core/src/store/memory.rs

use super::{CartRepository, CatalogRepository, OrderRepository, ReviewRepository};
use crate::error::{MarketError, Result};
use crate::models::{
  CartLine, CartLineId, Category, CategoryId, NewOrderLine, NewProduct, NewReview, Order, OrderId, OrderLine,
  OrderLineId, OrderStatus, OrderWithLines, Product, ProductId, ProductPatch, Review, ReviewId, ShippingInfo, UserId,
};
use crate::models::review::aggregate_rating;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// A point-in-time copy of every table, for inspection and comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
  pub categories: BTreeMap<CategoryId, Category>,
  pub products: BTreeMap<ProductId, Product>,
  pub cart_lines: BTreeMap<CartLineId, CartLine>,
  pub orders: BTreeMap<OrderId, Order>,
  pub order_lines: BTreeMap<OrderLineId, OrderLine>,
  pub reviews: BTreeMap<ReviewId, Review>,
}

#[derive(Debug, Default)]
struct Sequences {
  category: u64,
  product: u64,
  cart_line: u64,
  order: u64,
  order_line: u64,
  review: u64,
}

fn next_id(counter: &mut u64) -> u64 {
  *counter += 1;
  *counter
}

#[derive(Debug, Default)]
struct Tables {
  data: StoreSnapshot,
  ids: Sequences,
}

impl Tables {
  fn product(&self, id: ProductId) -> Result<&Product> {
    self.data.products.get(&id).ok_or_else(|| MarketError::product_not_found(id))
  }

  fn order_with_lines(&self, order: &Order) -> OrderWithLines {
    let lines = self
      .data
      .order_lines
      .values()
      .filter(|line| line.order_id == order.id)
      .cloned()
      .collect();
    OrderWithLines {
      order: order.clone(),
      lines,
    }
  }
}

/// Marketplace storage held entirely in process memory.
///
/// All tables sit behind one lock and every repository call is a single
/// critical section, so each call is atomic with respect to every other.
/// Ids come from per-table counters starting at 1 and are never reused;
/// a higher id means a more recent record.
#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn snapshot(&self) -> StoreSnapshot {
    self.tables.read().data.clone()
  }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
  async fn get_product(&self, id: ProductId) -> Result<Product> {
    self.tables.read().product(id).cloned()
  }

  async fn list_products(&self) -> Result<Vec<Product>> {
    Ok(self.tables.read().data.products.values().cloned().collect())
  }

  async fn list_products_by_category(&self, category_id: CategoryId) -> Result<Vec<Product>> {
    let tables = self.tables.read();
    Ok(
      tables
        .data
        .products
        .values()
        .filter(|p| p.category_id == category_id)
        .cloned()
        .collect(),
    )
  }

  async fn list_products_by_seller(&self, seller_id: UserId) -> Result<Vec<Product>> {
    let tables = self.tables.read();
    Ok(
      tables
        .data
        .products
        .values()
        .filter(|p| p.seller_id == seller_id)
        .cloned()
        .collect(),
    )
  }

  async fn list_featured_products(&self) -> Result<Vec<Product>> {
    let tables = self.tables.read();
    Ok(tables.data.products.values().filter(|p| p.featured).cloned().collect())
  }

  async fn create_product(&self, data: NewProduct) -> Result<Product> {
    let mut tables = self.tables.write();
    let now = Utc::now();
    let product = Product {
      id: next_id(&mut tables.ids.product),
      name: data.name,
      description: data.description,
      price_cents: data.price_cents,
      unit: data.unit,
      stock: data.stock.unwrap_or(0),
      seller_id: data.seller_id,
      category_id: data.category_id,
      image_url: data.image_url,
      featured: data.featured,
      rating: 0.0,
      review_count: 0,
      created_at: now,
      updated_at: now,
    };
    tables.data.products.insert(product.id, product.clone());
    debug!(product_id = product.id, seller_id = product.seller_id, "Product created.");
    Ok(product)
  }

  async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product> {
    let mut tables = self.tables.write();
    let product = tables
      .data
      .products
      .get_mut(&id)
      .ok_or_else(|| MarketError::product_not_found(id))?;
    patch.apply_to(product);
    product.updated_at = Utc::now();
    Ok(product.clone())
  }

  async fn delete_product(&self, id: ProductId) -> Result<bool> {
    Ok(self.tables.write().data.products.remove(&id).is_some())
  }

  async fn decrement_stock(&self, id: ProductId, amount: u32) -> Result<Product> {
    let mut tables = self.tables.write();
    let product = tables
      .data
      .products
      .get_mut(&id)
      .ok_or_else(|| MarketError::product_not_found(id))?;
    if product.stock < amount {
      warn!(
        product_id = id,
        available = product.stock,
        requested = amount,
        "Stock decrement refused."
      );
      return Err(MarketError::InsufficientStock {
        product_id: id,
        available: product.stock,
        requested: amount,
      });
    }
    product.stock -= amount;
    product.updated_at = Utc::now();
    Ok(product.clone())
  }

  async fn decrement_stock_many(&self, items: &[(ProductId, u32)]) -> Result<Vec<Product>> {
    let mut tables = self.tables.write();

    // Same product listed twice counts against one stock figure.
    let mut wanted: Vec<(ProductId, u32)> = Vec::with_capacity(items.len());
    let mut positions: HashMap<ProductId, usize> = HashMap::new();
    for (product_id, amount) in items {
      match positions.get(product_id) {
        Some(idx) => wanted[*idx].1 += *amount,
        None => {
          positions.insert(*product_id, wanted.len());
          wanted.push((*product_id, *amount));
        }
      }
    }

    for (product_id, amount) in &wanted {
      let product = tables.product(*product_id)?;
      if product.stock < *amount {
        warn!(
          product_id = *product_id,
          available = product.stock,
          requested = *amount,
          "Batch stock decrement refused."
        );
        return Err(MarketError::InsufficientStock {
          product_id: *product_id,
          available: product.stock,
          requested: *amount,
        });
      }
    }

    let now = Utc::now();
    let mut updated = Vec::with_capacity(wanted.len());
    for (product_id, amount) in wanted {
      if let Some(product) = tables.data.products.get_mut(&product_id) {
        product.stock -= amount;
        product.updated_at = now;
        updated.push(product.clone());
      }
    }
    Ok(updated)
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    Ok(self.tables.read().data.categories.values().cloned().collect())
  }

  async fn create_category(&self, name: &str, slug: &str) -> Result<Category> {
    let mut tables = self.tables.write();
    if tables.data.categories.values().any(|c| c.slug == slug) {
      return Err(MarketError::validation("slug", format!("category '{}' already exists", slug)));
    }
    let category = Category {
      id: next_id(&mut tables.ids.category),
      name: name.to_string(),
      slug: slug.to_string(),
    };
    tables.data.categories.insert(category.id, category.clone());
    Ok(category)
  }
}

#[async_trait]
impl CartRepository for MemoryStore {
  async fn cart_lines(&self, owner_id: UserId) -> Result<Vec<CartLine>> {
    let tables = self.tables.read();
    Ok(
      tables
        .data
        .cart_lines
        .values()
        .filter(|line| line.owner_id == owner_id)
        .cloned()
        .collect(),
    )
  }

  async fn cart_line(&self, line_id: CartLineId) -> Result<CartLine> {
    self
      .tables
      .read()
      .data
      .cart_lines
      .get(&line_id)
      .cloned()
      .ok_or_else(|| MarketError::not_found("cart line", line_id))
  }

  async fn add_cart_line(&self, owner_id: UserId, product_id: ProductId, quantity: u32) -> Result<CartLine> {
    if quantity == 0 {
      return Err(MarketError::validation("quantity", "must be at least 1"));
    }
    let mut tables = self.tables.write();
    let unit_price_cents = tables.product(product_id)?.price_cents;

    if let Some(existing) = tables
      .data
      .cart_lines
      .values_mut()
      .find(|line| line.owner_id == owner_id && line.product_id == product_id)
    {
      existing.quantity = existing.quantity.saturating_add(quantity);
      return Ok(existing.clone());
    }

    let line = CartLine {
      id: next_id(&mut tables.ids.cart_line),
      owner_id,
      product_id,
      quantity,
      unit_price_cents,
      added_at: Utc::now(),
    };
    tables.data.cart_lines.insert(line.id, line.clone());
    Ok(line)
  }

  async fn set_cart_quantity(&self, line_id: CartLineId, quantity: u32) -> Result<CartLine> {
    if quantity == 0 {
      return Err(MarketError::validation("quantity", "must be at least 1"));
    }
    let mut tables = self.tables.write();
    let line = tables
      .data
      .cart_lines
      .get_mut(&line_id)
      .ok_or_else(|| MarketError::not_found("cart line", line_id))?;
    line.quantity = quantity;
    Ok(line.clone())
  }

  async fn remove_cart_line(&self, line_id: CartLineId) -> Result<bool> {
    Ok(self.tables.write().data.cart_lines.remove(&line_id).is_some())
  }

  async fn remove_cart_lines(&self, line_ids: &[CartLineId]) -> Result<usize> {
    let mut tables = self.tables.write();
    Ok(
      line_ids
        .iter()
        .filter(|id| tables.data.cart_lines.remove(id).is_some())
        .count(),
    )
  }

  async fn clear_cart(&self, owner_id: UserId) -> Result<bool> {
    let mut tables = self.tables.write();
    let before = tables.data.cart_lines.len();
    tables.data.cart_lines.retain(|_, line| line.owner_id != owner_id);
    Ok(tables.data.cart_lines.len() < before)
  }
}

#[async_trait]
impl OrderRepository for MemoryStore {
  async fn create_order(
    &self,
    owner_id: UserId,
    shipping: ShippingInfo,
    payment_method: Option<String>,
    lines: Vec<NewOrderLine>,
  ) -> Result<OrderWithLines> {
    if lines.is_empty() {
      return Err(MarketError::validation("lines", "an order needs at least one line"));
    }
    let total_cents = lines.iter().map(NewOrderLine::subtotal_cents).sum();

    let mut tables = self.tables.write();
    let now = Utc::now();
    let order = Order {
      id: next_id(&mut tables.ids.order),
      owner_id,
      status: OrderStatus::Pending,
      total_cents,
      shipping,
      payment_method,
      created_at: now,
      updated_at: now,
    };

    let mut created_lines = Vec::with_capacity(lines.len());
    for line in lines {
      let order_line = OrderLine {
        id: next_id(&mut tables.ids.order_line),
        order_id: order.id,
        product_id: line.product_id,
        seller_id: line.seller_id,
        quantity: line.quantity,
        price_cents: line.price_cents,
      };
      tables.data.order_lines.insert(order_line.id, order_line.clone());
      created_lines.push(order_line);
    }
    tables.data.orders.insert(order.id, order.clone());
    debug!(order_id = order.id, owner_id, total_cents, "Order created.");

    Ok(OrderWithLines {
      order,
      lines: created_lines,
    })
  }

  async fn get_order(&self, id: OrderId) -> Result<OrderWithLines> {
    let tables = self.tables.read();
    let order = tables
      .data
      .orders
      .get(&id)
      .ok_or_else(|| MarketError::not_found("order", id))?;
    Ok(tables.order_with_lines(order))
  }

  async fn list_orders_by_owner(&self, owner_id: UserId) -> Result<Vec<OrderWithLines>> {
    let tables = self.tables.read();
    Ok(
      tables
        .data
        .orders
        .values()
        .rev()
        .filter(|order| order.owner_id == owner_id)
        .map(|order| tables.order_with_lines(order))
        .collect(),
    )
  }

  async fn list_order_lines_by_seller(&self, seller_id: UserId) -> Result<Vec<OrderLine>> {
    let tables = self.tables.read();
    let mut lines: Vec<OrderLine> = tables
      .data
      .order_lines
      .values()
      .filter(|line| line.seller_id == seller_id)
      .cloned()
      .collect();
    lines.sort_by(|a, b| b.order_id.cmp(&a.order_id).then(a.id.cmp(&b.id)));
    Ok(lines)
  }

  async fn set_order_status(&self, id: OrderId, status: OrderStatus) -> Result<OrderWithLines> {
    let mut tables = self.tables.write();
    let order = tables
      .data
      .orders
      .get_mut(&id)
      .ok_or_else(|| MarketError::not_found("order", id))?;
    order.status = status;
    order.updated_at = Utc::now();
    let order = order.clone();
    Ok(tables.order_with_lines(&order))
  }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
  async fn create_review(&self, owner_id: UserId, review: NewReview) -> Result<Review> {
    let mut tables = self.tables.write();
    tables.product(review.product_id)?;
    let review = Review {
      id: next_id(&mut tables.ids.review),
      owner_id,
      product_id: review.product_id,
      rating: review.rating,
      comment: review.comment,
      created_at: Utc::now(),
    };
    tables.data.reviews.insert(review.id, review.clone());

    let ratings: Vec<u8> = tables
      .data
      .reviews
      .values()
      .filter(|r| r.product_id == review.product_id)
      .map(|r| r.rating)
      .collect();
    let (rating, review_count) = aggregate_rating(&ratings);
    if let Some(product) = tables.data.products.get_mut(&review.product_id) {
      product.rating = rating;
      product.review_count = review_count;
    }
    debug!(product_id = review.product_id, rating, review_count, "Product rating refreshed.");
    Ok(review)
  }

  async fn list_reviews_for_product(&self, product_id: ProductId) -> Result<Vec<Review>> {
    let tables = self.tables.read();
    Ok(
      tables
        .data
        .reviews
        .values()
        .filter(|review| review.product_id == product_id)
        .cloned()
        .collect(),
    )
  }
}
