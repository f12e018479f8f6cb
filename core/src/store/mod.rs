// core/src/store/mod.rs

//! Repository contracts the workflows are written against, plus the
//! in-memory implementation used by the server and the tests.
//!
//! Method names carry their entity (`get_product`, `cart_lines`, ...) so a
//! single store type can implement every trait without ambiguous calls.

pub mod memory;

pub use memory::{MemoryStore, StoreSnapshot};

use crate::error::Result;
use crate::models::{
  CartLine, CartLineId, Category, CategoryId, NewOrderLine, NewProduct, NewReview, OrderId, OrderLine, OrderStatus,
  OrderWithLines, Product, ProductId, ProductPatch, Review, ShippingInfo, UserId,
};
use async_trait::async_trait;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
  async fn get_product(&self, id: ProductId) -> Result<Product>;

  async fn list_products(&self) -> Result<Vec<Product>>;

  async fn list_products_by_category(&self, category_id: CategoryId) -> Result<Vec<Product>>;

  async fn list_products_by_seller(&self, seller_id: UserId) -> Result<Vec<Product>>;

  async fn list_featured_products(&self) -> Result<Vec<Product>>;

  /// Stock defaults to 0 when absent; rating and review count start at 0.
  async fn create_product(&self, data: NewProduct) -> Result<Product>;

  /// Merges the patch without checking ownership; callers enforce that.
  async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product>;

  /// `true` if a product existed and was removed.
  async fn delete_product(&self, id: ProductId) -> Result<bool>;

  /// Takes `amount` units off the product's stock.
  ///
  /// The sufficiency check and the write happen in one critical section.
  /// On shortfall the stock is left untouched and `InsufficientStock` is returned.
  async fn decrement_stock(&self, id: ProductId, amount: u32) -> Result<Product>;

  /// All-or-nothing variant of `decrement_stock` over several products.
  /// Either every product is decremented or none is.
  async fn decrement_stock_many(&self, items: &[(ProductId, u32)]) -> Result<Vec<Product>>;

  async fn list_categories(&self) -> Result<Vec<Category>>;

  async fn create_category(&self, name: &str, slug: &str) -> Result<Category>;
}

#[async_trait]
pub trait CartRepository: Send + Sync {
  async fn cart_lines(&self, owner_id: UserId) -> Result<Vec<CartLine>>;

  async fn cart_line(&self, line_id: CartLineId) -> Result<CartLine>;

  /// Adds `quantity` of a product to the owner's cart.
  ///
  /// An existing line for the same product has its quantity increased
  /// instead of a second line being created. The price snapshot is read
  /// from the catalog when the line is first created.
  async fn add_cart_line(&self, owner_id: UserId, product_id: ProductId, quantity: u32) -> Result<CartLine>;

  /// `quantity` must be at least 1. Stock is not consulted here.
  async fn set_cart_quantity(&self, line_id: CartLineId, quantity: u32) -> Result<CartLine>;

  async fn remove_cart_line(&self, line_id: CartLineId) -> Result<bool>;

  /// Removes exactly the given lines; ids that no longer exist are ignored.
  /// Returns how many lines were removed.
  async fn remove_cart_lines(&self, line_ids: &[CartLineId]) -> Result<usize>;

  /// Removes every line the owner has; `true` if there was at least one.
  async fn clear_cart(&self, owner_id: UserId) -> Result<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
  /// Persists an order and its lines as one unit.
  ///
  /// The total is the sum of quantity x price over `lines` and the status
  /// always starts as pending.
  async fn create_order(
    &self,
    owner_id: UserId,
    shipping: ShippingInfo,
    payment_method: Option<String>,
    lines: Vec<NewOrderLine>,
  ) -> Result<OrderWithLines>;

  async fn get_order(&self, id: OrderId) -> Result<OrderWithLines>;

  /// Newest first.
  async fn list_orders_by_owner(&self, owner_id: UserId) -> Result<Vec<OrderWithLines>>;

  /// Every line sold by `seller_id`, across all orders, newest order first.
  async fn list_order_lines_by_seller(&self, seller_id: UserId) -> Result<Vec<OrderLine>>;

  /// Any status may follow any other.
  async fn set_order_status(&self, id: OrderId, status: OrderStatus) -> Result<OrderWithLines>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
  /// Stores the review and, in the same unit, refreshes the product's
  /// `rating` and `review_count` from all of its reviews.
  /// Fails with `NotFound` if the product does not exist.
  async fn create_review(&self, owner_id: UserId, review: NewReview) -> Result<Review>;

  /// Oldest first.
  async fn list_reviews_for_product(&self, product_id: ProductId) -> Result<Vec<Review>>;
}

/// Everything the marketplace needs from its storage.
pub trait MarketStore: CatalogRepository + CartRepository + OrderRepository + ReviewRepository {}

impl<S> MarketStore for S where S: CatalogRepository + CartRepository + OrderRepository + ReviewRepository {}
