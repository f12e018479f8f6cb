// core/src/marketplace.rs

//! `Marketplace`: the operations callers invoke, with identity and role rules applied.
//!
//! The store, workflow registry and cart locks are built once and shared
//! by every clone of the facade.

use crate::error::{MarketError, Result};
use crate::flow::{ContextData, FlowOutcome, Workflows};
use crate::input::{
  AddToCartInput, CartQuantityInput, CheckoutInput, OrderStatusInput, ProductInput, ReviewInput,
};
use crate::models::{
  CartItemView, CartLine, CartLineId, CartView, Category, CategoryId, Identity, OrderId, OrderLine, OrderWithLines,
  Product, ProductId, Review, SellerOrder,
};
use crate::store::{CartRepository, CatalogRepository, MarketStore, OrderRepository, ReviewRepository};
use crate::workflows::{self, AddToCartCtxData, CheckoutCtxData, OwnerLocks};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// An order as the caller is allowed to see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OrderView {
  /// The customer who placed it sees everything.
  Full(OrderWithLines),
  /// A seller sees the header and only their own lines.
  Seller(SellerOrder),
}

/// Everything `orders` shows a caller. `sales` is always empty for customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistory {
  /// Orders the caller placed, newest first.
  pub purchases: Vec<OrderWithLines>,
  /// Orders holding the caller's products, newest first, showing only their lines.
  pub sales: Vec<SellerOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReceipt {
  pub review: Review,
  /// The product with its refreshed rating and review count.
  pub product: Product,
}

#[derive(Clone)]
pub struct Marketplace {
  store: Arc<dyn MarketStore>,
  workflows: Arc<Workflows<MarketError>>,
  /// Per-owner cart lock. Checkout holds it for the whole run and every
  /// cart mutation takes it, so no cart change lands mid-checkout.
  cart_locks: Arc<OwnerLocks>,
}

impl Marketplace {
  pub fn new(store: Arc<dyn MarketStore>) -> Result<Self> {
    let workflows = Workflows::new();
    workflows::register_all(&workflows)?;
    Ok(Self {
      store,
      workflows: Arc::new(workflows),
      cart_locks: Arc::new(OwnerLocks::new()),
    })
  }

  pub fn store(&self) -> &Arc<dyn MarketStore> {
    &self.store
  }

  fn require_farmer(identity: &Identity, action: &str) -> Result<()> {
    if identity.is_farmer() {
      Ok(())
    } else {
      warn!(user_id = identity.user_id, action, "Non-seller attempted a seller action.");
      Err(MarketError::forbidden(format!("only sellers may {}", action)))
    }
  }

  async fn owned_product(&self, identity: &Identity, product_id: ProductId) -> Result<Product> {
    let product = self.store.get_product(product_id).await?;
    if product.seller_id != identity.user_id {
      warn!(
        user_id = identity.user_id,
        product_id,
        owner = product.seller_id,
        "Seller attempted to modify another seller's product."
      );
      return Err(MarketError::forbidden("product belongs to another seller"));
    }
    Ok(product)
  }

  async fn owned_cart_line(&self, identity: &Identity, line_id: CartLineId) -> Result<CartLine> {
    let line = self.store.cart_line(line_id).await?;
    if line.owner_id != identity.user_id {
      return Err(MarketError::forbidden("cart line belongs to another user"));
    }
    Ok(line)
  }

  // --- Storefront ---

  pub async fn list_products(&self) -> Result<Vec<Product>> {
    self.store.list_products().await
  }

  pub async fn product(&self, product_id: ProductId) -> Result<Product> {
    self.store.get_product(product_id).await
  }

  pub async fn products_in_category(&self, category_id: CategoryId) -> Result<Vec<Product>> {
    self.store.list_products_by_category(category_id).await
  }

  pub async fn featured_products(&self) -> Result<Vec<Product>> {
    self.store.list_featured_products().await
  }

  pub async fn categories(&self) -> Result<Vec<Category>> {
    self.store.list_categories().await
  }

  pub async fn product_reviews(&self, product_id: ProductId) -> Result<Vec<Review>> {
    self.store.get_product(product_id).await?;
    self.store.list_reviews_for_product(product_id).await
  }

  // --- Cart ---

  /// The caller's cart with each line's current product, if it still exists.
  pub async fn cart(&self, identity: &Identity) -> Result<CartView> {
    let lines = self.store.cart_lines(identity.user_id).await?;
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
      let product = match self.store.get_product(line.product_id).await {
        Ok(product) => Some(product),
        Err(MarketError::NotFound { .. }) => None,
        Err(e) => return Err(e),
      };
      items.push(CartItemView { line, product });
    }
    Ok(CartView::new(identity.user_id, items))
  }

  #[instrument(name = "marketplace::add_to_cart", skip(self, input), fields(user_id = identity.user_id))]
  pub async fn add_to_cart(&self, identity: &Identity, input: &AddToCartInput) -> Result<CartLine> {
    let (product_id, quantity) = input.validate()?;
    let _cart_guard = self.cart_locks.acquire(identity.user_id).await;
    let ctx_data = ContextData::new(AddToCartCtxData::new(
      self.store.clone(),
      identity.user_id,
      product_id,
      quantity,
    ));
    match self.workflows.run(ctx_data.clone()).await? {
      FlowOutcome::Completed => ctx_data
        .read()
        .updated_line
        .clone()
        .ok_or_else(|| MarketError::Internal("add to cart completed without a cart line".to_string())),
      FlowOutcome::Stopped => Err(MarketError::Internal("add to cart was halted".to_string())),
    }
  }

  /// Sets a line's quantity. The new quantity must fit the product's current stock.
  #[instrument(name = "marketplace::update_cart_line", skip(self, input), fields(user_id = identity.user_id))]
  pub async fn update_cart_line(
    &self,
    identity: &Identity,
    line_id: CartLineId,
    input: &CartQuantityInput,
  ) -> Result<CartLine> {
    let quantity = input.validate()?;
    let _cart_guard = self.cart_locks.acquire(identity.user_id).await;
    let line = self.owned_cart_line(identity, line_id).await?;
    let product = self.store.get_product(line.product_id).await?;
    if quantity > product.stock {
      return Err(MarketError::InsufficientStock {
        product_id: product.id,
        available: product.stock,
        requested: quantity,
      });
    }
    self.store.set_cart_quantity(line_id, quantity).await
  }

  pub async fn remove_cart_line(&self, identity: &Identity, line_id: CartLineId) -> Result<bool> {
    let _cart_guard = self.cart_locks.acquire(identity.user_id).await;
    self.owned_cart_line(identity, line_id).await?;
    self.store.remove_cart_line(line_id).await
  }

  pub async fn clear_cart(&self, identity: &Identity) -> Result<bool> {
    let _cart_guard = self.cart_locks.acquire(identity.user_id).await;
    self.store.clear_cart(identity.user_id).await
  }

  // --- Checkout and orders ---

  /// Places an order from the caller's cart.
  ///
  /// Input is validated before anything is read. The owner's cart lock is
  /// held for the whole workflow run.
  #[instrument(name = "marketplace::checkout", skip(self, input), fields(user_id = identity.user_id))]
  pub async fn checkout(&self, identity: &Identity, input: &CheckoutInput) -> Result<OrderWithLines> {
    let request = input.validate()?;
    let _cart_guard = self.cart_locks.acquire(identity.user_id).await;

    let ctx_data = ContextData::new(CheckoutCtxData::new(self.store.clone(), identity.user_id, request));
    match self.workflows.run(ctx_data.clone()).await? {
      FlowOutcome::Completed => {
        let order = ctx_data
          .read()
          .order
          .clone()
          .ok_or_else(|| MarketError::Internal("checkout completed without an order".to_string()))?;
        info!(order_id = order.order.id, total_cents = order.order.total_cents, "Checkout completed.");
        Ok(order)
      }
      FlowOutcome::Stopped => Err(MarketError::Internal("checkout was halted".to_string())),
    }
  }

  pub async fn customer_orders(&self, identity: &Identity) -> Result<Vec<OrderWithLines>> {
    self.store.list_orders_by_owner(identity.user_id).await
  }

  /// Orders holding at least one of the seller's lines, newest first, each
  /// showing only that seller's lines.
  pub async fn seller_orders(&self, identity: &Identity) -> Result<Vec<SellerOrder>> {
    Self::require_farmer(identity, "view sold orders")?;
    let lines = self.store.list_order_lines_by_seller(identity.user_id).await?;

    let mut grouped: Vec<(OrderId, Vec<OrderLine>)> = Vec::new();
    for line in lines {
      match grouped.last_mut() {
        Some((order_id, group)) if *order_id == line.order_id => group.push(line),
        _ => grouped.push((line.order_id, vec![line])),
      }
    }

    let mut views = Vec::with_capacity(grouped.len());
    for (order_id, lines) in grouped {
      let order = self.store.get_order(order_id).await?.order;
      views.push(SellerOrder::from_order(&order, lines));
    }
    Ok(views)
  }

  /// Orders for the caller: what they bought, and for a seller, what they sold.
  pub async fn orders(&self, identity: &Identity) -> Result<OrderHistory> {
    let purchases = self.customer_orders(identity).await?;
    let sales = if identity.is_farmer() {
      self.seller_orders(identity).await?
    } else {
      Vec::new()
    };
    Ok(OrderHistory { purchases, sales })
  }

  /// A single order. Orders the caller has no part in read as not found.
  pub async fn order(&self, identity: &Identity, order_id: OrderId) -> Result<OrderView> {
    let placed = self.store.get_order(order_id).await?;
    if placed.order.owner_id == identity.user_id {
      return Ok(OrderView::Full(placed));
    }
    if identity.is_farmer() {
      let lines: Vec<OrderLine> = placed
        .lines
        .iter()
        .filter(|line| line.seller_id == identity.user_id)
        .cloned()
        .collect();
      if lines.is_empty() {
        return Err(MarketError::not_found("order", order_id));
      }
      return Ok(OrderView::Seller(SellerOrder::from_order(&placed.order, lines)));
    }
    Err(MarketError::not_found("order", order_id))
  }

  /// Sets an order's status on behalf of a seller holding a line in it.
  ///
  /// Any status may follow any other, including leaving delivered or cancelled.
  #[instrument(name = "marketplace::set_order_status", skip(self, input), fields(user_id = identity.user_id))]
  pub async fn set_order_status(
    &self,
    identity: &Identity,
    order_id: OrderId,
    input: &OrderStatusInput,
  ) -> Result<SellerOrder> {
    Self::require_farmer(identity, "update order status")?;
    let status = input.validate()?;
    let placed = self.store.get_order(order_id).await?;
    if !placed.lines.iter().any(|line| line.seller_id == identity.user_id) {
      return Err(MarketError::forbidden("order has no lines from this seller"));
    }
    if placed.order.status.is_terminal() && placed.order.status != status {
      warn!(
        order_id,
        from = %placed.order.status,
        to = %status,
        "Order leaving a terminal status."
      );
    }
    let updated = self.store.set_order_status(order_id, status).await?;
    info!(order_id, status = %status, "Order status updated.");
    let lines = updated
      .lines
      .into_iter()
      .filter(|line| line.seller_id == identity.user_id)
      .collect();
    Ok(SellerOrder::from_order(&updated.order, lines))
  }

  // --- Seller product management ---

  pub async fn seller_products(&self, identity: &Identity) -> Result<Vec<Product>> {
    Self::require_farmer(identity, "list their products")?;
    self.store.list_products_by_seller(identity.user_id).await
  }

  #[instrument(name = "marketplace::create_product", skip(self, input), fields(user_id = identity.user_id))]
  pub async fn create_product(&self, identity: &Identity, input: &ProductInput) -> Result<Product> {
    Self::require_farmer(identity, "create products")?;
    let data = input.validate_new(identity.user_id)?;
    let categories = self.store.list_categories().await?;
    if !categories.iter().any(|c| c.id == data.category_id) {
      return Err(MarketError::validation("categoryId", "unknown category"));
    }
    let product = self.store.create_product(data).await?;
    info!(product_id = product.id, "Product created.");
    Ok(product)
  }

  #[instrument(name = "marketplace::update_product", skip(self, input), fields(user_id = identity.user_id))]
  pub async fn update_product(
    &self,
    identity: &Identity,
    product_id: ProductId,
    input: &ProductInput,
  ) -> Result<Product> {
    Self::require_farmer(identity, "edit products")?;
    let patch = input.validate_patch()?;
    self.owned_product(identity, product_id).await?;
    self.store.update_product(product_id, patch).await
  }

  #[instrument(name = "marketplace::delete_product", skip(self), fields(user_id = identity.user_id))]
  pub async fn delete_product(&self, identity: &Identity, product_id: ProductId) -> Result<bool> {
    Self::require_farmer(identity, "delete products")?;
    self.owned_product(identity, product_id).await?;
    self.store.delete_product(product_id).await
  }

  // --- Reviews ---

  #[instrument(name = "marketplace::create_review", skip(self, input), fields(user_id = identity.user_id))]
  pub async fn create_review(
    &self,
    identity: &Identity,
    product_id: ProductId,
    input: &ReviewInput,
  ) -> Result<ReviewReceipt> {
    let review = input.validate(product_id)?;
    let review = self.store.create_review(identity.user_id, review).await?;
    let product = self.store.get_product(product_id).await?;
    Ok(ReviewReceipt { review, product })
  }
}
