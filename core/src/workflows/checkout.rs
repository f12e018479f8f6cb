// core/src/workflows/checkout.rs

//! The checkout workflow: turns an owner's cart into one pending order.
//!
//! Validation steps (`load_cart`, `resolve_products`, `validate_stock`,
//! `price_order`) only read. The first failure among them ends the run with
//! every repository untouched. The commit steps then take the stock, write
//! the order and its lines, and remove the ordered lines from the cart.
//! Stock is taken first through the all-or-nothing batch decrement, so a
//! shortfall that appears between validation and commit still aborts before
//! any order row exists; the two writes after it cannot fail against the
//! in-memory store.

use crate::error::MarketError;
use crate::flow::{ContextData, FlowError, Pipeline, StepControl, StepDef};
use crate::models::NewOrderLine;
use crate::store::{CartRepository, CatalogRepository, OrderRepository};
use crate::workflows::contexts::CheckoutCtxData;
use tracing::{info, warn};

pub const LOAD_CART: &str = "load_cart";
pub const RESOLVE_PRODUCTS: &str = "resolve_products";
pub const VALIDATE_STOCK: &str = "validate_stock";
pub const PRICE_ORDER: &str = "price_order";
pub const RESERVE_STOCK: &str = "reserve_stock";
pub const CREATE_ORDER: &str = "create_order";
pub const CLEAR_CART: &str = "clear_cart";

pub fn checkout_pipeline() -> Result<Pipeline<CheckoutCtxData, MarketError>, FlowError> {
  let mut p = Pipeline::<CheckoutCtxData, MarketError>::new(
    "checkout",
    vec![
      StepDef::required(LOAD_CART),
      StepDef::required(RESOLVE_PRODUCTS),
      StepDef::required(VALIDATE_STOCK),
      StepDef::required(PRICE_ORDER),
      StepDef::required(RESERVE_STOCK),
      StepDef::required(CREATE_ORDER),
      StepDef::required(CLEAR_CART),
    ],
  );

  p.on(LOAD_CART, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, owner_id) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.owner_id)
      };
      let lines = store.cart_lines(owner_id).await?;
      if lines.is_empty() {
        warn!("Checkout (User {}): cart is empty.", owner_id);
        return Err(MarketError::EmptyCart);
      }
      info!("Checkout (User {}): {} cart line(s) loaded.", owner_id, lines.len());
      ctx_data.write().cart_lines = lines;
      Ok::<_, MarketError>(StepControl::Continue)
    })
  })?;

  p.on(RESOLVE_PRODUCTS, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, product_ids) = {
        let guard = ctx_data.read();
        let ids: Vec<_> = guard.cart_lines.iter().map(|line| line.product_id).collect();
        (guard.store.clone(), ids)
      };
      let mut products = Vec::with_capacity(product_ids.len());
      for product_id in product_ids {
        // A deleted product leaves a dangling cart line; that is a NotFound, not a skip.
        products.push(store.get_product(product_id).await?);
      }
      ctx_data.write().products = products;
      Ok::<_, MarketError>(StepControl::Continue)
    })
  })?;

  p.on(VALIDATE_STOCK, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      for (line, product) in guard.cart_lines.iter().zip(&guard.products) {
        if line.quantity > product.stock {
          warn!(
            "Checkout (User {}): insufficient stock for product {}. Available: {}, Requested: {}.",
            guard.owner_id, product.id, product.stock, line.quantity
          );
          return Err(MarketError::InsufficientStock {
            product_id: product.id,
            available: product.stock,
            requested: line.quantity,
          });
        }
      }
      Ok::<_, MarketError>(StepControl::Continue)
    })
  })?;

  // Priced from the catalog as it is now, not from the cart's add-time snapshot.
  p.on(PRICE_ORDER, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let order_lines: Vec<NewOrderLine> = guard
        .cart_lines
        .iter()
        .zip(&guard.products)
        .map(|(line, product)| NewOrderLine {
          product_id: product.id,
          seller_id: product.seller_id,
          quantity: line.quantity,
          price_cents: product.price_cents,
        })
        .collect();
      let total_cents = order_lines.iter().map(NewOrderLine::subtotal_cents).sum();
      let stale_lines = guard
        .cart_lines
        .iter()
        .zip(&guard.products)
        .filter(|(line, product)| line.unit_price_cents != product.price_cents)
        .count();
      if stale_lines > 0 {
        info!(
          "Checkout (User {}): {} line(s) repriced since they were added to the cart.",
          guard.owner_id, stale_lines
        );
      }
      guard.order_lines = order_lines;
      guard.total_cents = total_cents;
      Ok::<_, MarketError>(StepControl::Continue)
    })
  })?;

  p.on(RESERVE_STOCK, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, items) = {
        let guard = ctx_data.read();
        let items: Vec<_> = guard
          .order_lines
          .iter()
          .map(|line| (line.product_id, line.quantity))
          .collect();
        (guard.store.clone(), items)
      };
      store.decrement_stock_many(&items).await?;
      Ok::<_, MarketError>(StepControl::Continue)
    })
  })?;

  p.on(CREATE_ORDER, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, owner_id, request, order_lines) = {
        let guard = ctx_data.read();
        (
          guard.store.clone(),
          guard.owner_id,
          guard.request.clone(),
          guard.order_lines.clone(),
        )
      };
      let order = store
        .create_order(owner_id, request.shipping, request.payment_method, order_lines)
        .await?;
      ctx_data.write().order = Some(order);
      Ok::<_, MarketError>(StepControl::Continue)
    })
  })?;

  p.after(CREATE_ORDER, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      if let Some(placed) = &guard.order {
        info!(
          "Checkout (Order {}): placed for user {} with {} line(s), total {} cents.",
          placed.order.id,
          placed.order.owner_id,
          placed.lines.len(),
          placed.order.total_cents
        );
      }
      Ok::<_, MarketError>(StepControl::Continue)
    })
  })?;

  // Only the lines that were ordered; anything added to the cart since `load_cart` stays.
  p.on(CLEAR_CART, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, owner_id, line_ids) = {
        let guard = ctx_data.read();
        let ids: Vec<_> = guard.cart_lines.iter().map(|line| line.id).collect();
        (guard.store.clone(), guard.owner_id, ids)
      };
      let removed = store.remove_cart_lines(&line_ids).await?;
      if removed < line_ids.len() {
        warn!(
          "Checkout (User {}): {} of {} ordered cart line(s) were already gone.",
          owner_id,
          line_ids.len() - removed,
          line_ids.len()
        );
      }
      Ok::<_, MarketError>(StepControl::Continue)
    })
  })?;

  Ok(p)
}
