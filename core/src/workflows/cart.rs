// core/src/workflows/cart.rs
use crate::error::MarketError;
use crate::flow::{ContextData, FlowError, Pipeline, StepControl, StepDef};
use crate::store::{CartRepository, CatalogRepository};
use crate::workflows::contexts::AddToCartCtxData;
use tracing::{info, warn};

pub const FETCH_PRODUCT: &str = "fetch_product_for_cart";
pub const CHECK_STOCK: &str = "check_stock_for_cart";
pub const ADD_OR_MERGE_LINE: &str = "add_or_merge_cart_line";

/// Builds the add-to-cart workflow. The quantity is validated before the run.
pub fn add_to_cart_pipeline() -> Result<Pipeline<AddToCartCtxData, MarketError>, FlowError> {
  let mut p = Pipeline::<AddToCartCtxData, MarketError>::new(
    "add_to_cart",
    vec![
      StepDef::required(FETCH_PRODUCT),
      StepDef::required(CHECK_STOCK),
      StepDef::required(ADD_OR_MERGE_LINE),
    ],
  );

  p.on(FETCH_PRODUCT, |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (store, product_id) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.product_id)
      };
      let product = store.get_product(product_id).await?;
      info!(
        "Add to Cart (Product {}): found '{}', stock {}.",
        product.id, product.name, product.stock
      );
      ctx_data.write().product = Some(product);
      Ok::<_, MarketError>(StepControl::Continue)
    })
  })?;

  // The line may already hold some of this product; the merged quantity is what must fit.
  p.on(CHECK_STOCK, |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (store, owner_id, product, quantity) = {
        let guard = ctx_data.read();
        let product = guard
          .product
          .clone()
          .ok_or_else(|| MarketError::Internal("product not resolved before stock check".to_string()))?;
        (guard.store.clone(), guard.owner_id, product, guard.quantity)
      };
      let already_in_cart: u32 = store
        .cart_lines(owner_id)
        .await?
        .iter()
        .filter(|line| line.product_id == product.id)
        .map(|line| line.quantity)
        .sum();
      let requested = already_in_cart.saturating_add(quantity);
      if requested > product.stock {
        warn!(
          "Add to Cart (Product {}): insufficient stock. Available: {}, Requested: {}.",
          product.id, product.stock, requested
        );
        return Err(MarketError::InsufficientStock {
          product_id: product.id,
          available: product.stock,
          requested,
        });
      }
      Ok::<_, MarketError>(StepControl::Continue)
    })
  })?;

  p.on(ADD_OR_MERGE_LINE, |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (store, owner_id, product_id, quantity) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.owner_id, guard.product_id, guard.quantity)
      };
      let line = store.add_cart_line(owner_id, product_id, quantity).await?;
      info!(
        "Add to Cart (User {}): line {} now holds {} of product {}.",
        owner_id, line.id, line.quantity, product_id
      );
      ctx_data.write().updated_line = Some(line);
      Ok::<_, MarketError>(StepControl::Continue)
    })
  })?;

  Ok(p)
}
