// core/src/lib.rs

//! Harvest: the core of a farm-to-table marketplace.
//!
//! Farmers list products; customers browse, fill a cart and check out into
//! orders that farmers then fulfil. This crate holds:
//!  - the records (`models`) and the typed, validated request shapes (`input`),
//!  - repository traits with an in-memory store (`store`),
//!  - a small async step-pipeline engine (`flow`) and the workflows built on
//!    it (`workflows`): add-to-cart and checkout,
//!  - `Marketplace`, the facade applying identity and role rules.
//!
//! ```ignore
//! let store = Arc::new(MemoryStore::new());
//! let market = Marketplace::new(store.clone())?;
//! market.add_to_cart(&Identity::customer(1), &AddToCartInput { product_id: 3, quantity: 2 }).await?;
//! let order = market.checkout(&Identity::customer(1), &checkout_input).await?;
//! ```

pub mod error;
pub mod flow;
pub mod input;
pub mod marketplace;
pub mod models;
pub mod store;
pub mod workflows;

pub use crate::error::{MarketError, Result};
pub use crate::flow::{ContextData, FlowError, FlowOutcome, Pipeline, StepControl, StepDef, Workflows};
pub use crate::input::{
  AddToCartInput, CartQuantityInput, CheckoutInput, CheckoutRequest, OrderStatusInput, ProductInput, ReviewInput,
};
pub use crate::marketplace::{Marketplace, OrderHistory, OrderView, ReviewReceipt};
pub use crate::models::{
  CartItemView, CartLine, CartLineId, CartView, Category, CategoryId, Identity, NewOrderLine, NewProduct, NewReview,
  Order, OrderId, OrderLine, OrderLineId, OrderStatus, OrderWithLines, Product, ProductId, ProductPatch, Review,
  ReviewId, Role, SellerOrder, ShippingInfo, UserId,
};
pub use crate::store::{
  CartRepository, CatalogRepository, MarketStore, MemoryStore, OrderRepository, ReviewRepository, StoreSnapshot,
};
