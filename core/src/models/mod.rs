// core/src/models/mod.rs

//! Records held by the marketplace store and the views built from them.

pub mod cart;
pub mod category;
pub mod identity;
pub mod order;
pub mod product;
pub mod review;

pub use cart::{CartItemView, CartLine, CartView};
pub use category::Category;
pub use identity::{Identity, Role};
pub use order::{NewOrderLine, Order, OrderLine, OrderStatus, OrderWithLines, SellerOrder, ShippingInfo};
pub use product::{NewProduct, Product, ProductPatch};
pub use review::{NewReview, Review};

pub type UserId = u64;
pub type ProductId = u64;
pub type CategoryId = u64;
pub type CartLineId = u64;
pub type OrderId = u64;
pub type OrderLineId = u64;
pub type ReviewId = u64;
