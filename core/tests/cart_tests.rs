// tests/cart_tests.rs
mod common;

use common::*;
use harvest::{AddToCartInput, CartQuantityInput, CatalogRepository, MarketError, ProductInput};
use serial_test::serial;

fn add(product_id: u64, quantity: i64) -> AddToCartInput {
  AddToCartInput { product_id, quantity }
}

#[tokio::test]
#[serial]
async fn adding_the_same_product_twice_merges_into_one_line() {
  let m = Market::new().await;
  let a = m.product(FARMER_A, "Product A", 300, 5).await;

  let first = m.market.add_to_cart(&customer(), &add(a.id, 1)).await.unwrap();
  let second = m.market.add_to_cart(&customer(), &add(a.id, 2)).await.unwrap();
  assert_eq!(first.id, second.id);
  assert_eq!(second.quantity, 3);

  let cart = m.market.cart(&customer()).await.unwrap();
  assert_eq!(cart.items.len(), 1);
  assert_eq!(cart.items[0].line.quantity, 3);
  assert_eq!(cart.item_count, 3);
  assert_eq!(cart.snapshot_subtotal_cents, 900);
}

#[tokio::test]
#[serial]
async fn carts_are_kept_per_owner() {
  let m = Market::new().await;
  let a = m.product(FARMER_A, "Product A", 300, 5).await;

  m.market.add_to_cart(&customer(), &add(a.id, 1)).await.unwrap();
  m.market.add_to_cart(&other_customer(), &add(a.id, 2)).await.unwrap();

  let mine = m.market.cart(&customer()).await.unwrap();
  let theirs = m.market.cart(&other_customer()).await.unwrap();
  assert_eq!(mine.item_count, 1);
  assert_eq!(theirs.item_count, 2);
  assert_ne!(mine.items[0].line.id, theirs.items[0].line.id);
}

#[tokio::test]
#[serial]
async fn cart_line_keeps_the_price_from_when_it_was_added() {
  let m = Market::new().await;
  let a = m.product(FARMER_A, "Product A", 300, 5).await;
  m.market.add_to_cart(&customer(), &add(a.id, 1)).await.unwrap();

  m.market
    .update_product(
      &farmer_a(),
      a.id,
      &ProductInput {
        price_cents: Some(450),
        ..Default::default()
      },
    )
    .await
    .unwrap();

  let merged = m.market.add_to_cart(&customer(), &add(a.id, 1)).await.unwrap();
  assert_eq!(merged.unit_price_cents, 300);

  let cart = m.market.cart(&customer()).await.unwrap();
  assert_eq!(cart.snapshot_subtotal_cents, 600);
  let product = cart.items[0].product.as_ref().unwrap();
  assert_eq!(product.price_cents, 450);
}

#[tokio::test]
#[serial]
async fn add_to_cart_checks_existing_quantity_against_stock() {
  let m = Market::new().await;
  let a = m.product(FARMER_A, "Product A", 300, 3).await;

  m.market.add_to_cart(&customer(), &add(a.id, 2)).await.unwrap();
  let err = m.market.add_to_cart(&customer(), &add(a.id, 2)).await.unwrap_err();
  match err {
    MarketError::InsufficientStock {
      product_id,
      available,
      requested,
    } => {
      assert_eq!(product_id, a.id);
      assert_eq!(available, 3);
      assert_eq!(requested, 4);
    }
    other => panic!("expected InsufficientStock, got {:?}", other),
  }
  assert_eq!(m.market.cart(&customer()).await.unwrap().item_count, 2);
}

#[tokio::test]
#[serial]
async fn add_to_cart_rejects_bad_quantity_and_unknown_product() {
  let m = Market::new().await;
  let a = m.product(FARMER_A, "Product A", 300, 3).await;

  let err = m.market.add_to_cart(&customer(), &add(a.id, 0)).await.unwrap_err();
  assert!(matches!(err, MarketError::Validation { ref field, .. } if field == "quantity"));

  let err = m.market.add_to_cart(&customer(), &add(777, 1)).await.unwrap_err();
  assert!(matches!(err, MarketError::NotFound { entity: "product", id: 777 }));
  assert!(m.market.cart(&customer()).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn another_users_cart_line_is_forbidden() {
  let m = Market::new().await;
  let a = m.product(FARMER_A, "Product A", 300, 5).await;
  let line = m.market.add_to_cart(&customer(), &add(a.id, 1)).await.unwrap();

  let err = m
    .market
    .update_cart_line(&other_customer(), line.id, &CartQuantityInput { quantity: 2 })
    .await
    .unwrap_err();
  assert!(matches!(err, MarketError::Forbidden(_)));

  let err = m.market.remove_cart_line(&other_customer(), line.id).await.unwrap_err();
  assert!(matches!(err, MarketError::Forbidden(_)));
  assert_eq!(m.market.cart(&customer()).await.unwrap().item_count, 1);
}

#[tokio::test]
#[serial]
async fn update_remove_and_clear() {
  let m = Market::new().await;
  let a = m.product(FARMER_A, "Product A", 300, 5).await;
  let b = m.product(FARMER_B, "Product B", 1000, 1).await;
  let line_a = m.market.add_to_cart(&customer(), &add(a.id, 1)).await.unwrap();
  let line_b = m.market.add_to_cart(&customer(), &add(b.id, 1)).await.unwrap();

  let updated = m
    .market
    .update_cart_line(&customer(), line_a.id, &CartQuantityInput { quantity: 4 })
    .await
    .unwrap();
  assert_eq!(updated.quantity, 4);

  let err = m
    .market
    .update_cart_line(&customer(), line_a.id, &CartQuantityInput { quantity: 6 })
    .await
    .unwrap_err();
  assert!(matches!(err, MarketError::InsufficientStock { available: 5, requested: 6, .. }));

  let err = m
    .market
    .update_cart_line(&customer(), line_a.id, &CartQuantityInput { quantity: 0 })
    .await
    .unwrap_err();
  assert!(matches!(err, MarketError::Validation { .. }));

  assert!(m.market.remove_cart_line(&customer(), line_b.id).await.unwrap());
  let err = m.market.remove_cart_line(&customer(), line_b.id).await.unwrap_err();
  assert!(matches!(err, MarketError::NotFound { entity: "cart line", .. }));

  assert!(m.market.clear_cart(&customer()).await.unwrap());
  assert!(!m.market.clear_cart(&customer()).await.unwrap());
  assert!(m.market.cart(&customer()).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn cart_view_tolerates_deleted_products() {
  let m = Market::new().await;
  let a = m.product(FARMER_A, "Product A", 300, 5).await;
  m.market.add_to_cart(&customer(), &add(a.id, 2)).await.unwrap();
  assert!(m.store.delete_product(a.id).await.unwrap());

  let cart = m.market.cart(&customer()).await.unwrap();
  assert_eq!(cart.items.len(), 1);
  assert!(cart.items[0].product.is_none());
  assert_eq!(cart.snapshot_subtotal_cents, 600);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn concurrent_adds_by_one_owner_cannot_overshoot_stock() {
  let m = Market::new().await;
  let a = m.product(FARMER_A, "Product A", 300, 3).await;

  let mut handles = Vec::new();
  for _ in 0..2 {
    let market = m.market.clone();
    let product_id = a.id;
    handles.push(tokio::spawn(async move { market.add_to_cart(&customer(), &add(product_id, 2)).await }));
  }

  let mut added = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(line) => {
        added += 1;
        assert_eq!(line.quantity, 2);
      }
      Err(MarketError::InsufficientStock {
        available, requested, ..
      }) => {
        assert_eq!(available, 3);
        assert_eq!(requested, 4);
      }
      Err(other) => panic!("unexpected add to cart error: {:?}", other),
    }
  }
  assert_eq!(added, 1);

  let cart = m.market.cart(&customer()).await.unwrap();
  assert_eq!(cart.items.len(), 1);
  assert_eq!(cart.item_count, 2);
}
