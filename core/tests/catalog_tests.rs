// tests/catalog_tests.rs
mod common;

use common::*;
use harvest::{CatalogRepository, MarketError, ProductInput};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn stock_never_goes_negative_across_decrements() {
  let m = Market::new().await;
  let carrots = m.product(FARMER_A, "Carrots", 250, 5).await;

  let after = m.store.decrement_stock(carrots.id, 2).await.unwrap();
  assert_eq!(after.stock, 3);

  match m.store.decrement_stock(carrots.id, 4).await {
    Err(MarketError::InsufficientStock {
      product_id,
      available,
      requested,
    }) => {
      assert_eq!(product_id, carrots.id);
      assert_eq!(available, 3);
      assert_eq!(requested, 4);
    }
    other => panic!("expected InsufficientStock, got {:?}", other),
  }
  assert_eq!(m.store.get_product(carrots.id).await.unwrap().stock, 3);

  let emptied = m.store.decrement_stock(carrots.id, 3).await.unwrap();
  assert_eq!(emptied.stock, 0);
}

#[tokio::test]
#[serial]
async fn decrement_of_missing_product_is_not_found() {
  let m = Market::new().await;
  let err = m.store.decrement_stock(999, 1).await.unwrap_err();
  assert!(matches!(err, MarketError::NotFound { entity: "product", id: 999 }));
}

#[tokio::test]
#[serial]
async fn batch_decrement_is_all_or_nothing() {
  let m = Market::new().await;
  let kale = m.product(FARMER_A, "Kale", 300, 4).await;
  let eggs = m.product(FARMER_B, "Eggs", 600, 1).await;

  let err = m
    .store
    .decrement_stock_many(&[(kale.id, 2), (eggs.id, 2)])
    .await
    .unwrap_err();
  assert!(matches!(err, MarketError::InsufficientStock { product_id, .. } if product_id == eggs.id));
  assert_eq!(m.store.get_product(kale.id).await.unwrap().stock, 4);
  assert_eq!(m.store.get_product(eggs.id).await.unwrap().stock, 1);

  // Repeated entries for one product are summed before the check.
  let err = m
    .store
    .decrement_stock_many(&[(kale.id, 3), (kale.id, 2)])
    .await
    .unwrap_err();
  assert!(matches!(err, MarketError::InsufficientStock { available: 4, requested: 5, .. }));

  let updated = m
    .store
    .decrement_stock_many(&[(kale.id, 3), (eggs.id, 1)])
    .await
    .unwrap();
  assert_eq!(updated.len(), 2);
  assert_eq!(m.store.get_product(kale.id).await.unwrap().stock, 1);
  assert_eq!(m.store.get_product(eggs.id).await.unwrap().stock, 0);
}

#[tokio::test]
#[serial]
async fn listings_filter_by_category_seller_and_featured() {
  let m = Market::new().await;
  let carrots = m.product(FARMER_A, "Carrots", 250, 5).await;
  m.product(FARMER_B, "Beets", 275, 5).await;
  let milk = m
    .market
    .create_product(
      &farmer_b(),
      &ProductInput {
        name: Some("Whole Milk".to_string()),
        price_cents: Some(450),
        unit: Some("half gallon".to_string()),
        category_id: Some(m.dairy),
        featured: Some(true),
        ..Default::default()
      },
    )
    .await
    .unwrap();

  assert_eq!(m.market.list_products().await.unwrap().len(), 3);
  assert_eq!(m.market.products_in_category(m.vegetables).await.unwrap().len(), 2);

  let dairy = m.market.products_in_category(m.dairy).await.unwrap();
  assert_eq!(dairy.len(), 1);
  assert_eq!(dairy[0].id, milk.id);

  let featured = m.market.featured_products().await.unwrap();
  assert_eq!(featured.iter().map(|p| p.id).collect::<Vec<_>>(), vec![milk.id]);

  let mine = m.market.seller_products(&farmer_a()).await.unwrap();
  assert_eq!(mine.iter().map(|p| p.id).collect::<Vec<_>>(), vec![carrots.id]);

  let categories = m.market.categories().await.unwrap();
  assert_eq!(categories.len(), 2);
  assert_eq!(categories[1].slug, "dairy-eggs");
}

#[tokio::test]
#[serial]
async fn created_product_defaults_stock_and_rating_to_zero() {
  let m = Market::new().await;
  let product = m
    .market
    .create_product(
      &farmer_a(),
      &ProductInput {
        name: Some("  Garlic ".to_string()),
        price_cents: Some(150),
        category_id: Some(m.vegetables),
        ..Default::default()
      },
    )
    .await
    .unwrap();

  assert_eq!(product.name, "Garlic");
  assert_eq!(product.stock, 0);
  assert_eq!(product.unit, "each");
  assert_eq!(product.rating, 0.0);
  assert_eq!(product.review_count, 0);
  assert_eq!(product.seller_id, FARMER_A);
  assert!(!product.featured);
}

#[tokio::test]
#[serial]
async fn product_creation_checks_role_and_category() {
  let m = Market::new().await;
  let input = ProductInput {
    name: Some("Honey".to_string()),
    price_cents: Some(900),
    category_id: Some(m.vegetables),
    ..Default::default()
  };

  let err = m.market.create_product(&customer(), &input).await.unwrap_err();
  assert!(matches!(err, MarketError::Forbidden(_)));

  let unknown = ProductInput {
    category_id: Some(42),
    ..input.clone()
  };
  let err = m.market.create_product(&farmer_a(), &unknown).await.unwrap_err();
  assert!(matches!(err, MarketError::Validation { ref field, .. } if field == "categoryId"));

  let negative = ProductInput {
    price_cents: Some(-1),
    ..input
  };
  let err = m.market.create_product(&farmer_a(), &negative).await.unwrap_err();
  assert!(matches!(err, MarketError::Validation { ref field, .. } if field == "priceCents"));
  assert!(m.market.list_products().await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn sellers_update_and_delete_only_their_own_products() {
  let m = Market::new().await;
  let carrots = m.product(FARMER_A, "Carrots", 250, 5).await;
  let patch = ProductInput {
    price_cents: Some(275),
    stock: Some(12),
    ..Default::default()
  };

  let err = m.market.update_product(&farmer_b(), carrots.id, &patch).await.unwrap_err();
  assert!(matches!(err, MarketError::Forbidden(_)));
  let err = m.market.delete_product(&farmer_b(), carrots.id).await.unwrap_err();
  assert!(matches!(err, MarketError::Forbidden(_)));

  let updated = m.market.update_product(&farmer_a(), carrots.id, &patch).await.unwrap();
  assert_eq!(updated.price_cents, 275);
  assert_eq!(updated.stock, 12);
  assert_eq!(updated.name, "Carrots");

  let err = m
    .market
    .update_product(&farmer_a(), carrots.id, &ProductInput::default())
    .await
    .unwrap_err();
  assert!(matches!(err, MarketError::Validation { .. }));

  assert!(m.market.delete_product(&farmer_a(), carrots.id).await.unwrap());
  let err = m.market.product(carrots.id).await.unwrap_err();
  assert!(matches!(err, MarketError::NotFound { entity: "product", .. }));
  let err = m.market.delete_product(&farmer_a(), carrots.id).await.unwrap_err();
  assert!(matches!(err, MarketError::NotFound { .. }));
}

#[tokio::test]
#[serial]
async fn duplicate_category_slug_is_rejected() {
  let m = Market::new().await;
  let err = m.store.create_category("Veg", "vegetables").await.unwrap_err();
  assert!(matches!(err, MarketError::Validation { ref field, .. } if field == "slug"));
}

#[tokio::test]
#[serial]
async fn sellers_can_clear_description_and_image() {
  let m = Market::new().await;
  let eggs = m
    .market
    .create_product(
      &farmer_a(),
      &ProductInput {
        name: Some("Eggs".into()),
        description: Some("Brown, free range".into()),
        price_cents: Some(600),
        category_id: Some(m.dairy),
        image_url: Some("/img/eggs.jpg".into()),
        ..Default::default()
      },
    )
    .await
    .unwrap();
  assert_eq!(eggs.description.as_deref(), Some("Brown, free range"));

  // Absent fields are left alone.
  let repriced = ProductInput {
    price_cents: Some(650),
    ..Default::default()
  };
  let updated = m.market.update_product(&farmer_a(), eggs.id, &repriced).await.unwrap();
  assert_eq!(updated.description.as_deref(), Some("Brown, free range"));
  assert_eq!(updated.image_url.as_deref(), Some("/img/eggs.jpg"));

  let cleared = ProductInput {
    description: Some(String::new()),
    image_url: Some(" ".into()),
    ..Default::default()
  };
  let updated = m.market.update_product(&farmer_a(), eggs.id, &cleared).await.unwrap();
  assert_eq!(updated.description, None);
  assert_eq!(updated.image_url, None);
  assert_eq!(updated.price_cents, 650);
  assert_eq!(m.market.product(eggs.id).await.unwrap().description, None);
}
