// tests/storefront_tests.rs
mod common;
use common::*;

use bikeshop::{BackendCall, CartItem, FailureKind, StorefrontGrid};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_grid_shows_a_card_per_product() {
  setup_tracing();
  let (_memory, backend) = backend_with(vec![widget(), gadget()], vec![]);
  let grid = StorefrontGrid::new(backend);

  let view = grid.load_products().await.unwrap();

  assert_eq!(view.cards.len(), 2);
  assert_eq!(view.cards[0].title, "Widget");
  assert_eq!(view.cards[0].price_label, "$9.50");
  assert_eq!(view.cards[0].image_path, "static/images/1.jpg");
  assert_eq!(view.cards[1].price_label, "$20.00");
  assert_eq!(grid.view(), view);
}

#[tokio::test]
#[serial]
async fn test_add_to_cart_posts_and_leaves_grid_alone() {
  setup_tracing();
  let (memory, backend) = backend_with(vec![widget()], vec![]);
  let grid = StorefrontGrid::new(backend);
  let before = grid.load_products().await.unwrap();
  memory.clear_calls();

  grid.add_to_cart(1).await.unwrap();
  grid.add_to_cart(1).await.unwrap();

  assert_eq!(memory.calls(), vec![BackendCall::AddToCart(1), BackendCall::AddToCart(1)]);
  assert_eq!(memory.cart(), vec![CartItem::new(1, 2)]);
  assert_eq!(grid.view(), before);
}

#[tokio::test]
#[serial]
async fn test_add_to_cart_failure_is_reported() {
  setup_tracing();
  let (memory, backend) = backend_with(vec![widget()], vec![]);
  let grid = StorefrontGrid::new(backend);
  memory.fail_with_status(Some(500));

  let err = grid.add_to_cart(1).await.unwrap_err();

  assert_eq!(err.kind(), FailureKind::Status(500));
  memory.fail_with_status(None);
  assert!(memory.cart().is_empty());
}

#[tokio::test]
#[serial]
async fn test_add_to_cart_at_quantity_ceiling_is_rejected() {
  setup_tracing();
  let (memory, backend) = backend_with(vec![widget()], vec![CartItem::new(1, u32::MAX)]);
  let grid = StorefrontGrid::new(backend);

  let err = grid.add_to_cart(1).await.unwrap_err();

  assert_eq!(err.kind(), FailureKind::Validation);
  assert_eq!(memory.cart(), vec![CartItem::new(1, u32::MAX)]);
}
