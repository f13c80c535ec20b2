// bikeshop/src/view.rs

//! View models for the three pages.
//!
//! A controller's "mounted" view is one of these structs. Every reload replaces
//! it wholesale; the only in-place edit is [`CatalogView::remove`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::model::{CartItem, Product, ProductId};

/// Formats a price with exactly two decimal places, e.g. `$9.50`.
///
/// Halves round away from zero (`1.125` shows as `$1.13`), not to even.
pub fn format_price(price: f64) -> String {
  let cents = (price * 100.0).round();
  format!("${:.2}", cents / 100.0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
  pub product_id: ProductId,
  pub title: String,
}

/// The registration page's product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogView {
  pub entries: Vec<CatalogEntry>,
}

impl CatalogView {
  pub fn from_products(products: &[Product]) -> Self {
    Self {
      entries: products
        .iter()
        .map(|p| CatalogEntry {
          product_id: p.id,
          title: p.title.clone(),
        })
        .collect(),
    }
  }

  /// Drops the entry for `product_id` only. Returns whether one was removed.
  pub fn remove(&mut self, product_id: ProductId) -> bool {
    let before = self.entries.len();
    self.entries.retain(|e| e.product_id != product_id);
    self.entries.len() != before
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
  pub product_id: ProductId,
  pub title: String,
  pub image_path: String,
  pub price_label: String,
}

/// The products page's card grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridView {
  pub cards: Vec<ProductCard>,
}

impl GridView {
  pub fn from_products(products: &[Product]) -> Self {
    Self {
      cards: products
        .iter()
        .map(|p| ProductCard {
          product_id: p.id,
          title: p.title.clone(),
          image_path: p.image_path.clone(),
          price_label: format_price(p.price),
        })
        .collect(),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
  pub product_id: ProductId,
  pub title: String,
  pub unit_price: f64,
  pub quantity: u32,
}

impl CartLine {
  pub fn price_label(&self) -> String {
    format_price(self.unit_price)
  }
}

/// Cart lines joined with their products, plus the running total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartView {
  pub lines: Vec<CartLine>,
  pub total: f64,
}

impl CartView {
  /// Joins each cart item to its product by id.
  ///
  /// Items whose product no longer exists are left out and add nothing to the total.
  pub fn reconcile(items: &[CartItem], products: &[Product]) -> Self {
    let by_id: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();

    let mut total = 0.0;
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
      let Some(product) = by_id.get(&item.product_id) else {
        continue;
      };
      total += product.price * f64::from(item.quantity);
      lines.push(CartLine {
        product_id: product.id,
        title: product.title.clone(),
        unit_price: product.price,
        quantity: item.quantity,
      });
    }

    Self { lines, total }
  }

  pub fn total_label(&self) -> String {
    format!("Total: {}", format_price(self.total))
  }

  pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
    self.lines.iter().find(|l| l.product_id == product_id).map(|l| l.quantity)
  }
}

/// The three cart line controls. Deserialises from the control names used in routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
  Decrease,
  Increase,
  Remove,
}

impl CartAction {
  pub fn as_str(&self) -> &'static str {
    match self {
      CartAction::Decrease => "decrease",
      CartAction::Increase => "increase",
      CartAction::Remove => "remove",
    }
  }
}

/// What a cart mutation does to the backend line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
  Set(u32),
  Delete,
}

/// Decides the new line state from the freshly fetched quantity.
///
/// A line never drops to zero: decreasing from one (or from nothing) deletes it.
/// Increasing a line already at `u32::MAX` is rejected.
pub fn next_change(action: CartAction, current: Option<u32>) -> StoreResult<QuantityChange> {
  let change = match action {
    CartAction::Decrease => match current {
      Some(quantity) if quantity > 1 => QuantityChange::Set(quantity - 1),
      _ => QuantityChange::Delete,
    },
    CartAction::Increase => {
      let quantity = current
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| StoreError::InvalidInput(format!("Quantity cannot go above {}.", u32::MAX)))?;
      QuantityChange::Set(quantity)
    }
    CartAction::Remove => QuantityChange::Delete,
  };
  Ok(change)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn product(id: ProductId, title: &str, price: f64) -> Product {
    Product {
      id,
      title: title.to_string(),
      description: String::new(),
      price,
      image_path: format!("static/images/{id}.png"),
    }
  }

  #[test]
  fn prices_always_have_two_decimals() {
    assert_eq!(format_price(9.5), "$9.50");
    assert_eq!(format_price(0.0), "$0.00");
    assert_eq!(format_price(1249.0), "$1249.00");
    assert_eq!(format_price(39.999), "$40.00");
  }

  #[test]
  fn price_halves_round_up() {
    assert_eq!(format_price(0.125), "$0.13");
    assert_eq!(format_price(1.125), "$1.13");
    assert_eq!(format_price(4.625), "$4.63");
    assert_eq!(format_price(10.375), "$10.38");
    // 1.005 is stored just below the half, so it stays down.
    assert_eq!(format_price(1.005), "$1.00");
  }

  #[test]
  fn totals_on_a_half_cent_round_up() {
    let products = vec![product(1, "Spoke", 0.125)];
    let view = CartView::reconcile(&[CartItem::new(1, 9)], &products);
    assert_eq!(view.total_label(), "Total: $1.13");
  }

  #[test]
  fn reconcile_joins_and_totals() {
    let products = vec![product(1, "Widget", 9.5)];
    let view = CartView::reconcile(&[CartItem::new(1, 2)], &products);

    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].title, "Widget");
    assert_eq!(view.lines[0].price_label(), "$9.50");
    assert_eq!(view.lines[0].quantity, 2);
    assert_eq!(view.total_label(), "Total: $19.00");
  }

  #[test]
  fn reconcile_skips_items_without_a_product() {
    let products = vec![product(1, "Widget", 9.5), product(2, "Bell", 4.25)];
    let items = vec![CartItem::new(2, 2), CartItem::new(99, 5), CartItem::new(1, 1)];
    let view = CartView::reconcile(&items, &products);

    let ids: Vec<_> = view.lines.iter().map(|l| l.product_id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(view.total_label(), "Total: $18.00");
    assert_eq!(view.quantity_of(99), None);
  }

  #[test]
  fn empty_cart_totals_zero() {
    assert_eq!(CartView::reconcile(&[], &[]).total_label(), "Total: $0.00");
  }

  #[test]
  fn next_change_never_leaves_a_zero_quantity() {
    let change = |action, current| next_change(action, current).unwrap();
    assert_eq!(change(CartAction::Decrease, Some(3)), QuantityChange::Set(2));
    assert_eq!(change(CartAction::Decrease, Some(1)), QuantityChange::Delete);
    assert_eq!(change(CartAction::Decrease, None), QuantityChange::Delete);
    assert_eq!(change(CartAction::Increase, Some(2)), QuantityChange::Set(3));
    assert_eq!(change(CartAction::Increase, None), QuantityChange::Set(1));
    assert_eq!(change(CartAction::Remove, Some(4)), QuantityChange::Delete);
  }

  #[test]
  fn increase_at_the_quantity_ceiling_is_rejected() {
    let err = next_change(CartAction::Increase, Some(u32::MAX)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
    assert_eq!(
      next_change(CartAction::Increase, Some(u32::MAX - 1)).unwrap(),
      QuantityChange::Set(u32::MAX)
    );
    assert_eq!(
      next_change(CartAction::Decrease, Some(u32::MAX)).unwrap(),
      QuantityChange::Set(u32::MAX - 1)
    );
  }

  #[test]
  fn catalog_remove_touches_only_its_own_entry() {
    let mut view = CatalogView::from_products(&[product(1, "A", 1.0), product(2, "B", 2.0), product(3, "C", 3.0)]);
    assert!(view.remove(2));
    assert!(!view.remove(2));
    let ids: Vec<_> = view.entries.iter().map(|e| e.product_id).collect();
    assert_eq!(ids, vec![1, 3]);
  }

  #[test]
  fn cart_action_parses_from_control_names() {
    let action: CartAction = serde_json::from_str("\"decrease\"").unwrap();
    assert_eq!(action, CartAction::Decrease);
    assert_eq!(CartAction::Increase.as_str(), "increase");
  }
}
