// bikeshop/src/model/cart_item.rs

use serde::{Deserialize, Serialize};

use super::ProductId;

/// One cart line as returned by `GET /cart`.
///
/// The backend keeps a single line per product; the client does not verify it.
/// The backend's own row id is not needed here and is ignored when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
  pub product_id: ProductId,
  pub quantity: u32,
}

impl CartItem {
  pub fn new(product_id: ProductId, quantity: u32) -> Self {
    Self { product_id, quantity }
  }
}
