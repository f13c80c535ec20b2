// bikeshop/src/controllers/storefront.rs

use std::sync::Arc;

use tracing::{info, instrument};

use crate::api::Backend;
use crate::error::StoreResult;
use crate::flow::SharedState;
use crate::model::ProductId;
use crate::view::GridView;

/// Products page: a card per product with an "add to cart" control.
pub struct StorefrontGrid {
  backend: Arc<dyn Backend>,
  mounted: SharedState<GridView>,
}

impl StorefrontGrid {
  pub fn new(backend: Arc<dyn Backend>) -> Self {
    Self {
      backend,
      mounted: SharedState::default(),
    }
  }

  pub fn view(&self) -> GridView {
    self.mounted.snapshot()
  }

  #[instrument(name = "storefront::load_products", skip(self), err(Display))]
  pub async fn load_products(&self) -> StoreResult<GridView> {
    let products = self.backend.list_products().await?;
    let view = GridView::from_products(&products);
    self.mounted.replace(view.clone());
    info!(cards = view.cards.len(), "Product grid loaded.");
    Ok(view)
  }

  /// Asks the backend to add one unit of `product_id`. The grid itself is unchanged.
  #[instrument(name = "storefront::add_to_cart", skip(self), err(Display))]
  pub async fn add_to_cart(&self, product_id: ProductId) -> StoreResult<()> {
    self.backend.add_to_cart(product_id).await?;
    info!(product_id, "Product added to cart.");
    Ok(())
  }
}
