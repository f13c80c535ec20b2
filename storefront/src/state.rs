// bikeshop_storefront/src/state.rs
use std::sync::Arc;

use bikeshop::{Backend, CartController, CatalogManager, StorefrontGrid};

use crate::config::AppConfig;
use crate::errors::Result;

/// One controller per page, all sharing the same backend.
///
/// Each controller's mounted view is shared by every visitor: the storefront
/// serves a single shop session, not one per user.
#[derive(Clone)]
pub struct AppState {
  pub catalog: Arc<CatalogManager>,
  pub storefront: Arc<StorefrontGrid>,
  pub cart: Arc<CartController>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(backend: Arc<dyn Backend>, config: Arc<AppConfig>) -> Result<Self> {
    let cart = CartController::new(Arc::clone(&backend))?.with_order_hide_delay(config.place_order_hide_delay);
    Ok(Self {
      catalog: Arc::new(CatalogManager::new(Arc::clone(&backend))?),
      storefront: Arc::new(StorefrontGrid::new(backend)),
      cart: Arc::new(cart),
      config,
    })
  }
}
