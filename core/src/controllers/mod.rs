// bikeshop/src/controllers/mod.rs

//! One controller per page. Each owns the page's mounted view and updates it
//! only through backend round trips.

pub mod cart;
pub mod catalog;
pub mod storefront;

pub use cart::{CartController, MutationOutcome, OrderButton};
pub use catalog::CatalogManager;
pub use storefront::StorefrontGrid;

use crate::error::StoreError;

/// Result of an action that mutates the backend and then reloads its page.
///
/// The mutation succeeded. If the follow-up reload failed, `view` is the
/// previously mounted view and `reload_error` says why.
#[derive(Debug)]
pub struct Reloaded<V> {
  pub view: V,
  pub reload_error: Option<StoreError>,
}

impl<V> Reloaded<V> {
  pub fn fresh(view: V) -> Self {
    Self {
      view,
      reload_error: None,
    }
  }

  pub fn stale(view: V, error: StoreError) -> Self {
    Self {
      view,
      reload_error: Some(error),
    }
  }
}
