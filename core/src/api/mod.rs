// bikeshop/src/api/mod.rs

//! The seam between the page controllers and the REST backend.
//!
//! Controllers only ever talk to a `dyn Backend`. [`HttpBackend`] is the real
//! request helper; [`InMemoryBackend`] stands in for it in tests and offline demos.

pub mod http;
pub mod memory;

pub use http::{HttpBackend, HttpBackendConfig};
pub use memory::{BackendCall, InMemoryBackend};

use crate::error::StoreResult;
use crate::model::{CartItem, NewProduct, Product, ProductId};
use async_trait::async_trait;

#[async_trait]
pub trait Backend: Send + Sync {
  /// `GET /products`
  async fn list_products(&self) -> StoreResult<Vec<Product>>;

  /// `POST /products` as a multipart form.
  async fn create_product(&self, product: &NewProduct) -> StoreResult<()>;

  /// `DELETE /products/{id}`
  async fn delete_product(&self, product_id: ProductId) -> StoreResult<()>;

  /// `GET /cart`
  async fn list_cart(&self) -> StoreResult<Vec<CartItem>>;

  /// `POST /cart` with `{product_id}`. The backend starts new lines at quantity 1.
  async fn add_to_cart(&self, product_id: ProductId) -> StoreResult<()>;

  /// `PUT /cart/{id}` with `{quantity}`.
  async fn update_cart_item(&self, product_id: ProductId, quantity: u32) -> StoreResult<()>;

  /// `DELETE /cart/{id}`
  async fn remove_cart_item(&self, product_id: ProductId) -> StoreResult<()>;
}
