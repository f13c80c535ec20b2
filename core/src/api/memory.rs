// bikeshop/src/api/memory.rs

//! A mock backend living in-process.
//!
//! Behaves like the shop's REST service closely enough for the controllers:
//! ids are assigned here, one cart line is kept per product, and missing
//! rows are reported as 404s. Every call is recorded so tests can assert on
//! the exact traffic a controller produced.

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{info, instrument, warn};

use super::Backend;
use crate::error::{StoreError, StoreResult};
use crate::model::{CartItem, NewProduct, Product, ProductId};

/// A request as the REST backend would have received it.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
  ListProducts,
  CreateProduct { title: String, price: f64 },
  DeleteProduct(ProductId),
  ListCart,
  AddToCart(ProductId),
  UpdateCartItem { product_id: ProductId, quantity: u32 },
  RemoveCartItem(ProductId),
}

#[derive(Debug, Default)]
struct MemoryState {
  products: Vec<Product>,
  cart: Vec<CartItem>,
  next_product_id: ProductId,
  calls: Vec<BackendCall>,
  failing_status: Option<u16>,
}

#[derive(Debug, Default)]
pub struct InMemoryBackend {
  state: Mutex<MemoryState>,
}

impl InMemoryBackend {
  pub fn new() -> Self {
    Self::default()
  }

  /// Starts from the given catalog and cart. Later products get ids above the highest seeded one.
  pub fn with_data(products: Vec<Product>, cart: Vec<CartItem>) -> Self {
    let next_product_id = products.iter().map(|p| p.id).max().unwrap_or(0);
    Self {
      state: Mutex::new(MemoryState {
        products,
        cart,
        next_product_id,
        ..MemoryState::default()
      }),
    }
  }

  /// A handful of bikes and parts for running the storefront without a backend.
  pub fn seed_demo_catalog(&self) {
    let demo = [
      ("Trail Hardtail 29", "Aluminium frame, 120mm fork", 1249.0, "static/images/hardtail.jpg"),
      ("City Commuter", "Fenders, rack and dynamo lights", 689.5, "static/images/commuter.jpg"),
      ("Chain Lube", "Dry conditions, 120ml", 9.5, "static/images/lube.jpg"),
      ("Floor Pump", "Presta and Schrader, 11 bar", 39.99, "static/images/pump.jpg"),
    ];

    let mut state = self.state.lock();
    for (title, description, price, image_path) in demo {
      state.next_product_id += 1;
      let id = state.next_product_id;
      state.products.push(Product {
        id,
        title: title.to_string(),
        description: description.to_string(),
        price,
        image_path: image_path.to_string(),
      });
    }
    info!(count = state.products.len(), "In-memory backend seeded with demo catalog.");
  }

  /// Makes every following call fail with `status`, or restores normal service with `None`.
  pub fn fail_with_status(&self, status: Option<u16>) {
    self.state.lock().failing_status = status;
  }

  pub fn calls(&self) -> Vec<BackendCall> {
    self.state.lock().calls.clone()
  }

  pub fn clear_calls(&self) {
    self.state.lock().calls.clear();
  }

  pub fn products(&self) -> Vec<Product> {
    self.state.lock().products.clone()
  }

  pub fn cart(&self) -> Vec<CartItem> {
    self.state.lock().cart.clone()
  }

  /// Records `call` and applies the configured failure, if any.
  fn begin(&self, state: &mut MemoryState, call: BackendCall, method: &str, path: String) -> StoreResult<()> {
    state.calls.push(call);
    match state.failing_status {
      Some(status) => {
        warn!(method, path = %path, status, "In-memory backend failing request as configured.");
        Err(StoreError::Status {
          method: method.to_string(),
          path,
          status,
        })
      }
      None => Ok(()),
    }
  }
}

fn missing(method: &str, path: String) -> StoreError {
  StoreError::Status {
    method: method.to_string(),
    path,
    status: 404,
  }
}

#[async_trait]
impl Backend for InMemoryBackend {
  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    let mut state = self.state.lock();
    self.begin(&mut state, BackendCall::ListProducts, "GET", "/products".to_string())?;
    Ok(state.products.clone())
  }

  #[instrument(name = "memory_backend::create_product", skip(self, product), fields(title = %product.title))]
  async fn create_product(&self, product: &NewProduct) -> StoreResult<()> {
    let mut state = self.state.lock();
    let call = BackendCall::CreateProduct {
      title: product.title.clone(),
      price: product.price,
    };
    self.begin(&mut state, call, "POST", "/products".to_string())?;

    state.next_product_id += 1;
    let id = state.next_product_id;
    state.products.push(Product {
      id,
      title: product.title.clone(),
      description: product.description.clone(),
      price: product.price,
      image_path: format!("static/images/{}", product.image.file_name),
    });
    info!(product_id = id, "Product stored.");
    Ok(())
  }

  async fn delete_product(&self, product_id: ProductId) -> StoreResult<()> {
    let mut state = self.state.lock();
    let path = format!("/products/{product_id}");
    self.begin(&mut state, BackendCall::DeleteProduct(product_id), "DELETE", path.clone())?;

    let before = state.products.len();
    state.products.retain(|p| p.id != product_id);
    if state.products.len() == before {
      return Err(missing("DELETE", path));
    }
    Ok(())
  }

  async fn list_cart(&self) -> StoreResult<Vec<CartItem>> {
    let mut state = self.state.lock();
    self.begin(&mut state, BackendCall::ListCart, "GET", "/cart".to_string())?;
    Ok(state.cart.clone())
  }

  async fn add_to_cart(&self, product_id: ProductId) -> StoreResult<()> {
    let mut state = self.state.lock();
    self.begin(&mut state, BackendCall::AddToCart(product_id), "POST", "/cart".to_string())?;

    match state.cart.iter_mut().find(|line| line.product_id == product_id) {
      Some(line) => {
        line.quantity = line.quantity.checked_add(1).ok_or_else(|| {
          StoreError::InvalidInput(format!("Quantity of product {product_id} cannot go above {}.", u32::MAX))
        })?
      }
      None => state.cart.push(CartItem::new(product_id, 1)),
    }
    Ok(())
  }

  async fn update_cart_item(&self, product_id: ProductId, quantity: u32) -> StoreResult<()> {
    let mut state = self.state.lock();
    let path = format!("/cart/{product_id}");
    let call = BackendCall::UpdateCartItem { product_id, quantity };
    self.begin(&mut state, call, "PUT", path)?;

    // Upsert: setting a quantity on a product that has no line creates it.
    match state.cart.iter_mut().find(|line| line.product_id == product_id) {
      Some(line) => line.quantity = quantity,
      None => state.cart.push(CartItem::new(product_id, quantity)),
    }
    Ok(())
  }

  async fn remove_cart_item(&self, product_id: ProductId) -> StoreResult<()> {
    let mut state = self.state.lock();
    let path = format!("/cart/{product_id}");
    self.begin(&mut state, BackendCall::RemoveCartItem(product_id), "DELETE", path.clone())?;

    let before = state.cart.len();
    state.cart.retain(|line| line.product_id != product_id);
    if state.cart.len() == before {
      return Err(missing("DELETE", path));
    }
    Ok(())
  }
}
