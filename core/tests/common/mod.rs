// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every fixture.

use std::sync::Arc;

use bikeshop::{Backend, CartItem, ImageUpload, InMemoryBackend, Product, ProductForm, ProductId};
use tracing::Level;

// --- Fixtures ---
pub fn product(id: ProductId, title: &str, price: f64) -> Product {
  Product {
    id,
    title: title.to_string(),
    description: format!("{title} description"),
    price,
    image_path: format!("static/images/{id}.jpg"),
  }
}

pub fn widget() -> Product {
  product(1, "Widget", 9.5)
}

pub fn gadget() -> Product {
  product(2, "Gadget", 20.0)
}

pub fn image(file_name: &str) -> ImageUpload {
  ImageUpload {
    file_name: file_name.to_string(),
    content_type: Some("image/png".to_string()),
    bytes: vec![0x89, 0x50, 0x4e, 0x47],
  }
}

pub fn form(title: &str, price: &str) -> ProductForm {
  ProductForm {
    title: title.to_string(),
    description: "Steel frame".to_string(),
    price: price.to_string(),
    image: Some(image("frame.png")),
  }
}

/// Returns the concrete backend (for assertions) and the same backend as a trait object.
pub fn backend_with(products: Vec<Product>, cart: Vec<CartItem>) -> (Arc<InMemoryBackend>, Arc<dyn Backend>) {
  let backend = Arc::new(InMemoryBackend::with_data(products, cart));
  let dynamic: Arc<dyn Backend> = backend.clone();
  (backend, dynamic)
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
