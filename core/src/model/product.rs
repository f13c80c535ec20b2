// bikeshop/src/model/product.rs

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Backend-assigned product identifier.
pub type ProductId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: ProductId,
  pub title: String,
  #[serde(default)]
  pub description: String,
  pub price: f64,
  #[serde(default)]
  pub image_path: String,
}

/// An uploaded image file from the registration form.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
  pub file_name: String,
  pub content_type: Option<String>,
  pub bytes: Vec<u8>,
}

// Keep raw image bytes out of logs.
impl std::fmt::Debug for ImageUpload {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ImageUpload")
      .field("file_name", &self.file_name)
      .field("content_type", &self.content_type)
      .field("len", &self.bytes.len())
      .finish()
  }
}

/// The registration form exactly as submitted.
///
/// `price` stays raw text so a rejected submission can be shown back to the
/// user unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
  pub title: String,
  pub description: String,
  pub price: String,
  pub image: Option<ImageUpload>,
}

/// A validated registration, ready to be sent as `POST /products`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub title: String,
  pub description: String,
  pub price: f64,
  pub image: ImageUpload,
}

impl TryFrom<&ProductForm> for NewProduct {
  type Error = StoreError;

  fn try_from(form: &ProductForm) -> StoreResult<Self> {
    let title = form.title.trim();
    if title.is_empty() {
      return Err(StoreError::InvalidInput("Title is required.".to_string()));
    }

    let price: f64 = form
      .price
      .trim()
      .parse()
      .map_err(|_| StoreError::InvalidInput(format!("Price '{}' is not a number.", form.price.trim())))?;
    if !price.is_finite() || price < 0.0 {
      return Err(StoreError::InvalidInput("Price must be zero or more.".to_string()));
    }

    let image = match &form.image {
      Some(image) if !image.file_name.trim().is_empty() => image.clone(),
      _ => return Err(StoreError::InvalidInput("An image file is required.".to_string())),
    };

    Ok(Self {
      title: title.to_string(),
      description: form.description.trim().to_string(),
      price,
      image,
    })
  }
}
