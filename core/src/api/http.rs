// bikeshop/src/api/http.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use tracing::{debug, instrument, warn};

use super::Backend;
use crate::error::{StoreError, StoreResult};
use crate::model::{CartItem, NewProduct, Product, ProductId};

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
  pub base_url: String,
  pub timeout: Duration,
}

impl HttpBackendConfig {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into(),
      timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }
}

/// Talks to the shop's REST backend over HTTP.
///
/// Every call goes through [`HttpBackend::request`]: JSON in, JSON out, and any
/// non-2xx status becomes [`StoreError::Status`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
  base_url: String,
  http: reqwest::Client,
}

// `POST /cart` carries the id as text, the way the grid's data attribute holds it.
#[derive(Debug, Serialize)]
struct AddToCartPayload {
  #[serde(serialize_with = "id_as_text")]
  product_id: ProductId,
}

#[derive(Debug, Serialize)]
struct UpdateQuantityPayload {
  quantity: u32,
}

fn id_as_text<S: Serializer>(id: &ProductId, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.collect_str(id)
}

impl HttpBackend {
  pub fn new(config: HttpBackendConfig) -> StoreResult<Self> {
    let http = reqwest::Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| StoreError::Internal(format!("HTTP client could not be built: {e}")))?;

    Ok(Self {
      base_url: config.base_url.trim_end_matches('/').to_string(),
      http,
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  /// Sends `payload` (if any) as JSON and decodes the JSON response body.
  #[instrument(name = "backend::request", skip(self, method, payload), fields(method = %method), err(Display))]
  pub async fn request<B, T>(&self, method: Method, path: &str, payload: Option<&B>) -> StoreResult<T>
  where
    B: Serialize + ?Sized + Sync,
    T: DeserializeOwned,
  {
    let mut request = self
      .http
      .request(method.clone(), self.url(path))
      .header(CONTENT_TYPE, "application/json");
    if let Some(body) = payload {
      request = request.json(body);
    }

    let response = request.send().await.map_err(|source| StoreError::Transport {
      method: method.to_string(),
      path: path.to_string(),
      source,
    })?;

    decode_response(&method, path, response).await
  }

  async fn get<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
    self.request::<(), T>(Method::GET, path, None).await
  }
}

async fn decode_response<T: DeserializeOwned>(method: &Method, path: &str, response: Response) -> StoreResult<T> {
  let status = response.status();
  if !status.is_success() {
    warn!(%method, path, status = status.as_u16(), "Backend rejected request.");
    return Err(StoreError::Status {
      method: method.to_string(),
      path: path.to_string(),
      status: status.as_u16(),
    });
  }

  let body = response.bytes().await.map_err(|source| StoreError::Transport {
    method: method.to_string(),
    path: path.to_string(),
    source,
  })?;
  debug!(%method, path, bytes = body.len(), "Backend response received.");

  serde_json::from_slice(&body).map_err(|e| StoreError::Decode {
    method: method.to_string(),
    path: path.to_string(),
    message: e.to_string(),
  })
}

#[async_trait]
impl Backend for HttpBackend {
  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    self.get("/products").await
  }

  #[instrument(name = "backend::create_product", skip(self, product), fields(title = %product.title), err(Display))]
  async fn create_product(&self, product: &NewProduct) -> StoreResult<()> {
    let path = "/products";
    let mut image = Part::bytes(product.image.bytes.clone()).file_name(product.image.file_name.clone());
    if let Some(content_type) = &product.image.content_type {
      image = image
        .mime_str(content_type)
        .map_err(|e| StoreError::InvalidInput(format!("Unsupported image type '{content_type}': {e}")))?;
    }

    let form = Form::new()
      .text("title", product.title.clone())
      .text("description", product.description.clone())
      .text("price", product.price.to_string())
      .part("image", image);

    let response = self
      .http
      .post(self.url(path))
      .multipart(form)
      .send()
      .await
      .map_err(|source| StoreError::Transport {
        method: Method::POST.to_string(),
        path: path.to_string(),
        source,
      })?;

    let _created: serde_json::Value = decode_response(&Method::POST, path, response).await?;
    Ok(())
  }

  async fn delete_product(&self, product_id: ProductId) -> StoreResult<()> {
    let path = format!("/products/{product_id}");
    let _confirmation: serde_json::Value = self.request::<(), _>(Method::DELETE, &path, None).await?;
    Ok(())
  }

  async fn list_cart(&self) -> StoreResult<Vec<CartItem>> {
    self.get("/cart").await
  }

  async fn add_to_cart(&self, product_id: ProductId) -> StoreResult<()> {
    let payload = AddToCartPayload { product_id };
    let _line: serde_json::Value = self.request(Method::POST, "/cart", Some(&payload)).await?;
    Ok(())
  }

  async fn update_cart_item(&self, product_id: ProductId, quantity: u32) -> StoreResult<()> {
    let path = format!("/cart/{product_id}");
    let payload = UpdateQuantityPayload { quantity };
    let _line: serde_json::Value = self.request(Method::PUT, &path, Some(&payload)).await?;
    Ok(())
  }

  async fn remove_cart_item(&self, product_id: ProductId) -> StoreResult<()> {
    let path = format!("/cart/{product_id}");
    let _confirmation: serde_json::Value = self.request::<(), _>(Method::DELETE, &path, None).await?;
    Ok(())
  }
}
