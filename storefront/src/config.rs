// bikeshop_storefront/src/config.rs

use std::env;
use std::time::Duration;

use dotenvy::dotenv;

use crate::errors::{AppError, Result};

/// Where the controllers send their requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
  /// The real REST backend at `BACKEND_URL`.
  Http,
  /// The in-process mock backend.
  Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub backend_mode: BackendMode,
  pub backend_url: String,
  /// Base for product image URLs; the backend serves `static/images/...`.
  pub asset_base_url: String,
  pub request_timeout: Duration,
  pub place_order_hide_delay: Duration,
  /// Largest accepted size of a single field in the product form.
  pub max_upload_bytes: usize,
  // Only honoured in memory mode.
  pub seed_demo_data: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the config from any variable source; unset variables take their defaults.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_or = |var_name: &str, default: &str| lookup(var_name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = get_or("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let backend_mode = match get_or("BACKEND_MODE", "http").to_ascii_lowercase().as_str() {
      "http" => BackendMode::Http,
      "memory" => BackendMode::Memory,
      other => {
        return Err(AppError::Config(format!(
          "Invalid BACKEND_MODE '{}': expected 'http' or 'memory'",
          other
        )))
      }
    };

    let backend_url = get_or("BACKEND_URL", "http://127.0.0.1:8000").trim_end_matches('/').to_string();
    if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
      return Err(AppError::Config(format!("Invalid BACKEND_URL '{}': must be http(s)", backend_url)));
    }
    let asset_base_url = lookup("ASSET_BASE_URL")
      .map(|url| url.trim_end_matches('/').to_string())
      .unwrap_or_else(|| backend_url.clone());

    let request_timeout = Duration::from_millis(parse_millis(
      &get_or("REQUEST_TIMEOUT_MS", "5000"),
      "REQUEST_TIMEOUT_MS",
    )?);
    let place_order_hide_delay = Duration::from_millis(parse_millis(
      &get_or("PLACE_ORDER_HIDE_DELAY_MS", "500"),
      "PLACE_ORDER_HIDE_DELAY_MS",
    )?);

    let max_upload_bytes = get_or("MAX_UPLOAD_BYTES", "10485760")
      .trim()
      .parse::<usize>()
      .map_err(|e| AppError::Config(format!("Invalid MAX_UPLOAD_BYTES: {}", e)))?;

    let seed_demo_data = get_or("SEED_DEMO_DATA", "false")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DEMO_DATA value: {}", e)))?;

    tracing::info!(?backend_mode, %backend_url, "Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      backend_mode,
      backend_url,
      asset_base_url,
      request_timeout,
      place_order_hide_delay,
      max_upload_bytes,
      seed_demo_data,
    })
  }
}

fn parse_millis(raw: &str, var_name: &str) -> Result<u64> {
  raw
    .trim()
    .parse::<u64>()
    .map_err(|e| AppError::Config(format!("Invalid {}: {}", var_name, e)))
}
