// bikeshop_storefront/src/main.rs

mod config;
mod errors;
mod state;
mod web;

use std::sync::Arc;

use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use anyhow::Context;
use bikeshop::{Backend, HttpBackend, HttpBackendConfig, InMemoryBackend};
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, BackendMode};
use crate::errors::Result as AppResult;
use crate::state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // RUST_LOG overrides the default level
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting bike shop storefront...");

  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);
  let backend = build_backend(&app_config)?;
  let app_state = AppState::new(backend, Arc::clone(&app_config))?;

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;

  Ok(())
}

fn build_backend(config: &AppConfig) -> AppResult<Arc<dyn Backend>> {
  match config.backend_mode {
    BackendMode::Http => {
      if config.seed_demo_data {
        tracing::warn!("SEED_DEMO_DATA is ignored when BACKEND_MODE is http.");
      }
      let http_config = HttpBackendConfig::new(config.backend_url.clone()).with_timeout(config.request_timeout);
      let backend = HttpBackend::new(http_config)?;
      tracing::info!(base_url = backend.base_url(), "Using the REST backend.");
      Ok(Arc::new(backend))
    }
    BackendMode::Memory => {
      let backend = InMemoryBackend::new();
      if config.seed_demo_data {
        backend.seed_demo_catalog();
      }
      tracing::info!(seeded = config.seed_demo_data, "Using the in-memory backend.");
      Ok(Arc::new(backend))
    }
  }
}
