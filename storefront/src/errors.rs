// bikeshop_storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use bikeshop::{FailureKind, StoreError};
use thiserror::Error;

use crate::web::render::render_error_page;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Storefront Error: {0}")]
  Store(#[from] StoreError),

  /// The multipart product form could not be read.
  #[error("Upload Error: {0}")]
  Upload(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Allow anyhow::Error to be converted into AppError for handlers using anyhow-returning helpers
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<StoreError>() {
      Ok(store_err) => AppError::Store(store_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

/// HTTP status for a page that failed because of `err`.
///
/// Failures of the shop backend itself surface as 502; a backend 404 stays a 404.
pub fn status_for(err: &StoreError) -> StatusCode {
  match err.kind() {
    FailureKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
    FailureKind::Status(404) => StatusCode::NOT_FOUND,
    FailureKind::Status(_) | FailureKind::Network | FailureKind::Decode => StatusCode::BAD_GATEWAY,
    FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      AppError::Store(err) => status_for(err),
      AppError::Upload(_) => StatusCode::BAD_REQUEST,
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    let status = self.status_code();
    let detail = match self {
      AppError::Upload(m) => m.clone(),
      AppError::Store(err) => err.to_string(),
      // Configuration and internal details stay in the logs.
      AppError::Config(_) | AppError::Internal(_) => "An internal error occurred.".to_string(),
    };
    HttpResponse::build(status)
      .content_type("text/html; charset=utf-8")
      .body(render_error_page(status, &detail))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
