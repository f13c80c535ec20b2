// bikeshop/src/error.rs
use thiserror::Error;

/// Errors raised while assembling or running a [`Flow`](crate::flow::Flow).
///
/// These are setup mistakes (typos in step names, a step left without a handler)
/// rather than backend failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
  #[error("Step '{step}' is not declared in flow '{flow}'")]
  UnknownStep { flow: &'static str, step: String },

  #[error("Step '{step}' in flow '{flow}' already has a handler")]
  DuplicateHandler { flow: &'static str, step: String },

  #[error("Step '{step}' in flow '{flow}' has no handler")]
  HandlerMissing { flow: &'static str, step: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
  /// The backend answered with a non-success status code.
  #[error("{method} {path} failed with HTTP status {status}")]
  Status { method: String, path: String, status: u16 },

  #[error("{method} {path} could not be sent: {source}")]
  Transport {
    method: String,
    path: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Response from {method} {path} could not be decoded: {message}")]
  Decode { method: String, path: String, message: String },

  #[error("Invalid input: {0}")]
  InvalidInput(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Flow error: {source}")]
  Flow {
    #[from]
    source: FlowError,
  },

  #[error("Internal error: {0}")]
  Internal(String),
}

/// Coarse classification of a [`StoreError`], carried by notices so the page
/// can tell a rejected request from an unreachable backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  Status(u16),
  Network,
  Decode,
  Validation,
  Internal,
}

impl StoreError {
  pub fn kind(&self) -> FailureKind {
    match self {
      StoreError::Status { status, .. } => FailureKind::Status(*status),
      StoreError::NotFound(_) => FailureKind::Status(404),
      StoreError::Transport { .. } => FailureKind::Network,
      StoreError::Decode { .. } => FailureKind::Decode,
      StoreError::InvalidInput(_) => FailureKind::Validation,
      StoreError::Flow { .. } | StoreError::Internal(_) => FailureKind::Internal,
    }
  }
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kind_distinguishes_rejections_from_validation() {
    let rejected = StoreError::Status {
      method: "PUT".into(),
      path: "/cart/3".into(),
      status: 422,
    };
    assert_eq!(rejected.kind(), FailureKind::Status(422));
    assert_eq!(StoreError::InvalidInput("price".into()).kind(), FailureKind::Validation);
    assert_eq!(StoreError::NotFound("cart line 9".into()).kind(), FailureKind::Status(404));
  }

  #[test]
  fn flow_errors_convert_into_store_errors() {
    let err: StoreError = FlowError::HandlerMissing {
      flow: "cart_mutation",
      step: "apply_change".into(),
    }
    .into();
    assert_eq!(err.kind(), FailureKind::Internal);
    assert!(err.to_string().contains("apply_change"));
  }
}
