// bikeshop/src/notice.rs

//! Typed user-facing outcomes of page actions.
//!
//! Every user action ends in at most one [`Notice`]. Failures keep the
//! [`FailureKind`] of the underlying error so pages can tell a rejected request
//! from an unreachable backend.

use crate::error::{FailureKind, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
  LoadProducts,
  AddProduct,
  DeleteProduct,
  AddToCart,
  LoadCart,
  UpdateCart,
  RemoveFromCart,
}

impl UserAction {
  pub fn failure_message(&self) -> &'static str {
    match self {
      UserAction::LoadProducts => "Failed to load products",
      UserAction::AddProduct => "Failed to add product",
      UserAction::DeleteProduct => "Failed to delete product",
      UserAction::AddToCart => "Failed to add product to cart",
      UserAction::LoadCart => "Failed to load cart",
      UserAction::UpdateCart => "Failed to update cart",
      UserAction::RemoveFromCart => "Failed to remove item from cart",
    }
  }

  pub fn success_message(&self) -> Option<&'static str> {
    match self {
      UserAction::AddProduct => Some("Product added successfully!"),
      UserAction::DeleteProduct => Some("Product deleted."),
      UserAction::AddToCart => Some("Product added to cart!"),
      UserAction::UpdateCart => Some("Cart updated."),
      UserAction::RemoveFromCart => Some("Item removed from cart."),
      UserAction::LoadProducts | UserAction::LoadCart => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
  Success,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub level: NoticeLevel,
  pub action: UserAction,
  pub message: String,
  pub kind: Option<FailureKind>,
  /// Human-readable cause, shown under the message.
  pub detail: Option<String>,
}

impl Notice {
  /// `None` for actions that stay silent on success (plain page loads).
  pub fn success(action: UserAction) -> Option<Self> {
    action.success_message().map(|message| Self {
      level: NoticeLevel::Success,
      action,
      message: message.to_string(),
      kind: None,
      detail: None,
    })
  }

  pub fn failure(action: UserAction, error: &StoreError) -> Self {
    let detail = match error {
      // Validation messages are written for the user; other causes are summarised.
      StoreError::InvalidInput(message) => Some(message.clone()),
      _ => Some(describe_kind(error.kind())),
    };

    Self {
      level: NoticeLevel::Error,
      action,
      message: action.failure_message().to_string(),
      kind: Some(error.kind()),
      detail,
    }
  }

  pub fn is_error(&self) -> bool {
    self.level == NoticeLevel::Error
  }
}

fn describe_kind(kind: FailureKind) -> String {
  match kind {
    FailureKind::Status(404) => "The item no longer exists.".to_string(),
    FailureKind::Status(status) => format!("The shop backend answered with status {status}."),
    FailureKind::Network => "The shop backend could not be reached.".to_string(),
    FailureKind::Decode => "The shop backend sent an unexpected response.".to_string(),
    FailureKind::Validation => "The submitted form is invalid.".to_string(),
    FailureKind::Internal => "Something went wrong on our side.".to_string(),
  }
}
