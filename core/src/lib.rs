// bikeshop/src/lib.rs

//! Bike shop storefront core.
//!
//! Client-side logic for a small shop backed by a REST service (`/products`, `/cart`):
//!  - A request helper ([`api::HttpBackend`]) that speaks JSON and treats any
//!    non-success status as a failure, plus an in-memory stand-in.
//!  - Three page controllers: the catalog manager (register products), the
//!    storefront grid (add to cart) and the cart controller (quantities, total).
//!  - A small step engine ([`flow::Flow`]) for actions made of several round trips.
//!  - Typed notices instead of blocking alerts.
//!
//! The backend is the source of truth: controllers re-fetch before deciding
//! anything and every reload replaces the page's view wholesale.

pub mod api;
pub mod controllers;
pub mod error;
pub mod flow;
pub mod model;
pub mod notice;
pub mod sequencer;
pub mod view;

// --- Re-exports for the Public API ---

pub use crate::api::{Backend, BackendCall, HttpBackend, HttpBackendConfig, InMemoryBackend};
pub use crate::controllers::{CartController, CatalogManager, MutationOutcome, OrderButton, Reloaded, StorefrontGrid};
pub use crate::error::{FailureKind, FlowError, StoreError, StoreResult};
pub use crate::flow::{Flow, FlowControl, FlowResult, SharedState};
pub use crate::model::{CartItem, ImageUpload, NewProduct, Product, ProductForm, ProductId};
pub use crate::notice::{Notice, NoticeLevel, UserAction};
pub use crate::sequencer::{InFlight, MutationSequencer, MutationTicket};
pub use crate::view::{
  format_price, next_change, CartAction, CartLine, CartView, CatalogEntry, CatalogView, GridView, ProductCard,
  QuantityChange,
};
