// bikeshop/src/controllers/cart.rs

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::Reloaded;
use crate::api::Backend;
use crate::error::{StoreError, StoreResult};
use crate::flow::{Flow, FlowControl, FlowResult, SharedState, SkipCondition};
use crate::model::ProductId;
use crate::sequencer::{MutationSequencer, MutationTicket};
use crate::view::{next_change, CartAction, CartView, QuantityChange};

pub const DEFAULT_ORDER_BUTTON_HIDE_DELAY: Duration = Duration::from_millis(500);

/// State of the cosmetic "place order" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderButton {
  Ready,
  /// Flashes, then disappears once `hide_after` has elapsed.
  Flashing { hide_after: Duration },
}

#[derive(Debug)]
pub enum MutationOutcome {
  Applied(Reloaded<CartView>),
  /// A newer mutation of the same product was queued; its reload will show the result.
  Superseded,
}

struct CartMutationCtx {
  backend: Arc<dyn Backend>,
  sequencer: Arc<MutationSequencer>,
  ticket: MutationTicket,
  action: CartAction,
  current_quantity: Option<u32>,
  change: Option<QuantityChange>,
  reloaded: Option<CartView>,
  reload_error: Option<StoreError>,
}

/// Cart page: cart lines joined with products, quantity controls and the total.
pub struct CartController {
  backend: Arc<dyn Backend>,
  mounted: SharedState<CartView>,
  sequencer: Arc<MutationSequencer>,
  mutation_flow: Flow<CartMutationCtx, StoreError>,
  order_hide_delay: Duration,
}

impl CartController {
  pub fn new(backend: Arc<dyn Backend>) -> StoreResult<Self> {
    Ok(Self {
      backend,
      mounted: SharedState::default(),
      sequencer: Arc::new(MutationSequencer::new()),
      mutation_flow: build_mutation_flow()?,
      order_hide_delay: DEFAULT_ORDER_BUTTON_HIDE_DELAY,
    })
  }

  pub fn with_order_hide_delay(mut self, delay: Duration) -> Self {
    self.order_hide_delay = delay;
    self
  }

  pub fn view(&self) -> CartView {
    self.mounted.snapshot()
  }

  /// Fetches the cart, then the products, and mounts the joined view.
  #[instrument(name = "cart::load_cart", skip(self), err(Display))]
  pub async fn load_cart(&self) -> StoreResult<CartView> {
    let view = fetch_cart_view(self.backend.as_ref()).await?;
    self.mounted.replace(view.clone());
    info!(lines = view.lines.len(), total = view.total, "Cart loaded.");
    Ok(view)
  }

  pub async fn decrease(&self, product_id: ProductId) -> StoreResult<MutationOutcome> {
    self.mutate(product_id, CartAction::Decrease).await
  }

  pub async fn increase(&self, product_id: ProductId) -> StoreResult<MutationOutcome> {
    self.mutate(product_id, CartAction::Increase).await
  }

  pub async fn remove(&self, product_id: ProductId) -> StoreResult<MutationOutcome> {
    self.mutate(product_id, CartAction::Remove).await
  }

  /// Applies `action` to the line for `product_id` and reloads the cart.
  ///
  /// The quantity is always re-read from the backend rather than taken from the
  /// mounted view. Mutations of one product run one at a time.
  #[instrument(name = "cart::mutate", skip(self, action), fields(action = action.as_str()), err(Display))]
  pub async fn mutate(&self, product_id: ProductId, action: CartAction) -> StoreResult<MutationOutcome> {
    let in_flight = self.sequencer.begin(product_id).await;
    let ticket = in_flight.ticket();
    debug!(seq = ticket.seq, "Cart mutation started.");

    let ctx = SharedState::new(CartMutationCtx {
      backend: Arc::clone(&self.backend),
      sequencer: Arc::clone(&self.sequencer),
      ticket,
      action,
      current_quantity: None,
      change: None,
      reloaded: None,
      reload_error: None,
    });

    if self.mutation_flow.run(ctx.clone()).await? == FlowResult::Halted {
      info!(seq = ticket.seq, "Cart mutation superseded; skipping its reload.");
      return Ok(MutationOutcome::Superseded);
    }

    let (reloaded, reload_error) = {
      let mut guard = ctx.write();
      (guard.reloaded.take(), guard.reload_error.take())
    };
    match (reloaded, reload_error) {
      (Some(view), _) => {
        self.mounted.replace(view.clone());
        Ok(MutationOutcome::Applied(Reloaded::fresh(view)))
      }
      (None, Some(error)) => Ok(MutationOutcome::Applied(Reloaded::stale(self.view(), error))),
      (None, None) => Err(StoreError::Internal("Cart reload produced no view.".to_string())),
    }
  }

  /// Number of products with a cart mutation queued or running.
  pub fn mutations_in_flight(&self) -> usize {
    self.sequencer.tracked_products()
  }

  /// Purely cosmetic: no order is sent anywhere.
  #[instrument(name = "cart::place_order", skip(self))]
  pub fn place_order(&self) -> OrderButton {
    info!(lines = self.mounted.read().lines.len(), "Place order pressed; no backend request is made.");
    OrderButton::Flashing {
      hide_after: self.order_hide_delay,
    }
  }
}

async fn fetch_cart_view(backend: &dyn Backend) -> StoreResult<CartView> {
  let items = backend.list_cart().await?;
  let products = backend.list_products().await?;
  let view = CartView::reconcile(&items, &products);
  let skipped = items.len() - view.lines.len();
  if skipped > 0 {
    debug!(skipped, "Cart items without a matching product were left out.");
  }
  Ok(view)
}

fn build_mutation_flow() -> StoreResult<Flow<CartMutationCtx, StoreError>> {
  let removing: SkipCondition<CartMutationCtx> = Arc::new(|ctx: &CartMutationCtx| ctx.action == CartAction::Remove);

  let mut flow = Flow::new(
    "cart_mutation",
    &[
      ("refetch_cart", Some(removing)),
      ("resolve_change", None),
      ("apply_change", None),
      ("check_sequence", None),
      ("reload_cart", None),
    ],
  );

  flow.on("refetch_cart", |ctx: SharedState<CartMutationCtx>| async move {
    let (backend, product_id) = {
      let guard = ctx.read();
      (Arc::clone(&guard.backend), guard.ticket.product_id)
    };
    let items = backend.list_cart().await?;
    let current = items.iter().find(|i| i.product_id == product_id).map(|i| i.quantity);
    ctx.write().current_quantity = current;
    Ok::<_, StoreError>(FlowControl::Continue)
  })?;

  flow.on("resolve_change", |ctx: SharedState<CartMutationCtx>| async move {
    let mut guard = ctx.write();
    let change = next_change(guard.action, guard.current_quantity)?;
    debug!(current = ?guard.current_quantity, ?change, "Cart change resolved.");
    guard.change = Some(change);
    Ok::<_, StoreError>(FlowControl::Continue)
  })?;

  flow.on("apply_change", |ctx: SharedState<CartMutationCtx>| async move {
    let (backend, product_id, change) = {
      let guard = ctx.read();
      (Arc::clone(&guard.backend), guard.ticket.product_id, guard.change)
    };
    match change {
      Some(QuantityChange::Set(quantity)) => backend.update_cart_item(product_id, quantity).await?,
      Some(QuantityChange::Delete) => backend.remove_cart_item(product_id).await?,
      None => return Err(StoreError::Internal("Cart change was not resolved.".to_string())),
    }
    Ok::<_, StoreError>(FlowControl::Continue)
  })?;

  flow.on("check_sequence", |ctx: SharedState<CartMutationCtx>| async move {
    let guard = ctx.read();
    let control = if guard.sequencer.is_current(guard.ticket) {
      FlowControl::Continue
    } else {
      FlowControl::Halt
    };
    Ok::<_, StoreError>(control)
  })?;

  // The mutation already happened; a failed reload is reported alongside it.
  flow.on("reload_cart", |ctx: SharedState<CartMutationCtx>| async move {
    let backend = Arc::clone(&ctx.read().backend);
    match fetch_cart_view(backend.as_ref()).await {
      Ok(view) => ctx.write().reloaded = Some(view),
      Err(error) => {
        warn!(%error, "Cart reload after mutation failed.");
        ctx.write().reload_error = Some(error);
      }
    }
    Ok::<_, StoreError>(FlowControl::Continue)
  })?;

  Ok(flow)
}
