// bikeshop/src/controllers/catalog.rs

use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::Reloaded;
use crate::api::Backend;
use crate::error::{StoreError, StoreResult};
use crate::flow::{Flow, FlowControl, FlowResult, SharedState};
use crate::model::{NewProduct, ProductForm, ProductId};
use crate::view::CatalogView;

struct AddProductCtx {
  backend: Arc<dyn Backend>,
  form: ProductForm,
  validated: Option<NewProduct>,
  reloaded: Option<CatalogView>,
  reload_error: Option<StoreError>,
}

/// Registration page: the product form and the list of existing products.
pub struct CatalogManager {
  backend: Arc<dyn Backend>,
  mounted: SharedState<CatalogView>,
  add_flow: Flow<AddProductCtx, StoreError>,
}

impl CatalogManager {
  pub fn new(backend: Arc<dyn Backend>) -> StoreResult<Self> {
    Ok(Self {
      backend,
      mounted: SharedState::default(),
      add_flow: build_add_flow()?,
    })
  }

  pub fn view(&self) -> CatalogView {
    self.mounted.snapshot()
  }

  #[instrument(name = "catalog::load_products", skip(self), err(Display))]
  pub async fn load_products(&self) -> StoreResult<CatalogView> {
    let products = self.backend.list_products().await?;
    let view = CatalogView::from_products(&products);
    self.mounted.replace(view.clone());
    info!(entries = view.entries.len(), "Catalog loaded.");
    Ok(view)
  }

  /// Validates and submits `form`, then reloads the list.
  ///
  /// On error nothing was created and the caller still owns `form` to show it again.
  #[instrument(name = "catalog::add_product", skip(self, form), fields(title = %form.title), err(Display))]
  pub async fn add_product(&self, form: &ProductForm) -> StoreResult<Reloaded<CatalogView>> {
    let ctx = SharedState::new(AddProductCtx {
      backend: Arc::clone(&self.backend),
      form: form.clone(),
      validated: None,
      reloaded: None,
      reload_error: None,
    });

    if self.add_flow.run(ctx.clone()).await? == FlowResult::Halted {
      return Err(StoreError::Internal("Product registration halted unexpectedly.".to_string()));
    }

    let (reloaded, reload_error) = {
      let mut guard = ctx.write();
      (guard.reloaded.take(), guard.reload_error.take())
    };
    match (reloaded, reload_error) {
      (Some(view), _) => {
        self.mounted.replace(view.clone());
        Ok(Reloaded::fresh(view))
      }
      (None, Some(error)) => Ok(Reloaded::stale(self.view(), error)),
      (None, None) => Err(StoreError::Internal("Catalog reload produced no view.".to_string())),
    }
  }

  /// Deletes the product and drops its entry from the mounted list without a reload.
  #[instrument(name = "catalog::delete_product", skip(self), err(Display))]
  pub async fn delete_product(&self, product_id: ProductId) -> StoreResult<CatalogView> {
    self.backend.delete_product(product_id).await?;

    let mut mounted = self.mounted.write();
    if !mounted.remove(product_id) {
      warn!(product_id, "Deleted product was not in the mounted list.");
    }
    info!(product_id, "Product deleted.");
    Ok(mounted.clone())
  }
}

fn build_add_flow() -> StoreResult<Flow<AddProductCtx, StoreError>> {
  let mut flow = Flow::new(
    "add_product",
    &[("validate_form", None), ("submit_product", None), ("reload_products", None)],
  );

  flow.on("validate_form", |ctx: SharedState<AddProductCtx>| async move {
    let validated = NewProduct::try_from(&ctx.read().form)?;
    ctx.write().validated = Some(validated);
    Ok::<_, StoreError>(FlowControl::Continue)
  })?;

  flow.on("submit_product", |ctx: SharedState<AddProductCtx>| async move {
    let (backend, product) = {
      let guard = ctx.read();
      (Arc::clone(&guard.backend), guard.validated.clone())
    };
    let product = product.ok_or_else(|| StoreError::Internal("Form was not validated.".to_string()))?;
    backend.create_product(&product).await?;
    info!(title = %product.title, "Product submitted.");
    Ok::<_, StoreError>(FlowControl::Continue)
  })?;

  // The product exists by now, so a failed reload is reported but does not fail the add.
  flow.on("reload_products", |ctx: SharedState<AddProductCtx>| async move {
    let backend = Arc::clone(&ctx.read().backend);
    match backend.list_products().await {
      Ok(products) => ctx.write().reloaded = Some(CatalogView::from_products(&products)),
      Err(error) => {
        warn!(%error, "Catalog reload after add failed.");
        ctx.write().reload_error = Some(error);
      }
    }
    Ok::<_, StoreError>(FlowControl::Continue)
  })?;

  Ok(flow)
}
