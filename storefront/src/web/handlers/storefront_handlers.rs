// bikeshop_storefront/src/web/handlers/storefront_handlers.rs

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use bikeshop::{GridView, Notice, ProductId, UserAction};
use tracing::{instrument, warn};

use super::html_page;
use crate::errors::status_for;
use crate::state::AppState;
use crate::web::render::{WebBody, WebPage};

fn products_page(app_state: &AppState, grid: GridView, notices: Vec<Notice>) -> WebPage {
  WebPage {
    title: "Products",
    path: "/products",
    notices,
    body: WebBody::Products {
      grid,
      asset_base_url: app_state.config.asset_base_url.clone(),
    },
  }
}

#[instrument(name = "handler::products_page", skip(app_state))]
pub async fn products_page_handler(app_state: web::Data<AppState>) -> HttpResponse {
  match app_state.storefront.load_products().await {
    Ok(grid) => html_page(StatusCode::OK, &products_page(&app_state, grid, Vec::new())),
    Err(err) => {
      warn!(error = %err, "Product grid could not be loaded.");
      let notices = vec![Notice::failure(UserAction::LoadProducts, &err)];
      let page = products_page(&app_state, app_state.storefront.view(), notices);
      html_page(status_for(&err), &page)
    }
  }
}

#[instrument(name = "handler::add_to_cart", skip(app_state))]
pub async fn add_to_cart_handler(app_state: web::Data<AppState>, path: web::Path<ProductId>) -> HttpResponse {
  let product_id = path.into_inner();
  let (status, notice) = match app_state.storefront.add_to_cart(product_id).await {
    Ok(()) => (StatusCode::OK, Notice::success(UserAction::AddToCart)),
    Err(err) => {
      warn!(product_id, error = %err, "Add to cart failed.");
      (status_for(&err), Some(Notice::failure(UserAction::AddToCart, &err)))
    }
  };
  let page = products_page(&app_state, app_state.storefront.view(), notice.into_iter().collect());
  html_page(status, &page)
}
