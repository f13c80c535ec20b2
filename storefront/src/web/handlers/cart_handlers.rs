// bikeshop_storefront/src/web/handlers/cart_handlers.rs

use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use bikeshop::{CartAction, CartView, MutationOutcome, Notice, OrderButton, ProductId, UserAction};
use tracing::{info, instrument, warn};

use super::html_page;
use crate::errors::status_for;
use crate::state::AppState;
use crate::web::render::{WebBody, WebPage};

fn cart_page(cart: CartView, order: OrderButton, notices: Vec<Notice>) -> WebPage {
  WebPage {
    title: "Cart",
    path: "/cart",
    notices,
    body: WebBody::Cart { cart, order },
  }
}

fn user_action(action: CartAction) -> UserAction {
  match action {
    CartAction::Decrease | CartAction::Increase => UserAction::UpdateCart,
    CartAction::Remove => UserAction::RemoveFromCart,
  }
}

#[instrument(name = "handler::cart_page", skip(app_state))]
pub async fn cart_page_handler(app_state: web::Data<AppState>) -> HttpResponse {
  match app_state.cart.load_cart().await {
    Ok(cart) => html_page(StatusCode::OK, &cart_page(cart, OrderButton::Ready, Vec::new())),
    Err(err) => {
      warn!(error = %err, "Cart could not be loaded.");
      let notices = vec![Notice::failure(UserAction::LoadCart, &err)];
      html_page(status_for(&err), &cart_page(app_state.cart.view(), OrderButton::Ready, notices))
    }
  }
}

/// `POST /cart/{id}/{decrease|increase|remove}`
#[instrument(name = "handler::mutate_cart", skip(app_state))]
pub async fn mutate_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(ProductId, CartAction)>,
) -> HttpResponse {
  let (product_id, action) = path.into_inner();
  let notice_action = user_action(action);

  match app_state.cart.mutate(product_id, action).await {
    Ok(MutationOutcome::Applied(reloaded)) => {
      let mut notices: Vec<Notice> = Notice::success(notice_action).into_iter().collect();
      if let Some(reload_err) = &reloaded.reload_error {
        notices.push(Notice::failure(UserAction::LoadCart, reload_err));
      }
      html_page(StatusCode::OK, &cart_page(reloaded.view, OrderButton::Ready, notices))
    }
    Ok(MutationOutcome::Superseded) => {
      info!(product_id, "Cart mutation superseded; redirecting to the latest cart.");
      HttpResponse::SeeOther().insert_header((LOCATION, "/cart")).finish()
    }
    Err(err) => {
      warn!(product_id, error = %err, "Cart mutation failed.");
      let notices = vec![Notice::failure(notice_action, &err)];
      html_page(status_for(&err), &cart_page(app_state.cart.view(), OrderButton::Ready, notices))
    }
  }
}

#[instrument(name = "handler::place_order", skip(app_state))]
pub async fn place_order_handler(app_state: web::Data<AppState>) -> HttpResponse {
  let order = app_state.cart.place_order();
  html_page(StatusCode::OK, &cart_page(app_state.cart.view(), order, Vec::new()))
}
