// bikeshop_storefront/src/web/handlers/mod.rs

pub mod cart_handlers;
pub mod catalog_handlers;
pub mod storefront_handlers;

use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;

use super::render::{render_page, WebBody, WebPage};

/// Renders `page` as a full HTML response.
pub(crate) fn html_page(status: StatusCode, page: &WebPage) -> HttpResponse {
  HttpResponse::build(status)
    .content_type(ContentType::html())
    .body(render_page(page))
}

pub async fn landing_handler() -> HttpResponse {
  let page = WebPage {
    title: "Bike Shop",
    path: "/",
    notices: Vec::new(),
    body: WebBody::Landing,
  };
  html_page(StatusCode::OK, &page)
}

pub async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
