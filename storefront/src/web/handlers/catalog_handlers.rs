// bikeshop_storefront/src/web/handlers/catalog_handlers.rs

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use bikeshop::{CatalogView, ImageUpload, Notice, ProductForm, ProductId, UserAction};
use futures_util::StreamExt;
use tracing::{info, instrument, warn};

use super::html_page;
use crate::errors::{status_for, AppError, Result};
use crate::state::AppState;
use crate::web::render::{WebBody, WebPage};

fn register_page(catalog: CatalogView, form: ProductForm, notices: Vec<Notice>) -> WebPage {
  WebPage {
    title: "Register products",
    path: "/register",
    notices,
    body: WebBody::Register { catalog, form },
  }
}

#[instrument(name = "handler::register_page", skip(app_state))]
pub async fn register_page_handler(app_state: web::Data<AppState>) -> HttpResponse {
  match app_state.catalog.load_products().await {
    Ok(catalog) => html_page(StatusCode::OK, &register_page(catalog, ProductForm::default(), Vec::new())),
    Err(err) => {
      warn!(error = %err, "Catalog could not be loaded.");
      let notices = vec![Notice::failure(UserAction::LoadProducts, &err)];
      let page = register_page(app_state.catalog.view(), ProductForm::default(), notices);
      html_page(status_for(&err), &page)
    }
  }
}

#[instrument(name = "handler::add_product", skip(app_state, payload))]
pub async fn add_product_handler(app_state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
  let form = read_product_form(payload, app_state.config.max_upload_bytes).await?;

  match app_state.catalog.add_product(&form).await {
    Ok(reloaded) => {
      let mut notices: Vec<Notice> = Notice::success(UserAction::AddProduct).into_iter().collect();
      if let Some(reload_err) = &reloaded.reload_error {
        notices.push(Notice::failure(UserAction::LoadProducts, reload_err));
      }
      let page = register_page(reloaded.view, ProductForm::default(), notices);
      Ok(html_page(StatusCode::OK, &page))
    }
    Err(err) => {
      warn!(error = %err, "Product registration failed.");
      let notices = vec![Notice::failure(UserAction::AddProduct, &err)];
      // The file input cannot be pre-filled; everything else is shown again.
      let retained = ProductForm { image: None, ..form };
      let page = register_page(app_state.catalog.view(), retained, notices);
      Ok(html_page(status_for(&err), &page))
    }
  }
}

#[instrument(name = "handler::delete_product", skip(app_state))]
pub async fn delete_product_handler(app_state: web::Data<AppState>, path: web::Path<ProductId>) -> HttpResponse {
  let product_id = path.into_inner();
  match app_state.catalog.delete_product(product_id).await {
    Ok(catalog) => {
      let notices = Notice::success(UserAction::DeleteProduct).into_iter().collect();
      html_page(StatusCode::OK, &register_page(catalog, ProductForm::default(), notices))
    }
    Err(err) => {
      warn!(product_id, error = %err, "Product deletion failed.");
      let notices = vec![Notice::failure(UserAction::DeleteProduct, &err)];
      let page = register_page(app_state.catalog.view(), ProductForm::default(), notices);
      html_page(status_for(&err), &page)
    }
  }
}

/// Reads the multipart registration form. Unknown fields are ignored.
///
/// Any field larger than `max_field_bytes` aborts the upload.
async fn read_product_form(mut payload: Multipart, max_field_bytes: usize) -> Result<ProductForm> {
  let mut form = ProductForm::default();

  while let Some(field) = payload.next().await {
    let mut field = field.map_err(|e| AppError::Upload(format!("Malformed form data: {}", e)))?;
    let name = field.name().unwrap_or_default().to_string();
    let file_name = field
      .content_disposition()
      .and_then(|cd| cd.get_filename())
      .map(str::to_string);
    let content_type = field.content_type().map(|mime| mime.to_string());

    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
      let chunk = chunk.map_err(|e| AppError::Upload(format!("Field '{}' could not be read: {}", name, e)))?;
      if bytes.len() + chunk.len() > max_field_bytes {
        warn!(field = %name, max_field_bytes, "Form field exceeds the upload limit.");
        return Err(AppError::Upload(format!(
          "Field '{}' is larger than {} bytes.",
          name, max_field_bytes
        )));
      }
      bytes.extend_from_slice(&chunk);
    }

    match name.as_str() {
      "title" => form.title = field_text(&name, bytes)?,
      "description" => form.description = field_text(&name, bytes)?,
      "price" => form.price = field_text(&name, bytes)?,
      // Browsers send an empty, unnamed part when no file was chosen.
      "image" => {
        form.image = file_name.filter(|f| !f.is_empty()).map(|file_name| ImageUpload {
          file_name,
          content_type,
          bytes,
        })
      }
      other => warn!(field = other, "Ignoring unexpected form field."),
    }
  }

  info!(title = %form.title, has_image = form.image.is_some(), "Product form received.");
  Ok(form)
}

fn field_text(name: &str, bytes: Vec<u8>) -> Result<String> {
  String::from_utf8(bytes).map_err(|_| AppError::Upload(format!("Field '{}' is not valid UTF-8.", name)))
}
