// bikeshop_storefront/src/web/render.rs

//! Server-rendered pages.
//!
//! Each page is rendered wholesale from its controller's view plus the notices
//! produced by the request. Element ids and control classes are stable so the
//! markup can be targeted by styles and browser tests.

use actix_web::http::StatusCode;
use bikeshop::{CartView, CatalogView, GridView, Notice, NoticeLevel, OrderButton, ProductForm};
use maud::{html, Markup, PreEscaped, DOCTYPE};

#[derive(Debug, Clone)]
pub enum WebBody {
  Landing,
  Register {
    catalog: CatalogView,
    /// Values to pre-fill, e.g. after a failed submission.
    form: ProductForm,
  },
  Products {
    grid: GridView,
    asset_base_url: String,
  },
  Cart {
    cart: CartView,
    order: OrderButton,
  },
}

#[derive(Debug, Clone)]
pub struct WebPage {
  pub title: &'static str,
  pub path: &'static str,
  pub notices: Vec<Notice>,
  pub body: WebBody,
}

pub fn render_page(page: &WebPage) -> String {
  let markup = html! {
    (DOCTYPE)
    html lang="en" {
      head {
        meta charset="utf-8";
        meta name="viewport" content="width=device-width, initial-scale=1";
        title { (page.title) " | Bike Shop" }
        style { (PreEscaped(STYLES)) }
      }
      body {
        (topbar(page.path))
        main id="main" {
          h1 { (page.title) }
          (notices(&page.notices))
          (page_body(&page.body))
        }
      }
    }
  };
  markup.into_string()
}

pub fn render_error_page(status: StatusCode, detail: &str) -> String {
  let heading = status.canonical_reason().unwrap_or("Error");
  let markup = html! {
    (DOCTYPE)
    html lang="en" {
      head {
        meta charset="utf-8";
        title { (heading) " | Bike Shop" }
        style { (PreEscaped(STYLES)) }
      }
      body {
        (topbar(""))
        main id="main" {
          h1 { (status.as_u16()) " " (heading) }
          div class="notice error" role="alert" { (detail) }
        }
      }
    }
  };
  markup.into_string()
}

/// Resolves a backend image path against the asset base URL. Absolute URLs pass through.
pub fn asset_url(asset_base_url: &str, image_path: &str) -> Option<String> {
  let image_path = image_path.trim();
  if image_path.is_empty() {
    return None;
  }
  if image_path.starts_with("http://") || image_path.starts_with("https://") {
    return Some(image_path.to_string());
  }
  Some(format!(
    "{}/{}",
    asset_base_url.trim_end_matches('/'),
    image_path.trim_start_matches('/')
  ))
}

fn topbar(path: &str) -> Markup {
  let nav = [
    ("/", "Home"),
    ("/register", "Register products"),
    ("/products", "Products"),
    ("/cart", "Cart"),
  ];

  html! {
    header class="topbar" {
      span class="brand" { "Bike Shop" }
      nav {
        @for (href, label) in nav {
          a class={(if path == href { "nav-link active" } else { "nav-link" })} href=(href) { (label) }
        }
      }
    }
  }
}

fn notices(notices: &[Notice]) -> Markup {
  html! {
    div id="notices" {
      @for notice in notices {
        @let class = match notice.level {
          NoticeLevel::Success => "notice success",
          NoticeLevel::Error => "notice error",
        };
        div class=(class) role=(if notice.is_error() { "alert" } else { "status" }) {
          strong { (notice.message) }
          @if let Some(detail) = &notice.detail {
            span class="notice-detail" { " " (detail) }
          }
        }
      }
    }
  }
}

fn page_body(body: &WebBody) -> Markup {
  match body {
    WebBody::Landing => landing(),
    WebBody::Register { catalog, form } => register(catalog, form),
    WebBody::Products { grid, asset_base_url } => products(grid, asset_base_url),
    WebBody::Cart { cart, order } => cart_page(cart, *order),
  }
}

fn landing() -> Markup {
  html! {
    p { "Welcome to the bike shop." }
    ul class="landing-links" {
      li { a href="/register" { "Register products" } }
      li { a href="/products" { "Browse products" } }
      li { a href="/cart" { "View your cart" } }
    }
  }
}

fn register(catalog: &CatalogView, form: &ProductForm) -> Markup {
  html! {
    form id="product-form" method="post" action="/register/products" enctype="multipart/form-data" {
      label { "Title" input type="text" name="title" value=(form.title) required; }
      label { "Description" textarea name="description" { (form.description) } }
      label { "Price" input type="number" name="price" step="0.01" min="0" value=(form.price) required; }
      label { "Image" input type="file" name="image" accept="image/*" required; }
      button type="submit" { "Add product" }
    }
    h2 { "Products" }
    ul id="product-list" {
      @for entry in &catalog.entries {
        li {
          span class="product-title" { (entry.title) }
          form method="post" action={"/register/products/" (entry.product_id) "/delete"} {
            button type="submit" class="delete" data-id=(entry.product_id) { "Delete" }
          }
        }
      }
    }
  }
}

fn products(grid: &GridView, asset_base_url: &str) -> Markup {
  html! {
    div id="product-grid" {
      @for card in &grid.cards {
        div class="product-card" {
          @if let Some(src) = asset_url(asset_base_url, &card.image_path) {
            img src=(src) alt=(card.title);
          }
          h3 { (card.title) }
          p class="price" { (card.price_label) }
          form method="post" action={"/products/" (card.product_id) "/add-to-cart"} {
            button type="submit" class="add-to-cart" data-id=(card.product_id) { "Add to cart" }
          }
        }
      }
    }
  }
}

fn cart_page(cart: &CartView, order: OrderButton) -> Markup {
  html! {
    ul id="cart-list" {
      @for line in &cart.lines {
        li class="cart-line" {
          span class="cart-title" { (line.title) }
          span class="price" { (line.price_label()) }
          span class="quantity" { (line.quantity) }
          @for (action, label) in [("decrease", "-"), ("increase", "+"), ("remove", "Remove")] {
            form method="post" action={"/cart/" (line.product_id) "/" (action)} {
              button type="submit" class=(action) data-id=(line.product_id) { (label) }
            }
          }
        }
      }
    }
    p id="cart-total" { (cart.total_label()) }
    form method="post" action="/cart/place-order" {
      @match order {
        OrderButton::Ready => {
          button type="submit" id="place-order" { "Place order" }
        }
        OrderButton::Flashing { hide_after } => {
          button type="submit" id="place-order" class="flash-red"
            style={"animation-delay: " (hide_after.as_millis()) "ms"} { "Place order" }
        }
      }
    }
  }
}

const STYLES: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1d1d1f; }
.topbar { display: flex; gap: 2rem; align-items: center; padding: 0.75rem 1.5rem; background: #20313b; color: #fff; }
.topbar a { color: #cfe3ee; margin-right: 1rem; text-decoration: none; }
.topbar a.active { color: #fff; font-weight: 600; }
main { padding: 1.5rem; max-width: 60rem; }
.notice { padding: 0.6rem 0.9rem; margin-bottom: 0.5rem; border-radius: 4px; }
.notice.success { background: #e3f4e6; }
.notice.error { background: #fbe4e4; }
#product-form label { display: block; margin-bottom: 0.5rem; }
#product-list li, .cart-line { display: flex; gap: 0.75rem; align-items: center; margin-bottom: 0.4rem; }
#product-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(12rem, 1fr)); gap: 1rem; }
.product-card { border: 1px solid #ddd; border-radius: 6px; padding: 0.75rem; }
.product-card img { max-width: 100%; }
#cart-total { font-weight: 600; }
.flash-red { background: #c62828; color: #fff; animation: hide-order 0s forwards; }
@keyframes hide-order { to { visibility: hidden; } }
"#;
