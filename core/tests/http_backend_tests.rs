// tests/http_backend_tests.rs
mod common;
use common::*;

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use bikeshop::{Backend, CartItem, FailureKind, HttpBackend, HttpBackendConfig, NewProduct, StoreError};
use parking_lot::Mutex;
use serial_test::serial;

#[derive(Debug, Clone)]
struct Recorded {
  method: String,
  path: String,
  content_type: Option<String>,
  body: String,
}

#[derive(Default)]
struct FakeShop {
  /// Answer every request with this status instead.
  fail_status: Option<u16>,
  /// Answer with a body that is not JSON.
  garbage: bool,
  requests: Mutex<Vec<Recorded>>,
}

async fn handle(req: HttpRequest, body: web::Bytes, shop: web::Data<FakeShop>) -> HttpResponse {
  shop.requests.lock().push(Recorded {
    method: req.method().to_string(),
    path: req.path().to_string(),
    content_type: req
      .headers()
      .get("content-type")
      .and_then(|v| v.to_str().ok())
      .map(str::to_string),
    body: String::from_utf8_lossy(&body).into_owned(),
  });

  if let Some(status) = shop.fail_status {
    let status = actix_web::http::StatusCode::from_u16(status).unwrap();
    return HttpResponse::build(status).json(serde_json::json!({ "detail": "nope" }));
  }
  if shop.garbage {
    return HttpResponse::Ok().content_type("text/html").body("<html>oops</html>");
  }

  match (req.method().as_str(), req.path()) {
    ("GET", "/products") => HttpResponse::Ok().json(serde_json::json!([
      { "id": 1, "title": "Widget", "description": "Blue", "price": 9.5, "image_path": "static/images/widget.png" },
      { "id": 2, "title": "Gadget", "price": 20.0 }
    ])),
    ("GET", "/cart") => HttpResponse::Ok().json(serde_json::json!([{ "product_id": 1, "quantity": 2 }])),
    ("POST", "/products") => HttpResponse::Ok().json(serde_json::json!({ "id": 3 })),
    _ => HttpResponse::Ok().json(serde_json::json!({ "ok": true })),
  }
}

/// Starts a fake REST backend on an ephemeral port.
fn start_fake_shop(shop: FakeShop) -> (HttpBackend, web::Data<FakeShop>) {
  let shop = web::Data::new(shop);
  let data = shop.clone();
  let server = HttpServer::new(move || App::new().app_data(data.clone()).default_service(web::to(handle)))
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
  let addr = server.addrs()[0];
  actix_web::rt::spawn(server.run());

  let config = HttpBackendConfig::new(format!("http://{addr}/")).with_timeout(Duration::from_secs(5));
  (HttpBackend::new(config).unwrap(), shop)
}

fn requests(shop: &web::Data<FakeShop>) -> Vec<Recorded> {
  shop.requests.lock().clone()
}

#[actix_web::test]
#[serial]
async fn test_lists_decode_json_bodies() {
  setup_tracing();
  let (backend, shop) = start_fake_shop(FakeShop::default());

  let products = backend.list_products().await.unwrap();
  let cart = backend.list_cart().await.unwrap();

  assert_eq!(products.len(), 2);
  assert_eq!(products[0].image_path, "static/images/widget.png");
  // Optional fields default when the backend leaves them out.
  assert_eq!(products[1].description, "");
  assert_eq!(products[1].image_path, "");
  assert_eq!(cart, vec![CartItem::new(1, 2)]);

  let seen = requests(&shop);
  assert_eq!(seen[0].method, "GET");
  assert_eq!(seen[0].path, "/products");
  assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
  assert_eq!(seen[1].path, "/cart");
}

#[actix_web::test]
#[serial]
async fn test_add_to_cart_posts_id_as_text() {
  setup_tracing();
  let (backend, shop) = start_fake_shop(FakeShop::default());

  backend.add_to_cart(7).await.unwrap();

  let seen = requests(&shop);
  assert_eq!(seen.len(), 1);
  assert_eq!(seen[0].method, "POST");
  assert_eq!(seen[0].path, "/cart");
  assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
  let body: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
  assert_eq!(body, serde_json::json!({ "product_id": "7" }));
}

#[actix_web::test]
#[serial]
async fn test_quantity_update_and_removal_hit_the_item_path() {
  setup_tracing();
  let (backend, shop) = start_fake_shop(FakeShop::default());

  backend.update_cart_item(4, 3).await.unwrap();
  backend.remove_cart_item(4).await.unwrap();
  backend.delete_product(9).await.unwrap();

  let seen = requests(&shop);
  assert_eq!(seen[0].method, "PUT");
  assert_eq!(seen[0].path, "/cart/4");
  let body: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
  assert_eq!(body, serde_json::json!({ "quantity": 3 }));
  assert_eq!((seen[1].method.as_str(), seen[1].path.as_str()), ("DELETE", "/cart/4"));
  assert_eq!((seen[2].method.as_str(), seen[2].path.as_str()), ("DELETE", "/products/9"));
}

#[actix_web::test]
#[serial]
async fn test_create_product_sends_multipart_form() {
  setup_tracing();
  let (backend, shop) = start_fake_shop(FakeShop::default());
  let product = NewProduct {
    title: "Roadster".to_string(),
    description: "Steel frame".to_string(),
    price: 349.9,
    image: image("frame.png"),
  };

  backend.create_product(&product).await.unwrap();

  let seen = requests(&shop);
  assert_eq!(seen[0].method, "POST");
  assert_eq!(seen[0].path, "/products");
  assert!(seen[0]
    .content_type
    .as_deref()
    .unwrap()
    .starts_with("multipart/form-data"));
  assert!(seen[0].body.contains("name=\"title\""));
  assert!(seen[0].body.contains("Roadster"));
  assert!(seen[0].body.contains("name=\"price\""));
  assert!(seen[0].body.contains("349.9"));
  assert!(seen[0].body.contains("filename=\"frame.png\""));
}

#[actix_web::test]
#[serial]
async fn test_non_success_status_is_a_failure() {
  setup_tracing();
  let (backend, _shop) = start_fake_shop(FakeShop {
    fail_status: Some(500),
    ..FakeShop::default()
  });

  let err = backend.update_cart_item(1, 2).await.unwrap_err();

  match err {
    StoreError::Status { method, path, status } => {
      assert_eq!(method, "PUT");
      assert_eq!(path, "/cart/1");
      assert_eq!(status, 500);
    }
    other => panic!("Expected StoreError::Status, got {other:?}"),
  }
}

#[actix_web::test]
#[serial]
async fn test_unparseable_body_is_a_decode_failure() {
  setup_tracing();
  let (backend, _shop) = start_fake_shop(FakeShop {
    garbage: true,
    ..FakeShop::default()
  });

  let err = backend.list_products().await.unwrap_err();

  assert_eq!(err.kind(), FailureKind::Decode);
}

#[actix_web::test]
#[serial]
async fn test_unreachable_backend_is_a_network_failure() {
  setup_tracing();
  let port = {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
  };
  let backend = HttpBackend::new(HttpBackendConfig::new(format!("http://127.0.0.1:{port}"))).unwrap();

  let err = backend.list_cart().await.unwrap_err();

  assert_eq!(err.kind(), FailureKind::Network);
}

#[actix_web::test]
#[serial]
async fn test_controllers_work_over_http() {
  setup_tracing();
  let (backend, shop) = start_fake_shop(FakeShop::default());
  let cart = bikeshop::CartController::new(Arc::new(backend)).unwrap();

  let view = cart.load_cart().await.unwrap();

  assert_eq!(view.total_label(), "Total: $19.00");
  let paths: Vec<String> = requests(&shop).into_iter().map(|r| r.path).collect();
  assert_eq!(paths, vec!["/cart", "/products"]);
}
