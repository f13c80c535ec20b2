// bikeshop_storefront/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{cart_handlers, catalog_handlers, health_check_handler, landing_handler, storefront_handlers};

// Every page and action is registered once, here; `main.rs` calls this when building the App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/", web::get().to(landing_handler))
    .route("/health", web::get().to(health_check_handler))
    // Register page
    .service(
      web::scope("/register")
        .route("", web::get().to(catalog_handlers::register_page_handler))
        .route("/products", web::post().to(catalog_handlers::add_product_handler))
        .route(
          "/products/{product_id}/delete",
          web::post().to(catalog_handlers::delete_product_handler),
        ),
    )
    // Products page
    .service(
      web::scope("/products")
        .route("", web::get().to(storefront_handlers::products_page_handler))
        .route(
          "/{product_id}/add-to-cart",
          web::post().to(storefront_handlers::add_to_cart_handler),
        ),
    )
    // Cart page
    .service(
      web::scope("/cart")
        .route("", web::get().to(cart_handlers::cart_page_handler))
        .route("/place-order", web::post().to(cart_handlers::place_order_handler))
        .route("/{product_id}/{action}", web::post().to(cart_handlers::mutate_cart_handler)),
    );
}
