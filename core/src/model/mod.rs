// bikeshop/src/model/mod.rs

//! Data shapes exchanged with the REST backend.

pub mod cart_item;
pub mod product;

pub use cart_item::CartItem;
pub use product::{ImageUpload, NewProduct, Product, ProductForm, ProductId};
