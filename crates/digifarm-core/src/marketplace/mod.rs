//! Produce marketplace: listing, search and the product page.

mod catalog;
mod model;
mod quantity;

pub use catalog::{ProductCatalog, ProductQuery};
pub use model::{Category, Product, ProductDetail, Seller, SellerContact};
pub use quantity::QuantitySelector;
