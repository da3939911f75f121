//! Domain models.

pub mod product;
pub mod seller;

pub use product::{NewProduct, Product, ProductChanges};
pub use seller::Seller;
