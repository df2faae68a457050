pub mod product;

pub use product::{CatalogError, Product, ProductCatalog, SpoilageRisk, UnknownSpoilageRisk};
