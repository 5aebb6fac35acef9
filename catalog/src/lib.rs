//! # Catalog
//!
//! Product dataset loading for the semantic search system. The dataset is
//! a CSV file read fully into memory at startup; rows are indexed by their
//! unique id for display-time joins.

pub mod error;
pub mod product;
pub mod store;

pub use error::{CatalogError, Result};
pub use product::Product;
pub use store::ProductCatalog;
