//! Dataset loading and id-indexed lookup.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{CatalogError, Result};
use crate::product::Product;

/// In-memory product dataset, loaded once from CSV.
///
/// Rows keep their file order; lookups by id go through a side index.
/// Rows with an empty id, and later rows that repeat an id, are skipped
/// with a warning rather than failing the whole load.
#[derive(Debug)]
pub struct ProductCatalog {
    products: Vec<Product>,
    by_id: HashMap<String, usize>,
}

impl ProductCatalog {
    /// Load the full dataset at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }

        let mut reader = csv::Reader::from_path(path)?;
        let mut products: Vec<Product> = Vec::new();
        let mut by_id: HashMap<String, usize> = HashMap::new();

        for record in reader.deserialize() {
            let product: Product = record?;
            if product.asin.is_empty() {
                warn!("skipping dataset row with empty id");
                continue;
            }
            match by_id.entry(product.asin.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(products.len());
                    products.push(product);
                }
                Entry::Occupied(_) => {
                    warn!(
                        "duplicate product id {}, keeping first occurrence",
                        product.asin
                    );
                }
            }
        }

        info!("loaded {} products from {}", products.len(), path.display());
        Ok(Self { products, by_id })
    }

    /// Look up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.by_id.get(id).map(|&i| &self.products[i])
    }

    /// All products in file order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
