use crate::domain::ports::CatalogStore;
use crate::domain::product::Product;
use crate::error::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct ProductData {
    products: Vec<Product>,
}

/// Loads the initial catalog from a JSON document of the form
/// `{"products": [{"id", "name", "category", "price", "stock"}, ...]}`.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Parses products in document order.
    pub fn read<R: Read>(source: R) -> Result<Vec<Product>> {
        let data: ProductData = serde_json::from_reader(source)?;
        Ok(data.products)
    }

    pub fn read_path(path: impl AsRef<Path>) -> Result<Vec<Product>> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Inserts every product into `catalog`, stopping at the first duplicate id.
    pub async fn seed(catalog: &dyn CatalogStore, products: Vec<Product>) -> Result<usize> {
        let count = products.len();
        for product in products {
            catalog.insert(product).await?;
        }
        info!(products = count, "catalog seeded");
        Ok(count)
    }
}
