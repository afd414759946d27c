use super::product::{Product, ProductId};
use crate::error::Result;
use async_trait::async_trait;

/// Shared product catalog.
///
/// Implementations must make `reserve` and `set_stock` linearizable per product:
/// a check-and-decrement is one indivisible step, and stock is never observed below zero.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Adds a product. Fails with `DuplicateProduct` if the id is taken.
    async fn insert(&self, product: Product) -> Result<()>;
    async fn get(&self, id: ProductId) -> Result<Product>;
    /// Deducts `quantity` from stock if enough is available, returning the post-reservation snapshot.
    async fn reserve(&self, id: ProductId, quantity: u32) -> Result<Product>;
    async fn set_stock(&self, id: ProductId, quantity: i64) -> Result<()>;
    async fn list(&self) -> Result<Vec<Product>>;
}

pub type CatalogStoreBox = Box<dyn CatalogStore>;
