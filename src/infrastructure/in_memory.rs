use crate::domain::ports::CatalogStore;
use crate::domain::product::{Product, ProductId};
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory product catalog.
///
/// Uses `Arc<RwLock<HashMap<ProductId, Product>>>`: lookups and listings share the
/// read lock, reservations and stock overrides take the write lock so each
/// check-and-decrement happens as one step.
#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryCatalog {
    /// Creates a new, empty catalog.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn insert(&self, product: Product) -> Result<()> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id) {
            return Err(OrderError::DuplicateProduct(product.id));
        }
        products.insert(product.id, product);
        Ok(())
    }

    async fn get(&self, id: ProductId) -> Result<Product> {
        let products = self.products.read().await;
        products.get(&id).cloned().ok_or(OrderError::NotFound(id))
    }

    async fn reserve(&self, id: ProductId, quantity: u32) -> Result<Product> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or(OrderError::NotFound(id))?;
        if product.stock < quantity {
            return Err(OrderError::InsufficientStock {
                id,
                available: product.stock,
                requested: quantity,
            });
        }
        product.stock -= quantity;
        Ok(product.clone())
    }

    async fn set_stock(&self, id: ProductId, quantity: i64) -> Result<()> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or(OrderError::NotFound(id))?;
        product.stock =
            u32::try_from(quantity).map_err(|_| OrderError::InvalidQuantity(quantity))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        let mut snapshot: Vec<Product> = products.values().cloned().collect();
        snapshot.sort_by_key(|p| p.id);
        Ok(snapshot)
    }
}
