use super::product::{Product, ProductId};
use crate::error::OrderError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

pub type OrderId = u64;

static NEXT_ORDER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum OrderStatus {
    #[default]
    Created,
    Enqueued,
    Processing,
    Processed,
}

/// A request as it arrives from a front-end, before validation.
///
/// `quantity` is signed so negative input reaches intake and is rejected there
/// rather than failing to parse.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
pub struct OrderRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl OrderRequest {
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
        }
    }

    /// Validates the requested quantity, returning it as an unsigned count.
    pub fn validated_quantity(&self) -> Result<u32, OrderError> {
        u32::try_from(self.quantity).map_err(|_| OrderError::InvalidQuantity(self.quantity))
    }
}

/// An accepted order.
///
/// Holds a snapshot of the product taken at reservation time, so workers never
/// touch the shared catalog. Owned by exactly one party at a time.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Order {
    pub id: OrderId,
    pub product: Product,
    pub quantity: u32,
    pub status: OrderStatus,
}

impl Order {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self {
            id: NEXT_ORDER_ID.fetch_add(1, Ordering::Relaxed),
            product,
            quantity,
            status: OrderStatus::Created,
        }
    }

    /// Price of the whole order.
    pub fn total(&self) -> Decimal {
        self.product.price.value() * Decimal::from(self.quantity)
    }
}
