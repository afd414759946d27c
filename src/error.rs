use crate::domain::product::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("product {0} not found")]
    NotFound(ProductId),
    #[error("quantity cannot be negative: {0}")]
    InvalidQuantity(i64),
    #[error("insufficient stock for product {id}: only {available} items available, {requested} requested")]
    InsufficientStock {
        id: ProductId,
        available: u32,
        requested: u32,
    },
    #[error("work queue is full, retry later")]
    QueueFull,
    #[error("engine is shutting down")]
    ShuttingDown,
    #[error("duplicate product id {0}")]
    DuplicateProduct(ProductId),
    #[error("price must be positive")]
    InvalidPrice,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OrderError>;
