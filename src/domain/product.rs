use crate::error::OrderError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ProductId = u32;

/// A positive unit price.
///
/// Wraps `rust_decimal::Decimal` so a zero or negative price can never reach the catalog.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> Result<Self, OrderError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(OrderError::InvalidPrice)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = OrderError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Product category. Anything outside the known set is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Grocery,
    Electronics,
    Fashion,
    #[serde(other)]
    Unknown,
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value {
            "Grocery" => Category::Grocery,
            "Electronics" => Category::Electronics,
            "Fashion" => Category::Fashion,
            _ => Category::Unknown,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Grocery => "Grocery",
            Category::Electronics => "Electronics",
            Category::Fashion => "Fashion",
            Category::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// A catalog entry. Only the catalog mutates `stock`; everything else works on snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Price,
    pub stock: u32,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: Category,
        price: Price,
        stock: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            price,
            stock,
        }
    }
}
