#![allow(dead_code)]

use orderpool::application::engine::OrderEngine;
use orderpool::application::sink::{ResultMessage, ResultReceiver};
use orderpool::config::EngineConfig;
use orderpool::domain::ports::CatalogStore;
use orderpool::domain::product::{Category, Price, Product};
use orderpool::infrastructure::in_memory::InMemoryCatalog;
use rust_decimal_macros::dec;
use std::io::{Error, Write};
use std::path::Path;

pub fn product(id: u32, category: Category, stock: u32) -> Product {
    Product::new(
        id,
        format!("product-{id}"),
        category,
        Price::new(dec!(10.0)).unwrap(),
        stock,
    )
}

pub async fn catalog_with(products: Vec<Product>) -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new();
    for product in products {
        catalog.insert(product).await.unwrap();
    }
    catalog
}

/// Engine over a single product with id 1.
pub async fn engine_with_stock(stock: u32, config: EngineConfig) -> (OrderEngine, ResultReceiver) {
    let catalog = catalog_with(vec![product(1, Category::Grocery, stock)]).await;
    OrderEngine::start(Box::new(catalog), config).unwrap()
}

/// Reads every worker message on its own task until the sink closes.
pub fn collect_results(mut results: ResultReceiver) -> tokio::task::JoinHandle<Vec<ResultMessage>> {
    tokio::spawn(async move {
        let mut out = Vec::new();
        while let Some(message) = results.recv().await {
            out.push(message);
        }
        out
    })
}

pub fn write_catalog_json(path: &Path, products: &[(u32, &str, &str, &str, u32)]) -> Result<(), Error> {
    let mut file = std::fs::File::create(path)?;
    let entries: Vec<String> = products
        .iter()
        .map(|(id, name, category, price, stock)| {
            format!(
                r#"{{"id": {id}, "name": "{name}", "category": "{category}", "price": {price}, "stock": {stock}}}"#
            )
        })
        .collect();
    write!(file, r#"{{"products": [{}]}}"#, entries.join(","))?;
    Ok(())
}

pub fn write_orders_csv(path: &Path, rows: &[[&str; 2]]) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(["product_id", "quantity"])?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
