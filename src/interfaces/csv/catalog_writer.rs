use crate::domain::product::Product;
use crate::error::Result;
use std::io::Write;

/// Writes catalog snapshots as CSV: `id,name,category,price,stock`.
pub struct CatalogWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CatalogWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_products(&mut self, products: impl IntoIterator<Item = Product>) -> Result<()> {
        self.writer
            .write_record(["id", "name", "category", "price", "stock"])?;
        for product in products {
            self.writer.write_record([
                product.id.to_string(),
                product.name,
                product.category.to_string(),
                product.price.to_string(),
                product.stock.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
