use crate::domain::order::OrderRequest;
use crate::error::{OrderError, Result};
use std::io::Read;

/// Reads order requests from a CSV source with a `product_id, quantity` header.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths.
pub struct OrderReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OrderReader<R> {
    /// Creates a new `OrderReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields one result per row, so a bad row does not stop the stream.
    pub fn requests(self) -> impl Iterator<Item = Result<OrderRequest>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(OrderError::from))
    }
}
