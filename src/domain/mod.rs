//! Domain layer: catalog entities, orders, worker lifecycle and the storage port.

pub mod order;
pub mod ports;
pub mod product;
pub mod worker;
