//! Application layer containing the order-processing pipeline.
//!
//! `OrderEngine` is the entry point. Intake reserves stock and pushes orders
//! into a bounded work queue; a pool of worker tasks drains it and publishes
//! progress on a bounded result sink; the pool monitor supervises worker
//! lifecycle and keeps the pool at or above its floor.

pub mod engine;
pub mod intake;
pub mod monitor;
pub mod queue;
pub mod sink;
pub mod worker;
