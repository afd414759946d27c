use super::intake::OrderIntake;
use super::monitor::{PoolMonitor, PoolStats};
use super::queue::work_queue;
use super::sink::{ResultReceiver, ResultSink};
use crate::config::EngineConfig;
use crate::domain::order::{Order, OrderRequest};
use crate::domain::ports::CatalogStoreBox;
use crate::domain::product::{Product, ProductId};
use crate::error::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The main entry point for order processing.
///
/// `OrderEngine` owns the catalog, the work queue and the pool monitor. `submit`
/// reserves stock synchronously and returns as soon as the order is queued;
/// workers report progress on the result sink.
pub struct OrderEngine {
    intake: OrderIntake,
    active_workers: Arc<AtomicUsize>,
    stats: watch::Receiver<PoolStats>,
    shutdown: watch::Sender<bool>,
    monitor: JoinHandle<()>,
}

impl OrderEngine {
    /// Starts the worker pool over `catalog`. Must be called from within a tokio runtime.
    ///
    /// Returns the engine together with the only receiver of worker messages.
    /// Workers wait while the sink is full, so the receiver must be read
    /// concurrently with `shutdown`. Dropping it discards every message.
    ///
    /// # Arguments
    ///
    /// * `catalog` - The product catalog, already seeded.
    /// * `config` - Pool sizing and timing.
    pub fn start(
        catalog: CatalogStoreBox,
        config: EngineConfig,
    ) -> Result<(Self, ResultReceiver)> {
        config.validate()?;

        let (queue, receiver) = work_queue(config.queue_capacity);
        let (sink, results) = ResultSink::new(config.sink_capacity);
        let (monitor, handle) = PoolMonitor::new(config, receiver, queue.observer(), sink);
        let monitor = tokio::spawn(monitor.run());

        let engine = Self {
            intake: OrderIntake::new(catalog, queue),
            active_workers: handle.active_workers,
            stats: handle.stats,
            shutdown: handle.shutdown,
            monitor,
        };
        Ok((engine, results))
    }

    /// Submits an order for `quantity` units of a product.
    pub async fn submit(&self, product_id: ProductId, quantity: i64) -> Result<Order> {
        self.submit_request(OrderRequest::new(product_id, quantity))
            .await
    }

    pub async fn submit_request(&self, request: OrderRequest) -> Result<Order> {
        self.intake.submit(request).await
    }

    pub async fn product(&self, id: ProductId) -> Result<Product> {
        self.intake.catalog().get(id).await
    }

    pub async fn products(&self) -> Result<Vec<Product>> {
        self.intake.catalog().list().await
    }

    /// Administrative stock override.
    pub async fn set_stock(&self, id: ProductId, quantity: i64) -> Result<()> {
        self.intake.catalog().set_stock(id, quantity).await
    }

    /// Current number of active workers.
    pub fn active_workers(&self) -> usize {
        self.active_workers.load(Ordering::SeqCst)
    }

    /// The most recent sample taken by the pool monitor.
    pub fn pool_stats(&self) -> PoolStats {
        *self.stats.borrow()
    }

    /// Orders waiting for a worker.
    pub fn queued_orders(&self) -> usize {
        self.intake.queue().depth()
    }

    /// Closes the work queue, waits for workers to finish every queued order,
    /// and returns the final state of the catalog. The result receiver closes
    /// once the last worker has exited.
    pub async fn shutdown(self) -> Result<Vec<Product>> {
        let Self {
            intake,
            shutdown,
            monitor,
            ..
        } = self;

        let catalog = intake.close();
        shutdown.send_replace(true);
        if let Err(err) = monitor.await {
            error!(%err, "pool monitor failed during shutdown");
        }
        info!("order engine stopped");

        catalog.list().await
    }
}
