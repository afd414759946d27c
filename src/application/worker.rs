use super::monitor::RetirementRequest;
use super::queue::SharedReceiver;
use super::sink::{MessageKind, ResultMessage, ResultSink};
use crate::domain::order::{Order, OrderStatus};
use crate::domain::product::Category;
use crate::domain::worker::{WorkerId, WorkerLifecycle};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout_at;
use tracing::{debug, info};

/// Why a worker task ended.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WorkerExit {
    /// The monitor accepted an idle retirement.
    Retired,
    /// The work queue was closed and drained.
    QueueClosed,
}

/// Handling notice for a product category.
pub fn category_advisory(category: Category) -> &'static str {
    match category {
        Category::Grocery => "This is a grocery item. Perishable and needs fast delivery!",
        Category::Electronics => "This is an electronic item. Ensure safe packaging!",
        Category::Fashion => "This is a fashion item. Speed and presentation matter!",
        Category::Unknown => "Unknown category. Classify properly for quick commerce.",
    }
}

/// Pulls orders off the shared queue one at a time until it retires or the queue closes.
///
/// Workers are only ever started by the pool monitor.
pub struct Worker {
    lifecycle: WorkerLifecycle,
    queue: SharedReceiver,
    sink: ResultSink,
    signals: mpsc::Sender<RetirementRequest>,
}

impl Worker {
    pub fn new(
        id: WorkerId,
        idle_timeout: Duration,
        queue: SharedReceiver,
        sink: ResultSink,
        signals: mpsc::Sender<RetirementRequest>,
    ) -> Self {
        Self {
            lifecycle: WorkerLifecycle::new(id, idle_timeout),
            queue,
            sink,
            signals,
        }
    }

    pub async fn run(mut self) -> WorkerExit {
        let worker_id = self.lifecycle.id();
        debug!(worker_id, "worker started");

        loop {
            let deadline = self.lifecycle.deadline();
            // The deadline covers waiting for the lock as well as for an order.
            let next = timeout_at(deadline, async { self.queue.lock().await.recv().await }).await;

            match next {
                Ok(Some(mut order)) => {
                    self.process(&mut order).await;
                    self.lifecycle.order_processed();
                }
                Ok(None) => {
                    self.lifecycle.retire();
                    debug!(worker_id, "work queue closed, worker exiting");
                    return WorkerExit::QueueClosed;
                }
                Err(_) => {
                    if self.request_retirement().await {
                        info!(worker_id, "idle worker retired");
                        return WorkerExit::Retired;
                    }
                }
            }
        }
    }

    /// Asks the monitor for permission to retire. Returns `false` if the worker should keep going.
    async fn request_retirement(&mut self) -> bool {
        let worker_id = self.lifecycle.id();
        self.lifecycle.idle_expired();

        let (reply, accepted) = oneshot::channel();
        if let Err(err) = self.signals.try_send(RetirementRequest { worker_id, reply }) {
            debug!(worker_id, %err, "retirement signal not delivered, staying active");
            self.lifecycle.retirement_undelivered();
            return false;
        }

        match accepted.await {
            Ok(()) => {
                self.lifecycle.retire();
                true
            }
            Err(_) => {
                debug!(worker_id, "monitor dropped retirement request, staying active");
                self.lifecycle.retirement_undelivered();
                false
            }
        }
    }

    async fn process(&self, order: &mut Order) {
        let worker_id = self.lifecycle.id();
        order.status = OrderStatus::Processing;
        debug!(
            worker_id,
            order_id = order.id,
            product_id = order.product.id,
            quantity = order.quantity,
            "processing order"
        );
        self.emit(
            order,
            MessageKind::Processing,
            format!("Processing order for {}", order.product.name),
        )
        .await;

        let stock_notice = if order.quantity > 0 {
            "Product is in stock and ready for quick delivery!"
        } else {
            "Product is out of stock! Restocking soon."
        };
        self.emit(order, MessageKind::Stock, stock_notice.to_string()).await;

        for item in 1..=order.quantity {
            self.emit(order, MessageKind::Packing, format!("Packing item {item}")).await;
        }

        self.emit(
            order,
            MessageKind::Advisory,
            category_advisory(order.product.category).to_string(),
        )
        .await;

        order.status = OrderStatus::Processed;
        self.emit(
            order,
            MessageKind::Completed,
            format!(
                "Order for {} has been processed successfully!",
                order.product.name
            ),
        )
        .await;
        info!(worker_id, order_id = order.id, "order processed");
    }

    /// Waits while the sink is full.
    async fn emit(&self, order: &Order, kind: MessageKind, text: String) {
        self.sink
            .publish(ResultMessage {
                order_id: order.id,
                worker_id: self.lifecycle.id(),
                kind,
                text,
            })
            .await;
    }
}
