use super::queue::WorkQueue;
use crate::domain::order::{Order, OrderRequest, OrderStatus};
use crate::domain::ports::CatalogStoreBox;
use crate::error::Result;
use tracing::debug;

/// Validates requests, reserves stock and hands accepted orders to the work queue.
pub struct OrderIntake {
    catalog: CatalogStoreBox,
    queue: WorkQueue,
}

impl OrderIntake {
    pub fn new(catalog: CatalogStoreBox, queue: WorkQueue) -> Self {
        Self { catalog, queue }
    }

    pub fn catalog(&self) -> &CatalogStoreBox {
        &self.catalog
    }

    pub fn queue(&self) -> &WorkQueue {
        &self.queue
    }

    /// Accepts an order.
    ///
    /// A queue slot is claimed before any stock is touched, so a full queue is
    /// reported as `QueueFull` with the catalog unchanged. Once this returns
    /// `Ok`, the stock has been deducted and the order is in the queue; it is
    /// never rolled back.
    pub async fn submit(&self, request: OrderRequest) -> Result<Order> {
        let quantity = request.validated_quantity()?;
        let product = self.catalog.get(request.product_id).await?;

        let slot = self.queue.claim_slot()?;
        let product = if quantity > 0 {
            // A failed reservation drops `slot`, returning it to the queue.
            self.catalog.reserve(product.id, quantity).await?
        } else {
            product
        };

        let mut order = Order::new(product, quantity);
        order.status = OrderStatus::Enqueued;
        debug!(
            order_id = order.id,
            product_id = order.product.id,
            quantity,
            "order accepted"
        );
        slot.send(order.clone());
        Ok(order)
    }

    /// Closes the work queue and hands back the catalog.
    pub fn close(self) -> CatalogStoreBox {
        self.catalog
    }
}
