use crate::domain::order::Order;
use crate::error::{OrderError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{self, Permit, WeakSender};

/// Consumer side of the work queue, shared by every worker.
///
/// Each order is handed to whichever worker holds the lock when it arrives,
/// so no order is delivered twice.
pub type SharedReceiver = Arc<Mutex<mpsc::Receiver<Order>>>;

/// Producer side of the bounded FIFO between intake and the worker pool.
pub struct WorkQueue {
    tx: mpsc::Sender<Order>,
}

pub fn work_queue(capacity: usize) -> (WorkQueue, SharedReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (WorkQueue { tx }, Arc::new(Mutex::new(rx)))
}

impl WorkQueue {
    /// Claims a slot without waiting. The slot is released if the permit is dropped unused.
    pub fn claim_slot(&self) -> Result<Permit<'_, Order>> {
        self.tx.try_reserve().map_err(|err| match err {
            TrySendError::Full(()) => OrderError::QueueFull,
            TrySendError::Closed(()) => OrderError::ShuttingDown,
        })
    }

    /// Orders currently buffered (including claimed but unsent slots).
    pub fn depth(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// A handle that observes the queue without keeping it open.
    pub fn observer(&self) -> QueueObserver {
        QueueObserver {
            tx: self.tx.downgrade(),
        }
    }
}

/// Reads queue depth for monitoring. Does not prevent the queue from closing.
#[derive(Clone)]
pub struct QueueObserver {
    tx: WeakSender<Order>,
}

impl QueueObserver {
    /// Buffered orders, or zero once the queue has been closed.
    pub fn depth(&self) -> usize {
        self.tx
            .upgrade()
            .map(|tx| tx.max_capacity() - tx.capacity())
            .unwrap_or(0)
    }
}
