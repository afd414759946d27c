use crate::domain::order::OrderId;
use crate::domain::worker::WorkerId;
use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc;
use tracing::trace;

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// A worker picked the order up.
    Processing,
    /// In-stock / out-of-stock notice.
    Stock,
    Packing,
    /// Category-specific handling notice.
    Advisory,
    Completed,
}

/// A progress or outcome line emitted by a worker.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct ResultMessage {
    pub order_id: OrderId,
    pub worker_id: WorkerId,
    pub kind: MessageKind,
    pub text: String,
}

impl fmt::Display for ResultMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Worker {}: {}", self.worker_id, self.text)
    }
}

/// The single consumer end of the result sink.
pub type ResultReceiver = mpsc::Receiver<ResultMessage>;

/// Bounded channel of worker messages with one consumer.
///
/// A full sink makes `publish` wait, so a slow consumer slows the workers down
/// instead of losing messages. Once the consumer is dropped, messages are
/// discarded.
#[derive(Clone)]
pub struct ResultSink {
    tx: mpsc::Sender<ResultMessage>,
}

impl ResultSink {
    pub fn new(capacity: usize) -> (Self, ResultReceiver) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    pub async fn publish(&self, message: ResultMessage) {
        if self.tx.send(message).await.is_err() {
            trace!("result consumer gone, message dropped");
        }
    }
}
