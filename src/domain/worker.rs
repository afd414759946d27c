use std::time::Duration;
use tokio::time::Instant;

pub type WorkerId = usize;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WorkerState {
    /// Waiting on the queue or processing an order.
    Active,
    /// Idle deadline expired; waiting for the monitor to answer a retirement request.
    IdleWaiting,
    Retired,
}

/// Per-worker lifecycle: state plus an idle deadline that resets on every processed order.
#[derive(Debug, Clone)]
pub struct WorkerLifecycle {
    id: WorkerId,
    state: WorkerState,
    idle_timeout: Duration,
    deadline: Instant,
}

impl WorkerLifecycle {
    pub fn new(id: WorkerId, idle_timeout: Duration) -> Self {
        Self {
            id,
            state: WorkerState::Active,
            idle_timeout,
            deadline: Instant::now() + idle_timeout,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn order_processed(&mut self) {
        self.reset_deadline();
    }

    pub fn idle_expired(&mut self) {
        if self.state == WorkerState::Active {
            self.state = WorkerState::IdleWaiting;
        }
    }

    /// The retirement request never reached the monitor: keep working with a fresh deadline.
    pub fn retirement_undelivered(&mut self) {
        if self.state == WorkerState::IdleWaiting {
            self.state = WorkerState::Active;
            self.reset_deadline();
        }
    }

    pub fn retire(&mut self) {
        self.state = WorkerState::Retired;
    }

    fn reset_deadline(&mut self) {
        self.deadline = Instant::now() + self.idle_timeout;
    }
}
