use crate::error::{OrderError, Result};
use std::time::Duration;

pub const DEFAULT_WORKER_COUNT: usize = 3;
pub const DEFAULT_WORKER_FLOOR: usize = 1;
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
pub const DEFAULT_SINK_CAPACITY: usize = 100;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MONITOR_TICK: Duration = Duration::from_secs(5);

/// Tuning knobs for the order engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Workers started with the pool.
    pub worker_count: usize,
    /// Minimum number of active workers the monitor maintains.
    pub worker_floor: usize,
    /// Orders that may wait in the work queue before `submit` reports `QueueFull`.
    pub queue_capacity: usize,
    pub sink_capacity: usize,
    /// How long a worker waits for an order before asking to retire.
    pub idle_timeout: Duration,
    pub monitor_tick: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            worker_floor: DEFAULT_WORKER_FLOOR,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            sink_capacity: DEFAULT_SINK_CAPACITY,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            monitor_tick: DEFAULT_MONITOR_TICK,
        }
    }
}

impl EngineConfig {
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_worker_floor(mut self, worker_floor: usize) -> Self {
        self.worker_floor = worker_floor;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_sink_capacity(mut self, sink_capacity: usize) -> Self {
        self.sink_capacity = sink_capacity;
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn with_monitor_tick(mut self, monitor_tick: Duration) -> Self {
        self.monitor_tick = monitor_tick;
        self
    }

    /// Capacity of the worker-to-monitor retirement channel.
    pub(crate) fn signal_capacity(&self) -> usize {
        self.worker_count + self.worker_floor
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(OrderError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.worker_floor == 0 {
            return Err(OrderError::InvalidConfig(
                "worker floor must be at least 1".to_string(),
            ));
        }
        if self.worker_floor > self.worker_count {
            return Err(OrderError::InvalidConfig(format!(
                "worker floor {} exceeds worker count {}",
                self.worker_floor, self.worker_count
            )));
        }
        if self.queue_capacity == 0 || self.sink_capacity == 0 {
            return Err(OrderError::InvalidConfig(
                "channel capacities must be at least 1".to_string(),
            ));
        }
        if self.idle_timeout.is_zero() || self.monitor_tick.is_zero() {
            return Err(OrderError::InvalidConfig(
                "durations must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
