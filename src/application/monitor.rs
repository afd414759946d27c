use super::queue::{QueueObserver, SharedReceiver};
use super::sink::ResultSink;
use super::worker::{Worker, WorkerExit};
use crate::config::EngineConfig;
use crate::domain::worker::WorkerId;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinSet};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

/// Sent by an idle worker; the monitor answers on `reply` once the worker may exit.
pub struct RetirementRequest {
    pub worker_id: WorkerId,
    pub reply: oneshot::Sender<()>,
}

/// One sample of pool health, taken on every monitor tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub active_workers: usize,
    /// Tasks alive on the runtime, workers and everything else included.
    pub alive_tasks: usize,
    pub runtime_workers: usize,
    pub queued_orders: usize,
}

/// Handles held by the engine to observe and stop a running monitor.
pub struct MonitorHandle {
    pub active_workers: Arc<AtomicUsize>,
    pub stats: watch::Receiver<PoolStats>,
    pub shutdown: watch::Sender<bool>,
}

/// Supervisor for the worker pool.
///
/// Owns every worker task and the active-worker count. Workers never start
/// siblings; they ask to retire and the monitor decides whether a replacement
/// is needed first, so the count never drops below `worker_floor`.
pub struct PoolMonitor {
    config: EngineConfig,
    queue: SharedReceiver,
    observer: QueueObserver,
    sink: ResultSink,
    workers: JoinSet<WorkerExit>,
    next_worker_id: WorkerId,
    active: Arc<AtomicUsize>,
    signal_tx: mpsc::Sender<RetirementRequest>,
    signal_rx: mpsc::Receiver<RetirementRequest>,
    stats_tx: watch::Sender<PoolStats>,
    shutdown_rx: watch::Receiver<bool>,
    /// Set once shutdown is requested; exited workers are no longer replaced.
    stopping: bool,
}

impl PoolMonitor {
    pub fn new(
        config: EngineConfig,
        queue: SharedReceiver,
        observer: QueueObserver,
        sink: ResultSink,
    ) -> (Self, MonitorHandle) {
        let (signal_tx, signal_rx) = mpsc::channel(config.signal_capacity());
        let (stats_tx, stats_rx) = watch::channel(PoolStats::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let active = Arc::new(AtomicUsize::new(0));

        let monitor = Self {
            config,
            queue,
            observer,
            sink,
            workers: JoinSet::new(),
            next_worker_id: 1,
            active: active.clone(),
            signal_tx,
            signal_rx,
            stats_tx,
            shutdown_rx,
            stopping: false,
        };
        let handle = MonitorHandle {
            active_workers: active,
            stats: stats_rx,
            shutdown: shutdown_tx,
        };
        (monitor, handle)
    }

    /// Starts the initial workers, then supervises until shutdown has been
    /// requested and every worker has drained the queue and exited.
    pub async fn run(mut self) {
        for _ in 0..self.config.worker_count {
            self.spawn_worker();
        }
        info!(
            workers = self.config.worker_count,
            floor = self.config.worker_floor,
            "worker pool started"
        );

        let mut ticker = interval(self.config.monitor_tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.report(),
                Some(request) = self.signal_rx.recv() => self.handle_retirement(request),
                Some(joined) = self.workers.join_next() => self.reap(joined),
                _ = self.shutdown_rx.changed(), if !self.stopping => {
                    self.stopping = true;
                    info!(active = self.active_workers(), "shutdown requested, draining workers");
                }
            }

            if self.stopping && self.workers.is_empty() {
                break;
            }
        }

        self.report();
        info!("worker pool stopped");
    }

    fn active_workers(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn spawn_worker(&mut self) {
        let id = self.next_worker_id;
        self.next_worker_id += 1;
        self.active.fetch_add(1, Ordering::SeqCst);

        let worker = Worker::new(
            id,
            self.config.idle_timeout,
            self.queue.clone(),
            self.sink.clone(),
            self.signal_tx.clone(),
        );
        self.workers.spawn(worker.run());
        debug!(worker_id = id, active = self.active_workers(), "worker spawned");
    }

    fn handle_retirement(&mut self, request: RetirementRequest) {
        let worker_id = request.worker_id;
        let remaining = self.active_workers().saturating_sub(1);

        if remaining < self.config.worker_floor {
            info!(
                worker_id,
                floor = self.config.worker_floor,
                "starting replacement before retiring worker"
            );
            self.spawn_worker();
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        if request.reply.send(()).is_err() {
            warn!(worker_id, "retiring worker went away before acknowledgement");
        }
        debug!(worker_id, active = self.active_workers(), "worker retirement accepted");
    }

    fn reap(&mut self, joined: Result<WorkerExit, JoinError>) {
        match joined {
            // Already accounted for when the retirement was accepted.
            Ok(WorkerExit::Retired) => {}
            Ok(WorkerExit::QueueClosed) => {
                self.active.fetch_sub(1, Ordering::SeqCst);
            }
            Err(err) => {
                error!(%err, "worker task failed");
                self.active.fetch_sub(1, Ordering::SeqCst);
                if !self.stopping && self.active_workers() < self.config.worker_floor {
                    self.spawn_worker();
                }
            }
        }
    }

    fn report(&self) {
        let metrics = Handle::current().metrics();
        let stats = PoolStats {
            active_workers: self.active_workers(),
            alive_tasks: metrics.num_alive_tasks(),
            runtime_workers: metrics.num_workers(),
            queued_orders: self.observer.depth(),
        };
        info!(
            active_workers = stats.active_workers,
            alive_tasks = stats.alive_tasks,
            runtime_workers = stats.runtime_workers,
            queued_orders = stats.queued_orders,
            "pool status"
        );
        self.stats_tx.send_replace(stats);
    }
}
