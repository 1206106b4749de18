//! # Worker Pool Module
//!
//! Fixed pool of OS threads that executes request-handler tasks off the I/O
//! thread. Tasks flow through an MPMC channel; every worker shares the same
//! receiver, so they load-balance automatically. Handler panics are caught
//! per task and never take a worker down.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Sender};
use tracing::{debug, error};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Counters for observing pool behavior. All relaxed atomics; precise only
/// in aggregate.
#[derive(Debug, Default)]
pub struct PoolMetrics {
    dispatched: AtomicU64,
    completed: AtomicU64,
    panicked: AtomicU64,
}

impl PoolMetrics {
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn panicked(&self) -> u64 {
        self.panicked.load(Ordering::Relaxed)
    }
}

/// Fixed-size pool of worker threads consuming a shared task queue.
pub struct WorkerPool {
    sender: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    metrics: Arc<PoolMetrics>,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        let (sender, receiver) = unbounded::<Job>();
        let metrics = Arc::new(PoolMetrics::default());

        let mut workers = Vec::with_capacity(threads);
        for worker_id in 0..threads {
            let receiver = receiver.clone();
            let metrics = Arc::clone(&metrics);
            let spawned = std::thread::Builder::new()
                .name(format!("oxpress-worker-{worker_id}"))
                .spawn(move || {
                    debug!(worker_id, "worker started");
                    for job in receiver.iter() {
                        if catch_unwind(AssertUnwindSafe(move || job())).is_err() {
                            error!(worker_id, "handler task panicked");
                            metrics.panicked.fetch_add(1, Ordering::Relaxed);
                        }
                        metrics.completed.fetch_add(1, Ordering::Relaxed);
                    }
                    debug!(worker_id, "worker exiting");
                });
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => error!(worker_id, error = %err, "failed to spawn worker thread"),
            }
        }

        Self {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            metrics,
        }
    }

    /// Queue a task for the next free worker. Tasks submitted after
    /// [`WorkerPool::stop_workers`] are dropped.
    pub fn enqueue(&self, job: impl FnOnce() + Send + 'static) {
        let sender = self.sender.lock().unwrap();
        match sender.as_ref() {
            Some(tx) => {
                self.metrics.dispatched.fetch_add(1, Ordering::Relaxed);
                if tx.send(Box::new(job)).is_err() {
                    error!("worker queue disconnected, dropping task");
                }
            }
            None => error!("worker pool stopped, dropping task"),
        }
    }

    /// Close the queue and join every worker. Pending tasks are drained
    /// before the workers exit. Idempotent.
    pub fn stop_workers(&self) {
        self.sender.lock().unwrap().take();
        let workers = std::mem::take(&mut *self.workers.lock().unwrap());
        for handle in workers {
            let _ = handle.join();
        }
    }

    pub fn metrics(&self) -> &Arc<PoolMetrics> {
        &self.metrics
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop_workers();
    }
}
