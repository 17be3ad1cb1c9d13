//! # Bounded Worker Pool
//!
//! Fans a known batch of [`WorkItem`]s out to a fixed number of workers.
//!
//! ## Architecture
//!
//! ```text
//!   items ──> work queue ──┬──> worker 1 ──┐
//!                          ├──> worker 2 ──┼──> results ──> dispatcher
//!                          └──> worker N ──┘                 │
//!                                                            └──> ProgressReporter
//! ```
//!
//! - All items are queued up front; workers pull the next item as soon as they
//!   finish the previous one.
//! - Only the dispatcher touches the completion counter, so progress updates
//!   are exclusive and monotonic.
//! - The dispatcher stops after receiving exactly `items.len()` completions.
//! - A panicking unit of work is contained and reported as
//!   [`Completion::Panicked`]; the worker moves on to the next item.
//!
//! Completion order is unrelated to submission order.

use crate::progress::ProgressReporter;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error};

/// One unit of batch input with its originating context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem<T> {
    /// Position in the submitted batch
    pub sequence: usize,
    /// Owning collection, when the payload lives inside one
    pub parent_id: Option<String>,
    pub payload: T,
}

impl<T> WorkItem<T> {
    pub fn new(sequence: usize, payload: T) -> Self {
        Self {
            sequence,
            parent_id: None,
            payload,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Number `payloads` in submission order.
    pub fn batch(payloads: impl IntoIterator<Item = T>) -> Vec<Self> {
        payloads
            .into_iter()
            .enumerate()
            .map(|(sequence, payload)| Self::new(sequence, payload))
            .collect()
    }
}

/// What a worker produced for one item
#[derive(Debug)]
pub enum Completion<T, R> {
    Finished(R),
    Panicked { item: WorkItem<T>, message: String },
}

/// Fixed-size pool of async workers
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Pool with `workers` parallel slots (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `op` over every item and return one completion per item.
    ///
    /// `progress` is called once per completion with a counter running from
    /// 1 to `items.len()`.
    pub async fn run<T, R, F, Fut>(
        &self,
        items: Vec<WorkItem<T>>,
        op: F,
        progress: &dyn ProgressReporter,
    ) -> Vec<Completion<T, R>>
    where
        T: Clone + Send + 'static,
        R: Send + 'static,
        F: Fn(WorkItem<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let total = items.len();
        if total == 0 {
            return Vec::new();
        }

        let (work_tx, work_rx) = mpsc::unbounded_channel();
        for item in items {
            // The receiver is alive until the workers below drop it
            let _ = work_tx.send(item);
        }
        drop(work_tx);

        let queue = Arc::new(Mutex::new(work_rx));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel();
        let op = Arc::new(op);

        let worker_count = self.workers.min(total);
        debug!(total, workers = worker_count, "Starting worker pool");

        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            let queue = Arc::clone(&queue);
            let results = result_tx.clone();
            let op = Arc::clone(&op);

            workers.spawn(async move {
                loop {
                    let next = queue.lock().await.recv().await;
                    let Some(item) = next else {
                        break;
                    };

                    // Building the future runs user code too, so it goes inside the guard
                    let input = item.clone();
                    let guarded = AssertUnwindSafe(async { op(input).await }).catch_unwind();
                    let completion = match guarded.await {
                        Ok(result) => Completion::Finished(result),
                        Err(panic) => {
                            let message = panic_message(panic.as_ref());
                            error!(worker_id, sequence = item.sequence, %message, "Work item panicked");
                            Completion::Panicked { item, message }
                        }
                    };

                    if results.send(completion).is_err() {
                        break;
                    }
                }
                debug!(worker_id, "Worker finished");
            });
        }
        drop(result_tx);

        let mut completions = Vec::with_capacity(total);
        while completions.len() < total {
            match result_rx.recv().await {
                Some(completion) => {
                    completions.push(completion);
                    progress.report(completions.len(), total);
                }
                None => {
                    error!(
                        received = completions.len(),
                        total, "Workers exited before the batch completed"
                    );
                    break;
                }
            }
        }

        while workers.join_next().await.is_some() {}

        completions
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
