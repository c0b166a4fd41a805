//! Bounded fetch queue
//!
//! Every network fetch triggered while answering one query is admitted through
//! a [`FetchQueue`]. The queue never lets more than `concurrency` tasks run at
//! once; tasks start in submission order (the semaphore hands out permits
//! first-in, first-out) but may finish in any order.

use crate::{FetchError, QueueError};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

/// How many concurrent fetches to allow per logical CPU by default
const FETCHES_PER_CPU: usize = 4;

/// Returns the default queue concurrency for this machine
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        * FETCHES_PER_CPU
}

/// Admission-controlled runner for fetch tasks
#[derive(Debug)]
pub struct FetchQueue {
    /// Permits for tasks allowed to run right now
    semaphore: Semaphore,

    /// Configured concurrency limit
    concurrency: usize,

    /// Tasks currently holding a permit
    in_flight: AtomicUsize,

    /// Highest value `in_flight` has reached
    high_water_mark: AtomicUsize,

    /// Tasks that ran to completion, successfully or not
    completed: AtomicUsize,
}

impl FetchQueue {
    /// Creates a queue that runs at most `concurrency` tasks at a time
    ///
    /// A limit of zero would never admit anything, so it is raised to one.
    pub fn new(concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);

        Self {
            semaphore: Semaphore::new(concurrency),
            concurrency,
            in_flight: AtomicUsize::new(0),
            high_water_mark: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    /// Creates a queue sized by [`default_concurrency`]
    pub fn with_default_concurrency() -> Self {
        Self::new(default_concurrency())
    }

    /// Submits a task and waits for its result
    ///
    /// The task is not started until a slot is free. A failing task only fails
    /// its own caller; sibling tasks and the queue itself are unaffected.
    ///
    /// # Arguments
    ///
    /// * `task` - Zero-argument unit of work, usually one HTTP GET
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - The task's result
    /// * `Err(QueueError::Task)` - The task itself failed
    /// * `Err(QueueError::Closed)` - The queue was closed before the task started
    pub async fn add<F, Fut, T>(&self, task: F) -> Result<T, QueueError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        tracing::trace!(
            "Waiting for fetch slot ({}/{} in flight)",
            self.in_flight(),
            self.concurrency
        );

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| QueueError::Closed)?;
        let _slot = InFlight::enter(self);

        let result = task().await;
        self.completed.fetch_add(1, Ordering::SeqCst);

        Ok(result?)
    }

    /// Stops admitting tasks; waiting and future submissions fail with `Closed`
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Returns the configured concurrency limit
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the number of tasks running right now
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Returns the largest number of tasks that ever ran at once
    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark.load(Ordering::SeqCst)
    }

    /// Returns the number of tasks that finished
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl Default for FetchQueue {
    fn default() -> Self {
        Self::with_default_concurrency()
    }
}

/// Counts a task as in flight for as long as it is alive, including when its
/// future is dropped before finishing
struct InFlight<'a> {
    queue: &'a FetchQueue,
}

impl<'a> InFlight<'a> {
    fn enter(queue: &'a FetchQueue) -> Self {
        let now = queue.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        queue.high_water_mark.fetch_max(now, Ordering::SeqCst);
        Self { queue }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.queue.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
