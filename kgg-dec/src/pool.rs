use log::{debug, error, warn};
use parking_lot::{Condvar, Mutex};
use std::{
    collections::VecDeque,
    io,
    sync::Arc,
    thread::{self, JoinHandle},
};

struct Queue<T> {
    jobs: VecDeque<T>,
    shutdown: bool,
}

struct Shared<T> {
    queue: Mutex<Queue<T>>,
    signal: Condvar,
}

impl<T> Shared<T> {
    /// Block until a job is available. `None` once the queue is empty and
    /// shutdown was requested.
    fn pop(&self) -> Option<T> {
        let mut queue = self.queue.lock();

        loop {
            if let Some(job) = queue.jobs.pop_front() {
                return Some(job);
            }

            if queue.shutdown {
                return None;
            }

            self.signal.wait(&mut queue);
        }
    }
}

/// Fixed set of worker threads draining a shared job queue.
///
/// [`join`](Self::join) lets the workers finish every queued job before they
/// exit, nothing is cancelled.
///
/// # Example
///
/// ```
/// use kgg_dec::WorkerPool;
/// use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
///
/// let total = Arc::new(AtomicUsize::new(0));
/// let mut pool = WorkerPool::new();
///
/// for _ in 0..4 {
///     let total = Arc::clone(&total);
///     pool.add_worker(move |x: usize| {
///         total.fetch_add(x, Ordering::SeqCst);
///     })?;
/// }
///
/// for x in 1..=100 {
///     pool.push(x);
/// }
///
/// assert_eq!(pool.join(), 4);
/// assert_eq!(total.load(Ordering::SeqCst), 5050);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct WorkerPool<T> {
    shared: Arc<Shared<T>>,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(Queue {
                    jobs: VecDeque::new(),
                    shutdown: false,
                }),
                signal: Condvar::new(),
            }),
            workers: Vec::new(),
        }
    }

    /// Queue a job and wake one idle worker.
    pub fn push(&self, job: T) {
        self.shared.queue.lock().jobs.push_back(job);
        self.shared.signal.notify_one();
    }

    /// Spawn a worker which runs `handler` for each job it takes off the queue.
    pub fn add_worker<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(T) + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);

        let handle = thread::Builder::new()
            .name(format!("kgg-worker-{}", self.workers.len() + 1))
            .spawn(move || {
                while let Some(job) = shared.pop() {
                    handler(job);
                }
            })?;

        self.workers.push(handle);
        Ok(())
    }

    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Snapshot of whether the queue is empty. Jobs may still be running.
    pub fn finished(&self) -> bool {
        self.shared.queue.lock().jobs.is_empty()
    }

    /// Request shutdown and wait for every worker to drain the queue and exit.
    /// Returns the number of workers joined.
    pub fn join(mut self) -> usize {
        self.shutdown()
    }

    fn shutdown(&mut self) -> usize {
        self.shared.queue.lock().shutdown = true;
        self.shared.signal.notify_all();

        let mut joined = 0;

        for (i, handle) in self.workers.drain(..).enumerate() {
            if handle.join().is_err() {
                error!("worker thread {} panicked", i + 1);
            } else {
                debug!("thread {} joined", i + 1);
            }

            joined += 1;
        }

        let dropped = self.shared.queue.lock().jobs.len();
        if dropped > 0 {
            warn!("{} queued jobs dropped, no worker left to run them", dropped);
        }

        joined
    }
}

impl<T: Send + 'static> Default for WorkerPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        self.shared.queue.lock().shutdown = true;
        self.shared.signal.notify_all();

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}
