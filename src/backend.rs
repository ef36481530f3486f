//! Control over the thread count of an external BLAS backend
//!
//! Product entry points run their own worker pool. If a BLAS library linked
//! into the same process also fans out, the two nest and oversubscribe the
//! machine, so every entry point pins the backend to one thread for the
//! duration of the call with [`SingleThreadedBlas`] and puts the previous
//! setting back when the guard drops, on every exit path.

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use tracing::trace;

/// Read and write access to a backend's global thread count
pub trait BlasThreads: Debug + Send + Sync {
    fn threads(&self) -> usize;

    fn set_threads(&self, n: usize);
}

/// Process-wide thread count used when no real backend is wired in
#[derive(Debug)]
pub struct ProcessBlasThreads {
    current: AtomicUsize,
}

impl ProcessBlasThreads {
    pub fn new(n: usize) -> Self {
        Self {
            current: AtomicUsize::new(n.max(1)),
        }
    }
}

impl BlasThreads for ProcessBlasThreads {
    fn threads(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    fn set_threads(&self, n: usize) {
        self.current.store(n, Ordering::SeqCst);
    }
}

static PROCESS_BLAS: OnceLock<Arc<ProcessBlasThreads>> = OnceLock::new();

/// The process-wide backend control, initialised to the number of cores
pub fn global() -> Arc<dyn BlasThreads> {
    PROCESS_BLAS
        .get_or_init(|| Arc::new(ProcessBlasThreads::new(num_cpus::get())))
        .clone()
}

/// Holds the backend at one thread until dropped
#[must_use = "the backend is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SingleThreadedBlas<'a> {
    control: &'a dyn BlasThreads,
    previous: usize,
}

impl<'a> SingleThreadedBlas<'a> {
    pub fn acquire(control: &'a dyn BlasThreads) -> Self {
        let previous = control.threads();
        control.set_threads(1);
        trace!(previous, "pinned BLAS backend to one thread");
        Self { control, previous }
    }

    /// The setting that will be restored on drop
    pub fn previous(&self) -> usize {
        self.previous
    }
}

impl Drop for SingleThreadedBlas<'_> {
    fn drop(&mut self) {
        self.control.set_threads(self.previous);
        trace!(restored = self.previous, "restored BLAS backend threads");
    }
}
