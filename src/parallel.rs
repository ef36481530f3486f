//! # Worker pools for the product kernels
//!
//! Product calls run their parallel region on a rayon pool with the
//! requested number of workers. Pools are built once per thread count and
//! then shared by every later call asking for that count, so repeated small
//! products do not pay for spawning threads. Rows are handed out through
//! rayon's work-stealing scheduler, which balances rows with very different
//! nonzero counts the way a dynamic schedule would.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::Result;

/// Pools already built, keyed by thread count
static POOL_CACHE: OnceLock<Mutex<HashMap<usize, Arc<ThreadPool>>>> = OnceLock::new();

/// A rayon pool with a fixed number of workers
#[derive(Clone)]
pub struct WorkerPool {
    pool: Arc<ThreadPool>,
    n_threads: usize,
}

impl WorkerPool {
    /// Returns the shared pool with `n_threads` workers (at least one),
    /// building it on first use
    pub fn new(n_threads: usize) -> Result<Self> {
        let n_threads = n_threads.max(1);
        let cache = POOL_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        let mut cache_guard = cache.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(pool) = cache_guard.get(&n_threads) {
            return Ok(Self {
                pool: Arc::clone(pool),
                n_threads,
            });
        }

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(n_threads)
                .thread_name(move |i| format!("spdm-{n_threads}-worker-{i}"))
                .build()?,
        );
        cache_guard.insert(n_threads, Arc::clone(&pool));
        debug!(n_threads, "built worker pool");
        Ok(Self { pool, n_threads })
    }

    pub fn n_threads(&self) -> usize {
        self.n_threads
    }

    /// Runs `op` inside the pool; parallel iterators in `op` use its workers
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("n_threads", &self.n_threads)
            .finish()
    }
}
