//! Execution strategy for per-year and per-station work.
//!
//! Both strategies run the same closure over `0..count` and return results in
//! index order, so output never depends on which one is selected. The worker
//! pool uses a private rayon pool rather than the global one.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// One item after another on the calling thread.
    #[default]
    Sequential,
    /// Fixed-size pool; each item writes only its own result slot.
    WorkerPool {
        #[serde(default = "default_workers")]
        workers: usize,
    },
}

fn default_workers() -> usize {
    ExecutionStrategy::DEFAULT_WORKERS
}

impl ExecutionStrategy {
    /// Pool size used when a worker pool is requested without a count.
    pub const DEFAULT_WORKERS: usize = 4;

    pub fn worker_pool(workers: usize) -> Self {
        ExecutionStrategy::WorkerPool {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        match *self {
            ExecutionStrategy::Sequential => 1,
            ExecutionStrategy::WorkerPool { workers } => workers.max(1),
        }
    }

    /// Apply `f` to every index in `0..count`, stopping at the first error.
    pub fn map<T, E, F>(&self, count: usize, f: F) -> Result<Vec<T>, E>
    where
        T: Send,
        E: Send + From<ExecutionError>,
        F: Fn(usize) -> Result<T, E> + Sync + Send,
    {
        match *self {
            ExecutionStrategy::Sequential => (0..count).map(f).collect(),
            ExecutionStrategy::WorkerPool { workers } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers.max(1))
                    .thread_name(|i| format!("hydropost-worker-{i}"))
                    .build()
                    .map_err(ExecutionError::from)?;
                pool.install(|| (0..count).into_par_iter().map(&f).collect())
            }
        }
    }
}
