use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how a batch of faces is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread, writing each face straight
    /// into the destination.
    #[default]
    Serial,

    /// Use the global Rayon thread pool to compute faces in parallel.
    ///
    /// Faces are staged and committed in supply order afterwards.
    Parallel,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// Map `f` over `items`, keeping the output in input order.
///
/// `f` receives the item index alongside the item.
pub fn map_ordered<T, R, F>(
    items: &[T],
    strategy: ExecutionStrategy,
    f: F,
) -> Result<Vec<R>, ParallelError>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Send + Sync,
{
    match strategy {
        ExecutionStrategy::Serial => Ok(items.iter().enumerate().map(|(i, t)| f(i, t)).collect()),
        ExecutionStrategy::Parallel => Ok(items
            .par_iter()
            .enumerate()
            .map(|(i, t)| f(i, t))
            .collect()),
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;
            Ok(pool.install(|| {
                items
                    .par_iter()
                    .enumerate()
                    .map(|(i, t)| f(i, t))
                    .collect()
            }))
        }
    }
}
