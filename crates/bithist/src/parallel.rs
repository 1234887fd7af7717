//! Worker pool plumbing.
//!
//! The engine never owns threads. Parallel kernels run on whatever rayon pool
//! is current when they are called: the global pool, or a local pool scoped to
//! one call through [`run_with_threads`].

use rayon::prelude::*;

use crate::error::Result;

#[cfg(not(target_has_atomic = "64"))]
compile_error!("bithist requires a target with lock-free 64-bit atomics");

// =============================================================================
// Parallelism
// =============================================================================

/// Whether parallel execution is allowed.
///
/// Kernels take this flag instead of a thread count. The pool itself is set
/// up once at the entry point via `n_threads`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if the current pool has multiple threads)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Number of workers a kernel should plan for.
    #[inline]
    pub fn workers(self) -> usize {
        match self {
            Parallelism::Sequential => 1,
            Parallelism::Parallel => rayon::current_num_threads(),
        }
    }

    #[inline]
    pub fn maybe_par_for_each<T, I, F>(self, iter: I, f: F)
    where
        T: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().for_each(f);
        } else {
            iter.into_iter().for_each(f);
        }
    }

    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = use the current pool (the global one unless called from inside
///   another pool)
/// - `1` = sequential, no pool
/// - `n > 1` = a local pool of exactly `n` threads for the duration of `f`
///
/// # Errors
///
/// [`HistError::ThreadPool`](crate::HistError::ThreadPool) if the local pool
/// cannot be created.
pub fn run_with_threads<T: Send>(
    n_threads: usize,
    f: impl FnOnce(Parallelism) -> T + Send,
) -> Result<T> {
    if n_threads <= 1 {
        return Ok(f(Parallelism::from_threads(n_threads)));
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build()?;
    Ok(pool.install(|| f(Parallelism::Parallel)))
}

/// Set the number of worker threads of the process-wide pool.
///
/// Must be called before the global pool is first used; afterwards rayon
/// refuses and this returns [`HistError::ThreadPool`](crate::HistError::ThreadPool).
/// `0` lets rayon pick one worker per logical core.
pub fn init_global_threads(n_threads: usize) -> Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()?;
    log::debug!(
        "global worker pool initialized with {} threads",
        rayon::current_num_threads()
    );
    Ok(())
}

/// What the accumulation backend has available.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackendInfo {
    /// Workers in the current pool.
    pub workers: usize,
    /// Whether 64-bit atomic counters are lock-free on this target.
    pub lock_free_u64: bool,
}

/// Report the backend the parallel strategies will run on.
///
/// Builds are rejected outright on targets without 64-bit atomics, so
/// `lock_free_u64` is always `true` in a compiled crate.
pub fn backend() -> BackendInfo {
    BackendInfo {
        workers: rayon::current_num_threads(),
        lock_free_u64: cfg!(target_has_atomic = "64"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallelism_from_threads() {
        assert!(!Parallelism::from_threads(1).is_parallel());
        assert!(Parallelism::from_threads(2).is_parallel());
        assert!(Parallelism::from_threads(8).is_parallel());
        assert_eq!(Parallelism::Sequential.workers(), 1);
    }

    #[test]
    fn test_run_with_threads_sequential() {
        let result = run_with_threads(1, |p| p).unwrap();
        assert_eq!(result, Parallelism::Sequential);
    }

    #[test]
    fn test_run_with_threads_explicit() {
        let result = run_with_threads(3, |p| (p, rayon::current_num_threads())).unwrap();
        assert_eq!(result, (Parallelism::Parallel, 3));
    }

    #[test]
    fn test_maybe_par_map() {
        let result: Vec<_> = Parallelism::Sequential.maybe_par_map(0..5usize, |i| i * 2);
        assert_eq!(result, vec![0, 2, 4, 6, 8]);

        let result: Vec<_> = Parallelism::Parallel.maybe_par_map(0..5usize, |i| i * 2);
        assert_eq!(result, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_maybe_par_for_each() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let sum = AtomicUsize::new(0);
        Parallelism::Parallel.maybe_par_for_each(0..10usize, |i| {
            sum.fetch_add(i, Ordering::Relaxed);
        });
        assert_eq!(sum.load(Ordering::Relaxed), 45);
    }

    #[test]
    fn test_backend_reports_atomics() {
        let info = backend();
        assert!(info.lock_free_u64);
        assert!(info.workers >= 1);
    }
}
