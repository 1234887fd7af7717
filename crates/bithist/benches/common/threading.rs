use rayon::ThreadPoolBuilder;

/// Thread counts swept by the parallel benchmarks, capped at the core count.
pub fn thread_counts() -> Vec<usize> {
    let max = std::thread::available_parallelism().map_or(1, |n| n.get());
    [1usize, 2, 4, 8, 16]
        .into_iter()
        .filter(|&n| n <= max)
        .collect()
}

/// Run `f` within a Rayon thread pool configured with `n_threads`.
///
/// Uses a *local* pool so different benchmarks can test different thread counts.
pub fn with_rayon_threads<R: Send>(n_threads: usize, f: impl FnOnce() -> R + Send) -> R {
    assert!(n_threads >= 1, "n_threads must be >= 1");
    if n_threads == 1 {
        return f();
    }
    let pool = ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build()
        .expect("failed to build rayon thread pool");
    pool.install(f)
}
