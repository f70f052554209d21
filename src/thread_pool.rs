//! Shared thread pool for parallel resampling.

#[cfg(feature = "parallel")]
use rayon::ThreadPool;

#[cfg(feature = "parallel")]
use std::sync::OnceLock;

#[cfg(feature = "parallel")]
static THREAD_POOL: OnceLock<ThreadPool> = OnceLock::new();

/// Get or initialize the shared resampling pool.
///
/// One worker per logical CPU. Workers are named so they are easy to spot in
/// a profiler.
#[cfg(feature = "parallel")]
pub fn get_thread_pool() -> &'static ThreadPool {
    THREAD_POOL.get_or_init(|| {
        rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("cohort-resample-{i}"))
            .build()
            .expect("Failed to build resampling thread pool")
    })
}

/// Run `op` inside the shared pool.
#[cfg(feature = "parallel")]
pub fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R + Send,
    R: Send,
{
    get_thread_pool().install(op)
}

/// Without the `parallel` feature `op` runs on the calling thread.
#[cfg(not(feature = "parallel"))]
pub fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R,
{
    op()
}
