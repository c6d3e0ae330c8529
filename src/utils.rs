//! Common utilities used across the crate.

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// Components that may fan out over rows take this flag and use rayon
/// only when it is [`Parallelism::Parallel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Parallel when `parallel` is set and the rayon pool has more than one thread.
    #[inline]
    pub fn from_flag(parallel: bool) -> Self {
        if parallel && rayon::current_num_threads() > 1 {
            Parallelism::Parallel
        } else {
            Parallelism::Sequential
        }
    }

    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Map `f` over `0..n`, collecting results in index order.
    #[inline]
    pub fn maybe_par_map<R, F>(self, n: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send,
    {
        if self.is_parallel() {
            (0..n).into_par_iter().map(f).collect()
        } else {
            (0..n).map(f).collect()
        }
    }
}
