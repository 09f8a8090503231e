//! Declarative parallel/sequential execution utilities.
//!
//! Helpers that abstract over parallel vs sequential execution based on the
//! `parallel` feature flag. The `cfg` logic lives here in one place, keeping
//! call sites clean.
//!
//! # Runtime Override
//!
//! All functions accept a `force_sequential` parameter. When `true`, execution
//! is sequential even if the `parallel` feature is enabled, which keeps log
//! output ordered when debugging a single tournament.
//!
//! # Example
//!
//! ```
//! let lengths = parallel::map_slice(&["a", "bb", "ccc"], |s| s.len(), false);
//! assert_eq!(lengths, vec![1, 2, 3]);
//!
//! let total = parallel::map_reduce_slice(&[1u64, 2, 3], |&x| x * 10, || 0, |a, b| a + b, true);
//! assert_eq!(total, 60);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Map a function over a slice, potentially in parallel.
///
/// Returns a Vec of results in the same order as input (parallel preserves order).
///
/// # Parameters
/// - `force_sequential`: When true, forces sequential execution even if parallel feature is enabled
#[inline]
pub fn map_slice<T, F, R>(slice: &[T], f: F, force_sequential: bool) -> Vec<R>
where
    T: Sync,
    F: Fn(&T) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().map(f).collect()
        } else {
            slice.par_iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().map(f).collect()
    }
}

/// Map each element and reduce the results, potentially in parallel.
///
/// `reduce` must be associative and `identity` must be its neutral element;
/// the parallel path combines partial results in an unspecified grouping.
///
/// # Parameters
/// - `force_sequential`: When true, forces sequential execution even if parallel feature is enabled
#[inline]
pub fn map_reduce_slice<T, F, I, G, R>(
    slice: &[T],
    map: F,
    identity: I,
    reduce: G,
    force_sequential: bool,
) -> R
where
    T: Sync,
    F: Fn(&T) -> R + Sync + Send,
    I: Fn() -> R + Sync + Send,
    G: Fn(R, R) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().map(map).fold(identity(), reduce)
        } else {
            slice.par_iter().map(map).reduce(identity, reduce)
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().map(map).fold(identity(), reduce)
    }
}
