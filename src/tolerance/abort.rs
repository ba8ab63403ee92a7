//! Cooperative cancellation for long-running polygon passes.

use std::sync::atomic::{AtomicBool, Ordering};

/// A signal polled by long-running operations.
///
/// The engines poll it once per outer intersection iteration and once per
/// classification iteration; when it reports `true` the operation unwinds
/// with [`PolyError::Cancelled`](crate::PolyError::Cancelled).
///
/// Implemented for [`NeverAbort`], [`AtomicBool`] and closures wrapped in
/// [`AbortFn`].
///
/// # Example
///
/// ```
/// use regpoly::tolerance::AbortCheck;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// let flag = AtomicBool::new(false);
/// assert!(!flag.should_abort());
/// flag.store(true, Ordering::Relaxed);
/// assert!(flag.should_abort());
/// ```
pub trait AbortCheck: Sync {
    /// Returns `true` if the running operation should stop.
    fn should_abort(&self) -> bool;
}

/// An abort check that never fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverAbort;

impl AbortCheck for NeverAbort {
    #[inline]
    fn should_abort(&self) -> bool {
        false
    }
}

impl AbortCheck for AtomicBool {
    #[inline]
    fn should_abort(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// Adapts a closure into an [`AbortCheck`].
#[derive(Debug, Clone, Copy)]
pub struct AbortFn<T>(pub T);

impl<T: Fn() -> bool + Sync> AbortCheck for AbortFn<T> {
    #[inline]
    fn should_abort(&self) -> bool {
        (self.0)()
    }
}
