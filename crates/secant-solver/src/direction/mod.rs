//! Direction algorithms for accelerated fixed-point iterations.
//!
//! The workspace dispatches each outer iteration to one of:
//!
//! - [`anderson`] - multi-secant Anderson acceleration via least squares
//! - [`broyden`] - restarted limited-memory Broyden with Powell damping
//! - [`full`] - the incomplete dense Broyden variant
//!
//! The plain residual direction `dir = -R` needs no algorithm of its own and
//! lives directly in the dispatcher.

pub mod anderson;
pub mod broyden;
pub mod full;

pub(crate) use anderson::compute_anderson_direction;
pub(crate) use broyden::compute_restarted_broyden;
pub(crate) use full::compute_full_broyden;
pub use full::FullBroydenScratch;

/// Outcome of a successful direction computation.
///
/// The reset-vs-increment distinction is part of the caller contract: a reset
/// means the implicit operator approximation was discarded and secant history
/// restarts from empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionStatus {
    /// Direction computed; no cache lifecycle event to report.
    Success,
    /// Direction computed and the secant memory grew by one pair.
    CacheIncremented,
    /// Direction computed and the secant memory was discarded, restarting
    /// accumulation from empty.
    CacheReset,
}

impl DirectionStatus {
    /// True when the call discarded the accumulated secant history.
    #[inline]
    pub fn is_reset(&self) -> bool {
        matches!(self, DirectionStatus::CacheReset)
    }
}
