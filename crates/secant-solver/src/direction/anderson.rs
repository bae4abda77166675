//! Multi-secant Anderson acceleration.

use secant_core::kernels::{axpby, gemv_col_major, scaled_copy};

use crate::direction::DirectionStatus;
use crate::error::Result;
use crate::lstsq::solve_least_squares;
use crate::workspace::AccelWorkspace;

/// Assemble the multi-secant least-squares direction.
///
/// The current pair is inserted into the sliding window first, so the window
/// always contains it. With `cols` valid slots, the coefficients `t` solve
/// `U t ~= R` in the least-squares sense and the direction is
/// `dir = -R - (S - Y) t`.
///
/// The window slots are consumed in buffer order, which after the first
/// wraparound is not recency order; the solution is invariant to column
/// permutation, only the coefficient layout differs.
pub(crate) fn compute_anderson_direction(work: &mut AccelWorkspace) -> Result<DirectionStatus> {
    let l = work.dim();

    // dir = -R
    scaled_copy(&mut work.direction, &work.residual, -1.0);

    // Insert the current pair at the cursor slot. Only the overwritten slot
    // of S - Y needs recomputation; older slots keep their differences.
    let slot = work.cache.cursor();
    {
        let (s, u, s_minus_y) = work.cache.slots_mut(slot);
        s.copy_from_slice(&work.delta_x);
        u.copy_from_slice(&work.delta_residual);
        axpby(s_minus_y, s, 1.0, u, -1.0);
    }
    work.cache.note_insert();
    let cols = work.cache.len();
    let used = cols * l;

    // The least-squares front-end clobbers its matrix, so it operates on the
    // scratch copy of the U slots and on R staged in the coefficient buffer.
    work.cache.rhs[..l].copy_from_slice(&work.residual);
    work.cache.scratch[..used].copy_from_slice(&work.cache.u[..used]);
    solve_least_squares(
        l,
        cols,
        &mut work.cache.scratch,
        &mut work.cache.rhs,
        work.config.lstsq,
    )?;

    // dir -= (S - Y) * t
    gemv_col_major(
        &mut work.direction,
        &work.cache.s_minus_y[..used],
        &work.cache.rhs[..cols],
        -1.0,
        1.0,
    );

    work.cache.advance_circular();
    Ok(DirectionStatus::Success)
}
