//! Dense least-squares front-end.
//!
//! Solves overdetermined or square `rows x cols` systems in the buffers the
//! secant cache hands over: column-major matrix in, solution written back over
//! the prefix of the right-hand side. The matrix argument is clobbered either
//! way, so callers must pass a working copy of anything they still need.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

/// Singular values below this fraction of the largest one are truncated by
/// the rank-revealing method.
pub const SVD_RCOND: f64 = 1e-8;

/// Numerical method for the least-squares solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeastSquaresMethod {
    /// Thin QR factorization, no truncation.
    #[default]
    Qr,
    /// Rank-revealing SVD with singular values truncated at [`SVD_RCOND`]
    /// relative to the largest one.
    Svd,
}

/// Solve `min ||A t - rhs||` for the column-major `rows x cols` matrix stored
/// in `a`, with `rows >= cols >= 1`.
///
/// On success `rhs[..cols]` holds the minimizing solution; the rest of `rhs`
/// and all of `a` are left in an unspecified state.
pub fn solve_least_squares(
    rows: usize,
    cols: usize,
    a: &mut [f64],
    rhs: &mut [f64],
    method: LeastSquaresMethod,
) -> Result<()> {
    debug_assert!(cols >= 1 && cols <= rows);
    if a.len() < rows * cols {
        return Err(Error::DimensionMismatch {
            expected: rows * cols,
            actual: a.len(),
        });
    }
    if rhs.len() < rows {
        return Err(Error::DimensionMismatch {
            expected: rows,
            actual: rhs.len(),
        });
    }

    let matrix = DMatrix::from_column_slice(rows, cols, &a[..rows * cols]);
    let b = DVector::from_column_slice(&rhs[..rows]);

    let solution = match method {
        LeastSquaresMethod::Qr => {
            let qr = matrix.qr();
            let qtb = qr.q().transpose() * b;
            qr.r()
                .solve_upper_triangular(&qtb)
                .ok_or(Error::SingularMatrix)?
        }
        LeastSquaresMethod::Svd => {
            let svd = matrix.svd(true, true);
            let sigma_max = svd.singular_values.max();
            let eps = SVD_RCOND * sigma_max;
            let dropped = svd.singular_values.iter().filter(|&&s| s <= eps).count();
            if dropped > 0 {
                log::debug!(
                    "least-squares SVD truncated {} of {} singular values",
                    dropped,
                    cols
                );
            }
            svd.solve(&b, eps).map_err(|_| Error::SingularMatrix)?
        }
    };

    rhs[..cols].copy_from_slice(solution.as_slice());
    Ok(())
}
