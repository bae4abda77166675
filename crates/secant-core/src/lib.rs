//! Elementary numerical kernels shared by the secant crates.
//!
//! Everything operates on plain `f64` slices. Matrices are stored
//! column-major: column `j` of a `rows x cols` matrix occupies
//! `[j * rows .. (j + 1) * rows]`.

pub mod kernels;

pub use kernels::{axpby, axpy, blend_assign, dot, gemv_col_major, norm, norm_squared, scaled_copy};
