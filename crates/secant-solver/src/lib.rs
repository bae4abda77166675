//! Acceleration directions for fixed-point iterations.
//!
//! Each outer iteration of a fixed-point solver produces a residual and a
//! secant pair (iterate change, residual change). This crate turns those into
//! a search direction through one of four strategies:
//!
//! - plain residual: `dir = -R`
//! - restarted limited-memory Broyden with Powell damping
//! - Anderson acceleration via a least-squares solve over recent pairs
//! - a dense Broyden variant kept only as an incomplete interface stub
//!
//! The engine is strictly sequential: one call per outer iteration, mutating
//! the direction buffer in place and reporting a cache lifecycle status.
//!
//! # Usage
//!
//! ```
//! use secant_solver::{AccelConfig, AccelWorkspace, DirectionStrategy};
//!
//! let config = AccelConfig::default().with_direction(DirectionStrategy::AndersonAcceleration);
//! let mut work = AccelWorkspace::new(2, config).unwrap();
//!
//! work.residual.copy_from_slice(&[1.0, 0.0]);
//! work.delta_x.copy_from_slice(&[0.1, 0.1]);
//! work.delta_residual.copy_from_slice(&[0.05, 0.02]);
//! work.compute_direction(1).unwrap();
//!
//! assert!(work.direction.iter().all(|d| d.is_finite()));
//! ```
//!
//! # Module Structure
//!
//! - [`workspace`] - per-solve buffers and the strategy dispatcher
//! - [`direction`] - the direction algorithms
//! - [`cache`] - limited-memory secant-pair storage
//! - [`lstsq`] - dense least-squares front-end
//! - [`config`] - strategy selection and parameters

pub mod cache;
pub mod config;
pub mod direction;
pub mod error;
pub mod lstsq;
pub mod workspace;

pub use cache::SecantCache;
pub use config::{AccelConfig, DirectionStrategy, ScalingRule};
pub use direction::{DirectionStatus, FullBroydenScratch};
pub use error::{Error, Result};
pub use lstsq::{LeastSquaresMethod, SVD_RCOND, solve_least_squares};
pub use workspace::AccelWorkspace;
