//! Dense Broyden variant. Incomplete.
//!
//! Kept for interface compatibility only: the single implemented behavior is
//! the optional diagonal seeding of the dense operator on the second
//! iteration. The dense rank-one update itself is not implemented and the
//! direction buffer is left untouched.

use secant_core::kernels::{dot, norm};

use crate::config::ScalingRule;
use crate::direction::DirectionStatus;
use crate::error::Result;
use crate::workspace::AccelWorkspace;

/// Scratch buffers for the dense Broyden variant, owned by the workspace so
/// concurrent solver instances cannot alias each other's state.
#[derive(Debug, Clone)]
pub struct FullBroydenScratch {
    /// Dense operator, row-major `l x l`.
    pub h: Vec<f64>,
    /// Reserved for the operator-times-residual-change product of the dense
    /// update.
    pub hy: Vec<f64>,
}

impl FullBroydenScratch {
    /// Allocate scratch for vectors of length `l`.
    pub fn new(l: usize) -> Self {
        Self {
            h: vec![0.0; l * l],
            hy: vec![0.0; l],
        }
    }
}

pub(crate) fn compute_full_broyden(
    work: &mut AccelWorkspace,
    iteration: usize,
) -> Result<DirectionStatus> {
    let l = work.dim();
    let seed_diagonal = work.config.init_scaling && iteration == 1;

    let ip = if seed_diagonal || work.config.scaling_rule != ScalingRule::Off {
        dot(&work.delta_residual, &work.delta_x)
    } else {
        0.0
    };

    if seed_diagonal {
        let gamma = ip / norm(&work.delta_residual);
        let scratch = work
            .full_broyden
            .get_or_insert_with(|| FullBroydenScratch::new(l));
        for d in 0..l {
            scratch.h[d * (l + 1)] = gamma;
        }
    }

    Ok(DirectionStatus::Success)
}
