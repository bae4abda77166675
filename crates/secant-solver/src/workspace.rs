//! Per-solve workspace: buffers, configuration, and the strategy dispatcher.

use secant_core::kernels::scaled_copy;

use crate::cache::SecantCache;
use crate::config::{AccelConfig, DirectionStrategy};
use crate::direction::{
    DirectionStatus, FullBroydenScratch, compute_anderson_direction, compute_full_broyden,
    compute_restarted_broyden,
};
use crate::error::{Error, Result};

/// Buffers and state for one fixed-point solve.
///
/// The surrounding solver fills `residual`, `delta_x`, and `delta_residual`
/// each outer iteration, then calls [`compute_direction`]; the search
/// direction is left in `direction`. The workspace is exclusively owned by
/// one solve for its entire lifetime, so no locking is involved anywhere.
///
/// [`compute_direction`]: AccelWorkspace::compute_direction
#[derive(Debug, Clone)]
pub struct AccelWorkspace {
    /// Fixed-point residual R at the current iterate.
    pub residual: Vec<f64>,
    /// Iterate change Sk since the previous iteration.
    pub delta_x: Vec<f64>,
    /// Residual change Yk since the previous iteration.
    pub delta_residual: Vec<f64>,
    /// Output search direction.
    pub direction: Vec<f64>,
    /// Engine configuration.
    pub config: AccelConfig,
    /// Secant-pair storage driven by the limited-memory strategies.
    pub cache: SecantCache,
    /// Scratch for the dense Broyden variant.
    pub full_broyden: Option<FullBroydenScratch>,
    l: usize,
}

impl AccelWorkspace {
    /// Allocate a workspace for vectors of length `l`.
    ///
    /// The configured memory is clamped to `l` so the least-squares system
    /// can never have more unknowns than equations.
    pub fn new(l: usize, config: AccelConfig) -> Result<Self> {
        if l == 0 {
            return Err(Error::InvalidConfig(
                "dimension must be positive".to_string(),
            ));
        }
        config.validate()?;

        let mut config = config;
        if config.memory > l {
            log::debug!(
                "secant memory clamped from {} to problem dimension {}",
                config.memory,
                l
            );
            config.memory = l;
        }

        let full_broyden = match config.direction {
            DirectionStrategy::FullBroyden => Some(FullBroydenScratch::new(l)),
            _ => None,
        };
        let cache = SecantCache::new(l, config.memory);

        Ok(Self {
            residual: vec![0.0; l],
            delta_x: vec![0.0; l],
            delta_residual: vec![0.0; l],
            direction: vec![0.0; l],
            config,
            cache,
            full_broyden,
            l,
        })
    }

    /// Vector length.
    #[inline]
    pub fn dim(&self) -> usize {
        self.l
    }

    /// Compute the search direction for the current outer iteration.
    ///
    /// `iteration` is the outer iteration index; only the dense Broyden
    /// variant consults it. Buffer lengths are validated before anything is
    /// mutated.
    pub fn compute_direction(&mut self, iteration: usize) -> Result<DirectionStatus> {
        self.check_lengths()?;

        match self.config.direction {
            DirectionStrategy::FixedPointResidual => {
                scaled_copy(&mut self.direction, &self.residual, -1.0);
                Ok(DirectionStatus::Success)
            }
            DirectionStrategy::RestartedBroyden => compute_restarted_broyden(self),
            DirectionStrategy::AndersonAcceleration => compute_anderson_direction(self),
            DirectionStrategy::FullBroyden => compute_full_broyden(self, iteration),
        }
    }

    /// Discard the accumulated secant history. Always reports the reset.
    pub fn reset_cache(&mut self) -> DirectionStatus {
        self.cache.reset()
    }

    fn check_lengths(&self) -> Result<()> {
        for buf in [
            &self.residual,
            &self.delta_x,
            &self.delta_residual,
            &self.direction,
        ] {
            if buf.len() != self.l {
                return Err(Error::DimensionMismatch {
                    expected: self.l,
                    actual: buf.len(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_residual_is_exact_and_leaves_cache_alone() {
        let config = AccelConfig::default().with_direction(DirectionStrategy::FixedPointResidual);
        let mut work = AccelWorkspace::new(3, config).unwrap();
        work.residual.copy_from_slice(&[1.5, -2.0, 0.25]);
        work.delta_x.copy_from_slice(&[9.0, 9.0, 9.0]);
        work.delta_residual.copy_from_slice(&[9.0, 9.0, 9.0]);

        for iteration in 0..4 {
            let status = work.compute_direction(iteration).unwrap();
            assert_eq!(status, DirectionStatus::Success);
            assert_eq!(work.direction, vec![-1.5, 2.0, -0.25]);
            assert_eq!((work.cache.cursor(), work.cache.len()), (0, 0));
        }
    }

    #[test]
    fn rejects_zero_dimension() {
        let result = AccelWorkspace::new(0, AccelConfig::default());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_invalid_config() {
        let result = AccelWorkspace::new(4, AccelConfig::default().with_memory(0));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let result = AccelWorkspace::new(4, AccelConfig::default().with_theta_bar(2.0));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn memory_is_clamped_to_dimension() {
        let work = AccelWorkspace::new(3, AccelConfig::default().with_memory(50)).unwrap();
        assert_eq!(work.config.memory, 3);
        assert_eq!(work.cache.capacity(), 3);
    }

    #[test]
    fn validates_buffer_lengths_before_mutation() {
        let mut work = AccelWorkspace::new(2, AccelConfig::default()).unwrap();
        work.direction.copy_from_slice(&[5.0, 6.0]);
        work.residual.push(0.0);

        let result = work.compute_direction(1);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
        assert_eq!(work.direction, vec![5.0, 6.0], "direction untouched");
    }

    #[test]
    fn reset_cache_always_reports_reset() {
        let mut work = AccelWorkspace::new(2, AccelConfig::default()).unwrap();
        assert_eq!(work.reset_cache(), DirectionStatus::CacheReset);
        assert_eq!(work.reset_cache(), DirectionStatus::CacheReset);
    }
}
