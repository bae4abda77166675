//! Engine configuration: strategy selection and algorithm parameters.

use crate::error::{Error, Result};
use crate::lstsq::LeastSquaresMethod;

/// Direction strategy applied each outer iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionStrategy {
    /// Plain fixed-point residual direction, `dir = -R`. No cache use.
    FixedPointResidual,
    /// Limited-memory Broyden updates with Powell damping and a hard restart
    /// when the memory fills.
    #[default]
    RestartedBroyden,
    /// Multi-secant Anderson acceleration via a least-squares solve over the
    /// sliding window of recent pairs.
    AndersonAcceleration,
    /// Dense Broyden variant. Incomplete: performs only the optional initial
    /// diagonal rescaling of its operator and must not be relied upon.
    FullBroyden,
}

impl DirectionStrategy {
    /// Parse from a string.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "residual" | "fixed-point" | "fixed_point_residual" => Some(Self::FixedPointResidual),
            "broyden" | "restarted-broyden" | "restarted_broyden" => Some(Self::RestartedBroyden),
            "anderson" | "anderson-acceleration" | "anderson_acceleration" => {
                Some(Self::AndersonAcceleration)
            }
            "full-broyden" | "full_broyden" => Some(Self::FullBroyden),
            _ => None,
        }
    }
}

impl std::str::FromStr for DirectionStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| Error::UnknownStrategy(s.to_string()))
    }
}

/// Operator rescaling rule consulted by the dense Broyden variant when seeding
/// its operator. Ignored by every other strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingRule {
    /// No rescaling.
    #[default]
    Off,
    /// Scale by `<Sk, Yk> / <Yk, Yk>`.
    SecantToResidual,
    /// Scale by `<Sk, Yk> / <Sk, Sk>`.
    SecantToIterate,
}

/// Configuration for the acceleration-direction engine.
#[derive(Debug, Clone)]
pub struct AccelConfig {
    /// Direction strategy.
    pub direction: DirectionStrategy,
    /// Secant-pair memory (cache capacity, at least 1).
    pub memory: usize,
    /// Powell damping threshold, in (0, 1).
    pub theta_bar: f64,
    /// Least-squares method used by Anderson acceleration.
    pub lstsq: LeastSquaresMethod,
    /// Operator rescaling rule for the dense Broyden variant.
    pub scaling_rule: ScalingRule,
    /// Seed the dense Broyden operator diagonal on the second iteration.
    pub init_scaling: bool,
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self {
            direction: DirectionStrategy::default(),
            memory: 10,
            theta_bar: 0.1,
            lstsq: LeastSquaresMethod::default(),
            scaling_rule: ScalingRule::default(),
            init_scaling: false,
        }
    }
}

impl AccelConfig {
    /// Set the direction strategy.
    pub fn with_direction(mut self, direction: DirectionStrategy) -> Self {
        self.direction = direction;
        self
    }

    /// Set the secant-pair memory.
    pub fn with_memory(mut self, memory: usize) -> Self {
        self.memory = memory;
        self
    }

    /// Set the Powell damping threshold.
    pub fn with_theta_bar(mut self, theta_bar: f64) -> Self {
        self.theta_bar = theta_bar;
        self
    }

    /// Set the least-squares method.
    pub fn with_lstsq(mut self, method: LeastSquaresMethod) -> Self {
        self.lstsq = method;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.memory == 0 {
            return Err(Error::InvalidConfig(
                "memory must be at least 1".to_string(),
            ));
        }
        if !(self.theta_bar > 0.0 && self.theta_bar < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "theta_bar must lie in (0, 1), got {}",
                self.theta_bar
            )));
        }
        Ok(())
    }
}
