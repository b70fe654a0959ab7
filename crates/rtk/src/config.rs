//! Fitting configuration.

use std::time::Duration;

use crate::error::RtkError;

/// Default number of triangles per event (short, medium and long term).
pub const DEFAULT_MAX_COMPONENTS: usize = 3;

/// RTK fitting configuration.
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `max_components` | 3 |
/// | `improvement_threshold` | 0.05 |
/// | `timeout` | 30 s |
/// | `max_iters` | 3000 |
/// | `sd_tolerance` | 1e-10 |
#[derive(Debug, Clone, PartialEq)]
pub struct RtkConfig {
    max_components: usize,
    improvement_threshold: f64,
    timeout: Duration,
    max_iters: u64,
    sd_tolerance: f64,
}

impl RtkConfig {
    /// Creates a configuration with the defaults above.
    pub fn new() -> Self {
        Self {
            max_components: DEFAULT_MAX_COMPONENTS,
            improvement_threshold: 0.05,
            timeout: Duration::from_secs(30),
            max_iters: 3000,
            sd_tolerance: 1e-10,
        }
    }

    /// Sets the largest number of triangles tried.
    pub fn with_max_components(mut self, n: usize) -> Self {
        self.max_components = n;
        self
    }

    /// Sets the relative RSS reduction an extra triangle must achieve.
    pub fn with_improvement_threshold(mut self, t: f64) -> Self {
        self.improvement_threshold = t;
        self
    }

    /// Sets the wall-clock budget for all fits of one event.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the iteration cap of each optimizer run.
    pub fn with_max_iters(mut self, n: u64) -> Self {
        self.max_iters = n;
        self
    }

    /// Sets the simplex standard-deviation tolerance (on the normalised cost).
    pub fn with_sd_tolerance(mut self, tol: f64) -> Self {
        self.sd_tolerance = tol;
        self
    }

    /// Returns the largest number of triangles tried.
    pub fn max_components(&self) -> usize {
        self.max_components
    }

    /// Returns the relative RSS reduction an extra triangle must achieve.
    pub fn improvement_threshold(&self) -> f64 {
        self.improvement_threshold
    }

    /// Returns the wall-clock budget per event.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the iteration cap of each optimizer run.
    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    /// Returns the simplex standard-deviation tolerance.
    pub fn sd_tolerance(&self) -> f64 {
        self.sd_tolerance
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), RtkError> {
        if self.max_components == 0 {
            return Err(RtkError::InvalidConfig {
                reason: "rtk_max_components must be >= 1, got 0".to_string(),
            });
        }
        if !self.improvement_threshold.is_finite() || self.improvement_threshold < 0.0 {
            return Err(RtkError::InvalidConfig {
                reason: format!(
                    "rtk_model_improvement_threshold must be finite and >= 0, got {}",
                    self.improvement_threshold
                ),
            });
        }
        if self.timeout.is_zero() {
            return Err(RtkError::InvalidConfig {
                reason: "fit_timeout_seconds must be > 0".to_string(),
            });
        }
        if self.max_iters == 0 {
            return Err(RtkError::InvalidConfig {
                reason: "max_iters must be > 0".to_string(),
            });
        }
        if !(self.sd_tolerance > 0.0 && self.sd_tolerance.is_finite()) {
            return Err(RtkError::InvalidConfig {
                reason: format!("sd_tolerance must be > 0, got {}", self.sd_tolerance),
            });
        }
        Ok(())
    }
}

impl Default for RtkConfig {
    fn default() -> Self {
        Self::new()
    }
}
