//! Error types for the sewerflow-rtk crate.

use crate::fit::{EventFit, NonConvergence};

/// Error type for all fallible operations in the sewerflow-rtk crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RtkError {
    /// Returned when the event window holds too few samples.
    #[error("insufficient data: got {n} samples, need at least {min}")]
    InsufficientData {
        /// Number of samples provided.
        n: usize,
        /// Minimum number of samples required.
        min: usize,
    },

    /// Returned when the rain and observed series differ in length.
    #[error("rain has {rain} samples but the observed response has {observed}")]
    LengthMismatch {
        /// Rain length.
        rain: usize,
        /// Observed response length.
        observed: usize,
    },

    /// Returned when an input contains NaN or infinity.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when the event window holds no rain.
    #[error("event window contains no rainfall")]
    NoRainfall,

    /// Returned when a configuration value is out of range.
    #[error("invalid RTK configuration: {reason}")]
    InvalidConfig {
        /// Description of what is wrong.
        reason: String,
    },

    /// Returned when the optimizer itself fails.
    #[error("optimisation failed: {reason}")]
    OptimizationFailed {
        /// Message from the solver.
        reason: String,
    },

    /// Returned when the optimizer stopped before converging. Carries the
    /// best parameters found.
    #[error("fit did not converge ({reason}); best R^2 = {:.3}", best.nse())]
    FitNotConverged {
        /// Why the optimizer stopped.
        reason: NonConvergence,
        /// Best fit found before stopping.
        best: Box<EventFit>,
    },
}
