//! Error types for the sewerflow-grid crate.

/// Error type for all fallible operations in the sewerflow-grid crate.
///
/// Covers malformed input series and sampling intervals that cannot be
/// turned into a uniform grid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Returned when a series has fewer samples than required.
    #[error("{label} series has {n} samples, need at least {min}")]
    TooFewSamples {
        /// Which series was rejected.
        label: &'static str,
        /// Number of samples provided.
        n: usize,
        /// Minimum number of samples required.
        min: usize,
    },

    /// Returned when timestamps and values differ in length.
    #[error("{label} series has {timestamps} timestamps but {values} values")]
    LengthMismatch {
        /// Which series was rejected.
        label: &'static str,
        /// Number of timestamps.
        timestamps: usize,
        /// Number of values.
        values: usize,
    },

    /// Returned when timestamps are not strictly increasing.
    #[error("{label} timestamps are not strictly increasing at index {index}")]
    NonIncreasing {
        /// Which series was rejected.
        label: &'static str,
        /// Index of the first timestamp not after its predecessor.
        index: usize,
    },

    /// Returned when a value is NaN or infinite.
    #[error("{label} value at index {index} is not finite")]
    NonFiniteValue {
        /// Which series was rejected.
        label: &'static str,
        /// Index of the offending value.
        index: usize,
    },

    /// Returned when a rainfall depth is negative.
    #[error("rain depth at index {index} is negative ({value})")]
    NegativeDepth {
        /// Index of the offending depth.
        index: usize,
        /// The negative depth.
        value: f64,
    },

    /// Returned when sampling intervals vary beyond the tolerance and no
    /// resampling policy was requested.
    #[error(
        "irregular sampling at index {index}: interval {delta_secs}s differs from dominant \
         {expected_secs}s by more than {tolerance}"
    )]
    IrregularGrid {
        /// Index of the sample that ends the offending interval.
        index: usize,
        /// The offending interval in seconds.
        delta_secs: i64,
        /// The dominant interval in seconds.
        expected_secs: i64,
        /// Relative tolerance that was exceeded.
        tolerance: f64,
    },

    /// Returned when the dominant interval is shorter than one second.
    #[error("dominant sampling interval must be at least 1s, got {step_secs}s")]
    InvalidStep {
        /// The rejected interval in seconds.
        step_secs: i64,
    },

    /// Returned when the interval does not divide a day into whole slots.
    #[error("sampling interval {step_secs}s does not divide 86400s evenly")]
    StepDoesNotDivideDay {
        /// The rejected interval in seconds.
        step_secs: i64,
    },

    /// Returned when the regularity tolerance is out of range.
    #[error("grid tolerance must be finite and in [0, 0.5), got {tolerance}")]
    InvalidTolerance {
        /// The rejected tolerance.
        tolerance: f64,
    },
}
