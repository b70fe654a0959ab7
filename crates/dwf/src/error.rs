//! Error types for the sewerflow-dwf crate.

/// Error type for all fallible operations in the sewerflow-dwf crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DwfError {
    /// Returned when a configuration value is out of range.
    #[error("invalid {name}: {value} (expected {expected})")]
    InvalidParameter {
        /// Name of the offending option.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable description of the valid range.
        expected: &'static str,
    },

    /// Returned when an input slice does not match the grid length.
    #[error("{input} has {got} samples but the grid has {expected}")]
    LengthMismatch {
        /// Name of the mismatched input.
        input: &'static str,
        /// Grid length.
        expected: usize,
        /// Length of the input.
        got: usize,
    },

    /// Returned when the series is too short to hold a diurnal cycle.
    #[error("flow series spans {hours} hours, need at least {min_hours}")]
    SeriesTooShort {
        /// Hours covered by the series.
        hours: f64,
        /// Minimum hours required.
        min_hours: f64,
    },

    /// Returned when too few dry days are available to estimate baseflow.
    #[error("only {found} dry days available, need >= {required}")]
    InsufficientDryData {
        /// Number of dry days found.
        found: usize,
        /// Minimum number of dry days required.
        required: usize,
    },
}
