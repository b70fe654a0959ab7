//! Error types for storm event detection.

/// Errors from event detection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EventError {
    /// Invalid configuration parameter.
    #[error("invalid event configuration: {reason}")]
    InvalidConfig {
        /// Description of what is wrong.
        reason: String,
    },

    /// An input slice does not match the grid length.
    #[error("{input} has {got} samples but the grid has {expected}")]
    LengthMismatch {
        /// Name of the mismatched input.
        input: &'static str,
        /// Grid length.
        expected: usize,
        /// Length of the input.
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_config() {
        let e = EventError::InvalidConfig {
            reason: "event_gap_hours must be > 0, got 0".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid event configuration: event_gap_hours must be > 0, got 0"
        );
    }

    #[test]
    fn display_length_mismatch() {
        let e = EventError::LengthMismatch {
            input: "residual",
            expected: 48,
            got: 47,
        };
        assert_eq!(e.to_string(), "residual has 47 samples but the grid has 48");
    }

    #[test]
    fn is_std_error() {
        let e = EventError::InvalidConfig {
            reason: "x".to_string(),
        };
        let _: &dyn std::error::Error = &e;
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EventError>();
    }
}
