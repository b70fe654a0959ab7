//! Error types for the sewerflow-decomp crate.

use sewerflow_dwf::DwfError;
use sewerflow_events::EventError;
use sewerflow_grid::GridError;

/// Error type for all fallible operations in the sewerflow-decomp crate.
///
/// Grid and dry-weather failures are fatal and wrapped transparently.
/// Per-event fitting failures never surface here; they are reported in
/// the result instead.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DecomposeError {
    /// Time-grid construction or validation error.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Dry-weather estimation error.
    #[error(transparent)]
    DryWeather(#[from] DwfError),

    /// Event detection error.
    #[error(transparent)]
    Events(#[from] EventError),

    /// Returned when an option is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
