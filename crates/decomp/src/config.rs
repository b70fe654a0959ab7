//! Configuration for a full decomposition run.

use sewerflow_dwf::DryWeatherConfig;
use sewerflow_events::EventConfig;
use sewerflow_grid::GridConfig;
use sewerflow_rtk::RtkConfig;

use crate::error::DecomposeError;

/// Configuration for [`decompose`](crate::decompose).
///
/// Bundles the configuration of each stage plus the fit-quality floor
/// below which a converged event fit is still reported as low-confidence.
///
/// # Example
///
/// ```
/// use sewerflow_decomp::DecompositionConfig;
/// use sewerflow_dwf::DryWeatherConfig;
/// use sewerflow_events::EventConfig;
///
/// let config = DecompositionConfig::new()
///     .with_dry_weather(DryWeatherConfig::new().with_lookback_hours(12))
///     .with_events(EventConfig::new().with_gap_hours(8.0))
///     .with_min_fit_nse(0.6);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecompositionConfig {
    grid: GridConfig,
    dry_weather: DryWeatherConfig,
    events: EventConfig,
    rtk: RtkConfig,
    min_fit_nse: f64,
}

impl DecompositionConfig {
    /// Creates a configuration with every stage at its defaults and no
    /// fit-quality floor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the grid detection options.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Sets the dry-weather options.
    pub fn with_dry_weather(mut self, dry_weather: DryWeatherConfig) -> Self {
        self.dry_weather = dry_weather;
        self
    }

    /// Sets the event detection options.
    pub fn with_events(mut self, events: EventConfig) -> Self {
        self.events = events;
        self
    }

    /// Sets the RTK fitting options.
    pub fn with_rtk(mut self, rtk: RtkConfig) -> Self {
        self.rtk = rtk;
        self
    }

    /// Sets the R² below which a converged fit is flagged low-confidence.
    pub fn with_min_fit_nse(mut self, nse: f64) -> Self {
        self.min_fit_nse = nse;
        self
    }

    /// Returns the grid detection settings.
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Returns the dry-weather estimation settings.
    pub fn dry_weather(&self) -> &DryWeatherConfig {
        &self.dry_weather
    }

    /// Returns the storm-event detection settings.
    pub fn events(&self) -> &EventConfig {
        &self.events
    }

    /// Returns the RTK fitting settings.
    pub fn rtk(&self) -> &RtkConfig {
        &self.rtk
    }

    /// Returns the NSE below which a fit is low confidence.
    pub fn min_fit_nse(&self) -> f64 {
        self.min_fit_nse
    }

    /// Validates every stage.
    ///
    /// # Errors
    ///
    /// [`DecomposeError::InvalidConfiguration`] naming the first bad option.
    pub fn validate(&self) -> Result<(), DecomposeError> {
        let invalid = |e: &dyn std::fmt::Display| DecomposeError::InvalidConfiguration(e.to_string());
        self.grid.validate().map_err(|e| invalid(&e))?;
        self.dry_weather.validate().map_err(|e| invalid(&e))?;
        self.events.validate().map_err(|e| invalid(&e))?;
        self.rtk.validate().map_err(|e| invalid(&e))?;
        if !(self.min_fit_nse.is_finite() && self.min_fit_nse <= 1.0) {
            return Err(DecomposeError::InvalidConfiguration(format!(
                "min_fit_nse must be finite and <= 1, got {}",
                self.min_fit_nse
            )));
        }
        Ok(())
    }
}
