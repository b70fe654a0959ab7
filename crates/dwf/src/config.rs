//! Configuration for dry-weather flow estimation.

use sewerflow_grid::FlowSeries;

use crate::error::DwfError;

/// How the diurnal pattern relates to the daily sanitary level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternMode {
    /// Pattern values are multipliers with mean 1.0.
    #[default]
    Multiplicative,
    /// Pattern values are offsets with mean 0.0.
    Additive,
}

/// Smoothing applied to the daily dry-weather floor before interpolation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrendFilter {
    /// Centred moving minimum.
    #[default]
    MovingMinimum,
    /// Centred moving average (low-pass).
    MovingAverage,
}

/// Which days share a diurnal pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DayGrouping {
    /// One pattern for every day of the week.
    #[default]
    Combined,
    /// Separate Monday–Friday and Saturday–Sunday patterns.
    WeekdayWeekend,
}

/// Where the groundwater infiltration component comes from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GwiSource {
    /// Estimated from the dry-day minimum flows.
    #[default]
    Estimated,
    /// A fixed average scaled by calendar-month multipliers (January first).
    Monthly {
        /// Average GWI rate.
        average: f64,
        /// Multiplier for each calendar month.
        multipliers: [f64; 12],
    },
    /// A measured or externally modelled GWI series, interpolated onto the
    /// flow grid.
    Series(FlowSeries),
}

/// Configuration for [`estimate_dry_weather`](crate::estimate_dry_weather).
///
/// # Example
///
/// ```
/// use sewerflow_dwf::{DayGrouping, DryWeatherConfig, PatternMode};
///
/// let config = DryWeatherConfig::new()
///     .with_lookback_hours(12)
///     .with_grouping(DayGrouping::WeekdayWeekend)
///     .with_pattern_mode(PatternMode::Additive);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DryWeatherConfig {
    lookback_hours: u32,
    rain_threshold: f64,
    min_dry_days: usize,
    filter_window_days: usize,
    trend_filter: TrendFilter,
    min_flow_factor: f64,
    pattern_mode: PatternMode,
    grouping: DayGrouping,
    gwi_source: GwiSource,
    reconstruction_tolerance: f64,
}

impl DryWeatherConfig {
    /// Creates a configuration with defaults.
    ///
    /// | Parameter | Default |
    /// |-----------|---------|
    /// | `lookback_hours` | 6 |
    /// | `rain_threshold` | 0.0 |
    /// | `min_dry_days` | 3 |
    /// | `filter_window_days` | 5 |
    /// | `trend_filter` | `MovingMinimum` |
    /// | `min_flow_factor` | 1.0 |
    /// | `pattern_mode` | `Multiplicative` |
    /// | `grouping` | `Combined` |
    /// | `gwi_source` | `Estimated` |
    /// | `reconstruction_tolerance` | 0.02 |
    pub fn new() -> Self {
        Self {
            lookback_hours: 6,
            rain_threshold: 0.0,
            min_dry_days: 3,
            filter_window_days: 5,
            trend_filter: TrendFilter::MovingMinimum,
            min_flow_factor: 1.0,
            pattern_mode: PatternMode::Multiplicative,
            grouping: DayGrouping::Combined,
            gwi_source: GwiSource::Estimated,
            reconstruction_tolerance: 0.02,
        }
    }

    /// Sets how many hours before a day's start must also be dry.
    pub fn with_lookback_hours(mut self, hours: u32) -> Self {
        self.lookback_hours = hours;
        self
    }

    /// Sets the rain depth (over the day plus look-back) still counted as dry.
    pub fn with_rain_threshold(mut self, threshold: f64) -> Self {
        self.rain_threshold = threshold;
        self
    }

    /// Sets the minimum number of dry days required.
    pub fn with_min_dry_days(mut self, days: usize) -> Self {
        self.min_dry_days = days;
        self
    }

    /// Sets the width of the GWI smoothing window in days.
    pub fn with_filter_window_days(mut self, days: usize) -> Self {
        self.filter_window_days = days;
        self
    }

    /// Sets the GWI smoothing filter.
    pub fn with_trend_filter(mut self, filter: TrendFilter) -> Self {
        self.trend_filter = filter;
        self
    }

    /// Sets the fraction of the dry-day minimum flow attributed to GWI.
    pub fn with_min_flow_factor(mut self, factor: f64) -> Self {
        self.min_flow_factor = factor;
        self
    }

    /// Sets the diurnal pattern mode.
    pub fn with_pattern_mode(mut self, mode: PatternMode) -> Self {
        self.pattern_mode = mode;
        self
    }

    /// Sets the day grouping.
    pub fn with_grouping(mut self, grouping: DayGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Sets the GWI source.
    pub fn with_gwi_source(mut self, source: GwiSource) -> Self {
        self.gwi_source = source;
        self
    }

    /// Sets the relative dry-day volume error above which a warning is logged.
    pub fn with_reconstruction_tolerance(mut self, tolerance: f64) -> Self {
        self.reconstruction_tolerance = tolerance;
        self
    }

    /// Returns the look-back in hours.
    pub fn lookback_hours(&self) -> u32 {
        self.lookback_hours
    }

    /// Returns the dry rain threshold.
    pub fn rain_threshold(&self) -> f64 {
        self.rain_threshold
    }

    /// Returns the minimum number of dry days.
    pub fn min_dry_days(&self) -> usize {
        self.min_dry_days
    }

    /// Returns the GWI smoothing window in days.
    pub fn filter_window_days(&self) -> usize {
        self.filter_window_days
    }

    /// Returns the GWI smoothing filter.
    pub fn trend_filter(&self) -> TrendFilter {
        self.trend_filter
    }

    /// Returns the minimum-flow factor.
    pub fn min_flow_factor(&self) -> f64 {
        self.min_flow_factor
    }

    /// Returns the diurnal pattern mode.
    pub fn pattern_mode(&self) -> PatternMode {
        self.pattern_mode
    }

    /// Returns the day grouping.
    pub fn grouping(&self) -> DayGrouping {
        self.grouping
    }

    /// Returns the GWI source.
    pub fn gwi_source(&self) -> &GwiSource {
        &self.gwi_source
    }

    /// Returns the reconstruction tolerance.
    pub fn reconstruction_tolerance(&self) -> f64 {
        self.reconstruction_tolerance
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), DwfError> {
        if !self.rain_threshold.is_finite() || self.rain_threshold < 0.0 {
            return Err(DwfError::InvalidParameter {
                name: "rain_threshold",
                value: self.rain_threshold,
                expected: "finite and >= 0",
            });
        }
        if self.min_dry_days < 1 {
            return Err(DwfError::InvalidParameter {
                name: "min_dry_days",
                value: self.min_dry_days as f64,
                expected: ">= 1",
            });
        }
        if self.filter_window_days < 1 {
            return Err(DwfError::InvalidParameter {
                name: "baseline_filter_window_days",
                value: self.filter_window_days as f64,
                expected: ">= 1",
            });
        }
        if !(self.min_flow_factor > 0.0 && self.min_flow_factor <= 1.0) {
            return Err(DwfError::InvalidParameter {
                name: "min_flow_factor",
                value: self.min_flow_factor,
                expected: "in (0, 1]",
            });
        }
        if !self.reconstruction_tolerance.is_finite() || self.reconstruction_tolerance <= 0.0 {
            return Err(DwfError::InvalidParameter {
                name: "reconstruction_tolerance",
                value: self.reconstruction_tolerance,
                expected: "finite and > 0",
            });
        }
        if let GwiSource::Monthly {
            average,
            multipliers,
        } = &self.gwi_source
        {
            if !average.is_finite() || *average < 0.0 {
                return Err(DwfError::InvalidParameter {
                    name: "gwi_average",
                    value: *average,
                    expected: "finite and >= 0",
                });
            }
            if let Some(&bad) = multipliers.iter().find(|m| !m.is_finite() || **m < 0.0) {
                return Err(DwfError::InvalidParameter {
                    name: "gwi_monthly_multiplier",
                    value: bad,
                    expected: "finite and >= 0",
                });
            }
        }
        Ok(())
    }
}

impl Default for DryWeatherConfig {
    fn default() -> Self {
        Self::new()
    }
}
