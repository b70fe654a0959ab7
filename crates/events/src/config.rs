//! Configuration for storm event detection.

use crate::error::EventError;

/// Event detection configuration.
///
/// | Parameter | Default | Meaning |
/// |-----------|---------|---------|
/// | `min_intensity` | 0.0 | peak 1-hour depth an event must exceed |
/// | `gap_hours` | 6.0 | dry run that separates two events |
/// | `max_duration_hours` | 72.0 | cap on a response window from event start |
/// | `response_fraction` | 0.05 | residual fraction of peak counted as baseline |
/// | `zero_rain` | 1e-9 | depths at or below this are dry |
#[derive(Debug, Clone, PartialEq)]
pub struct EventConfig {
    min_intensity: f64,
    gap_hours: f64,
    max_duration_hours: f64,
    response_fraction: f64,
    zero_rain: f64,
}

impl EventConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self {
            min_intensity: 0.0,
            gap_hours: 6.0,
            max_duration_hours: 72.0,
            response_fraction: 0.05,
            zero_rain: 1e-9,
        }
    }

    /// Sets the minimum peak 1-hour depth.
    pub fn with_min_intensity(mut self, v: f64) -> Self {
        self.min_intensity = v;
        self
    }

    /// Sets the separating dry-run length in hours.
    pub fn with_gap_hours(mut self, v: f64) -> Self {
        self.gap_hours = v;
        self
    }

    /// Sets the maximum window length in hours.
    pub fn with_max_duration_hours(mut self, v: f64) -> Self {
        self.max_duration_hours = v;
        self
    }

    /// Sets the baseline fraction of the residual peak.
    pub fn with_response_fraction(mut self, v: f64) -> Self {
        self.response_fraction = v;
        self
    }

    /// Sets the near-zero rain depth.
    pub fn with_zero_rain(mut self, v: f64) -> Self {
        self.zero_rain = v;
        self
    }

    /// Returns the minimum peak 1-hour depth.
    pub fn min_intensity(&self) -> f64 {
        self.min_intensity
    }

    /// Returns the dry gap, in hours, that separates events.
    pub fn gap_hours(&self) -> f64 {
        self.gap_hours
    }

    /// Returns the longest response window, in hours.
    pub fn max_duration_hours(&self) -> f64 {
        self.max_duration_hours
    }

    /// Returns the baseline fraction of the peak residual.
    pub fn response_fraction(&self) -> f64 {
        self.response_fraction
    }

    /// Returns the near-zero rain depth.
    pub fn zero_rain(&self) -> f64 {
        self.zero_rain
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), EventError> {
        if !self.min_intensity.is_finite() || self.min_intensity < 0.0 {
            return Err(EventError::InvalidConfig {
                reason: format!(
                    "event_min_intensity must be finite and >= 0, got {}",
                    self.min_intensity
                ),
            });
        }
        if !self.gap_hours.is_finite() || self.gap_hours <= 0.0 {
            return Err(EventError::InvalidConfig {
                reason: format!("event_gap_hours must be > 0, got {}", self.gap_hours),
            });
        }
        if !self.max_duration_hours.is_finite() || self.max_duration_hours <= 0.0 {
            return Err(EventError::InvalidConfig {
                reason: format!(
                    "event_max_duration_hours must be > 0, got {}",
                    self.max_duration_hours
                ),
            });
        }
        if !(self.response_fraction > 0.0 && self.response_fraction < 1.0) {
            return Err(EventError::InvalidConfig {
                reason: format!(
                    "response_fraction must be in (0, 1), got {}",
                    self.response_fraction
                ),
            });
        }
        if !self.zero_rain.is_finite() || self.zero_rain < 0.0 {
            return Err(EventError::InvalidConfig {
                reason: format!("zero_rain must be finite and >= 0, got {}", self.zero_rain),
            });
        }
        Ok(())
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self::new()
    }
}
