//! Validated, immutable time-series containers.

use chrono::NaiveDateTime;

use crate::error::GridError;

/// A rate-valued series: sewer flow, or any other rate such as a
/// caller-supplied groundwater infiltration record.
///
/// Timestamps are strictly increasing and every value is finite. The
/// container is immutable once built; the decomposition never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSeries {
    timestamps: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl FlowSeries {
    /// Creates a new `FlowSeries`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the lengths differ, the series is empty,
    /// timestamps are not strictly increasing, or a value is not finite.
    pub fn new(timestamps: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self, GridError> {
        validate("flow", &timestamps, &values)?;
        Ok(Self { timestamps, values })
    }

    /// Returns the sample timestamps.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Returns the flow values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A rainfall series of depth increments.
///
/// Each depth is the rain that fell during the interval beginning at its
/// timestamp. Depths are finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct RainSeries {
    timestamps: Vec<NaiveDateTime>,
    depths: Vec<f64>,
}

impl RainSeries {
    /// Creates a new `RainSeries`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] on the same structural problems as
    /// [`FlowSeries::new`], and [`GridError::NegativeDepth`] if any depth
    /// is below zero.
    pub fn new(timestamps: Vec<NaiveDateTime>, depths: Vec<f64>) -> Result<Self, GridError> {
        validate("rain", &timestamps, &depths)?;
        if let Some((index, &value)) = depths.iter().enumerate().find(|(_, d)| **d < 0.0) {
            return Err(GridError::NegativeDepth { index, value });
        }
        Ok(Self { timestamps, depths })
    }

    /// Returns the sample timestamps.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Returns the depth increments.
    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Returns `true` if the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Returns the total depth over the whole series.
    pub fn total_depth(&self) -> f64 {
        self.depths.iter().sum()
    }
}

fn validate(
    label: &'static str,
    timestamps: &[NaiveDateTime],
    values: &[f64],
) -> Result<(), GridError> {
    if timestamps.len() != values.len() {
        return Err(GridError::LengthMismatch {
            label,
            timestamps: timestamps.len(),
            values: values.len(),
        });
    }
    if values.is_empty() {
        return Err(GridError::TooFewSamples {
            label,
            n: 0,
            min: 1,
        });
    }
    if let Some(index) = (1..timestamps.len()).find(|&i| timestamps[i] <= timestamps[i - 1]) {
        return Err(GridError::NonIncreasing { label, index });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(GridError::NonFiniteValue { label, index });
    }
    Ok(())
}
