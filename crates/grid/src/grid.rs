//! Dominant-interval detection and grid arithmetic.

use std::collections::BTreeMap;
use std::ops::Range;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use tracing::debug;

use crate::align::align_rate;
use crate::error::GridError;
use crate::series::FlowSeries;

/// Number of seconds in a calendar day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// What to do when sampling intervals vary beyond the tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IrregularPolicy {
    /// Fail with [`GridError::IrregularGrid`].
    #[default]
    Reject,
    /// Build a uniform grid at the dominant interval and linearly
    /// interpolate the flow onto it. Gaps longer than
    /// [`GridConfig::max_fill_samples`] are interpolated too but reported by
    /// [`TimeGrid::gaps`].
    Resample,
}

/// Configuration for grid detection.
///
/// # Example
///
/// ```
/// use sewerflow_grid::{GridConfig, IrregularPolicy};
///
/// let config = GridConfig::new()
///     .with_tolerance(0.02)
///     .with_policy(IrregularPolicy::Resample);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Relative deviation from the dominant interval still treated as regular.
    tolerance: f64,
    /// Policy for irregular input.
    policy: IrregularPolicy,
    /// Longest run of missing samples that counts as filled data.
    max_fill_samples: usize,
}

impl GridConfig {
    /// Creates a configuration with defaults: `tolerance = 0.01`,
    /// `policy = Reject`, `max_fill_samples = 2`.
    pub fn new() -> Self {
        Self {
            tolerance: 0.01,
            policy: IrregularPolicy::Reject,
            max_fill_samples: 2,
        }
    }

    /// Sets the relative regularity tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the policy for irregular input.
    pub fn with_policy(mut self, policy: IrregularPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the longest run of missing samples that resampling may fill.
    pub fn with_max_fill_samples(mut self, n: usize) -> Self {
        self.max_fill_samples = n;
        self
    }

    /// Returns the relative regularity tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the policy for irregular input.
    pub fn policy(&self) -> IrregularPolicy {
        self.policy
    }

    /// Returns the longest run of missing samples that resampling may fill.
    pub fn max_fill_samples(&self) -> usize {
        self.max_fill_samples
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), GridError> {
        if !self.tolerance.is_finite() || !(0.0..0.5).contains(&self.tolerance) {
            return Err(GridError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A uniform sampling grid: `len` timestamps spaced `step_secs` apart.
///
/// A resampled grid also remembers the index ranges of input gaps that
/// were too long to count as filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGrid {
    start: NaiveDateTime,
    step_secs: i64,
    len: usize,
    resampled: bool,
    gaps: Vec<Range<usize>>,
}

impl TimeGrid {
    /// Creates a grid directly.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if `len < 2`, the step is below one second, or
    /// the step does not divide a day.
    pub fn new(start: NaiveDateTime, step_secs: i64, len: usize) -> Result<Self, GridError> {
        if len < 2 {
            return Err(GridError::TooFewSamples {
                label: "grid",
                n: len,
                min: 2,
            });
        }
        check_step(step_secs)?;
        Ok(Self {
            start,
            step_secs,
            len,
            resampled: false,
            gaps: Vec::new(),
        })
    }

    /// Detects the grid underlying `timestamps`.
    ///
    /// The step is the mode of consecutive deltas in whole seconds (ties go
    /// to the shorter interval). Every delta must lie within the configured
    /// relative tolerance of the step, otherwise the configured
    /// [`IrregularPolicy`] decides between failing and resampling.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IrregularGrid`] for irregular input under
    /// [`IrregularPolicy::Reject`], and the [`TimeGrid::new`] errors for
    /// unusable steps.
    pub fn detect(timestamps: &[NaiveDateTime], config: &GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        let n = timestamps.len();
        if n < 2 {
            return Err(GridError::TooFewSamples {
                label: "flow",
                n,
                min: 2,
            });
        }

        let step_secs = dominant_interval(timestamps);
        check_step(step_secs)?;

        let allowed = config.tolerance() * step_secs as f64;
        let offending = timestamps
            .windows(2)
            .enumerate()
            .map(|(i, w)| (i + 1, (w[1] - w[0]).num_seconds()))
            .find(|&(_, delta)| ((delta - step_secs) as f64).abs() > allowed);

        match (offending, config.policy()) {
            (None, _) => Ok(Self {
                start: timestamps[0],
                step_secs,
                len: n,
                resampled: false,
                gaps: Vec::new(),
            }),
            (Some((index, delta_secs)), IrregularPolicy::Reject) => Err(GridError::IrregularGrid {
                index,
                delta_secs,
                expected_secs: step_secs,
                tolerance: config.tolerance(),
            }),
            (Some((index, delta_secs)), IrregularPolicy::Resample) => {
                let span = (timestamps[n - 1] - timestamps[0]).num_seconds();
                let len = (span / step_secs) as usize + 1;
                let gaps = unfilled_gaps(timestamps, step_secs, config.max_fill_samples());
                debug!(
                    index,
                    delta_secs,
                    step_secs,
                    n_in = n,
                    n_out = len,
                    n_gaps = gaps.len(),
                    "irregular sampling: resampling onto uniform grid"
                );
                Ok(Self {
                    start: timestamps[0],
                    step_secs,
                    len,
                    resampled: true,
                    gaps,
                })
            }
        }
    }

    /// Returns the first timestamp.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Returns the last timestamp.
    pub fn end(&self) -> NaiveDateTime {
        self.timestamp(self.len - 1)
    }

    /// Returns the step in seconds.
    pub fn step_secs(&self) -> i64 {
        self.step_secs
    }

    /// Returns the step in hours.
    pub fn step_hours(&self) -> f64 {
        self.step_secs as f64 / 3600.0
    }

    /// Returns the number of grid points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a grid holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the grid was built by resampling irregular input.
    pub fn is_resampled(&self) -> bool {
        self.resampled
    }

    /// Returns the index ranges interpolated across input gaps longer than
    /// the fill limit, in time order.
    pub fn gaps(&self) -> &[Range<usize>] {
        &self.gaps
    }

    /// Returns `true` if any point of `range` lies in an unfilled gap.
    pub fn overlaps_gap(&self, range: Range<usize>) -> bool {
        self.gaps.iter().any(|g| g.start < range.end && range.start < g.end)
    }

    /// Returns the timestamp of grid point `i`.
    pub fn timestamp(&self, i: usize) -> NaiveDateTime {
        self.start + TimeDelta::seconds(i as i64 * self.step_secs)
    }

    /// Returns all grid timestamps.
    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        (0..self.len).map(|i| self.timestamp(i)).collect()
    }

    /// Returns the number of samples in one calendar day.
    pub fn samples_per_day(&self) -> usize {
        (SECONDS_PER_DAY / self.step_secs) as usize
    }

    /// Converts a duration in hours to a whole number of grid steps.
    pub fn samples_for_hours(&self, hours: f64) -> usize {
        (hours * 3600.0 / self.step_secs as f64).round().max(0.0) as usize
    }

    /// Returns the time covered by the grid in hours, counting the final
    /// sample's interval.
    pub fn duration_hours(&self) -> f64 {
        self.len as f64 * self.step_hours()
    }

    /// Returns the calendar day of grid point `i`.
    pub fn day_of(&self, i: usize) -> NaiveDate {
        self.timestamp(i).date()
    }

    /// Returns the diurnal slot (0..samples_per_day) of grid point `i`.
    pub fn slot_of(&self, i: usize) -> usize {
        let secs = self.timestamp(i).num_seconds_from_midnight() as i64;
        (secs / self.step_secs) as usize
    }

    /// Seconds from the grid start to `t` (negative before the start).
    pub fn offset_secs(&self, t: NaiveDateTime) -> i64 {
        (t - self.start).num_seconds()
    }

    /// Returns the flow values on this grid.
    ///
    /// When the grid was detected as regular the samples are taken as-is;
    /// a resampled grid interpolates the flow linearly.
    pub fn regularize(&self, flow: &FlowSeries) -> Vec<f64> {
        if !self.resampled && flow.len() == self.len {
            flow.values().to_vec()
        } else {
            align_rate(flow, self)
        }
    }
}

/// Mode of consecutive deltas in whole seconds; 0 for fewer than two samples.
pub(crate) fn dominant_interval(timestamps: &[NaiveDateTime]) -> i64 {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for w in timestamps.windows(2) {
        *counts.entry((w[1] - w[0]).num_seconds()).or_insert(0) += 1;
    }
    let mut best = (0_i64, 0_usize);
    for (&delta, &count) in &counts {
        if count > best.1 {
            best = (delta, count);
        }
    }
    best.0
}

/// Grid index ranges missing from `timestamps` in runs longer than
/// `max_fill` samples.
fn unfilled_gaps(
    timestamps: &[NaiveDateTime],
    step_secs: i64,
    max_fill: usize,
) -> Vec<Range<usize>> {
    let start = timestamps[0];
    let index_of = |t: NaiveDateTime| ((t - start).num_seconds() + step_secs / 2) / step_secs;
    timestamps
        .windows(2)
        .filter_map(|w| {
            let a = index_of(w[0]) as usize;
            let b = index_of(w[1]) as usize;
            (b > a + 1 + max_fill).then_some(a + 1..b)
        })
        .collect()
}

fn check_step(step_secs: i64) -> Result<(), GridError> {
    if step_secs < 1 {
        return Err(GridError::InvalidStep { step_secs });
    }
    if SECONDS_PER_DAY % step_secs != 0 {
        return Err(GridError::StepDoesNotDivideDay { step_secs });
    }
    Ok(())
}
