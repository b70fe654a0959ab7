//! Groundwater infiltration trend.

use chrono::{Datelike, NaiveDate, NaiveTime};
use sewerflow_grid::{FlowSeries, SECONDS_PER_DAY, TimeGrid, align_rate};
use sewerflow_stats::{lerp, mean};

use crate::classify::DayInfo;
use crate::config::TrendFilter;

/// Smoothed GWI estimate anchored at midday of one dry day.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TrendPoint {
    date: NaiveDate,
    floor: f64,
    value: f64,
}

impl TrendPoint {
    /// Returns the dry day.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the day's dry-weather floor before smoothing.
    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Returns the smoothed GWI value.
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Estimates GWI from the dry-day flow floors.
///
/// Each dry day's floor is its minimum flow times `min_flow_factor`. Floors
/// are smoothed over a centred window of `window_days` calendar days
/// (rounded up to odd), anchored at midday and linearly interpolated to
/// every grid point; the first and last anchors are held outwards.
pub(crate) fn estimate_gwi(
    flow: &[f64],
    grid: &TimeGrid,
    days: &[DayInfo],
    window_days: usize,
    filter: TrendFilter,
    min_flow_factor: f64,
) -> (Vec<f64>, Vec<TrendPoint>) {
    let dry: Vec<&DayInfo> = days.iter().filter(|d| d.is_dry()).collect();
    let floors: Vec<f64> = dry
        .iter()
        .map(|d| {
            flow[d.range()]
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min)
                * min_flow_factor
        })
        .collect();

    let half = (window_days / 2) as i64;
    let points: Vec<TrendPoint> = dry
        .iter()
        .zip(&floors)
        .map(|(d, &floor)| {
            let neighbours: Vec<f64> = dry
                .iter()
                .zip(&floors)
                .filter(|(e, _)| (e.date() - d.date()).num_days().abs() <= half)
                .map(|(_, &f)| f)
                .collect();
            let value = match filter {
                TrendFilter::MovingMinimum => {
                    neighbours.iter().copied().fold(f64::INFINITY, f64::min)
                }
                TrendFilter::MovingAverage => mean(&neighbours),
            };
            TrendPoint {
                date: d.date(),
                floor,
                value,
            }
        })
        .collect();

    let anchors: Vec<(f64, f64)> = points
        .iter()
        .map(|p| {
            let midnight = grid.offset_secs(p.date.and_time(NaiveTime::MIN));
            ((midnight + SECONDS_PER_DAY / 2) as f64, p.value)
        })
        .collect();

    (interpolate_anchors(&anchors, grid), points)
}

/// GWI from an average rate and calendar-month multipliers.
pub(crate) fn monthly_gwi(grid: &TimeGrid, average: f64, multipliers: &[f64; 12]) -> Vec<f64> {
    (0..grid.len())
        .map(|i| average * multipliers[grid.day_of(i).month0() as usize])
        .collect()
}

/// GWI from a caller-supplied series.
pub(crate) fn supplied_gwi(series: &FlowSeries, grid: &TimeGrid) -> Vec<f64> {
    align_rate(series, grid)
}

/// Piecewise-linear interpolation of `(offset_secs, value)` anchors at every
/// grid point. Anchors must be sorted by offset and non-empty.
fn interpolate_anchors(anchors: &[(f64, f64)], grid: &TimeGrid) -> Vec<f64> {
    let step = grid.step_secs() as f64;
    let (first, last) = (anchors[0], anchors[anchors.len() - 1]);
    let mut k = 0;
    (0..grid.len())
        .map(|i| {
            let x = i as f64 * step;
            if x <= first.0 {
                return first.1;
            }
            if x >= last.0 {
                return last.1;
            }
            while anchors[k + 1].0 < x {
                k += 1;
            }
            let (x0, y0) = anchors[k];
            let (x1, y1) = anchors[k + 1];
            lerp(x0, y0, x1, y1, x)
        })
        .collect()
}
