//! Dry-weather flow estimation pipeline.

use chrono::NaiveDate;
use sewerflow_grid::TimeGrid;
use sewerflow_stats::mean;
use tracing::{debug, info, warn};

use crate::classify::{DayGroup, DayInfo, classify_days};
use crate::config::{DayGrouping, DryWeatherConfig, GwiSource};
use crate::error::DwfError;
use crate::pattern::{DiurnalPattern, DrySanitaryDay, GroupPattern, extract_pattern};
use crate::trend::{TrendPoint, estimate_gwi, monthly_gwi, supplied_gwi};

/// Shortest series that can hold a diurnal cycle plus context.
const MIN_SERIES_HOURS: f64 = 48.0;

/// Dry-day volumes below this are compared in absolute terms.
const MIN_DRY_VOLUME: f64 = 1e-9;

/// GWI and BWWF on the flow grid, with the patterns and trend behind them.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DryWeatherEstimate {
    #[serde(skip)]
    gwi: Vec<f64>,
    #[serde(skip)]
    bwwf: Vec<f64>,
    patterns: Vec<GroupPattern>,
    gwi_trend: Vec<TrendPoint>,
    days: Vec<DayInfo>,
    n_dry_days: usize,
    reconstruction_error: f64,
}

impl DryWeatherEstimate {
    /// Returns groundwater infiltration at every grid point.
    pub fn gwi(&self) -> &[f64] {
        &self.gwi
    }

    /// Returns base wastewater flow at every grid point.
    pub fn bwwf(&self) -> &[f64] {
        &self.bwwf
    }

    /// Returns one pattern per day group.
    pub fn patterns(&self) -> &[GroupPattern] {
        &self.patterns
    }

    /// Returns the pattern used for `group`, if estimated.
    pub fn pattern_for(&self, group: DayGroup) -> Option<&GroupPattern> {
        self.patterns.iter().find(|p| p.group() == group)
    }

    /// Returns the smoothed daily GWI anchors (empty unless GWI was estimated).
    pub fn gwi_trend(&self) -> &[TrendPoint] {
        &self.gwi_trend
    }

    /// Returns every calendar day of the grid with its classification.
    pub fn days(&self) -> &[DayInfo] {
        &self.days
    }

    /// Returns the number of dry days.
    pub fn n_dry_days(&self) -> usize {
        self.n_dry_days
    }

    /// Returns the largest relative volume error of GWI + BWWF on a dry day.
    pub fn reconstruction_error(&self) -> f64 {
        self.reconstruction_error
    }
}

/// Estimates GWI and BWWF for a flow series on `grid`.
///
/// `rain` holds the rain depth per grid bin, if a rain series is available.
/// Without it every complete day counts as dry.
///
/// # Errors
///
/// - [`DwfError::InvalidParameter`] if `config` fails validation.
/// - [`DwfError::LengthMismatch`] if `flow` or `rain` differ from the grid length.
/// - [`DwfError::SeriesTooShort`] if the grid spans less than 48 hours.
/// - [`DwfError::InsufficientDryData`] if fewer than `min_dry_days` days are dry.
#[tracing::instrument(skip_all, fields(n = flow.len(), has_rain = rain.is_some()))]
pub fn estimate_dry_weather(
    flow: &[f64],
    grid: &TimeGrid,
    rain: Option<&[f64]>,
    config: &DryWeatherConfig,
) -> Result<DryWeatherEstimate, DwfError> {
    config.validate()?;
    check_len("flow", flow.len(), grid.len())?;
    if let Some(rain) = rain {
        check_len("rain", rain.len(), grid.len())?;
    }

    let hours = grid.duration_hours();
    if hours < MIN_SERIES_HOURS {
        return Err(DwfError::SeriesTooShort {
            hours,
            min_hours: MIN_SERIES_HOURS,
        });
    }

    let days = classify_days(
        grid,
        rain,
        config.lookback_hours(),
        config.rain_threshold(),
    );
    let n_dry_days = days.iter().filter(|d| d.is_dry()).count();
    debug!(n_days = days.len(), n_dry_days, "days classified");
    if n_dry_days < config.min_dry_days() {
        return Err(DwfError::InsufficientDryData {
            found: n_dry_days,
            required: config.min_dry_days(),
        });
    }

    let (gwi, gwi_trend) = match config.gwi_source() {
        GwiSource::Estimated => estimate_gwi(
            flow,
            grid,
            &days,
            config.filter_window_days(),
            config.trend_filter(),
            config.min_flow_factor(),
        ),
        GwiSource::Monthly {
            average,
            multipliers,
        } => (monthly_gwi(grid, *average, multipliers), Vec::new()),
        GwiSource::Series(series) => (supplied_gwi(series, grid), Vec::new()),
    };

    let dry: Vec<DrySanitaryDay> = days
        .iter()
        .filter(|d| d.is_dry())
        .map(|d| DrySanitaryDay {
            group: group_of(d.date(), config.grouping()),
            slots: d.range().map(|i| grid.slot_of(i)).collect(),
            sanitary: d.range().map(|i| flow[i] - gwi[i]).collect(),
        })
        .collect();

    let patterns = group_patterns(&dry, config, grid.samples_per_day());

    let mut bwwf = vec![0.0; grid.len()];
    let mut dry_iter = dry.iter();
    for day in &days {
        let group = group_of(day.date(), config.grouping());
        let Some(gp) = patterns.iter().find(|p| p.group() == group) else {
            continue;
        };
        let level = if day.is_dry() {
            dry_iter
                .next()
                .map(DrySanitaryDay::level)
                .unwrap_or(gp.sanitary_level())
        } else {
            gp.sanitary_level()
        };
        for i in day.range() {
            bwwf[i] = gp.pattern().apply(level, grid.slot_of(i)).max(0.0);
        }
    }

    let reconstruction_error = days
        .iter()
        .filter(|d| d.is_dry())
        .map(|d| volume_error(&flow[d.range()], &gwi[d.range()], &bwwf[d.range()]))
        .fold(0.0, f64::max);
    if reconstruction_error > config.reconstruction_tolerance() {
        warn!(
            reconstruction_error,
            tolerance = config.reconstruction_tolerance(),
            "dry-day volumes not reproduced within tolerance"
        );
    }

    info!(
        n_dry_days,
        n_patterns = patterns.len(),
        reconstruction_error,
        "dry-weather flow estimated"
    );

    Ok(DryWeatherEstimate {
        gwi,
        bwwf,
        patterns,
        gwi_trend,
        days,
        n_dry_days,
        reconstruction_error,
    })
}

fn check_len(input: &'static str, got: usize, expected: usize) -> Result<(), DwfError> {
    if got != expected {
        return Err(DwfError::LengthMismatch {
            input,
            expected,
            got,
        });
    }
    Ok(())
}

fn group_of(date: NaiveDate, grouping: DayGrouping) -> DayGroup {
    match grouping {
        DayGrouping::Combined => DayGroup::All,
        DayGrouping::WeekdayWeekend => DayGroup::of(date),
    }
}

/// One pattern per group. A group without usable dry days borrows the
/// combined pattern and level.
fn group_patterns(
    dry: &[DrySanitaryDay],
    config: &DryWeatherConfig,
    slots_per_day: usize,
) -> Vec<GroupPattern> {
    let mode = config.pattern_mode();
    let combined = extract_pattern(dry.iter(), mode, slots_per_day)
        .unwrap_or_else(|| DiurnalPattern::flat(mode, slots_per_day));
    let levels: Vec<f64> = dry.iter().map(DrySanitaryDay::level).collect();
    let combined_level = mean(&levels);

    let groups: &[DayGroup] = match config.grouping() {
        DayGrouping::Combined => &[DayGroup::All],
        DayGrouping::WeekdayWeekend => &[DayGroup::Weekday, DayGroup::Weekend],
    };

    groups
        .iter()
        .map(|&group| {
            let members: Vec<&DrySanitaryDay> = dry.iter().filter(|d| d.group == group).collect();
            if members.is_empty() {
                debug!(?group, "no dry days in group, using combined pattern");
                return GroupPattern::new(group, combined.clone(), combined_level, 0);
            }
            let pattern = extract_pattern(members.iter().copied(), mode, slots_per_day)
                .unwrap_or_else(|| combined.clone());
            let levels: Vec<f64> = members.iter().map(|d| d.level()).collect();
            GroupPattern::new(group, pattern, mean(&levels), members.len())
        })
        .collect()
}

fn volume_error(flow: &[f64], gwi: &[f64], bwwf: &[f64]) -> f64 {
    let observed: f64 = flow.iter().sum();
    let modelled: f64 = gwi.iter().zip(bwwf).map(|(g, b)| g + b).sum();
    let diff = (modelled - observed).abs();
    if observed.abs() > MIN_DRY_VOLUME {
        diff / observed.abs()
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn volume_error_relative() {
        assert_relative_eq!(
            volume_error(&[10.0, 10.0], &[5.0, 5.0], &[4.0, 5.0]),
            0.05,
            epsilon = 1e-12
        );
    }

    #[test]
    fn volume_error_absolute_for_zero_flow() {
        assert_relative_eq!(volume_error(&[0.0], &[0.0], &[0.5]), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn group_of_combined_is_all() {
        let sat = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        assert_eq!(group_of(sat, DayGrouping::Combined), DayGroup::All);
        assert_eq!(group_of(sat, DayGrouping::WeekdayWeekend), DayGroup::Weekend);
    }
}
