//! Pure conversion functions: TOML config structs -> crate API config types.

use std::time::Duration;

use anyhow::{Result, bail};

use crate::config::*;

use sewerflow_decomp::DecompositionConfig;
use sewerflow_dwf::{DayGrouping, DryWeatherConfig, GwiSource, PatternMode, TrendFilter};
use sewerflow_events::EventConfig;
use sewerflow_grid::{FlowSeries, GridConfig, IrregularPolicy};
use sewerflow_rtk::RtkConfig;

/// Parses an irregular-sampling policy name.
pub fn parse_irregular_policy(s: &str) -> Result<IrregularPolicy> {
    match s.to_lowercase().as_str() {
        "reject" => Ok(IrregularPolicy::Reject),
        "resample" => Ok(IrregularPolicy::Resample),
        other => bail!("unknown irregular sampling policy: {other:?}"),
    }
}

/// Parses a GWI trend filter name.
pub fn parse_trend_filter(s: &str) -> Result<TrendFilter> {
    match s.to_lowercase().as_str() {
        "moving_minimum" | "min" => Ok(TrendFilter::MovingMinimum),
        "moving_average" | "mean" => Ok(TrendFilter::MovingAverage),
        other => bail!("unknown trend filter: {other:?}"),
    }
}

/// Parses a diurnal pattern mode name.
pub fn parse_pattern_mode(s: &str) -> Result<PatternMode> {
    match s.to_lowercase().as_str() {
        "multiplicative" => Ok(PatternMode::Multiplicative),
        "additive" => Ok(PatternMode::Additive),
        other => bail!("unknown pattern mode: {other:?}"),
    }
}

/// Parses a day grouping name.
pub fn parse_day_grouping(s: &str) -> Result<DayGrouping> {
    match s.to_lowercase().as_str() {
        "combined" => Ok(DayGrouping::Combined),
        "weekday_weekend" => Ok(DayGrouping::WeekdayWeekend),
        other => bail!("unknown day grouping: {other:?}"),
    }
}

/// Converts the TOML GWI section into a [`GwiSource`].
///
/// `series` is the `gwi` array from the input file, required when the source
/// is `"series"` and ignored otherwise.
pub fn parse_gwi_source(gwi: &GwiToml, series: Option<FlowSeries>) -> Result<GwiSource> {
    match gwi.source.to_lowercase().as_str() {
        "estimated" => Ok(GwiSource::Estimated),
        "monthly" => match (gwi.average, gwi.multipliers) {
            (Some(average), Some(multipliers)) => Ok(GwiSource::Monthly {
                average,
                multipliers,
            }),
            _ => bail!("monthly GWI source needs both average and multipliers"),
        },
        "series" => match series {
            Some(s) => Ok(GwiSource::Series(s)),
            None => bail!("GWI source is \"series\" but the input has no gwi array"),
        },
        other => bail!("unknown GWI source: {other:?}"),
    }
}

/// Builds a [`GridConfig`] from the TOML grid configuration.
pub fn build_grid_config(grid: &GridToml) -> Result<GridConfig> {
    Ok(GridConfig::new()
        .with_tolerance(grid.tolerance)
        .with_policy(parse_irregular_policy(&grid.irregular)?)
        .with_max_fill_samples(grid.max_fill_samples))
}

/// Builds a [`DryWeatherConfig`] from the TOML dry-weather configuration.
pub fn build_dry_weather_config(
    dw: &DryWeatherToml,
    gwi_series: Option<FlowSeries>,
) -> Result<DryWeatherConfig> {
    Ok(DryWeatherConfig::new()
        .with_lookback_hours(dw.dry_lookback_hours)
        .with_rain_threshold(dw.dry_rain_threshold)
        .with_min_dry_days(dw.min_dry_days)
        .with_filter_window_days(dw.baseline_filter_window_days)
        .with_trend_filter(parse_trend_filter(&dw.trend_filter)?)
        .with_min_flow_factor(dw.min_flow_factor)
        .with_pattern_mode(parse_pattern_mode(&dw.pattern_mode)?)
        .with_grouping(parse_day_grouping(&dw.day_grouping)?)
        .with_gwi_source(parse_gwi_source(&dw.gwi, gwi_series)?)
        .with_reconstruction_tolerance(dw.reconstruction_tolerance))
}

/// Builds an [`EventConfig`] from the TOML events configuration.
pub fn build_event_config(ev: &EventsToml) -> EventConfig {
    EventConfig::new()
        .with_min_intensity(ev.event_min_intensity)
        .with_gap_hours(ev.event_gap_hours)
        .with_max_duration_hours(ev.event_max_duration_hours)
        .with_response_fraction(ev.response_fraction)
}

/// Builds an [`RtkConfig`] from the TOML RTK configuration.
pub fn build_rtk_config(rtk: &RtkToml) -> Result<RtkConfig> {
    let timeout = match Duration::try_from_secs_f64(rtk.fit_timeout_seconds) {
        Ok(d) if !d.is_zero() => d,
        _ => bail!(
            "fit_timeout_seconds must be a positive number of seconds, got {}",
            rtk.fit_timeout_seconds
        ),
    };
    Ok(RtkConfig::new()
        .with_max_components(rtk.rtk_max_components)
        .with_improvement_threshold(rtk.rtk_model_improvement_threshold)
        .with_timeout(timeout)
        .with_max_iters(rtk.max_iters))
}

/// Builds the full [`DecompositionConfig`] and validates it.
pub fn build_decomposition_config(
    cfg: &SewerflowConfig,
    gwi_series: Option<FlowSeries>,
) -> Result<DecompositionConfig> {
    let config = DecompositionConfig::new()
        .with_grid(build_grid_config(&cfg.grid)?)
        .with_dry_weather(build_dry_weather_config(&cfg.dry_weather, gwi_series)?)
        .with_events(build_event_config(&cfg.events))
        .with_rtk(build_rtk_config(&cfg.rtk)?)
        .with_min_fit_nse(cfg.min_fit_nse);
    config.validate()?;
    Ok(config)
}
