use std::f64::consts::PI;

use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use sewerflow_dwf::{
    DayClass, DayGroup, DayGrouping, DryWeatherConfig, DwfError, GwiSource, PatternMode,
    estimate_dry_weather,
};
use sewerflow_grid::{FlowSeries, TimeGrid};

/// 2024-01-01 was a Monday.
fn monday() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn hourly(days: usize) -> TimeGrid {
    TimeGrid::new(monday(), 3600, days * 24).unwrap()
}

/// Multiplicative shape with minimum 0 at `trough` and mean 1 over 24 hours.
fn shape(hour: usize, trough: usize) -> f64 {
    1.0 - (2.0 * PI * (hour as f64 - trough as f64) / 24.0).cos()
}

fn true_gwi(i: usize) -> f64 {
    4.0 + 0.02 * i as f64 / 24.0
}

fn synthetic_flow(grid: &TimeGrid) -> Vec<f64> {
    (0..grid.len())
        .map(|i| true_gwi(i) + 2.0 * shape(i % 24, 0))
        .collect()
}

#[test]
fn recovers_gwi_and_pattern_on_dry_days() {
    let grid = hourly(14);
    let flow = synthetic_flow(&grid);
    let est = estimate_dry_weather(&flow, &grid, None, &DryWeatherConfig::default()).unwrap();

    assert_eq!(est.n_dry_days(), 14);
    assert_eq!(est.gwi_trend().len(), 14);
    for (i, &g) in est.gwi().iter().enumerate() {
        let truth = true_gwi(i);
        assert!(
            (g - truth).abs() / truth < 0.05,
            "gwi[{i}] = {g}, expected about {truth}"
        );
    }

    let gp = est.pattern_for(DayGroup::All).unwrap();
    assert_eq!(gp.n_days(), 14);
    for (h, &p) in gp.pattern().values().iter().enumerate() {
        assert!(
            (p - shape(h, 0)).abs() < 0.05,
            "pattern[{h}] = {p}, expected about {}",
            shape(h, 0)
        );
    }
    assert!(est.reconstruction_error() < 1e-9);
}

#[test]
fn recovers_pattern_with_noise() {
    let grid = hourly(21);
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 0.005).unwrap();
    let flow: Vec<f64> = synthetic_flow(&grid)
        .into_iter()
        .map(|f| f + noise.sample(&mut rng))
        .collect();

    let est = estimate_dry_weather(&flow, &grid, None, &DryWeatherConfig::default()).unwrap();
    let pattern = est.pattern_for(DayGroup::All).unwrap().pattern();
    for (h, &p) in pattern.values().iter().enumerate() {
        assert!((p - shape(h, 0)).abs() < 0.05, "slot {h}: {p}");
    }
    for (i, &g) in est.gwi().iter().enumerate() {
        assert!((g - true_gwi(i)).abs() / true_gwi(i) < 0.05);
    }
}

#[test]
fn rain_marks_days_wet() {
    let grid = hourly(10);
    let flow = synthetic_flow(&grid);
    let mut rain = vec![0.0; grid.len()];
    rain[3 * 24 + 12] = 4.0;
    rain[7 * 24 + 12] = 1.5;

    let est =
        estimate_dry_weather(&flow, &grid, Some(&rain), &DryWeatherConfig::default()).unwrap();
    assert_eq!(est.n_dry_days(), 8);
    assert_eq!(est.days()[3].class(), DayClass::Wet);
    assert_eq!(est.days()[7].class(), DayClass::Wet);
    assert_relative_eq!(est.days()[3].rain_depth(), 4.0);
    assert_eq!(est.bwwf().len(), grid.len());
    assert!(est.bwwf().iter().all(|&b| b >= 0.0));
}

#[test]
fn lookback_reaches_into_next_day() {
    let grid = hourly(6);
    let flow = synthetic_flow(&grid);
    let mut rain = vec![0.0; grid.len()];
    rain[24 + 22] = 1.0;

    let est =
        estimate_dry_weather(&flow, &grid, Some(&rain), &DryWeatherConfig::default()).unwrap();
    assert_eq!(est.days()[1].class(), DayClass::Wet);
    assert_eq!(est.days()[2].class(), DayClass::Wet);
    assert_eq!(est.n_dry_days(), 4);
}

#[test]
fn insufficient_dry_days() {
    let grid = hourly(3);
    let flow = synthetic_flow(&grid);
    let mut rain = vec![0.0; grid.len()];
    rain[12] = 1.0;
    rain[24 + 12] = 1.0;

    let err = estimate_dry_weather(&flow, &grid, Some(&rain), &DryWeatherConfig::default())
        .unwrap_err();
    assert_eq!(
        err,
        DwfError::InsufficientDryData {
            found: 1,
            required: 3
        }
    );
    assert_eq!(
        err.to_string(),
        "only 1 dry days available, need >= 3"
    );
}

#[test]
fn series_too_short() {
    let grid = TimeGrid::new(monday(), 3600, 40).unwrap();
    let flow = vec![5.0; 40];
    let err = estimate_dry_weather(&flow, &grid, None, &DryWeatherConfig::default()).unwrap_err();
    assert!(matches!(err, DwfError::SeriesTooShort { .. }));
}

#[test]
fn length_mismatch_rejected() {
    let grid = hourly(3);
    let flow = vec![5.0; 10];
    let err = estimate_dry_weather(&flow, &grid, None, &DryWeatherConfig::default()).unwrap_err();
    assert_eq!(
        err,
        DwfError::LengthMismatch {
            input: "flow",
            expected: 72,
            got: 10
        }
    );
}

#[test]
fn weekday_and_weekend_patterns() {
    let grid = hourly(14);
    let flow: Vec<f64> = (0..grid.len())
        .map(|i| match DayGroup::of(grid.day_of(i)) {
            DayGroup::Weekend => 4.0 + 3.0 * shape(i % 24, 6),
            _ => 4.0 + 2.0 * shape(i % 24, 0),
        })
        .collect();
    let config = DryWeatherConfig::new().with_grouping(DayGrouping::WeekdayWeekend);
    let est = estimate_dry_weather(&flow, &grid, None, &config).unwrap();

    assert_eq!(est.patterns().len(), 2);
    let weekday = est.pattern_for(DayGroup::Weekday).unwrap();
    let weekend = est.pattern_for(DayGroup::Weekend).unwrap();
    assert_eq!(weekday.n_days(), 10);
    assert_eq!(weekend.n_days(), 4);
    assert_relative_eq!(weekday.sanitary_level(), 2.0, epsilon = 1e-9);
    assert_relative_eq!(weekend.sanitary_level(), 3.0, epsilon = 1e-9);
    for h in 0..24 {
        assert_relative_eq!(weekday.pattern().values()[h], shape(h, 0), epsilon = 1e-9);
        assert_relative_eq!(weekend.pattern().values()[h], shape(h, 6), epsilon = 1e-9);
    }
    for (i, &f) in flow.iter().enumerate() {
        assert_relative_eq!(est.gwi()[i] + est.bwwf()[i], f, epsilon = 1e-9);
    }
}

#[test]
fn weekend_without_dry_days_borrows_combined() {
    let grid = hourly(5);
    let flow = synthetic_flow(&grid);
    let config = DryWeatherConfig::new().with_grouping(DayGrouping::WeekdayWeekend);
    let est = estimate_dry_weather(&flow, &grid, None, &config).unwrap();

    let weekday = est.pattern_for(DayGroup::Weekday).unwrap();
    let weekend = est.pattern_for(DayGroup::Weekend).unwrap();
    assert_eq!(weekend.n_days(), 0);
    assert_eq!(weekend.pattern(), weekday.pattern());
}

#[test]
fn additive_pattern_has_zero_mean() {
    let grid = hourly(7);
    let offset = |h: usize| (2.0 * PI * h as f64 / 24.0).sin();
    let flow: Vec<f64> = (0..grid.len()).map(|i| 6.0 + offset(i % 24)).collect();
    let config = DryWeatherConfig::new().with_pattern_mode(PatternMode::Additive);
    let est = estimate_dry_weather(&flow, &grid, None, &config).unwrap();

    let pattern = est.pattern_for(DayGroup::All).unwrap().pattern();
    assert_eq!(pattern.mode(), PatternMode::Additive);
    let mean: f64 = pattern.values().iter().sum::<f64>() / 24.0;
    assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
    for h in 0..24 {
        assert_relative_eq!(pattern.values()[h], offset(h), epsilon = 1e-9);
    }
    assert!(est.reconstruction_error() < 1e-9);
}

#[test]
fn monthly_gwi_source() {
    let grid = hourly(5);
    let flow: Vec<f64> = (0..grid.len())
        .map(|i| 3.0 + 2.0 * shape(i % 24, 0))
        .collect();
    let config = DryWeatherConfig::new().with_gwi_source(GwiSource::Monthly {
        average: 2.0,
        multipliers: [1.5; 12],
    });
    let est = estimate_dry_weather(&flow, &grid, None, &config).unwrap();

    assert!(est.gwi_trend().is_empty());
    assert!(est.gwi().iter().all(|&g| g == 3.0));
    let gp = est.pattern_for(DayGroup::All).unwrap();
    assert_relative_eq!(gp.sanitary_level(), 2.0, epsilon = 1e-9);
}

#[test]
fn supplied_gwi_series_is_interpolated() {
    let grid = hourly(4);
    let flow = vec![10.0; grid.len()];
    let end = grid.timestamp(grid.len() - 1);
    let gwi = FlowSeries::new(vec![monday(), end], vec![2.0, 2.0 + (grid.len() - 1) as f64 * 0.01])
        .unwrap();
    let config = DryWeatherConfig::new().with_gwi_source(GwiSource::Series(gwi));
    let est = estimate_dry_weather(&flow, &grid, None, &config).unwrap();

    assert_relative_eq!(est.gwi()[0], 2.0, epsilon = 1e-12);
    assert_relative_eq!(est.gwi()[50], 2.5, epsilon = 1e-12);
    assert!(est.reconstruction_error() < 1e-9);
}

#[test]
fn invalid_config_rejected() {
    let grid = hourly(4);
    let flow = synthetic_flow(&grid);
    let config = DryWeatherConfig::new().with_min_dry_days(0);
    assert!(matches!(
        estimate_dry_weather(&flow, &grid, None, &config),
        Err(DwfError::InvalidParameter { .. })
    ));
}
