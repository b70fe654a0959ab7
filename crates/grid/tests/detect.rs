//! Integration tests for grid detection and regularisation.

use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use sewerflow_grid::{FlowSeries, GridConfig, GridError, IrregularPolicy, TimeGrid};

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 10, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn at_secs(secs: &[i64]) -> Vec<NaiveDateTime> {
    secs.iter().map(|&s| t0() + TimeDelta::seconds(s)).collect()
}

#[test]
fn regular_fifteen_minute_series() {
    let ts = at_secs(&(0..96).map(|i| i * 900).collect::<Vec<_>>());
    let grid = TimeGrid::detect(&ts, &GridConfig::default()).unwrap();
    assert_eq!(grid.step_secs(), 900);
    assert_eq!(grid.len(), 96);
    assert!(!grid.is_resampled());
}

#[test]
fn jitter_within_tolerance_is_regular() {
    // 3600s +/- 20s is within 1%.
    let ts = at_secs(&[0, 3600, 7220, 10800, 14400, 18000, 21590, 25200]);
    let grid = TimeGrid::detect(&ts, &GridConfig::default()).unwrap();
    assert_eq!(grid.step_secs(), 3600);
    assert_eq!(grid.len(), 8);
}

#[test]
fn gap_is_rejected_by_default() {
    let ts = at_secs(&[0, 900, 1800, 3600, 4500]);
    let err = TimeGrid::detect(&ts, &GridConfig::default()).unwrap_err();
    assert_eq!(
        err,
        GridError::IrregularGrid {
            index: 3,
            delta_secs: 1800,
            expected_secs: 900,
            tolerance: 0.01,
        }
    );
}

#[test]
fn gap_is_filled_when_resampling() {
    let ts = at_secs(&[0, 900, 1800, 3600, 4500]);
    let flow = FlowSeries::new(ts, vec![1.0, 2.0, 3.0, 5.0, 6.0]).unwrap();
    let config = GridConfig::new().with_policy(IrregularPolicy::Resample);
    let grid = TimeGrid::detect(flow.timestamps(), &config).unwrap();
    assert!(grid.is_resampled());
    assert_eq!(grid.len(), 6);

    let values = grid.regularize(&flow);
    let expected = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    for (v, e) in values.iter().zip(expected) {
        assert_relative_eq!(*v, e, epsilon = 1e-12);
    }
}

#[test]
fn single_sample_is_rejected() {
    let err = TimeGrid::detect(&at_secs(&[0]), &GridConfig::default()).unwrap_err();
    assert!(matches!(err, GridError::TooFewSamples { n: 1, min: 2, .. }));
}

#[test]
fn step_not_dividing_day_is_rejected() {
    let ts = at_secs(&[0, 420, 840, 1260]);
    let err = TimeGrid::detect(&ts, &GridConfig::default()).unwrap_err();
    assert_eq!(err, GridError::StepDoesNotDivideDay { step_secs: 420 });
}
