//! End-to-end decomposition tests on synthetic catchments.

use std::f64::consts::PI;

use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use sewerflow_decomp::{DecomposeError, DecompositionConfig, FitOutcome, WetWeather, decompose};
use sewerflow_dwf::{DayClass, DayGroup, DwfError};
use sewerflow_grid::{FlowSeries, GridConfig, GridError, IrregularPolicy, RainSeries};
use sewerflow_rtk::{RtkConfig, RtkParams, simulate};

const VOLUME_FACTOR: f64 = 10.0;

fn t(i: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + TimeDelta::hours(i as i64)
}

fn timestamps(n: usize) -> Vec<NaiveDateTime> {
    (0..n).map(t).collect()
}

fn dry_weather(i: usize) -> f64 {
    4.0 + 2.0 * (1.0 - (2.0 * PI * (i % 24) as f64 / 24.0).cos())
}

/// Hourly flow over `days` days with a storm starting at each hour in `storms`.
fn catchment(days: usize, storms: &[usize]) -> (FlowSeries, RainSeries, Vec<f64>) {
    let n = days * 24;
    let mut rain = vec![0.0; n];
    for &s in storms {
        rain[s..s + 3].copy_from_slice(&[1.0, 2.0, 1.0]);
    }
    let response = simulate(&rain, &[RtkParams::new(0.3, 2.0, 3.0)], 1.0, VOLUME_FACTOR);
    let flow: Vec<f64> = (0..n).map(|i| dry_weather(i) + response[i]).collect();
    (
        FlowSeries::new(timestamps(n), flow).unwrap(),
        RainSeries::new(timestamps(n), rain).unwrap(),
        response,
    )
}

#[test]
fn storm_response_is_separated_and_fitted() {
    let (flow, rain, response) = catchment(21, &[10 * 24 + 6]);
    let result = decompose(&flow, Some(&rain), VOLUME_FACTOR, &DecompositionConfig::default())
        .unwrap();

    assert!(result.max_partition_error() < 1e-9);
    assert_eq!(result.metrics().n_dry_days, 20);
    for (w, r) in result.wwf().iter().zip(&response) {
        assert_relative_eq!(*w, *r, epsilon = 1e-6);
    }

    let WetWeather::Events(events) = result.wet_weather() else {
        panic!("expected events");
    };
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event().start_index(), 246);
    assert_eq!(events[0].event().rain_end_index(), 248);
    assert_relative_eq!(events[0].event().total_depth(), 4.0);

    let FitOutcome::Converged(fit) = events[0].outcome() else {
        panic!("expected a converged fit, got {:?}", events[0].outcome());
    };
    let p = fit.components()[0];
    assert!((p.r() - 0.3).abs() < 0.03, "R = {}", p.r());
    assert!((p.t_hours() - 2.0).abs() < 0.2, "T = {}", p.t_hours());
    assert!(fit.nse() > 0.9);
    assert!(result.metrics().overall_nse.unwrap() > 0.9);
    assert!(result.warnings().is_empty(), "{:?}", result.warnings());
}

#[test]
fn no_rain_series_means_no_events() {
    let (flow, _, _) = catchment(7, &[]);
    let result = decompose(&flow, None, VOLUME_FACTOR, &DecompositionConfig::default()).unwrap();

    assert_eq!(result.wet_weather(), &WetWeather::NoRainfall);
    assert!(result.wet_weather().events().is_empty());
    assert!(result.rtk_model().iter().all(|&q| q == 0.0));
    assert!(result.metrics().overall_nse.is_none());
    assert!(result.max_partition_error() < 1e-9);
    for (i, w) in result.wwf().iter().enumerate() {
        assert_relative_eq!(
            *w,
            result.flow()[i] - result.gwi()[i] - result.bwwf()[i],
            epsilon = 1e-12
        );
    }
}

#[test]
fn rain_series_without_rain_gives_empty_events() {
    let (flow, rain, _) = catchment(7, &[]);
    let result = decompose(&flow, Some(&rain), VOLUME_FACTOR, &DecompositionConfig::default())
        .unwrap();
    assert_eq!(result.wet_weather(), &WetWeather::Events(Vec::new()));
}

#[test]
fn identical_inputs_give_identical_results() {
    let (flow, rain, _) = catchment(14, &[5 * 24 + 3, 9 * 24 + 12]);
    let config = DecompositionConfig::default();
    let a = decompose(&flow, Some(&rain), VOLUME_FACTOR, &config).unwrap();
    let b = decompose(&flow, Some(&rain), VOLUME_FACTOR, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn events_keep_time_order() {
    let storms = [3 * 24 + 6, 7 * 24 + 6, 11 * 24 + 6, 15 * 24 + 6];
    let (flow, rain, _) = catchment(21, &storms);
    let result = decompose(&flow, Some(&rain), VOLUME_FACTOR, &DecompositionConfig::default())
        .unwrap();
    let starts: Vec<usize> = result
        .wet_weather()
        .events()
        .iter()
        .map(|e| e.event().start_index())
        .collect();
    assert_eq!(starts, storms.to_vec());
}

#[test]
fn failed_fits_do_not_abort_the_run() {
    let (flow, rain, _) = catchment(21, &[8 * 24 + 6, 14 * 24 + 6]);
    let config = DecompositionConfig::new().with_rtk(RtkConfig::new().with_max_iters(2));
    let result = decompose(&flow, Some(&rain), VOLUME_FACTOR, &config).unwrap();

    let events = result.wet_weather().events();
    assert_eq!(events.len(), 2);
    for ev in events {
        assert!(matches!(ev.outcome(), FitOutcome::LowConfidence { .. }));
        assert!(ev.outcome().fit().is_some());
    }
    assert_eq!(result.metrics().n_low_confidence, 2);
    assert_eq!(result.warnings().len(), 2);
    assert!(result.max_partition_error() < 1e-9);
}

#[test]
fn quality_floor_flags_low_confidence() {
    let (flow, rain, _) = catchment(14, &[6 * 24 + 6]);
    let config = DecompositionConfig::new().with_min_fit_nse(1.0);
    let result = decompose(&flow, Some(&rain), VOLUME_FACTOR, &config).unwrap();
    match result.wet_weather().events()[0].outcome() {
        FitOutcome::LowConfidence { reason, .. } => assert!(reason.contains("R^2"), "{reason}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn too_few_dry_days_is_fatal() {
    let storms: Vec<usize> = (0..4).map(|d| d * 24 + 12).collect();
    let (flow, rain, _) = catchment(4, &storms);
    let err = decompose(&flow, Some(&rain), VOLUME_FACTOR, &DecompositionConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        DecomposeError::DryWeather(DwfError::InsufficientDryData {
            found: 0,
            required: 3
        })
    ));
}

#[test]
fn gap_in_flow_is_rejected_by_default() {
    let mut ts = timestamps(24 * 5);
    ts.remove(30);
    let values = vec![5.0; ts.len()];
    let flow = FlowSeries::new(ts, values).unwrap();
    let err = decompose(&flow, None, VOLUME_FACTOR, &DecompositionConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        DecomposeError::Grid(GridError::IrregularGrid { index: 30, .. })
    ));
}

#[test]
fn gap_in_flow_is_filled_when_resampling() {
    let mut ts = timestamps(24 * 5);
    let mut values: Vec<f64> = (0..ts.len()).map(dry_weather).collect();
    ts.remove(30);
    values.remove(30);
    let flow = FlowSeries::new(ts, values).unwrap();
    let config = DecompositionConfig::new()
        .with_grid(GridConfig::new().with_policy(IrregularPolicy::Resample));
    let result = decompose(&flow, None, VOLUME_FACTOR, &config).unwrap();

    assert!(result.resampled());
    assert_eq!(result.timestamps().len(), 24 * 5);
    assert!(!result.warnings().is_empty());
    assert!(result.max_partition_error() < 1e-9);
}

#[test]
fn long_gap_days_are_not_dry_days() {
    // Days 5 to 7 missing entirely.
    let n = 24 * 14;
    let (ts, values): (Vec<NaiveDateTime>, Vec<f64>) = (0..n)
        .filter(|i| !(24 * 5..24 * 8).contains(i))
        .map(|i| (t(i), dry_weather(i)))
        .unzip();
    let flow = FlowSeries::new(ts, values).unwrap();
    let config = DecompositionConfig::new()
        .with_grid(GridConfig::new().with_policy(IrregularPolicy::Resample));
    let result = decompose(&flow, None, VOLUME_FACTOR, &config).unwrap();

    assert_eq!(result.timestamps().len(), n);
    assert_eq!(result.metrics().n_dry_days, 11);
    let incomplete: Vec<usize> = result
        .dry_weather()
        .days()
        .iter()
        .enumerate()
        .filter(|(_, d)| d.class() == DayClass::Incomplete)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(incomplete, [5, 6, 7]);

    let pattern = result.dry_weather().pattern_for(DayGroup::All).unwrap();
    for (slot, v) in pattern.pattern().values().iter().enumerate() {
        let truth = 1.0 - (2.0 * PI * slot as f64 / 24.0).cos();
        assert!((v - truth).abs() < 0.05, "slot {slot}: {v} vs {truth}");
    }

    assert!(
        result
            .warnings()
            .iter()
            .any(|w| w.contains("flow gap of 72 samples from 2024-01-06 00:00:00")),
        "{:?}",
        result.warnings()
    );
    assert!(result.max_partition_error() < 1e-9);
}

#[test]
fn bad_volume_factor_is_invalid_configuration() {
    let (flow, _, _) = catchment(4, &[]);
    let err = decompose(&flow, None, 0.0, &DecompositionConfig::default()).unwrap_err();
    assert!(matches!(err, DecomposeError::InvalidConfiguration(_)));
}

#[test]
fn result_serialises_with_tagged_outcomes() {
    let (flow, rain, _) = catchment(14, &[6 * 24 + 6]);
    let result = decompose(&flow, Some(&rain), VOLUME_FACTOR, &DecompositionConfig::default())
        .unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["gwi"].as_array().unwrap().len(), 14 * 24);
    assert_eq!(value["wet_weather"]["kind"], "events");
    assert_eq!(
        value["wet_weather"]["events"][0]["outcome"]["status"],
        "converged"
    );
    assert!(value["dry_weather"]["patterns"].is_array());
}
