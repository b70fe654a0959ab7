//! Round-trip integration tests for sewerflow-rtk.

use std::time::Duration;

use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use sewerflow_rtk::{NonConvergence, RtkConfig, RtkError, RtkParams, fit_event, simulate};

const STEP: f64 = 0.25;
const VOLUME_FACTOR: f64 = 10.0;

/// Triangular rain pulse over 1.25 hours on a 48-hour, 15-minute window.
fn triangular_pulse() -> Vec<f64> {
    let mut rain = vec![0.0; 192];
    rain[4..9].copy_from_slice(&[0.5, 1.0, 1.5, 1.0, 0.5]);
    rain
}

fn assert_within(actual: f64, expected: f64, rel: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= rel * expected.abs(),
        "{what}: expected {expected} within {:.0}%, got {actual}",
        rel * 100.0
    );
}

#[test]
fn single_triangle_round_trip() {
    let rain = triangular_pulse();
    let truth = [RtkParams::new(0.3, 2.0, 3.0)];
    let observed = simulate(&rain, &truth, STEP, VOLUME_FACTOR);

    let fit = fit_event(&rain, &observed, STEP, VOLUME_FACTOR, &RtkConfig::default()).unwrap();
    assert_eq!(fit.components().len(), 1);
    let p = fit.components()[0];
    assert_within(p.r(), 0.3, 0.10, "R");
    assert_within(p.t_hours(), 2.0, 0.10, "T");
    assert_within(p.k(), 3.0, 0.10, "K");
    assert!(fit.nse() > 0.9, "nse = {}", fit.nse());
    assert!(fit.converged());
    assert_eq!(fit.simulated().len(), observed.len());
}

#[test]
fn noisy_round_trip() {
    let rain = triangular_pulse();
    let clean = simulate(&rain, &[RtkParams::new(0.3, 2.0, 3.0)], STEP, VOLUME_FACTOR);
    let peak = clean.iter().copied().fold(0.0, f64::max);
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let noise = Normal::new(0.0, 0.02 * peak).unwrap();
    let observed: Vec<f64> = clean.iter().map(|q| q + noise.sample(&mut rng)).collect();

    let fit = fit_event(&rain, &observed, STEP, VOLUME_FACTOR, &RtkConfig::default()).unwrap();
    assert!(fit.nse() > 0.9, "nse = {}", fit.nse());
    assert_within(fit.total_r(), 0.3, 0.10, "total R");
    // Noise alone never buys a second triangle.
    assert_eq!(fit.components().len(), 1);
}

#[test]
fn second_triangle_added_for_slow_response() {
    let rain = triangular_pulse();
    let truth = [RtkParams::new(0.2, 1.0, 2.0), RtkParams::new(0.15, 8.0, 4.0)];
    let observed = simulate(&rain, &truth, STEP, VOLUME_FACTOR);

    let one = fit_event(
        &rain,
        &observed,
        STEP,
        VOLUME_FACTOR,
        &RtkConfig::new().with_max_components(1).with_max_iters(10_000),
    )
    .unwrap();
    assert_eq!(one.components().len(), 1);

    let many = fit_event(
        &rain,
        &observed,
        STEP,
        VOLUME_FACTOR,
        &RtkConfig::new().with_max_iters(10_000),
    )
    .unwrap();
    assert!(many.components().len() >= 2);
    assert!(many.nse() > 0.99, "nse = {}", many.nse());
    assert!(many.rss() < one.rss());
    let ts: Vec<f64> = many.components().iter().map(|p| p.t_hours()).collect();
    assert!(ts.windows(2).all(|w| w[0] <= w[1]), "not sorted: {ts:?}");
}

#[test]
fn improvement_threshold_decides_extra_triangle() {
    let rain = triangular_pulse();
    let truth = [RtkParams::new(0.2, 1.0, 2.0), RtkParams::new(0.15, 8.0, 4.0)];
    let observed = simulate(&rain, &truth, STEP, VOLUME_FACTOR);
    let base = RtkConfig::new().with_max_iters(10_000);
    let fit = |config: &RtkConfig| {
        fit_event(&rain, &observed, STEP, VOLUME_FACTOR, config).unwrap()
    };

    let one = fit(&base.clone().with_max_components(1));
    let two = fit(&base.clone().with_max_components(2));
    assert_eq!(two.components().len(), 2);
    let gain = (one.rss() - two.rss()) / one.rss();
    assert!(gain > 0.0 && gain < 1.0, "gain = {gain}");

    // Same runs, so only the threshold differs between these two.
    let strict = fit(
        &base
            .clone()
            .with_max_components(2)
            .with_improvement_threshold(gain + (1.0 - gain) / 2.0),
    );
    assert_eq!(strict.components().len(), 1);
    assert_eq!(strict.rss(), one.rss());

    let lenient = fit(
        &base
            .clone()
            .with_max_components(2)
            .with_improvement_threshold(gain / 2.0),
    );
    assert_eq!(lenient.components().len(), 2);
    assert_eq!(lenient.rss(), two.rss());
}

#[test]
fn iteration_cap_gives_best_effort() {
    let rain = triangular_pulse();
    let observed = simulate(&rain, &[RtkParams::new(0.3, 2.0, 3.0)], STEP, VOLUME_FACTOR);
    let config = RtkConfig::new().with_max_iters(2).with_max_components(1);

    match fit_event(&rain, &observed, STEP, VOLUME_FACTOR, &config) {
        Err(RtkError::FitNotConverged { reason, best }) => {
            assert_eq!(reason, NonConvergence::MaxIterations);
            assert_eq!(best.components().len(), 1);
            assert!(!best.converged());
        }
        other => panic!("expected FitNotConverged, got {other:?}"),
    }
}

#[test]
fn timeout_gives_best_effort() {
    let rain = triangular_pulse();
    let observed = simulate(&rain, &[RtkParams::new(0.3, 2.0, 3.0)], STEP, VOLUME_FACTOR);
    let config = RtkConfig::new().with_timeout(Duration::from_nanos(1));

    match fit_event(&rain, &observed, STEP, VOLUME_FACTOR, &config) {
        Err(RtkError::FitNotConverged { reason, best }) => {
            assert_eq!(reason, NonConvergence::Timeout);
            assert_eq!(best.non_convergence(), Some(NonConvergence::Timeout));
        }
        other => panic!("expected FitNotConverged, got {other:?}"),
    }
}
