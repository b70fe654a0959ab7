//! Component-count selection and the public event fit entry point.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::RtkConfig;
use crate::error::RtkError;
use crate::fit::{EventFit, NonConvergence};
use crate::optimizer::{Problem, Run};
use crate::params::{Bounds, RtkParams};

/// Fewest samples a window needs for a fit.
const MIN_SAMPLES: usize = 3;

/// RSS at or below this fraction of the SST needs no further triangles.
const NEGLIGIBLE_RSS: f64 = 1e-6;

/// Initial recession ratio.
const K_GUESS: f64 = 2.0;

/// Fits RTK triangles to one event's response.
///
/// `rain` is the depth per step over the window and `observed` the
/// wet-weather response (flow minus dry-weather flow) on the same steps.
/// One triangle is fitted first; another is added while it lowers the RSS
/// by more than `improvement_threshold` of the current RSS, up to
/// `max_components`. All runs share the configured timeout.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`RtkError::InvalidConfig`] | bad `config`, step or volume factor |
/// | [`RtkError::LengthMismatch`] | `rain` and `observed` differ in length |
/// | [`RtkError::InsufficientData`] | fewer than 3 samples |
/// | [`RtkError::NonFiniteData`] | NaN or infinity in either input |
/// | [`RtkError::NoRainfall`] | no positive rain in the window |
/// | [`RtkError::FitNotConverged`] | iteration cap or timeout; carries the best fit |
///
/// # Example
///
/// ```ignore
/// let fit = fit_event(&rain, &residual, 0.25, 12.5, &RtkConfig::default())?;
/// for p in fit.components() {
///     println!("R={:.3} T={:.2}h K={:.2}", p.r(), p.t_hours(), p.k());
/// }
/// ```
#[tracing::instrument(skip_all, fields(n = observed.len()))]
pub fn fit_event(
    rain: &[f64],
    observed: &[f64],
    step_hours: f64,
    volume_factor: f64,
    config: &RtkConfig,
) -> Result<EventFit, RtkError> {
    config.validate()?;
    if !(step_hours > 0.0 && step_hours.is_finite()) {
        return Err(RtkError::InvalidConfig {
            reason: format!("step must be > 0 hours, got {step_hours}"),
        });
    }
    if !(volume_factor > 0.0 && volume_factor.is_finite()) {
        return Err(RtkError::InvalidConfig {
            reason: format!("volume factor must be > 0, got {volume_factor}"),
        });
    }
    if rain.len() != observed.len() {
        return Err(RtkError::LengthMismatch {
            rain: rain.len(),
            observed: observed.len(),
        });
    }
    if observed.len() < MIN_SAMPLES {
        return Err(RtkError::InsufficientData {
            n: observed.len(),
            min: MIN_SAMPLES,
        });
    }
    if rain.iter().chain(observed).any(|v| !v.is_finite()) {
        return Err(RtkError::NonFiniteData);
    }
    if !rain.iter().any(|&r| r > 0.0) {
        return Err(RtkError::NoRainfall);
    }

    let deadline = Instant::now() + config.timeout();
    let bounds = Bounds::for_window(observed.len() as f64 * step_hours);
    let problem = Problem::new(rain, observed, step_hours, volume_factor, bounds);

    let guess = initial_guess(rain, observed, step_hours, volume_factor, &bounds);
    let mut best = problem.run(&[guess], config, remaining(deadline))?;
    let mut iterations = best.iterations;
    let mut timed_out = best.non_convergence == Some(NonConvergence::Timeout);
    debug!(components = 1, rss = best.rss, "initial model fitted");

    while best.params.len() < config.max_components() {
        if timed_out || best.rss <= NEGLIGIBLE_RSS * problem.sst() {
            break;
        }
        let candidate = extend(&problem, &best, config, deadline)?;
        iterations += candidate.iterations;
        timed_out = candidate.non_convergence == Some(NonConvergence::Timeout);

        let improvement = (best.rss - candidate.rss) / best.rss;
        debug!(
            components = candidate.params.len(),
            rss = candidate.rss,
            improvement,
            "candidate model fitted"
        );
        if improvement > config.improvement_threshold() {
            best = candidate;
        } else {
            break;
        }
    }

    let mut components = best.params;
    components.sort_by(|a, b| a.t_hours().total_cmp(&b.t_hours()));
    let simulated = problem.simulate(&components);
    let nse = sewerflow_stats::nse(observed, &simulated);
    let non_convergence = if timed_out {
        Some(NonConvergence::Timeout)
    } else {
        best.non_convergence
    };
    let fit = EventFit::new(
        components,
        best.rss,
        nse,
        iterations,
        non_convergence,
        simulated,
    );

    match non_convergence {
        Some(reason) => {
            warn!(%reason, nse, "RTK fit did not converge");
            Err(RtkError::FitNotConverged {
                reason,
                best: Box::new(fit),
            })
        }
        None => {
            debug!(components = fit.components().len(), nse, iterations, "RTK fit converged");
            Ok(fit)
        }
    }
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

/// Refits with one more, slower triangle appended to `current`.
fn extend(
    problem: &Problem<'_>,
    current: &Run,
    config: &RtkConfig,
    deadline: Instant,
) -> Result<Run, RtkError> {
    let mut init = current.params.clone();
    let slowest = init
        .iter()
        .copied()
        .max_by(|a, b| a.t_hours().total_cmp(&b.t_hours()))
        .unwrap_or(RtkParams::new(0.1, 1.0, K_GUESS));
    init.push(problem.bounds().clamp(RtkParams::new(
        (slowest.r() * 0.25).max(0.01),
        slowest.t_hours() * 3.0,
        slowest.k(),
    )));
    problem.run(&init, config, remaining(deadline))
}

/// First triangle: time to peak from the lag between the first rain and the
/// response peak, R from the volume ratio.
fn initial_guess(
    rain: &[f64],
    observed: &[f64],
    step_hours: f64,
    volume_factor: f64,
    bounds: &Bounds,
) -> RtkParams {
    let start = rain.iter().position(|&r| r > 0.0).unwrap_or(0);
    let peak = observed
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map_or(start, |(i, _)| i);
    let t0 = (peak.saturating_sub(start) as f64 * step_hours).max(step_hours);

    let depth: f64 = rain.iter().sum();
    let volume: f64 = observed.iter().map(|q| q.max(0.0)).sum::<f64>() * step_hours;
    let r0 = (volume / (volume_factor * depth)).max(0.01);

    bounds.clamp(RtkParams::new(r0, t0, K_GUESS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit_hydrograph::simulate;
    use approx::assert_relative_eq;

    #[test]
    fn initial_guess_from_volume_and_lag() {
        let mut rain = vec![0.0; 48];
        rain[4] = 2.0;
        let observed = simulate(&rain, &[RtkParams::new(0.4, 3.0, 2.0)], 1.0, 5.0);
        let g = initial_guess(&rain, &observed, 1.0, 5.0, &Bounds::for_window(48.0));
        assert_relative_eq!(g.r(), 0.4, max_relative = 1e-6);
        assert!((2.0..=4.0).contains(&g.t_hours()), "t0 = {}", g.t_hours());
        assert_relative_eq!(g.k(), K_GUESS);
    }

    #[test]
    fn no_rain_rejected() {
        let err = fit_event(&[0.0; 10], &[1.0; 10], 1.0, 1.0, &RtkConfig::default()).unwrap_err();
        assert!(matches!(err, RtkError::NoRainfall));
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let err = fit_event(&[1.0; 10], &[1.0; 9], 1.0, 1.0, &RtkConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            RtkError::LengthMismatch {
                rain: 10,
                observed: 9
            }
        ));
    }

    #[test]
    fn too_short_rejected() {
        let err = fit_event(&[1.0; 2], &[1.0; 2], 1.0, 1.0, &RtkConfig::default()).unwrap_err();
        assert!(matches!(err, RtkError::InsufficientData { n: 2, min: 3 }));
    }

    #[test]
    fn non_finite_rejected() {
        let err = fit_event(
            &[1.0, 0.0, 0.0],
            &[0.0, f64::NAN, 0.0],
            1.0,
            1.0,
            &RtkConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RtkError::NonFiniteData));
    }

    #[test]
    fn bad_volume_factor_rejected() {
        let err = fit_event(&[1.0; 4], &[1.0; 4], 1.0, 0.0, &RtkConfig::default()).unwrap_err();
        assert!(err.to_string().contains("volume factor"));
    }
}
