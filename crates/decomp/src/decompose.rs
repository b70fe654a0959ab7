//! Decomposition pipeline.

use rayon::prelude::*;
use sewerflow_dwf::estimate_dry_weather;
use sewerflow_events::{StormEvent, detect_events};
use sewerflow_grid::{FlowSeries, RainSeries, TimeGrid, align_depth};
use sewerflow_rtk::{RtkError, fit_event};
use tracing::{info, warn};

use crate::config::DecompositionConfig;
use crate::error::DecomposeError;
use crate::result::{DecompositionResult, EventResult, FitMetrics, FitOutcome, WetWeather};

/// Splits `flow` into GWI, BWWF and WWF and, when `rain` is given, fits
/// RTK unit hydrographs to every storm response.
///
/// `volume_factor` converts one unit of rain depth into flow units times
/// hours for the RTK fits (catchment area and unit conversion).
///
/// Pipeline:
/// 1. Validate the configuration
/// 2. Detect the time grid and put flow (and rain) on it
/// 3. Estimate GWI and BWWF from dry days
/// 4. WWF = flow - GWI - BWWF
/// 5. Detect storm events in the rain, windows in the WWF
/// 6. Fit each event in parallel; failures are recorded, not raised
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`DecomposeError::InvalidConfiguration`] | an option or `volume_factor` is out of range |
/// | [`DecomposeError::Grid`] | the flow timestamps are irregular, too few, or the step does not divide a day |
/// | [`DecomposeError::DryWeather`] | the series is too short or has too few dry days |
#[tracing::instrument(skip_all, fields(n = flow.len(), has_rain = rain.is_some()))]
pub fn decompose(
    flow: &FlowSeries,
    rain: Option<&RainSeries>,
    volume_factor: f64,
    config: &DecompositionConfig,
) -> Result<DecompositionResult, DecomposeError> {
    config.validate()?;
    if !(volume_factor > 0.0 && volume_factor.is_finite()) {
        return Err(DecomposeError::InvalidConfiguration(format!(
            "volume factor must be finite and > 0, got {volume_factor}"
        )));
    }

    let mut warnings = Vec::new();
    let grid = TimeGrid::detect(flow.timestamps(), config.grid())?;
    if grid.is_resampled() {
        let msg = format!(
            "irregular flow timestamps resampled to a {} s grid",
            grid.step_secs()
        );
        warn!("{msg}");
        warnings.push(msg);
    }
    for gap in grid.gaps() {
        let msg = format!(
            "flow gap of {} samples from {} to {} interpolated; days it touches are not used as dry days",
            gap.len(),
            grid.timestamp(gap.start),
            grid.timestamp(gap.end - 1)
        );
        warn!("{msg}");
        warnings.push(msg);
    }
    let flow_on_grid = grid.regularize(flow);
    let rain_on_grid = rain.map(|r| align_depth(r, &grid));

    let dry_weather = estimate_dry_weather(
        &flow_on_grid,
        &grid,
        rain_on_grid.as_deref(),
        config.dry_weather(),
    )?;
    if dry_weather.reconstruction_error() > config.dry_weather().reconstruction_tolerance() {
        warnings.push(format!(
            "dry-day volumes reproduced within {:.1}% only",
            dry_weather.reconstruction_error() * 100.0
        ));
    }

    let gwi = dry_weather.gwi().to_vec();
    let bwwf = dry_weather.bwwf().to_vec();
    let wwf: Vec<f64> = flow_on_grid
        .iter()
        .zip(gwi.iter().zip(&bwwf))
        .map(|(f, (g, b))| f - g - b)
        .collect();

    let wet_weather = match &rain_on_grid {
        None => WetWeather::NoRainfall,
        Some(rain) => {
            let events = detect_events(rain, Some(&wwf), &grid, config.events())?;
            let results: Vec<EventResult> = events
                .par_iter()
                .map(|ev| {
                    let outcome = fit_one(ev, rain, &wwf, &grid, volume_factor, config);
                    EventResult::new(ev.clone(), outcome)
                })
                .collect();
            WetWeather::Events(results)
        }
    };

    let mut rtk_model = vec![0.0; grid.len()];
    for result in wet_weather.events() {
        match result.outcome() {
            FitOutcome::Converged(_) => {}
            FitOutcome::LowConfidence { reason, .. } | FitOutcome::Failed { reason } => {
                warnings.push(format!(
                    "event starting {}: {reason}",
                    result.event().start()
                ));
            }
        }
        if let Some(fit) = result.outcome().fit() {
            let range = result.event().range();
            rtk_model[range].copy_from_slice(fit.simulated());
        }
    }

    let metrics = fit_metrics(&wet_weather, &wwf, &rtk_model, &dry_weather);
    info!(
        n_events = metrics.n_events,
        n_converged = metrics.n_converged,
        n_warnings = warnings.len(),
        "decomposition complete"
    );

    Ok(DecompositionResult {
        timestamps: grid.timestamps(),
        resampled: grid.is_resampled(),
        flow: flow_on_grid,
        gwi,
        bwwf,
        wwf,
        rtk_model,
        wet_weather,
        dry_weather,
        metrics,
        warnings,
    })
}

/// Fits one event. Never fails: problems become the outcome.
fn fit_one(
    event: &StormEvent,
    rain: &[f64],
    wwf: &[f64],
    grid: &TimeGrid,
    volume_factor: f64,
    config: &DecompositionConfig,
) -> FitOutcome {
    let range = event.range();
    match fit_event(
        &rain[range.clone()],
        &wwf[range],
        grid.step_hours(),
        volume_factor,
        config.rtk(),
    ) {
        Ok(fit) if fit.nse() < config.min_fit_nse() => FitOutcome::LowConfidence {
            reason: format!(
                "R^2 {:.3} below {:.3}",
                fit.nse(),
                config.min_fit_nse()
            ),
            fit,
        },
        Ok(fit) => FitOutcome::Converged(fit),
        Err(RtkError::FitNotConverged { reason, best }) => FitOutcome::LowConfidence {
            fit: *best,
            reason: format!("fit did not converge: {reason}"),
        },
        Err(e) => {
            warn!(start = %event.start(), error = %e, "event fit failed");
            FitOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

fn fit_metrics(
    wet_weather: &WetWeather,
    wwf: &[f64],
    rtk_model: &[f64],
    dry_weather: &sewerflow_dwf::DryWeatherEstimate,
) -> FitMetrics {
    let events = wet_weather.events();
    let mut observed = Vec::new();
    let mut modelled = Vec::new();
    for result in events.iter().filter(|r| r.outcome().fit().is_some()) {
        let range = result.event().range();
        observed.extend_from_slice(&wwf[range.clone()]);
        modelled.extend_from_slice(&rtk_model[range]);
    }

    FitMetrics {
        overall_nse: (!observed.is_empty()).then(|| sewerflow_stats::nse(&observed, &modelled)),
        n_events: events.len(),
        n_converged: events.iter().filter(|r| r.outcome().is_converged()).count(),
        n_low_confidence: events
            .iter()
            .filter(|r| matches!(r.outcome(), FitOutcome::LowConfidence { .. }))
            .count(),
        n_failed: events
            .iter()
            .filter(|r| matches!(r.outcome(), FitOutcome::Failed { .. }))
            .count(),
        n_dry_days: dry_weather.n_dry_days(),
        reconstruction_error: dry_weather.reconstruction_error(),
    }
}
