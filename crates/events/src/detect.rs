//! Rain clustering and response-window search.

use sewerflow_grid::TimeGrid;
use tracing::{debug, info};

use crate::config::EventConfig;
use crate::error::EventError;
use crate::event::StormEvent;

/// Wet samples separated by less than the gap.
#[derive(Debug, Clone, Copy)]
struct Cluster {
    first: usize,
    last: usize,
    depth: f64,
    peak: f64,
}

/// Detects storm events in `rain` (depth per grid bin).
///
/// Wet samples (depth above `zero_rain`) are grouped into clusters; a dry
/// run of at least `gap_hours` starts a new cluster. Clusters whose peak
/// one-hour depth does not exceed `min_intensity` are dropped. Each
/// remaining cluster gets a response window that ends once `residual`
/// (flow minus dry-weather flow) has stayed at or below
/// `response_fraction` of its window peak for `gap_hours`, or `gap_hours`
/// after the rain when no residual is given. Windows are capped at
/// `max_duration_hours` from the event start but never end before the
/// rain does. Overlapping windows are merged.
///
/// Returns an empty vector when no sample is wet.
///
/// # Errors
///
/// Returns [`EventError::InvalidConfig`] if `config` fails validation, or
/// [`EventError::LengthMismatch`] if `rain` or `residual` differ from the
/// grid length.
#[tracing::instrument(skip_all, fields(n = rain.len(), has_residual = residual.is_some()))]
pub fn detect_events(
    rain: &[f64],
    residual: Option<&[f64]>,
    grid: &TimeGrid,
    config: &EventConfig,
) -> Result<Vec<StormEvent>, EventError> {
    config.validate()?;
    check_len("rain", rain.len(), grid.len())?;
    if let Some(residual) = residual {
        check_len("residual", residual.len(), grid.len())?;
    }

    let gap = grid.samples_for_hours(config.gap_hours()).max(1);
    let hour = grid.samples_for_hours(1.0).max(1);
    let max_len = grid.samples_for_hours(config.max_duration_hours()).max(1);

    let clusters: Vec<Cluster> = cluster_rain(rain, config.zero_rain(), gap)
        .into_iter()
        .map(|(first, last)| Cluster {
            first,
            last,
            depth: rain[first..=last].iter().sum(),
            peak: peak_hourly_depth(&rain[first..=last], hour, grid.step_hours()),
        })
        .filter(|c| {
            let keep = c.peak > config.min_intensity();
            if !keep {
                debug!(first = c.first, peak = c.peak, "cluster below intensity threshold");
            }
            keep
        })
        .collect();

    let window = |first: usize, last: usize| {
        let cap = (first + max_len).min(grid.len() - 1).max(last);
        response_end(first, last, cap, gap, residual, config.response_fraction())
    };

    let mut events: Vec<StormEvent> = Vec::with_capacity(clusters.len());
    let mut current: Option<(Cluster, usize)> = None;
    for c in clusters {
        current = match current {
            None => Some((c, window(c.first, c.last))),
            Some((mut open, end)) if c.first <= end => {
                open.last = c.last;
                open.depth += c.depth;
                open.peak = open.peak.max(c.peak);
                debug!(first = open.first, last = open.last, "merged overlapping events");
                Some((open, window(open.first, open.last)))
            }
            Some((open, end)) => {
                events.push(build_event(grid, open, end));
                Some((c, window(c.first, c.last)))
            }
        };
    }
    if let Some((open, end)) = current {
        events.push(build_event(grid, open, end));
    }

    info!(n_events = events.len(), "storm events detected");
    Ok(events)
}

fn check_len(input: &'static str, got: usize, expected: usize) -> Result<(), EventError> {
    if got != expected {
        return Err(EventError::LengthMismatch {
            input,
            expected,
            got,
        });
    }
    Ok(())
}

fn build_event(grid: &TimeGrid, c: Cluster, end: usize) -> StormEvent {
    StormEvent::new(
        grid.timestamp(c.first),
        grid.timestamp(c.last),
        grid.timestamp(end),
        c.first,
        c.last,
        end,
        c.depth,
        c.peak,
    )
}

/// `(first, last)` wet indices of each cluster. A dry run of `gap` or more
/// samples separates clusters.
fn cluster_rain(rain: &[f64], zero_rain: f64, gap: usize) -> Vec<(usize, usize)> {
    let mut clusters = Vec::new();
    let mut open: Option<(usize, usize)> = None;
    for (i, _) in rain.iter().enumerate().filter(|(_, r)| **r > zero_rain) {
        open = match open {
            Some((first, last)) if i - last - 1 < gap => Some((first, i)),
            Some(done) => {
                clusters.push(done);
                Some((i, i))
            }
            None => Some((i, i)),
        };
    }
    clusters.extend(open);
    clusters
}

/// Largest depth over `window` consecutive samples, per hour.
fn peak_hourly_depth(rain: &[f64], window: usize, step_hours: f64) -> f64 {
    let w = window.min(rain.len());
    let peak = rain
        .windows(w)
        .map(|s| s.iter().sum::<f64>())
        .fold(0.0, f64::max);
    peak / (window as f64 * step_hours)
}

/// Index at which the response window closes.
///
/// Scans forward from the last wet sample for `gap` consecutive samples at
/// or below `fraction` of the residual peak in `[first, cap]`.
fn response_end(
    first: usize,
    last: usize,
    cap: usize,
    gap: usize,
    residual: Option<&[f64]>,
    fraction: f64,
) -> usize {
    let fallback = (last + gap).min(cap);
    let Some(residual) = residual else {
        return fallback;
    };
    let peak = residual[first..=cap]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    if peak <= 0.0 {
        return fallback;
    }
    let baseline = fraction * peak;
    let mut quiet = 0;
    for (j, &r) in residual.iter().enumerate().take(cap + 1).skip(last + 1) {
        quiet = if r <= baseline { quiet + 1 } else { 0 };
        if quiet == gap {
            return j;
        }
    }
    cap
}
