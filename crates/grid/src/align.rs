//! Alignment of rain and rate series onto a [`TimeGrid`].

use sewerflow_stats::lerp;

use crate::grid::{TimeGrid, dominant_interval};
use crate::series::{FlowSeries, RainSeries};

/// Redistributes rainfall depths onto the grid.
///
/// Each rain sample covers the interval from its timestamp to the next
/// sample, but never longer than the rain series' own dominant interval (so
/// a logging gap does not smear a burst across hours). Its depth is spread
/// evenly over that interval and accumulated into the grid bins it
/// overlaps, each bin spanning `[t_i, t_i + step)`. Depth falling outside
/// the grid span is dropped; depth inside it is conserved.
pub fn align_depth(rain: &RainSeries, grid: &TimeGrid) -> Vec<f64> {
    let step = grid.step_secs();
    let span_end = grid.len() as i64 * step;
    let own_step = match dominant_interval(rain.timestamps()) {
        0 => step,
        s => s,
    };

    let ts = rain.timestamps();
    let mut out = vec![0.0; grid.len()];
    for (i, (&t, &depth)) in ts.iter().zip(rain.depths()).enumerate() {
        if depth == 0.0 {
            continue;
        }
        let a = grid.offset_secs(t);
        let width = match ts.get(i + 1) {
            Some(&next) => (next - t).num_seconds().min(own_step),
            None => own_step,
        };
        let b = a + width;
        if b <= 0 || a >= span_end {
            continue;
        }

        let first = a.max(0) / step;
        let last = ((b.min(span_end) - 1) / step).min(grid.len() as i64 - 1);
        for j in first..=last {
            let bin_start = j * step;
            let overlap = b.min(bin_start + step) - a.max(bin_start);
            if overlap > 0 {
                out[j as usize] += depth * overlap as f64 / width as f64;
            }
        }
    }
    out
}

/// Linearly interpolates a rate series at every grid timestamp.
///
/// Grid points before the first or after the last sample take the nearest
/// edge value.
pub fn align_rate(series: &FlowSeries, grid: &TimeGrid) -> Vec<f64> {
    let ts = series.timestamps();
    let values = series.values();
    let mut out = Vec::with_capacity(grid.len());
    let mut k = 0;

    for i in 0..grid.len() {
        let t = grid.timestamp(i);
        if t <= ts[0] {
            out.push(values[0]);
            continue;
        }
        if t >= ts[ts.len() - 1] {
            out.push(values[values.len() - 1]);
            continue;
        }
        while ts[k + 1] < t {
            k += 1;
        }
        let x0 = grid.offset_secs(ts[k]) as f64;
        let x1 = grid.offset_secs(ts[k + 1]) as f64;
        let x = grid.offset_secs(t) as f64;
        out.push(lerp(x0, values[k], x1, values[k + 1], x));
    }
    out
}
