//! Statistical helper functions for the sewerflow decomposition crates.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sum of squared differences between `observed` and `simulated`.
///
/// Pairs beyond the shorter slice are ignored.
pub fn sum_squared_error(observed: &[f64], simulated: &[f64]) -> f64 {
    observed
        .iter()
        .zip(simulated)
        .map(|(o, s)| (o - s) * (o - s))
        .sum()
}

/// Total sum of squares of `observed` about its mean.
pub fn total_sum_squares(observed: &[f64]) -> f64 {
    let m = mean(observed);
    observed.iter().map(|o| (o - m) * (o - m)).sum()
}

/// Coefficient of determination in Nash-Sutcliffe form: `1 - SSE / SST`.
///
/// Range `(-inf, 1]`, 1 = perfect. When the observations are constant the
/// ratio is undefined: a perfect reproduction scores 1.0, anything else
/// `f64::NEG_INFINITY`.
pub fn nse(observed: &[f64], simulated: &[f64]) -> f64 {
    let sse = sum_squared_error(observed, simulated);
    let sst = total_sum_squares(observed);
    if sst <= f64::EPSILON {
        return if sse <= f64::EPSILON {
            1.0
        } else {
            f64::NEG_INFINITY
        };
    }
    1.0 - sse / sst
}

/// Linear interpolation between `(x0, y0)` and `(x1, y1)` at `x`.
///
/// Returns `y0` when the two abscissae coincide.
pub fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    let dx = x1 - x0;
    if dx.abs() < f64::EPSILON {
        return y0;
    }
    y0 + (x - x0) / dx * (y1 - y0)
}
