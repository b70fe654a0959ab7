//! Triangular unit hydrographs and their convolution with rain.

use crate::params::RtkParams;

/// Fraction of the unit-area triangle's volume delivered by `tau` hours.
///
/// The triangle rises linearly to its peak at `t` and falls back to zero at
/// `t * (1 + k)`.
pub fn triangle_cdf(tau: f64, t: f64, k: f64) -> f64 {
    let base = t * (1.0 + k);
    if tau <= 0.0 {
        0.0
    } else if tau < t {
        tau * tau / (t * base)
    } else if tau < base {
        let rem = base - tau;
        1.0 - rem * rem / (base * k * t)
    } else {
        1.0
    }
}

/// Unit hydrograph ordinates per hour for `len` steps of `step_hours`.
///
/// Ordinate `j` is the triangle's mean over `[j*dt, (j+1)*dt)`, so the
/// ordinates times `step_hours` sum to one once the base fits in `len` steps.
pub fn ordinates(t: f64, k: f64, step_hours: f64, len: usize) -> Vec<f64> {
    let mut prev = 0.0;
    (1..=len)
        .map(|j| {
            let next = triangle_cdf(j as f64 * step_hours, t, k);
            let h = (next - prev) / step_hours;
            prev = next;
            h
        })
        .collect()
}

/// Flow response to `rain` (depth per step) of the summed triangles.
///
/// `volume_factor` converts one unit of depth into flow units times hours,
/// so each triangle returns `r * volume_factor * depth` of volume.
pub fn simulate(
    rain: &[f64],
    params: &[RtkParams],
    step_hours: f64,
    volume_factor: f64,
) -> Vec<f64> {
    let n = rain.len();
    let mut kernel = vec![0.0; n];
    for p in params {
        for (kv, h) in kernel
            .iter_mut()
            .zip(ordinates(p.t_hours(), p.k(), step_hours, n))
        {
            *kv += p.r() * h;
        }
    }

    let mut out = vec![0.0; n];
    for (i, &depth) in rain.iter().enumerate() {
        if depth == 0.0 {
            continue;
        }
        let scale = depth * volume_factor;
        for (o, &kv) in out[i..].iter_mut().zip(&kernel) {
            *o += scale * kv;
        }
    }
    out
}
