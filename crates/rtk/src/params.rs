//! RTK parameters and the bounded-to-unconstrained mapping used by the
//! optimizer.
//!
//! Each bounded value `v ∈ (lo, hi)` is searched as `x = logit((v - lo) / (hi - lo))`
//! so Nelder-Mead can move freely while every decoded triangle stays valid.

/// One triangular unit hydrograph.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RtkParams {
    r: f64,
    t_hours: f64,
    k: f64,
}

impl RtkParams {
    /// Creates a parameter set. Values are not range-checked.
    pub fn new(r: f64, t_hours: f64, k: f64) -> Self {
        Self { r, t_hours, k }
    }

    /// Fraction of rain volume that enters the sewer.
    pub fn r(&self) -> f64 {
        self.r
    }

    /// Time to peak in hours.
    pub fn t_hours(&self) -> f64 {
        self.t_hours
    }

    /// Ratio of recession time to time to peak.
    pub fn k(&self) -> f64 {
        self.k
    }

    /// Base length of the triangle, `T * (1 + K)` hours.
    pub fn base_hours(&self) -> f64 {
        self.t_hours * (1.0 + self.k)
    }
}

/// Search box for one triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) r: (f64, f64),
    pub(crate) t: (f64, f64),
    pub(crate) k: (f64, f64),
}

pub(crate) const R_MIN: f64 = 1e-6;
pub(crate) const R_MAX: f64 = 2.0;
pub(crate) const T_MIN_HOURS: f64 = 1e-3;
pub(crate) const K_MIN: f64 = 1.0;
pub(crate) const K_MAX: f64 = 10.0;

impl Bounds {
    /// Bounds for a window spanning `window_hours`.
    pub(crate) fn for_window(window_hours: f64) -> Self {
        Self {
            r: (R_MIN, R_MAX),
            t: (T_MIN_HOURS, window_hours.max(2.0 * T_MIN_HOURS)),
            k: (K_MIN, K_MAX),
        }
    }

    /// Pulls a guess strictly inside the box.
    pub(crate) fn clamp(&self, p: RtkParams) -> RtkParams {
        RtkParams::new(
            inside(p.r, self.r),
            inside(p.t_hours, self.t),
            inside(p.k, self.k),
        )
    }
}

fn inside(v: f64, (lo, hi): (f64, f64)) -> f64 {
    let margin = (hi - lo) * 1e-6;
    v.clamp(lo + margin, hi - margin)
}

fn to_unconstrained(v: f64, (lo, hi): (f64, f64)) -> f64 {
    let p = ((v - lo) / (hi - lo)).clamp(1e-12, 1.0 - 1e-12);
    (p / (1.0 - p)).ln()
}

fn from_unconstrained(x: f64, (lo, hi): (f64, f64)) -> f64 {
    lo + (hi - lo) / (1.0 + (-x).exp())
}

/// Flattens triangles into the optimizer's unconstrained vector.
pub(crate) fn encode(params: &[RtkParams], bounds: &Bounds) -> Vec<f64> {
    params
        .iter()
        .flat_map(|p| {
            [
                to_unconstrained(p.r, bounds.r),
                to_unconstrained(p.t_hours, bounds.t),
                to_unconstrained(p.k, bounds.k),
            ]
        })
        .collect()
}

/// Maps an unconstrained vector (length a multiple of 3) back to triangles.
pub(crate) fn decode(x: &[f64], bounds: &Bounds) -> Vec<RtkParams> {
    x.chunks_exact(3)
        .map(|c| {
            RtkParams::new(
                from_unconstrained(c[0], bounds.r),
                from_unconstrained(c[1], bounds.t),
                from_unconstrained(c[2], bounds.k),
            )
        })
        .collect()
}
