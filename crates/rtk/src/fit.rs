//! Fitted RTK results.

use std::fmt;

use crate::params::RtkParams;

/// Why an optimizer run stopped without converging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NonConvergence {
    /// The iteration cap was hit.
    MaxIterations,
    /// The per-event time budget ran out.
    Timeout,
}

impl fmt::Display for NonConvergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxIterations => f.write_str("maximum iterations reached"),
            Self::Timeout => f.write_str("timeout"),
        }
    }
}

/// RTK triangles fitted to one event window.
///
/// `nse` is the coefficient of determination in Nash-Sutcliffe form:
/// `1 - RSS / SST` of the observed response.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EventFit {
    components: Vec<RtkParams>,
    rss: f64,
    nse: f64,
    iterations: u64,
    non_convergence: Option<NonConvergence>,
    #[serde(skip)]
    simulated: Vec<f64>,
}

impl EventFit {
    pub(crate) fn new(
        components: Vec<RtkParams>,
        rss: f64,
        nse: f64,
        iterations: u64,
        non_convergence: Option<NonConvergence>,
        simulated: Vec<f64>,
    ) -> Self {
        Self {
            components,
            rss,
            nse,
            iterations,
            non_convergence,
            simulated,
        }
    }

    /// Returns the fitted triangles, fastest first.
    pub fn components(&self) -> &[RtkParams] {
        &self.components
    }

    /// Returns the residual sum of squares.
    pub fn rss(&self) -> f64 {
        self.rss
    }

    /// Returns the goodness of fit.
    pub fn nse(&self) -> f64 {
        self.nse
    }

    /// Returns the total optimizer iterations over all component counts tried.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Returns `true` if the optimizer converged for the selected model.
    pub fn converged(&self) -> bool {
        self.non_convergence.is_none()
    }

    /// Returns why the optimizer stopped early, if it did.
    pub fn non_convergence(&self) -> Option<NonConvergence> {
        self.non_convergence
    }

    /// Returns the total response ratio, the sum of R over all triangles.
    pub fn total_r(&self) -> f64 {
        self.components.iter().map(RtkParams::r).sum()
    }

    /// Returns the modelled response over the event window.
    pub fn simulated(&self) -> &[f64] {
        &self.simulated
    }
}
