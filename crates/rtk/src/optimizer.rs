//! Nelder-Mead least-squares runs for a fixed number of triangles.
//!
//! Wraps the `argmin` crate to minimise the residual sum of squares over
//! logistic-mapped RTK parameters.
//!
//! **Not part of the public API.**

use std::time::Duration;

use argmin::core::{CostFunction, Executor, State, TerminationReason};
use argmin::solver::neldermead::NelderMead;
use sewerflow_stats::{sum_squared_error, total_sum_squares};

use crate::config::RtkConfig;
use crate::error::RtkError;
use crate::fit::NonConvergence;
use crate::params::{self, Bounds, RtkParams};
use crate::unit_hydrograph::simulate;

/// Step of the initial simplex in unconstrained space.
const SIMPLEX_STEP: f64 = 0.5;

/// One event's data and search box.
pub(crate) struct Problem<'a> {
    rain: &'a [f64],
    observed: &'a [f64],
    step_hours: f64,
    volume_factor: f64,
    bounds: Bounds,
    sst: f64,
}

/// Result of one optimizer run.
#[derive(Debug, Clone)]
pub(crate) struct Run {
    pub(crate) params: Vec<RtkParams>,
    pub(crate) rss: f64,
    pub(crate) iterations: u64,
    pub(crate) non_convergence: Option<NonConvergence>,
}

impl<'a> Problem<'a> {
    pub(crate) fn new(
        rain: &'a [f64],
        observed: &'a [f64],
        step_hours: f64,
        volume_factor: f64,
        bounds: Bounds,
    ) -> Self {
        Self {
            rain,
            observed,
            step_hours,
            volume_factor,
            bounds,
            sst: total_sum_squares(observed),
        }
    }

    pub(crate) fn sst(&self) -> f64 {
        self.sst
    }

    pub(crate) fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub(crate) fn simulate(&self, params: &[RtkParams]) -> Vec<f64> {
        simulate(self.rain, params, self.step_hours, self.volume_factor)
    }

    pub(crate) fn rss(&self, params: &[RtkParams]) -> f64 {
        sum_squared_error(self.observed, &self.simulate(params))
    }

    /// Minimises the RSS starting from `initial`, giving up after `budget`.
    ///
    /// A zero budget returns the initial guess flagged as timed out.
    pub(crate) fn run(
        &self,
        initial: &[RtkParams],
        config: &RtkConfig,
        budget: Duration,
    ) -> Result<Run, RtkError> {
        if budget.is_zero() {
            return Ok(Run {
                params: initial.to_vec(),
                rss: self.rss(initial),
                iterations: 0,
                non_convergence: Some(NonConvergence::Timeout),
            });
        }

        let x0 = params::encode(initial, &self.bounds);
        let dim = x0.len();
        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
        simplex.push(x0.clone());
        for i in 0..dim {
            let mut vertex = x0.clone();
            vertex[i] += SIMPLEX_STEP;
            simplex.push(vertex);
        }

        let cost = RtkCost {
            problem: self,
            scale: self.sst.max(f64::EPSILON),
        };
        let solver = NelderMead::new(simplex)
            .with_sd_tolerance(config.sd_tolerance())
            .map_err(|e| RtkError::OptimizationFailed {
                reason: e.to_string(),
            })?;
        let result = Executor::new(cost, solver)
            .configure(|state| state.max_iters(config.max_iters()))
            .timeout(budget)
            .run()
            .map_err(|e| RtkError::OptimizationFailed {
                reason: e.to_string(),
            })?;

        let state = result.state();
        let best = state
            .best_param
            .as_ref()
            .ok_or_else(|| RtkError::OptimizationFailed {
                reason: "solver returned no parameters".to_string(),
            })?;
        let params = params::decode(best, &self.bounds);
        let non_convergence = match state.get_termination_reason() {
            Some(TerminationReason::MaxItersReached) => Some(NonConvergence::MaxIterations),
            Some(TerminationReason::Timeout) => Some(NonConvergence::Timeout),
            _ => None,
        };

        Ok(Run {
            rss: self.rss(&params),
            params,
            iterations: state.get_iter(),
            non_convergence,
        })
    }
}

/// Cost function for argmin: RSS over the event, scaled by SST.
struct RtkCost<'p, 'a> {
    problem: &'p Problem<'a>,
    scale: f64,
}

impl CostFunction for RtkCost<'_, '_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let params = params::decode(x, &self.problem.bounds);
        let rss = self.problem.rss(&params) / self.scale;
        Ok(if rss.is_finite() { rss } else { f64::MAX })
    }
}
