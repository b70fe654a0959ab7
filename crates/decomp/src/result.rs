//! Decomposition output types.

use chrono::NaiveDateTime;
use sewerflow_dwf::DryWeatherEstimate;
use sewerflow_events::StormEvent;
use sewerflow_rtk::EventFit;

/// What became of one event's RTK fit.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FitOutcome {
    /// The optimizer converged and the fit cleared the quality floor.
    Converged(EventFit),
    /// Best-effort parameters that did not converge or fit poorly.
    LowConfidence {
        /// Best fit found.
        fit: EventFit,
        /// Why the fit is not trusted.
        reason: String,
    },
    /// No parameters could be estimated.
    Failed {
        /// What went wrong.
        reason: String,
    },
}

impl FitOutcome {
    /// Returns the fit, if any parameters were estimated.
    pub fn fit(&self) -> Option<&EventFit> {
        match self {
            Self::Converged(fit) | Self::LowConfidence { fit, .. } => Some(fit),
            Self::Failed { .. } => None,
        }
    }

    /// Returns `true` for a converged, trusted fit.
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged(_))
    }
}

/// One storm event and its fit.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EventResult {
    event: StormEvent,
    outcome: FitOutcome,
}

impl EventResult {
    pub(crate) fn new(event: StormEvent, outcome: FitOutcome) -> Self {
        Self { event, outcome }
    }

    /// Returns the detected storm event.
    pub fn event(&self) -> &StormEvent {
        &self.event
    }

    /// Returns the fit outcome for the event.
    pub fn outcome(&self) -> &FitOutcome {
        &self.outcome
    }
}

/// Wet-weather analysis, present only when rain was supplied.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", content = "events", rename_all = "snake_case")]
pub enum WetWeather {
    /// No rain series was supplied.
    NoRainfall,
    /// Events in time order with their fits. Empty when it never rained.
    Events(Vec<EventResult>),
}

impl WetWeather {
    /// Returns the event results; empty without rainfall.
    pub fn events(&self) -> &[EventResult] {
        match self {
            Self::NoRainfall => &[],
            Self::Events(events) => events,
        }
    }
}

/// Run-level fit statistics.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FitMetrics {
    /// R² of the RTK model against WWF over all fitted event windows.
    pub overall_nse: Option<f64>,
    /// Number of detected events.
    pub n_events: usize,
    /// Events with a converged fit.
    pub n_converged: usize,
    /// Events with a low-confidence fit.
    pub n_low_confidence: usize,
    /// Events without a fit.
    pub n_failed: usize,
    /// Dry days used for the dry-weather estimate.
    pub n_dry_days: usize,
    /// Largest dry-day relative volume error of GWI + BWWF.
    pub reconstruction_error: f64,
}

/// Complete decomposition of a flow series.
///
/// `gwi + bwwf + wwf` equals `flow` at every timestamp. `rtk_model` is the
/// fitted unit-hydrograph response inside event windows and zero elsewhere.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DecompositionResult {
    pub(crate) timestamps: Vec<NaiveDateTime>,
    pub(crate) resampled: bool,
    pub(crate) flow: Vec<f64>,
    pub(crate) gwi: Vec<f64>,
    pub(crate) bwwf: Vec<f64>,
    pub(crate) wwf: Vec<f64>,
    pub(crate) rtk_model: Vec<f64>,
    pub(crate) wet_weather: WetWeather,
    pub(crate) dry_weather: DryWeatherEstimate,
    pub(crate) metrics: FitMetrics,
    pub(crate) warnings: Vec<String>,
}

impl DecompositionResult {
    /// Returns the grid timestamps.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Returns `true` if irregular input was resampled onto a uniform grid.
    pub fn resampled(&self) -> bool {
        self.resampled
    }

    /// Returns the flow on the grid.
    pub fn flow(&self) -> &[f64] {
        &self.flow
    }

    /// Returns groundwater infiltration at each grid timestamp.
    pub fn gwi(&self) -> &[f64] {
        &self.gwi
    }

    /// Returns base wastewater flow at each grid timestamp.
    pub fn bwwf(&self) -> &[f64] {
        &self.bwwf
    }

    /// Returns wet-weather flow (flow minus GWI minus BWWF).
    pub fn wwf(&self) -> &[f64] {
        &self.wwf
    }

    /// Returns the fitted RTK response, zero outside event windows.
    pub fn rtk_model(&self) -> &[f64] {
        &self.rtk_model
    }

    /// Returns the wet-weather outcome.
    pub fn wet_weather(&self) -> &WetWeather {
        &self.wet_weather
    }

    /// Returns the dry-weather patterns, GWI trend and day classes.
    pub fn dry_weather(&self) -> &DryWeatherEstimate {
        &self.dry_weather
    }

    /// Returns run-level fit metrics.
    pub fn metrics(&self) -> &FitMetrics {
        &self.metrics
    }

    /// Returns the non-fatal issues met during the run.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Largest absolute difference between `gwi + bwwf + wwf` and `flow`.
    pub fn max_partition_error(&self) -> f64 {
        self.flow
            .iter()
            .zip(&self.gwi)
            .zip(&self.bwwf)
            .zip(&self.wwf)
            .map(|(((f, g), b), w)| (g + b + w - f).abs())
            .fold(0.0, f64::max)
    }
}
