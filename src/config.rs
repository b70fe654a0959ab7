use serde::Deserialize;

/// Top-level sewerflow configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SewerflowConfig {
    /// Flow units x hours per unit of rain depth.
    #[serde(default = "default_volume_factor")]
    pub volume_factor: f64,

    /// Event fits below this NSE are reported as low confidence.
    #[serde(default)]
    pub min_fit_nse: f64,

    /// Sampling-grid settings.
    #[serde(default)]
    pub grid: GridToml,

    /// Dry-weather estimation settings.
    #[serde(default)]
    pub dry_weather: DryWeatherToml,

    /// Storm-event detection settings.
    #[serde(default)]
    pub events: EventsToml,

    /// RTK fitting settings.
    #[serde(default)]
    pub rtk: RtkToml,
}

impl Default for SewerflowConfig {
    fn default() -> Self {
        Self {
            volume_factor: default_volume_factor(),
            min_fit_nse: 0.0,
            grid: GridToml::default(),
            dry_weather: DryWeatherToml::default(),
            events: EventsToml::default(),
            rtk: RtkToml::default(),
        }
    }
}

fn default_volume_factor() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridToml {
    #[serde(default = "default_grid_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_irregular")]
    pub irregular: String,
    #[serde(default = "default_max_fill_samples")]
    pub max_fill_samples: usize,
}

impl Default for GridToml {
    fn default() -> Self {
        Self {
            tolerance: default_grid_tolerance(),
            irregular: default_irregular(),
            max_fill_samples: default_max_fill_samples(),
        }
    }
}

fn default_grid_tolerance() -> f64 {
    0.01
}
fn default_irregular() -> String {
    "reject".to_string()
}
fn default_max_fill_samples() -> usize {
    2
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DryWeatherToml {
    #[serde(default = "default_dry_lookback_hours")]
    pub dry_lookback_hours: u32,
    #[serde(default)]
    pub dry_rain_threshold: f64,
    #[serde(default = "default_min_dry_days")]
    pub min_dry_days: usize,
    #[serde(default = "default_baseline_filter_window_days")]
    pub baseline_filter_window_days: usize,
    #[serde(default = "default_trend_filter")]
    pub trend_filter: String,
    #[serde(default = "default_min_flow_factor")]
    pub min_flow_factor: f64,
    #[serde(default = "default_pattern_mode")]
    pub pattern_mode: String,
    #[serde(default = "default_day_grouping")]
    pub day_grouping: String,
    #[serde(default = "default_reconstruction_tolerance")]
    pub reconstruction_tolerance: f64,
    #[serde(default)]
    pub gwi: GwiToml,
}

impl Default for DryWeatherToml {
    fn default() -> Self {
        Self {
            dry_lookback_hours: default_dry_lookback_hours(),
            dry_rain_threshold: 0.0,
            min_dry_days: default_min_dry_days(),
            baseline_filter_window_days: default_baseline_filter_window_days(),
            trend_filter: default_trend_filter(),
            min_flow_factor: default_min_flow_factor(),
            pattern_mode: default_pattern_mode(),
            day_grouping: default_day_grouping(),
            reconstruction_tolerance: default_reconstruction_tolerance(),
            gwi: GwiToml::default(),
        }
    }
}

fn default_dry_lookback_hours() -> u32 {
    6
}
fn default_min_dry_days() -> usize {
    3
}
fn default_baseline_filter_window_days() -> usize {
    5
}
fn default_trend_filter() -> String {
    "moving_minimum".to_string()
}
fn default_min_flow_factor() -> f64 {
    1.0
}
fn default_pattern_mode() -> String {
    "multiplicative".to_string()
}
fn default_day_grouping() -> String {
    "combined".to_string()
}
fn default_reconstruction_tolerance() -> f64 {
    0.02
}

/// GWI source: `estimated`, `monthly` (needs `average` and `multipliers`),
/// or `series` (read from the input file's `gwi` array).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GwiToml {
    #[serde(default = "default_gwi_source")]
    pub source: String,
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub multipliers: Option<[f64; 12]>,
}

impl Default for GwiToml {
    fn default() -> Self {
        Self {
            source: default_gwi_source(),
            average: None,
            multipliers: None,
        }
    }
}

fn default_gwi_source() -> String {
    "estimated".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsToml {
    #[serde(default)]
    pub event_min_intensity: f64,
    #[serde(default = "default_event_gap_hours")]
    pub event_gap_hours: f64,
    #[serde(default = "default_event_max_duration_hours")]
    pub event_max_duration_hours: f64,
    #[serde(default = "default_response_fraction")]
    pub response_fraction: f64,
}

impl Default for EventsToml {
    fn default() -> Self {
        Self {
            event_min_intensity: 0.0,
            event_gap_hours: default_event_gap_hours(),
            event_max_duration_hours: default_event_max_duration_hours(),
            response_fraction: default_response_fraction(),
        }
    }
}

fn default_event_gap_hours() -> f64 {
    6.0
}
fn default_event_max_duration_hours() -> f64 {
    72.0
}
fn default_response_fraction() -> f64 {
    0.05
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RtkToml {
    #[serde(default = "default_rtk_max_components")]
    pub rtk_max_components: usize,
    #[serde(default = "default_rtk_model_improvement_threshold")]
    pub rtk_model_improvement_threshold: f64,
    #[serde(default = "default_fit_timeout_seconds")]
    pub fit_timeout_seconds: f64,
    #[serde(default = "default_max_iters")]
    pub max_iters: u64,
}

impl Default for RtkToml {
    fn default() -> Self {
        Self {
            rtk_max_components: default_rtk_max_components(),
            rtk_model_improvement_threshold: default_rtk_model_improvement_threshold(),
            fit_timeout_seconds: default_fit_timeout_seconds(),
            max_iters: default_max_iters(),
        }
    }
}

fn default_rtk_max_components() -> usize {
    3
}
fn default_rtk_model_improvement_threshold() -> f64 {
    0.05
}
fn default_fit_timeout_seconds() -> f64 {
    30.0
}
fn default_max_iters() -> u64 {
    3000
}
