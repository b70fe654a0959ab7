//! Dry-weather flow estimation for sanitary sewers.
//!
//! This crate splits the dry-weather part of a flow series into slow
//! groundwater infiltration (GWI) and a repeating base wastewater flow
//! (BWWF) diurnal pattern, using the calendar days unaffected by rain.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │   classify   │────▶│     trend      │────▶│     pattern      │
//!  │ (dry days)   │     │ (GWI floor)    │     │ (BWWF shape)     │
//!  └──────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use sewerflow_dwf::{DayGrouping, DryWeatherConfig, TrendFilter};
//!
//! let config = DryWeatherConfig::new()
//!     .with_lookback_hours(6)
//!     .with_min_dry_days(3)
//!     .with_trend_filter(TrendFilter::MovingAverage)
//!     .with_grouping(DayGrouping::WeekdayWeekend);
//!
//! assert!(config.validate().is_ok());
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod estimate;
pub mod pattern;
pub mod trend;

pub use classify::{DayClass, DayGroup, DayInfo};
pub use config::{DayGrouping, DryWeatherConfig, GwiSource, PatternMode, TrendFilter};
pub use error::DwfError;
pub use estimate::{DryWeatherEstimate, estimate_dry_weather};
pub use pattern::{DiurnalPattern, GroupPattern};
pub use trend::TrendPoint;
