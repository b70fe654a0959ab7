//! # sewerflow-decomp
//!
//! Sanitary-sewer flow decomposition: groundwater infiltration (GWI), base
//! wastewater flow (BWWF) and rainfall-derived wet-weather flow (WWF), with
//! RTK unit-hydrograph fits for each storm.
//!
//! ## Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["FlowSeries (+ RainSeries)"] -->|"TimeGrid::detect"| B["grid"]
//!     B -->|"estimate_dry_weather"| C["GWI + BWWF"]
//!     C -->|"flow - GWI - BWWF"| D["WWF"]
//!     D -->|"detect_events"| E["StormEvents"]
//!     E -->|"fit_event (rayon)"| F["FitOutcomes"]
//!     F --> G["DecompositionResult"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use sewerflow_decomp::{DecompositionConfig, WetWeather, decompose};
//!
//! let result = decompose(&flow, Some(&rain), 12.5, &DecompositionConfig::default())?;
//! assert!(result.max_partition_error() < 1e-9);
//! if let WetWeather::Events(events) = result.wet_weather() {
//!     for ev in events {
//!         println!("{}: {:?}", ev.event().start(), ev.outcome().fit().map(|f| f.nse()));
//!     }
//! }
//! ```

mod config;
mod decompose;
mod error;
mod result;

pub use config::DecompositionConfig;
pub use decompose::decompose;
pub use error::DecomposeError;
pub use result::{DecompositionResult, EventResult, FitMetrics, FitOutcome, WetWeather};
