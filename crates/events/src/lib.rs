//! # sewerflow-events
//!
//! Storm event detection for rainfall-derived inflow analysis.
//!
//! Rain on the flow grid is clustered into storms; each storm gets a
//! response window in the flow residual (flow minus dry-weather flow) that
//! the unit-hydrograph fit is run over.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["rain per grid bin"] -->|"cluster (gap_hours)"| B["wet clusters"]
//!     B -->|"min_intensity"| C["candidates"]
//!     D["residual"] -->|"quiet run"| E["response windows"]
//!     C --> E
//!     E -->|"merge overlaps"| F["Vec&lt;StormEvent&gt;"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use sewerflow_events::{EventConfig, detect_events};
//!
//! let config = EventConfig::new().with_gap_hours(6.0);
//! let events = detect_events(&rain, Some(&residual), &grid, &config)?;
//! for ev in &events {
//!     println!("{} .. {}: {:.1}", ev.start(), ev.end(), ev.total_depth());
//! }
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Detection thresholds |
//! | `detect` | Clustering, window search, merging |
//! | `event` | [`StormEvent`] |
//! | `error` | Error types |

mod config;
mod detect;
mod error;
mod event;

pub use config::EventConfig;
pub use detect::detect_events;
pub use error::EventError;
pub use event::StormEvent;
