//! # sewerflow-grid
//!
//! Time-index utilities for regularly sampled sewer monitoring data.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["FlowSeries::new(ts, values)?"] -->|"TimeGrid::detect()"| B["TimeGrid"]
//!     B -->|".regularize(&flow)"| C["flow on grid"]
//!     D["RainSeries::new(ts, depths)?"] -->|"align_depth()"| E["depth per grid bin"]
//!     F["rate series"] -->|"align_rate()"| G["rate at grid timestamps"]
//!     B -->|".day_of(i) / .slot_of(i)"| H["calendar day + diurnal slot"]
//!     B -->|".gaps()"| I["index ranges too long to count as filled"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use sewerflow_grid::{FlowSeries, GridConfig, RainSeries, TimeGrid, align_depth};
//!
//! let flow = FlowSeries::new(timestamps, values)?;
//! let grid = TimeGrid::detect(flow.timestamps(), &GridConfig::default())?;
//! let flow_on_grid = grid.regularize(&flow);
//! let rain_on_grid = align_depth(&rain, &grid);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `series` | Validated flow and rain containers |
//! | `grid` | Dominant-interval detection and grid arithmetic |
//! | `align` | Depth redistribution and rate interpolation onto a grid |
//! | `error` | Error types |

mod align;
mod error;
mod grid;
mod series;

pub use align::{align_depth, align_rate};
pub use error::GridError;
pub use grid::{GridConfig, IrregularPolicy, SECONDS_PER_DAY, TimeGrid};
pub use series::{FlowSeries, RainSeries};
