//! # sewerflow-rtk
//!
//! RTK triangular unit-hydrograph fitting for rainfall-derived inflow and
//! infiltration (RDII) responses.
//!
//! ## Workflow
//!
//! ```mermaid
//! graph LR
//!     A["rain + residual (one event)"] -->|"fit_event(..)?"| B["EventFit"]
//!     B --> C[".components(): RtkParams, fastest first"]
//!     B --> D[".nse(): goodness of fit"]
//!     B --> E[".simulated(): modelled response"]
//!     F["RtkConfig"] -->|"max_components, timeout"| A
//! ```
//!
//! Each triangle has unit area, peaks at `T` hours and returns to zero at
//! `T * (1 + K)` hours. The modelled flow is the rain convolved with the sum
//! of `R`-weighted triangles, scaled by a caller-supplied volume factor that
//! converts rain depth into flow units times hours.
//!
//! ## Mathematical Glossary
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | R | [`RtkParams::r()`] | fraction of rain volume entering the sewer |
//! | T | [`RtkParams::t_hours()`] | time to peak, hours |
//! | K | [`RtkParams::k()`] | recession time over time to peak |
//! | R² | [`EventFit::nse()`] | Nash-Sutcliffe coefficient of determination |

mod config;
mod error;
mod fit;
mod selection;
mod unit_hydrograph;

pub(crate) mod optimizer;
pub(crate) mod params;

pub use config::{DEFAULT_MAX_COMPONENTS, RtkConfig};
pub use error::RtkError;
pub use fit::{EventFit, NonConvergence};
pub use params::RtkParams;
pub use selection::fit_event;
pub use unit_hydrograph::{ordinates, simulate, triangle_cdf};
