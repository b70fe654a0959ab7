//! JSON input: flow, optional rain and optional GWI samples.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;

use sewerflow_grid::{FlowSeries, RainSeries};

/// One timestamped sample.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Contents of the `--input` file.
///
/// Rain values are depths per interval starting at the timestamp. GWI values
/// are rates in flow units.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesInput {
    pub flow: Vec<Sample>,
    #[serde(default)]
    pub rain: Option<Vec<Sample>>,
    #[serde(default)]
    pub gwi: Option<Vec<Sample>>,
}

impl SeriesInput {
    /// Reads and parses an input file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse input {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds the flow series.
    pub fn flow_series(&self) -> Result<FlowSeries> {
        let (timestamps, values) = split(&self.flow);
        FlowSeries::new(timestamps, values).context("invalid flow series")
    }

    /// Builds the rain series, if present.
    pub fn rain_series(&self) -> Result<Option<RainSeries>> {
        self.rain
            .as_deref()
            .map(|samples| {
                let (timestamps, depths) = split(samples);
                RainSeries::new(timestamps, depths).context("invalid rain series")
            })
            .transpose()
    }

    /// Builds the supplied GWI series, if present.
    pub fn gwi_series(&self) -> Result<Option<FlowSeries>> {
        self.gwi
            .as_deref()
            .map(|samples| {
                let (timestamps, values) = split(samples);
                FlowSeries::new(timestamps, values).context("invalid gwi series")
            })
            .transpose()
    }
}

fn split(samples: &[Sample]) -> (Vec<NaiveDateTime>, Vec<f64>) {
    samples.iter().map(|s| (s.timestamp, s.value)).unzip()
}
