use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use sewerflow_decomp::decompose;

use crate::cli::DecomposeArgs;
use crate::config::SewerflowConfig;
use crate::convert;
use crate::input::SeriesInput;

pub fn run(args: DecomposeArgs) -> Result<()> {
    let _cmd = info_span!("decompose").entered();

    let config_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config {}", args.config.display()))?;
    let cfg: SewerflowConfig =
        toml::from_str(&config_str).context("failed to parse TOML config")?;

    let input = SeriesInput::read(&args.input)?;
    let flow = input.flow_series()?;
    let rain = input.rain_series()?;
    let gwi = input.gwi_series()?;
    info!(
        n_flow = flow.len(),
        n_rain = rain.as_ref().map_or(0, |r| r.len()),
        has_gwi = gwi.is_some(),
        "loaded input"
    );

    let config = convert::build_decomposition_config(&cfg, gwi)?;
    let volume_factor = args.volume_factor.unwrap_or(cfg.volume_factor);

    let result = decompose(&flow, rain.as_ref(), volume_factor, &config)
        .context("decomposition failed")?;

    let metrics = result.metrics();
    info!(
        n_events = metrics.n_events,
        n_converged = metrics.n_converged,
        n_dry_days = metrics.n_dry_days,
        n_warnings = result.warnings().len(),
        "decomposition complete"
    );

    match args.output {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &result)
                .context("failed to serialise result")?;
            writer.flush()?;
            info!(path = %path.display(), "result written");
        }
        None => {
            let mut writer = BufWriter::new(std::io::stdout().lock());
            serde_json::to_writer_pretty(&mut writer, &result)
                .context("failed to serialise result")?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}
