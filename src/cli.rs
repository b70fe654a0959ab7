use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sanitary-sewer flow decomposition.
#[derive(Parser)]
#[command(
    name = "sewerflow",
    version,
    about = "Split sewer flow into groundwater infiltration, base wastewater and wet-weather flow"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Decompose a flow series and fit RTK parameters to storm events.
    Decompose(DecomposeArgs),
}

/// Arguments for the `decompose` subcommand.
#[derive(clap::Args)]
pub struct DecomposeArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "sewerflow.toml")]
    pub config: PathBuf,

    /// Path to the input JSON with `flow` and optional `rain` and `gwi` series.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path for the result JSON (stdout if omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the volume factor from config (flow units x hours per unit of rain depth).
    #[arg(long = "volume-factor", visible_alias = "vf")]
    pub volume_factor: Option<f64>,
}
