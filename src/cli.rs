use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Network State Index of extracellular field-potential recordings.
#[derive(Parser)]
#[command(
    name = "nsi",
    version,
    about = "Network State Index of extracellular LFP recordings"
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
    /// Compute the envelope, the index and its validated states.
    Analyze(AnalyzeArgs),
    /// Compute the high-frequency power envelope only.
    Envelope(EnvelopeArgs),
}

/// Input options shared by every subcommand.
#[derive(clap::Args)]
pub struct InputArgs {
    /// Path to a text recording, one time sample per line.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Sampling interval of the recording, in seconds.
    #[arg(long)]
    pub dt: f64,

    /// Column of the recording to analyze.
    #[arg(long, default_value_t = 0)]
    pub channel: usize,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `analyze` subcommand.
#[derive(clap::Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Path for the JSON report (defaults to `<input>.nsi.json`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the rhythmic-term weight from config.
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Override the validation half-window (seconds) from config.
    #[arg(long)]
    pub tstate: Option<f64>,
}

/// Arguments for the `envelope` subcommand.
#[derive(clap::Args)]
pub struct EnvelopeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Path for the JSON envelope (defaults to `<input>.envelope.json`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
