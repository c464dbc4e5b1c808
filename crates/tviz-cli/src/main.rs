//! tviz CLI - encode, decode, and inspect tensor visualizer envelopes

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tviz_config::VizConfig;
use tviz_telemetry::{init_logging, LogLevel};

mod commands;

#[derive(Parser)]
#[command(name = "tviz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a raw little-endian tensor file into an envelope
    Encode {
        /// Raw tensor bytes
        input: PathBuf,
        /// Element type (float16, float32, int8, uint8, ...)
        #[arg(long)]
        dtype: String,
        /// Comma-separated dimensions, e.g. 2,3
        #[arg(long)]
        shape: String,
        /// Comma-separated axis permutation, e.g. 1,0
        #[arg(long)]
        permute: Option<String>,
        /// Write the envelope here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decode an envelope and summarize its contents
    Decode {
        /// Envelope JSON file
        envelope: PathBuf,
        /// Number of leading values to print
        #[arg(long, default_value = "8")]
        head: usize,
    },
    /// Compare payload sizes across encoding stages
    Inspect {
        /// Raw tensor bytes
        input: PathBuf,
        /// Element type
        #[arg(long)]
        dtype: String,
        /// Comma-separated dimensions
        #[arg(long)]
        shape: String,
    },
    /// Print the ES module shim for the renderer bundle
    Bundle {
        /// Renderer script; defaults to the configured bundle path
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        VizConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.verbose > 0 {
        config.logging.level = LogLevel::from_verbosity(config.logging.level, cli.verbose);
    }
    init_logging(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Encode {
            input,
            dtype,
            shape,
            permute,
            output,
        } => commands::encode::execute(
            &input,
            &dtype,
            &shape,
            permute.as_deref(),
            output.as_deref(),
            &config.encoder,
        ),
        Commands::Decode { envelope, head } => commands::decode::execute(&envelope, head),
        Commands::Inspect { input, dtype, shape } => {
            commands::inspect::execute(&input, &dtype, &shape, &config.encoder)
        }
        Commands::Bundle { path } => {
            let path = path.or(config.bundle.path).context(
                "No renderer bundle given. Pass a path or set bundle.path / TVIZ_BUNDLE_PATH",
            )?;
            commands::bundle::execute(&path)
        }
    }
}
