//! pvdhide - Hide encrypted messages in pictures and sound
//!
//! A CLI tool for steganography with authenticated encryption.
//! Images use adaptive PVD, WAV audio uses framed LSB.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    AnalyzeCommand, CapacityCommand, CommandExecutor, EmbedAudioCommand, EmbedImageCommand,
    ExtractAudioCommand, ExtractImageCommand, KeygenCommand,
};
use pvdhide::StegoConfig;

/// pvdhide - Hide encrypted messages in pictures and sound
///
/// Messages are encrypted with AES-128-EAX and embedded with adaptive
/// pixel-value differencing (images) or one bit per sample (16-bit WAV).
#[derive(Parser)]
#[command(name = "pvdhide")]
#[command(version)]
#[command(about = "Hide encrypted messages in images (adaptive PVD) and WAV audio (LSB)")]
#[command(long_about = None)]
struct Cli {
    /// Debug logging on stderr (overrides RUST_LOG and the config file)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: ~/.pvdhide/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new key pair
    Keygen(KeygenCommand),

    /// Hide a message in an image
    EmbedImage(EmbedImageCommand),

    /// Reveal a message hidden in an image
    ExtractImage(ExtractImageCommand),

    /// Hide a message in a WAV file
    EmbedAudio(EmbedAudioCommand),

    /// Reveal a message hidden in a WAV file
    ExtractAudio(ExtractAudioCommand),

    /// Show how much a carrier can hold
    Capacity(CapacityCommand),

    /// Measure PSNR/SNR between carriers, or the entropy of a file
    Analyze(AnalyzeCommand),
}

impl Commands {
    fn executor(&self) -> &dyn CommandExecutor {
        match self {
            Commands::Keygen(cmd) => cmd,
            Commands::EmbedImage(cmd) => cmd,
            Commands::ExtractImage(cmd) => cmd,
            Commands::EmbedAudio(cmd) => cmd,
            Commands::ExtractAudio(cmd) => cmd,
            Commands::Capacity(cmd) => cmd,
            Commands::Analyze(cmd) => cmd,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => StegoConfig::load_from(path),
        None => StegoConfig::load(),
    }
    .context("Failed to load configuration")?;

    init_tracing(cli.verbose, &config.log_level)?;

    cli.command.executor().execute(&config)
}

/// Logs go to stderr so stdout stays clean for results.
fn init_tracing(verbose: bool, log_level: &str) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))
    }
    .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
