//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.
//! Helpers shared by several commands (carrier checks, key loading, message
//! input) live here.

mod analyze;
mod capacity;
mod embed_audio;
mod embed_image;
mod extract_audio;
mod extract_image;
mod keygen;
mod report;

pub use analyze::AnalyzeCommand;
pub use capacity::CapacityCommand;
pub use embed_audio::EmbedAudioCommand;
pub use embed_image::EmbedImageCommand;
pub use extract_audio::ExtractAudioCommand;
pub use extract_image::ExtractImageCommand;
pub use keygen::KeygenCommand;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use pvdhide::{KeyPair, StegoConfig};

/// Image carriers accepted on input.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif"];

/// Audio carriers accepted on input.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "wave"];

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self, config: &StegoConfig) -> Result<()>;
}

/// Which codec a carrier file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierKind {
    Image,
    Audio,
}

impl CarrierKind {
    /// Classifies a path by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Audio)
        } else {
            None
        }
    }

    fn supported(&self) -> &'static str {
        match self {
            Self::Image => "Supported image formats: PNG, JPG, JPEG, BMP, TIFF",
            Self::Audio => "Only WAV audio files are supported",
        }
    }
}

/// Rejects carriers of the wrong kind or over the configured size limit.
pub fn check_carrier(path: &Path, expected: CarrierKind, config: &StegoConfig) -> Result<()> {
    if CarrierKind::from_path(path) != Some(expected) {
        bail!("{}: {}", expected.supported(), path.display());
    }

    let size = fs::metadata(path)
        .with_context(|| format!("Failed to read carrier: {}", path.display()))?
        .len();
    if size > config.max_carrier_bytes {
        bail!(
            "File too large ({} bytes). Maximum size is {} bytes",
            size,
            config.max_carrier_bytes
        );
    }

    Ok(())
}

/// Returns the message from `--message`, or reads it from stdin.
pub fn read_message(message: Option<&str>) -> Result<String> {
    let message = match message {
        Some(m) => m.to_string(),
        None => {
            eprintln!("Reading message from stdin (Ctrl+D to finish):");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read message from stdin")?;
            buffer.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if message.is_empty() {
        bail!("Secret message cannot be empty");
    }

    Ok(message)
}

/// Default stego file name: `{stem}_stego.{ext}` in the configured output dir.
pub fn default_output(carrier: &Path, ext: &str, config: &StegoConfig) -> PathBuf {
    let stem = carrier
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("carrier");
    config.output_path(&format!("{}_stego.{}", stem, ext))
}

/// Where the key pair for a reveal comes from.
#[derive(Args, Debug)]
pub struct KeySource {
    /// Base path of a saved key pair (reads .key and .pub)
    #[arg(short, long, conflicts_with_all = ["private", "public"])]
    pub keys: Option<PathBuf>,

    /// Private key half as hex
    #[arg(long, requires = "public")]
    pub private: Option<String>,

    /// Public key half as hex
    #[arg(long, requires = "private")]
    pub public: Option<String>,
}

impl KeySource {
    pub fn load(&self) -> Result<KeyPair> {
        match (&self.keys, &self.private, &self.public) {
            (Some(base), _, _) => KeyPair::load_from_files(base)
                .with_context(|| format!("Failed to load key pair: {}", base.display())),
            (None, Some(private), Some(public)) => {
                KeyPair::from_hex(private.trim(), public.trim()).context("Invalid key format")
            }
            _ => bail!("Private and public keys are required (--keys or --private/--public)"),
        }
    }
}
