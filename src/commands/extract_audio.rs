//! Extract-audio command - reveal a message hidden with embed-audio.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pvdhide::{reveal_from_audio, AudioStego, Integrity, StegoConfig};

use super::report::print_revealed;
use super::{check_carrier, CarrierKind, CommandExecutor, KeySource};

/// Reveal a message hidden in a WAV file.
#[derive(Args, Debug)]
pub struct ExtractAudioCommand {
    /// Stego audio
    #[arg(short, long)]
    pub carrier: PathBuf,

    #[command(flatten)]
    pub key_source: KeySource,
}

impl CommandExecutor for ExtractAudioCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        check_carrier(&self.carrier, CarrierKind::Audio, config)?;
        let keypair = self.key_source.load()?;

        let stego = AudioStego::from_file(&self.carrier)
            .with_context(|| format!("Failed to load audio: {}", self.carrier.display()))?;

        let revealed = reveal_from_audio(&stego, &keypair).context("Audio extraction failed")?;
        print_revealed(&revealed);

        if revealed.integrity == Some(Integrity::Unverified) {
            eprintln!("WARNING: frame checksum did not match; the message authenticated anyway.");
        }

        Ok(())
    }
}
