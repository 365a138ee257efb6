//! Embed-audio command - hide a message in 16-bit PCM WAV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pvdhide::{hide_in_audio_with_keys, AudioStego, KeyPair, StegoConfig};

use super::report::{print_analysis, print_embed_metrics, print_keys};
use super::{check_carrier, default_output, read_message, CarrierKind, CommandExecutor};

/// Hide a message in a WAV file (one bit per sample).
#[derive(Args, Debug)]
pub struct EmbedAudioCommand {
    /// Carrier audio (16-bit PCM WAV)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Message to hide (reads stdin if omitted)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Output path for the stego audio (default: <carrier>_stego.wav)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also save the generated key pair to <KEYS>.key / <KEYS>.pub
    #[arg(short, long)]
    pub keys: Option<PathBuf>,
}

impl CommandExecutor for EmbedAudioCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        check_carrier(&self.carrier, CarrierKind::Audio, config)?;
        let message = read_message(self.message.as_deref())?;

        let carrier = AudioStego::from_file(&self.carrier)
            .with_context(|| format!("Failed to load audio: {}", self.carrier.display()))?;
        eprintln!(
            "Loaded {:.2}s of audio ({} samples), capacity {} bytes",
            carrier.duration_secs(),
            carrier.sample_count(),
            carrier.capacity()
        );

        let embedding = hide_in_audio_with_keys(carrier, &message, KeyPair::generate())
            .context("Audio embedding failed")?;

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output(&self.carrier, "wav", config));
        embedding
            .stego
            .save(&output)
            .with_context(|| format!("Failed to write stego audio: {}", output.display()))?;

        if let Some(base) = &self.keys {
            embedding
                .keypair
                .save_to_files(base)
                .context("Failed to save key pair")?;
            eprintln!("Key pair saved to {}.key / .pub", base.display());
        }

        println!("Stego audio written to {}", output.display());
        println!();
        print_keys(&embedding.keypair, &embedding.shared_key);
        println!();
        println!("SNR: {:.2} dB", embedding.snr);
        print_embed_metrics(&embedding.metrics, "sample");
        println!();
        print_analysis(&embedding.analysis);

        Ok(())
    }
}
