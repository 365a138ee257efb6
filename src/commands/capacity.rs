//! Capacity command - how much an image or WAV carrier can hold.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use pvdhide::crypto::MIN_ENVELOPE_SIZE;
use pvdhide::{AudioStego, ImageStego, StegoConfig};

use super::{check_carrier, CarrierKind, CommandExecutor};

/// Report the usable payload of a carrier.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Carrier image or WAV file
    #[arg(short, long)]
    pub carrier: PathBuf,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let Some(kind) = CarrierKind::from_path(&self.carrier) else {
            bail!("Unknown carrier type: {}", self.carrier.display());
        };
        check_carrier(&self.carrier, kind, config)?;

        let bytes = match kind {
            CarrierKind::Image => {
                let stego = ImageStego::from_file(&self.carrier).context("Failed to load image")?;
                let (width, height) = stego.dimensions();
                println!("Image: {}x{} ({} pixels)", width, height, stego.pixel_count());
                println!("PVD capacity: {} bits", stego.capacity_bits());
                stego.capacity()
            }
            CarrierKind::Audio => {
                let stego = AudioStego::from_file(&self.carrier).context("Failed to load audio")?;
                println!(
                    "Audio: {} samples, {} channel(s), {:.2}s",
                    stego.sample_count(),
                    stego.spec().channels,
                    stego.duration_secs()
                );
                stego.capacity()
            }
        };

        println!("Payload capacity: {} bytes", bytes);
        // Nonce and tag take 32 bytes of every envelope.
        let message = (bytes + 1).saturating_sub(MIN_ENVELOPE_SIZE);
        println!("Longest message:  {} bytes (UTF-8)", message);

        Ok(())
    }
}
