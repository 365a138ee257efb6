//! Embed-image command - hide a message in a picture with adaptive PVD.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pvdhide::{hide_in_image_with_keys, EncoderConfig, ImageStego, KeyPair, StegoConfig};

use super::report::{print_analysis, print_embed_metrics, print_keys};
use super::{check_carrier, default_output, read_message, CarrierKind, CommandExecutor};

/// Hide a message in an image.
///
/// The stego image is always written losslessly (PNG by default); saving to
/// JPEG would destroy the hidden data.
#[derive(Args, Debug)]
pub struct EmbedImageCommand {
    /// Carrier image (PNG, JPG, JPEG, BMP, TIFF)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Message to hide (reads stdin if omitted)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Output path for the stego image (default: <carrier>_stego.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also save the generated key pair to <KEYS>.key / <KEYS>.pub
    #[arg(short, long)]
    pub keys: Option<PathBuf>,
}

impl CommandExecutor for EmbedImageCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        check_carrier(&self.carrier, CarrierKind::Image, config)?;
        let message = read_message(self.message.as_deref())?;

        let carrier = ImageStego::from_file(&self.carrier)
            .with_context(|| format!("Failed to load image: {}", self.carrier.display()))?;
        let (width, height) = carrier.dimensions();
        eprintln!(
            "Loaded {}x{} image, capacity {} bytes",
            width,
            height,
            carrier.capacity()
        );

        let encoder_config = EncoderConfig {
            min_psnr_db: config.min_psnr_db,
        };
        let embedding =
            hide_in_image_with_keys(carrier, &message, KeyPair::generate(), &encoder_config)
                .context("Image embedding failed")?;

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output(&self.carrier, "png", config));
        embedding
            .stego
            .save(&output)
            .with_context(|| format!("Failed to write stego image: {}", output.display()))?;

        if let Some(base) = &self.keys {
            embedding
                .keypair
                .save_to_files(base)
                .context("Failed to save key pair")?;
            eprintln!("Key pair saved to {}.key / .pub", base.display());
        }

        println!("Stego image written to {}", output.display());
        println!();
        print_keys(&embedding.keypair, &embedding.shared_key);
        println!();
        println!("PSNR: {:.2} dB", embedding.psnr);
        print_embed_metrics(&embedding.metrics, "pixel");
        println!();
        print_analysis(&embedding.analysis);

        Ok(())
    }
}
