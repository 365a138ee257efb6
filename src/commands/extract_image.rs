//! Extract-image command - reveal a message hidden with embed-image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pvdhide::{reveal_from_image, ImageStego, StegoConfig};

use super::report::print_revealed;
use super::{check_carrier, CarrierKind, CommandExecutor, KeySource};

/// Reveal a message hidden in an image.
#[derive(Args, Debug)]
pub struct ExtractImageCommand {
    /// Stego image
    #[arg(short, long)]
    pub carrier: PathBuf,

    #[command(flatten)]
    pub key_source: KeySource,
}

impl CommandExecutor for ExtractImageCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        check_carrier(&self.carrier, CarrierKind::Image, config)?;
        let keypair = self.key_source.load()?;

        let stego = ImageStego::from_file(&self.carrier)
            .with_context(|| format!("Failed to load image: {}", self.carrier.display()))?;

        let revealed = reveal_from_image(&stego, &keypair).context("Image extraction failed")?;
        print_revealed(&revealed);

        Ok(())
    }
}
