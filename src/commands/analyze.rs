//! Analyze command - distortion between carriers, or entropy of a file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use pvdhide::metrics::{psnr, shannon_entropy, snr};
use pvdhide::{AudioStego, ImageStego, StegoConfig};

use super::{check_carrier, CarrierKind, CommandExecutor};

/// Compare an original carrier with its stego copy, or measure file entropy.
///
/// Images report PSNR, WAV files report SNR.
#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// Original carrier
    #[arg(long, requires = "stego", conflicts_with = "entropy")]
    pub original: Option<PathBuf>,

    /// Stego carrier
    #[arg(long, requires = "original")]
    pub stego: Option<PathBuf>,

    /// Report the Shannon entropy of any file
    #[arg(long)]
    pub entropy: Option<PathBuf>,
}

impl CommandExecutor for AnalyzeCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        if let Some(path) = &self.entropy {
            let data =
                fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            println!(
                "Entropy: {:.4} bits/byte over {} bytes",
                shannon_entropy(&data),
                data.len()
            );
            return Ok(());
        }

        let (Some(original), Some(stego)) = (&self.original, &self.stego) else {
            bail!("Provide --original and --stego, or --entropy");
        };

        let Some(kind) = CarrierKind::from_path(original) else {
            bail!("Unknown carrier type: {}", original.display());
        };
        check_carrier(original, kind, config)?;
        check_carrier(stego, kind, config)?;

        match kind {
            CarrierKind::Image => println!("PSNR: {:.2} dB", image_psnr(original, stego)?),
            CarrierKind::Audio => println!("SNR: {:.2} dB", audio_snr(original, stego)?),
        }

        Ok(())
    }
}

fn image_psnr(original: &Path, stego: &Path) -> Result<f64> {
    let original = ImageStego::from_file(original).context("Failed to load original image")?;
    let stego = ImageStego::from_file(stego).context("Failed to load stego image")?;
    Ok(psnr(original.image(), stego.image())?)
}

fn audio_snr(original: &Path, stego: &Path) -> Result<f64> {
    let original = AudioStego::from_file(original).context("Failed to load original audio")?;
    let stego = AudioStego::from_file(stego).context("Failed to load stego audio")?;
    Ok(snr(original.samples(), stego.samples())?)
}
