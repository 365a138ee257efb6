//! Quality metrics for reporting.
//!
//! Computed after a codec has run and never fed back into embedding.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::RgbImage;
use thiserror::Error;

use crate::crypto::Envelope;

/// Longest preview string kept in a [`CiphertextAnalysis`].
const PREVIEW_CHARS: usize = 100;

/// Errors that can occur when comparing carriers.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MetricsError {
    #[error("Images must have the same dimensions: {left:?} vs {right:?}")]
    DimensionMismatch {
        left: (u32, u32),
        right: (u32, u32),
    },

    #[error("Audio signals must have the same length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// Peak signal-to-noise ratio in dB between two RGB images.
///
/// Returns `f64::INFINITY` for identical images.
pub fn psnr(original: &RgbImage, stego: &RgbImage) -> Result<f64, MetricsError> {
    if original.dimensions() != stego.dimensions() {
        return Err(MetricsError::DimensionMismatch {
            left: original.dimensions(),
            right: stego.dimensions(),
        });
    }

    let count = original.as_raw().len();
    if count == 0 {
        return Ok(f64::INFINITY);
    }

    let squared: f64 = original
        .as_raw()
        .iter()
        .zip(stego.as_raw())
        .map(|(a, b)| {
            let d = f64::from(*a) - f64::from(*b);
            d * d
        })
        .sum();
    let mse = squared / count as f64;

    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(20.0 * (255.0 / mse.sqrt()).log10())
}

/// Signal-to-noise ratio in dB between two sample arrays.
///
/// Returns `f64::INFINITY` when the arrays are identical.
pub fn snr(original: &[i16], stego: &[i16]) -> Result<f64, MetricsError> {
    if original.len() != stego.len() {
        return Err(MetricsError::LengthMismatch {
            left: original.len(),
            right: stego.len(),
        });
    }

    let (signal, noise) = original
        .iter()
        .zip(stego)
        .fold((0.0f64, 0.0f64), |(signal, noise), (a, b)| {
            let a = f64::from(*a);
            let d = a - f64::from(*b);
            (signal + a * a, noise + d * d)
        });

    // Both powers share the 1/n factor, so the ratio of sums is enough.
    if noise == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (signal / noise).log10())
}

/// Shannon entropy of a byte string, in bits per byte.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut counts = [0usize; 256];
    for byte in data {
        counts[usize::from(*byte)] += 1;
    }

    let len = data.len() as f64;
    counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Summary of an encryption envelope for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CiphertextAnalysis {
    pub ciphertext_length: usize,
    pub tag_length: usize,
    pub nonce_length: usize,
    pub total_encrypted_length: usize,
    /// Hex of the ciphertext, cut to 100 characters plus `...`.
    pub ciphertext_hex: String,
    /// Base64 of the ciphertext, cut to 100 characters plus `...`.
    pub ciphertext_base64: String,
    pub tag_hex: String,
    /// Entropy of the ciphertext in bits per byte.
    pub entropy: f64,
}

impl CiphertextAnalysis {
    pub fn new(envelope: &Envelope<'_>) -> Self {
        let ciphertext = envelope.ciphertext();
        Self {
            ciphertext_length: ciphertext.len(),
            tag_length: envelope.tag().len(),
            nonce_length: envelope.nonce().len(),
            total_encrypted_length: envelope.as_bytes().len(),
            ciphertext_hex: preview(hex::encode(ciphertext)),
            ciphertext_base64: preview(BASE64.encode(ciphertext)),
            tag_hex: hex::encode(envelope.tag()),
            entropy: shannon_entropy(ciphertext),
        }
    }
}

fn preview(mut text: String) -> String {
    // hex and base64 are ASCII, so byte truncation is safe.
    if text.len() > PREVIEW_CHARS {
        text.truncate(PREVIEW_CHARS);
        text.push_str("...");
    }
    text
}
