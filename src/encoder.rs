//! Hide pipelines.
//!
//! This module orchestrates the embedding process:
//! 1. Generate a key pair (or take the caller's) and derive the AES key
//! 2. Encrypt the message into an envelope
//! 3. Copy the carrier, embed the envelope in place
//! 4. Measure distortion against the copy and summarise the ciphertext

use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::DEFAULT_MIN_PSNR_DB;
use crate::crypto::{encrypt, Envelope, KeyPair, SharedKey, SymmetricError};
use crate::metrics::{self, CiphertextAnalysis, MetricsError};
use crate::stego::audio::FRAME_HEADER_BYTES;
use crate::stego::{AudioStego, AudioStegoError, ImageStego, ImageStegoError};

/// Errors that can occur during embedding.
#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("Encryption error: {0}")]
    Encryption(#[from] SymmetricError),

    #[error("{0}")]
    Image(#[from] ImageStegoError),

    #[error("{0}")]
    Audio(#[from] AudioStegoError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),
}

/// Configuration for the encoder.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Image embeddings below this PSNR are logged as a warning.
    pub min_psnr_db: f64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            min_psnr_db: DEFAULT_MIN_PSNR_DB,
        }
    }
}

/// Timings and sizes shared by both carriers.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedMetrics {
    pub encryption_ms: f64,
    pub embed_ms: f64,
    /// Bits written into the carrier.
    pub capacity_bits: usize,
    /// `capacity_bits` per pixel (images) or per sample (audio).
    pub capacity_per_unit: f64,
    /// UTF-8 length of the message.
    pub original_message_size: usize,
    /// Length of the encryption envelope.
    pub encrypted_data_size: usize,
}

impl EmbedMetrics {
    pub fn total_ms(&self) -> f64 {
        self.encryption_ms + self.embed_ms
    }
}

/// Result of hiding a message in an image.
#[derive(Debug)]
pub struct ImageEmbedding {
    /// The carrier with the envelope embedded.
    pub stego: ImageStego,
    /// Keys the recipient needs to reveal the message.
    pub keypair: KeyPair,
    pub shared_key: SharedKey,
    /// Distortion against the original carrier, in dB.
    pub psnr: f64,
    pub metrics: EmbedMetrics,
    pub analysis: CiphertextAnalysis,
}

/// Result of hiding a message in audio.
#[derive(Debug)]
pub struct AudioEmbedding {
    pub stego: AudioStego,
    pub keypair: KeyPair,
    pub shared_key: SharedKey,
    /// Signal-to-noise ratio against the original samples, in dB.
    pub snr: f64,
    pub metrics: EmbedMetrics,
    pub analysis: CiphertextAnalysis,
}

/// Ciphertext plus the bookkeeping both pipelines report.
struct Sealed {
    envelope: Vec<u8>,
    shared_key: SharedKey,
    encryption_ms: f64,
}

fn seal(message: &str, keypair: &KeyPair) -> Result<Sealed, EncoderError> {
    let shared_key = keypair.shared_key();

    let start = Instant::now();
    let envelope = encrypt(message, &shared_key)?;
    let encryption_ms = elapsed_ms(start);

    Ok(Sealed {
        envelope,
        shared_key,
        encryption_ms,
    })
}

/// Hides a message in an image under a freshly generated key pair.
pub fn hide_in_image(carrier: ImageStego, message: &str) -> Result<ImageEmbedding, EncoderError> {
    hide_in_image_with_keys(carrier, message, KeyPair::generate(), &EncoderConfig::default())
}

/// Hides a message in an image under the given key pair.
pub fn hide_in_image_with_keys(
    carrier: ImageStego,
    message: &str,
    keypair: KeyPair,
    config: &EncoderConfig,
) -> Result<ImageEmbedding, EncoderError> {
    let sealed = seal(message, &keypair)?;

    let original = carrier.image().clone();
    let mut stego = carrier;

    let start = Instant::now();
    stego.hide(&sealed.envelope)?;
    let embed_ms = elapsed_ms(start);

    let psnr = metrics::psnr(&original, stego.image())?;
    let capacity_bits = sealed.envelope.len() * 8;
    let pixels = stego.pixel_count();

    let metrics = EmbedMetrics {
        encryption_ms: sealed.encryption_ms,
        embed_ms,
        capacity_bits,
        capacity_per_unit: per_unit(capacity_bits, pixels),
        original_message_size: message.len(),
        encrypted_data_size: sealed.envelope.len(),
    };

    info!(
        bits = capacity_bits,
        psnr,
        encryption_ms = metrics.encryption_ms,
        embed_ms,
        "PVD embedding complete"
    );
    if psnr < config.min_psnr_db {
        warn!(
            psnr,
            min_psnr = config.min_psnr_db,
            "Stego image is below the quality threshold"
        );
    }

    Ok(ImageEmbedding {
        stego,
        keypair,
        shared_key: sealed.shared_key,
        psnr,
        metrics,
        analysis: analyze(&sealed.envelope)?,
    })
}

/// Hides a message in audio under a freshly generated key pair.
pub fn hide_in_audio(carrier: AudioStego, message: &str) -> Result<AudioEmbedding, EncoderError> {
    hide_in_audio_with_keys(carrier, message, KeyPair::generate())
}

/// Hides a message in audio under the given key pair.
pub fn hide_in_audio_with_keys(
    carrier: AudioStego,
    message: &str,
    keypair: KeyPair,
) -> Result<AudioEmbedding, EncoderError> {
    let sealed = seal(message, &keypair)?;

    let original = carrier.samples().to_vec();
    let mut stego = carrier;

    let start = Instant::now();
    stego.hide(&sealed.envelope)?;
    let embed_ms = elapsed_ms(start);

    let snr = metrics::snr(&original, stego.samples())?;
    // The frame header is embedded too, so it counts.
    let capacity_bits = (FRAME_HEADER_BYTES + sealed.envelope.len()) * 8;

    let metrics = EmbedMetrics {
        encryption_ms: sealed.encryption_ms,
        embed_ms,
        capacity_bits,
        capacity_per_unit: per_unit(capacity_bits, stego.sample_count()),
        original_message_size: message.len(),
        encrypted_data_size: sealed.envelope.len(),
    };

    info!(
        bits = capacity_bits,
        snr,
        encryption_ms = metrics.encryption_ms,
        embed_ms,
        "LSB embedding complete"
    );

    Ok(AudioEmbedding {
        stego,
        keypair,
        shared_key: sealed.shared_key,
        snr,
        metrics,
        analysis: analyze(&sealed.envelope)?,
    })
}

fn analyze(envelope: &[u8]) -> Result<CiphertextAnalysis, EncoderError> {
    Ok(CiphertextAnalysis::new(&Envelope::parse(envelope)?))
}

fn per_unit(bits: usize, units: usize) -> f64 {
    if units == 0 {
        0.0
    } else {
        bits as f64 / units as f64
    }
}

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
