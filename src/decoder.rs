//! Reveal pipelines.
//!
//! Extraction never fails on its own: a carrier with nothing in it yields an
//! empty payload, which is reported here as [`DecoderError::NoDataFound`].
//! Everything else that can go wrong surfaces from decryption.

use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::crypto::{decrypt, KeyPair, SymmetricError};
use crate::encoder::elapsed_ms;
use crate::stego::{AudioStego, ImageStego, Integrity};

/// Errors that can occur during revealing.
#[derive(Error, Debug)]
pub enum DecoderError {
    #[error("No hidden data found in the carrier, or the carrier may be corrupted")]
    NoDataFound,

    #[error("Decryption failed: {0}")]
    Decryption(#[from] SymmetricError),
}

/// A recovered message.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealedMessage {
    pub message: String,
    pub extract_ms: f64,
    pub decryption_ms: f64,
    /// Checksum state of the audio frame. Images carry no checksum.
    pub integrity: Option<Integrity>,
}

impl RevealedMessage {
    pub fn total_ms(&self) -> f64 {
        self.extract_ms + self.decryption_ms
    }
}

/// Recovers and decrypts a message hidden in an image.
pub fn reveal_from_image(
    stego: &ImageStego,
    keypair: &KeyPair,
) -> Result<RevealedMessage, DecoderError> {
    let start = Instant::now();
    let envelope = stego.extract();
    let extract_ms = elapsed_ms(start);

    if envelope.is_empty() {
        warn!("No PVD payload found in image");
        return Err(DecoderError::NoDataFound);
    }

    open(&envelope, keypair, extract_ms, None)
}

/// Recovers and decrypts a message hidden in audio.
///
/// A checksum mismatch does not stop decryption; the result carries
/// [`Integrity::Unverified`] and authentication has the final word.
pub fn reveal_from_audio(
    stego: &AudioStego,
    keypair: &KeyPair,
) -> Result<RevealedMessage, DecoderError> {
    let start = Instant::now();
    let payload = stego.extract();
    let extract_ms = elapsed_ms(start);

    if payload.is_empty() {
        warn!("No LSB payload found in audio");
        return Err(DecoderError::NoDataFound);
    }

    open(&payload.data, keypair, extract_ms, Some(payload.integrity))
}

fn open(
    envelope: &[u8],
    keypair: &KeyPair,
    extract_ms: f64,
    integrity: Option<Integrity>,
) -> Result<RevealedMessage, DecoderError> {
    let start = Instant::now();
    let message = decrypt(envelope, &keypair.shared_key())?;
    let decryption_ms = elapsed_ms(start);

    info!(
        bytes = envelope.len(),
        extract_ms, decryption_ms, "Message revealed"
    );

    Ok(RevealedMessage {
        message,
        extract_ms,
        decryption_ms,
        integrity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{encrypt, KeyPair};
    use hound::{SampleFormat, WavSpec};
    use image::{Rgb, RgbImage};

    fn create_test_image(width: u32, height: u32) -> ImageStego {
        ImageStego::from_rgb(RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 13) % 256) as u8,
                ((y * 29) % 256) as u8,
                (((x * y) * 7) % 256) as u8,
            ])
        }))
    }

    fn create_test_audio(sample_count: usize) -> AudioStego {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let samples = (0..sample_count)
            .map(|i| ((i % 200) as i16 - 100) * 50)
            .collect();
        AudioStego::from_samples(spec, samples).unwrap()
    }

    #[test]
    fn test_reveal_from_image() {
        let keypair = KeyPair::generate();
        let mut stego = create_test_image(80, 80);
        stego
            .hide(&encrypt("pixel secret", &keypair.shared_key()).unwrap())
            .unwrap();

        let revealed = reveal_from_image(&stego, &keypair).unwrap();
        assert_eq!(revealed.message, "pixel secret");
        assert_eq!(revealed.integrity, None);
        assert!(revealed.total_ms() >= 0.0);
    }

    #[test]
    fn test_reveal_from_audio() {
        let keypair = KeyPair::generate();
        let mut stego = create_test_audio(10_000);
        stego
            .hide(&encrypt("sample secret", &keypair.shared_key()).unwrap())
            .unwrap();

        let revealed = reveal_from_audio(&stego, &keypair).unwrap();
        assert_eq!(revealed.message, "sample secret");
        assert_eq!(revealed.integrity, Some(Integrity::Verified));
    }

    #[test]
    fn test_clean_carriers_have_no_data() {
        let keypair = KeyPair::generate();

        // A flat image decodes a zero-length header.
        let flat = ImageStego::from_rgb(RgbImage::from_pixel(16, 16, Rgb([9, 9, 9])));
        assert!(matches!(
            reveal_from_image(&flat, &keypair),
            Err(DecoderError::NoDataFound)
        ));

        // Silence decodes a zero-length frame.
        let spec = *create_test_audio(0).spec();
        let silent = AudioStego::from_samples(spec, vec![0; 4000]).unwrap();
        assert!(matches!(
            reveal_from_audio(&silent, &keypair),
            Err(DecoderError::NoDataFound)
        ));
    }

    #[test]
    fn test_wrong_key() {
        let keypair = KeyPair::generate();
        let mut stego = create_test_image(64, 64);
        stego
            .hide(&encrypt("not for you", &keypair.shared_key()).unwrap())
            .unwrap();

        let result = reveal_from_image(&stego, &KeyPair::generate());
        assert!(matches!(
            result,
            Err(DecoderError::Decryption(SymmetricError::AuthenticationFailed))
        ));
    }

    #[test]
    fn test_non_envelope_payload() {
        let keypair = KeyPair::generate();
        let mut stego = create_test_audio(2000);
        stego.hide(b"short").unwrap();

        let result = reveal_from_audio(&stego, &keypair);
        assert!(matches!(
            result,
            Err(DecoderError::Decryption(SymmetricError::EnvelopeTooShort { len: 5 }))
        ));
    }
}
