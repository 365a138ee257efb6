//! # pvdhide - Hide encrypted messages in pictures and sound
//!
//! pvdhide encrypts a message with AES-128-EAX and hides the resulting
//! envelope in a carrier file:
//! - **Images**: adaptive Pixel-Value Differencing. Each horizontal pixel
//!   pair, per channel, carries as many bits as its difference range allows,
//!   so textured regions hold more and flat regions hold none.
//! - **Audio**: one bit per 16-bit PCM sample, framed with a length and a
//!   truncated MD5 checksum.
//!
//! ## Security Model
//!
//! - The key pair is two random 32-byte strings; the AES key is the first 16
//!   bytes of `SHA-256(private || public)`. This is not asymmetric agreement:
//!   whoever holds both halves can read the message.
//! - The envelope is `nonce(16) || tag(16) || ciphertext`. Tampering or a wrong
//!   key fails authentication.
//! - Stego images must be stored losslessly (PNG, BMP, TIFF).
//!
//! ## Example Usage
//!
//! ```rust
//! use image::{Rgb, RgbImage};
//! use pvdhide::{hide_in_image, reveal_from_image, ImageStego};
//!
//! let carrier = ImageStego::from_rgb(RgbImage::from_fn(64, 64, |x, y| {
//!     Rgb([(x * 9) as u8, (y * 5) as u8, ((x + y) * 3) as u8])
//! }));
//!
//! // Keys are generated for every message
//! let embedding = hide_in_image(carrier, "meet at noon").unwrap();
//! println!("PSNR: {:.2} dB", embedding.psnr);
//!
//! // The recipient needs the stego image and both key halves
//! let revealed = reveal_from_image(&embedding.stego, &embedding.keypair).unwrap();
//! assert_eq!(revealed.message, "meet at noon");
//! ```
//!
//! ## Modules
//!
//! - [`crypto`]: Key pairs, key derivation, authenticated encryption
//! - [`stego`]: The image (PVD) and audio (LSB) codecs
//! - [`metrics`]: PSNR, SNR, entropy and ciphertext analysis
//! - [`encoder`]: Encrypt-then-embed pipelines
//! - [`decoder`]: Extract-then-decrypt pipelines
//! - [`config`]: Settings for the command-line front end

pub mod config;
pub mod crypto;
pub mod decoder;
pub mod encoder;
pub mod metrics;
pub mod stego;

// Re-export commonly used types at the crate root
pub use config::{ConfigError, StegoConfig};
pub use crypto::{KeyPair, SharedKey};
pub use decoder::{reveal_from_audio, reveal_from_image, DecoderError, RevealedMessage};
pub use encoder::{
    hide_in_audio, hide_in_audio_with_keys, hide_in_image, hide_in_image_with_keys,
    AudioEmbedding, EmbedMetrics, EncoderConfig, EncoderError, ImageEmbedding,
};
pub use stego::{AudioPayload, AudioStego, AudioStegoError, ImageStego, ImageStegoError, Integrity};
