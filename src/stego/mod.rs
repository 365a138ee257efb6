//! Steganography module for hiding data in carriers.
//!
//! Supports:
//! - Image PVD steganography (any decodable image, saved as PNG/BMP/TIFF)
//! - Audio LSB steganography with length and checksum framing (16-bit WAV)

pub mod audio;
pub mod bits;
pub mod image;
pub mod pvd;

pub use self::audio::{AudioPayload, AudioStego, AudioStegoError, Integrity};
pub use self::image::{ImageStego, ImageStegoError};
