//! Adaptive PVD steganography for images.
//!
//! Hides data in the differences between horizontally adjacent pixels, one
//! color channel at a time. Any format the `image` crate decodes is accepted
//! as a carrier; output must be written losslessly (PNG, BMP or TIFF).
//!
//! Format: [32-bit big-endian payload bit count] + [payload bits]
//! Both parts are spread over the usable slots of [`SlotWalker`], each slot
//! carrying as many bits as its difference range allows.

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::bits::{BitReader, BitWriter};
use super::pvd::{self, change_diff, SlotWalker};

/// Bits used by the length header in front of the payload.
pub const HEADER_BITS: usize = 32;

/// Errors that can occur during image steganography.
#[derive(Error, Debug)]
pub enum ImageStegoError {
    #[error("Image too small to hide data: need {needed_bits} bits, have capacity for {capacity_bits}")]
    CapacityExceeded {
        needed_bits: usize,
        capacity_bits: usize,
    },

    #[error("Image load error: {0}")]
    ImageLoadError(String),

    #[error("Image save error: {0}")]
    ImageSaveError(String),

    #[error("Refusing to save to lossy format {0}: hidden data would be destroyed")]
    LossyFormat(String),

    #[error("Pixel pair at ({x}, {y}) could not be adjusted")]
    PixelAdjustment { x: u32, y: u32 },
}

/// Image steganography handler.
///
/// Owns its RGB carrier; [`ImageStego::hide`] rewrites it in place.
#[derive(Debug, Clone)]
pub struct ImageStego {
    image: RgbImage,
}

impl ImageStego {
    /// Creates a new ImageStego from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageStegoError> {
        let image = image::open(path).map_err(|e| ImageStegoError::ImageLoadError(e.to_string()))?;
        Ok(Self::from_image(image))
    }

    /// Creates a new ImageStego from encoded image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageStegoError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ImageStegoError::ImageLoadError(e.to_string()))?;
        Ok(Self::from_image(image))
    }

    /// Creates a new ImageStego from a DynamicImage, dropping any alpha channel.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }

    /// Creates a new ImageStego from an RGB buffer.
    pub fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    /// Returns the number of bits the carrier holds, length header included.
    pub fn capacity_bits(&self) -> usize {
        pvd::capacity_bits(&self.image)
    }

    /// Returns the capacity in bytes available for the payload.
    pub fn capacity(&self) -> usize {
        self.capacity_bits().saturating_sub(HEADER_BITS) / 8
    }

    /// Hides data in the image.
    ///
    /// Capacity is checked before any pixel is touched, and the carrier is
    /// only replaced once every bit is in, so on error it is unchanged.
    pub fn hide(&mut self, data: &[u8]) -> Result<(), ImageStegoError> {
        let capacity_bits = self.capacity_bits();
        let needed_bits = HEADER_BITS + data.len() * 8;
        let payload_bits = u32::try_from(data.len() * 8).ok();

        let payload_bits = match payload_bits {
            Some(bits) if needed_bits <= capacity_bits => bits,
            _ => {
                return Err(ImageStegoError::CapacityExceeded {
                    needed_bits,
                    capacity_bits,
                })
            }
        };

        let mut framed = Vec::with_capacity(4 + data.len());
        framed.extend_from_slice(&payload_bits.to_be_bytes());
        framed.extend_from_slice(data);

        // Embed into a scratch copy so a failure leaves the carrier as it was.
        let mut image = self.image.clone();
        let mut reader = BitReader::new(&framed);
        let mut walker = SlotWalker::new(&image);
        let mut slots_used = 0usize;

        while reader.remaining() > 0 {
            let slot = walker
                .next_slot(&image)
                .ok_or(ImageStegoError::CapacityExceeded {
                    needed_bits,
                    capacity_bits,
                })?;

            // A short final field lands in the low-order bits of the slot.
            let (value, _) = reader.take(slot.range.bits);
            let target = i32::from(slot.range.lower) + value as i32;

            let left = image.get_pixel(slot.x, slot.y).0[slot.channel];
            let right = image.get_pixel(slot.x + 1, slot.y).0[slot.channel];
            let (left, right) = change_diff(target - i32::from(slot.dif), left, right)
                .ok_or(ImageStegoError::PixelAdjustment {
                    x: slot.x,
                    y: slot.y,
                })?;

            image.get_pixel_mut(slot.x, slot.y).0[slot.channel] = left;
            image.get_pixel_mut(slot.x + 1, slot.y).0[slot.channel] = right;
            slots_used += 1;
        }
        self.image = image;

        debug!(
            payload_bytes = data.len(),
            bits = needed_bits,
            capacity_bits,
            slots_used,
            "PVD embedding complete"
        );

        Ok(())
    }

    /// Extracts hidden data from the image.
    ///
    /// Returns an empty vector when nothing is hidden: either the header
    /// declares zero bits or the carrier runs out before the declared length
    /// is reached.
    pub fn extract(&self) -> Vec<u8> {
        let mut walker = SlotWalker::new(&self.image);
        let mut stream = BitWriter::with_capacity(HEADER_BITS);
        let mut total: Option<usize> = None;

        while let Some(slot) = walker.next_slot(&self.image) {
            match total {
                None => {
                    stream.push_bits(slot.secret(), slot.range.bits);
                    if let Some(payload_bits) = stream.leading_u32() {
                        debug!(payload_bits, "PVD header recovered");
                        if payload_bits == 0 {
                            return Vec::new();
                        }
                        total = Some(HEADER_BITS + payload_bits as usize);
                    }
                }
                Some(total) => {
                    let want = (total - stream.bit_len()).min(usize::from(slot.range.bits));
                    stream.push_bits(slot.secret(), want as u8);
                }
            }

            if let Some(total) = total {
                if stream.bit_len() >= total {
                    return payload_from_stream(stream, total - HEADER_BITS);
                }
            }
        }

        debug!(
            collected = stream.bit_len(),
            expected = ?total,
            "carrier exhausted before declared length"
        );
        Vec::new()
    }

    /// Saves the image to a file. The format comes from the extension and
    /// must be lossless.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageStegoError> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)
            .map_err(|e| ImageStegoError::ImageSaveError(e.to_string()))?;

        match format {
            ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff => self
                .image
                .save_with_format(path, format)
                .map_err(|e| ImageStegoError::ImageSaveError(e.to_string())),
            other => Err(ImageStegoError::LossyFormat(format!("{:?}", other))),
        }
    }

    /// Returns the image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ImageStegoError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ImageStegoError::ImageSaveError(e.to_string()))?;
        Ok(bytes)
    }

    /// Returns (width, height) in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Returns the number of pixels in the carrier.
    pub fn pixel_count(&self) -> usize {
        (self.image.width() as usize) * (self.image.height() as usize)
    }

    /// Returns a reference to the underlying image.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Consumes self and returns the underlying image.
    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

/// Cuts the payload out of a header+payload stream.
fn payload_from_stream(stream: BitWriter, payload_bits: usize) -> Vec<u8> {
    let bytes = stream.into_bytes();
    let header_bytes = HEADER_BITS / 8;
    let mut payload = bytes[header_bytes..header_bytes + payload_bits.div_ceil(8)].to_vec();

    let spare = payload_bits % 8;
    if spare != 0 {
        if let Some(last) = payload.last_mut() {
            *last &= 0xFFu8 << (8 - spare);
        }
    }
    payload
}
