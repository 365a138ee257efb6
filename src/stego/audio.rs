//! LSB steganography for audio files.
//!
//! Hides data in the least significant bits of 16-bit PCM samples.
//! Supports WAV files (uncompressed PCM).
//!
//! Format: [4 bytes length, big-endian] + [4 bytes MD5 prefix] + [data bytes]
//! Every frame bit goes into one sample, MSB-first within each byte.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use super::bits::{BitReader, BitWriter};

/// Bytes of framing in front of the payload (length + checksum).
pub const FRAME_HEADER_BYTES: usize = 8;

/// Bytes of the MD5 digest kept as the checksum.
pub const CHECKSUM_BYTES: usize = 4;

/// Largest payload length accepted from a header during extraction.
pub const MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Errors that can occur during audio steganography.
#[derive(Error, Debug)]
pub enum AudioStegoError {
    #[error("Message too large for audio. Max: {max_bytes} bytes, Required: {requested_bytes} bytes")]
    CapacityExceeded {
        max_bytes: usize,
        requested_bytes: usize,
    },

    #[error("Audio load error: {0}")]
    AudioLoadError(String),

    #[error("Audio save error: {0}")]
    AudioSaveError(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),
}

/// Outcome of the checksum comparison on extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integrity {
    /// The embedded checksum matches the payload.
    Verified,
    /// The checksum does not match; the bytes are returned anyway.
    Unverified,
}

/// Data recovered from an audio carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub data: Vec<u8>,
    pub integrity: Integrity,
}

impl AudioPayload {
    /// The "nothing hidden" result.
    fn empty() -> Self {
        Self {
            data: Vec::new(),
            integrity: Integrity::Unverified,
        }
    }

    /// Returns true if no data was recovered.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if the checksum matched.
    pub fn is_verified(&self) -> bool {
        self.integrity == Integrity::Verified
    }
}

/// Computes the 4-byte checksum stored in the frame header.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_BYTES] {
    let digest = md5::compute(data);
    let mut out = [0u8; CHECKSUM_BYTES];
    out.copy_from_slice(&digest.0[..CHECKSUM_BYTES]);
    out
}

/// Audio steganography handler.
#[derive(Debug, Clone)]
pub struct AudioStego {
    /// Audio specification (sample rate, channels, etc.)
    spec: WavSpec,
    /// Interleaved audio samples (16-bit signed integers)
    samples: Vec<i16>,
}

impl AudioStego {
    /// Creates a new AudioStego from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AudioStegoError> {
        let reader =
            WavReader::open(path).map_err(|e| AudioStegoError::AudioLoadError(e.to_string()))?;

        Self::from_reader(reader)
    }

    /// Creates a new AudioStego from WAV bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AudioStegoError> {
        let cursor = Cursor::new(bytes);
        let reader =
            WavReader::new(cursor).map_err(|e| AudioStegoError::AudioLoadError(e.to_string()))?;

        Self::from_reader(reader)
    }

    /// Creates a new AudioStego from raw samples.
    pub fn from_samples(spec: WavSpec, samples: Vec<i16>) -> Result<Self, AudioStegoError> {
        check_spec(&spec)?;
        Ok(Self { spec, samples })
    }

    fn from_reader<R: Read + Seek>(reader: WavReader<R>) -> Result<Self, AudioStegoError> {
        let spec = reader.spec();
        check_spec(&spec)?;

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AudioStegoError::AudioLoadError(e.to_string()))?;

        Ok(Self { spec, samples })
    }

    /// Returns the capacity in bytes that can be hidden in this audio.
    pub fn capacity(&self) -> usize {
        // 1 bit per sample, minus the length and checksum header
        (self.samples.len() / 8).saturating_sub(FRAME_HEADER_BYTES)
    }

    /// Returns the duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        let frames = self.samples.len() / usize::from(self.spec.channels.max(1));
        frames as f64 / f64::from(self.spec.sample_rate)
    }

    /// Hides data in the audio, rewriting the samples in place.
    ///
    /// Fails before touching any sample if the frame does not fit.
    pub fn hide(&mut self, data: &[u8]) -> Result<(), AudioStegoError> {
        let required_bits = (FRAME_HEADER_BYTES + data.len()) * 8;
        let available_bits = self.samples.len();
        let length = u32::try_from(data.len()).ok();

        let length = match length {
            Some(length) if required_bits <= available_bits => length,
            _ => {
                return Err(AudioStegoError::CapacityExceeded {
                    max_bytes: self.capacity(),
                    requested_bytes: data.len(),
                })
            }
        };

        let mut frame = Vec::with_capacity(FRAME_HEADER_BYTES + data.len());
        frame.extend_from_slice(&length.to_be_bytes());
        frame.extend_from_slice(&checksum(data));
        frame.extend_from_slice(data);

        let mut bits = BitReader::new(&frame);
        for sample in self.samples.iter_mut() {
            let Some(bit) = bits.read_bit() else {
                break;
            };
            let value = (i32::from(*sample) & !1) | i32::from(bit);
            *sample = value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
        }

        debug!(
            payload_bytes = data.len(),
            bits = bits.position(),
            samples = available_bits,
            "LSB embedding complete"
        );

        Ok(())
    }

    /// Extracts hidden data from the audio.
    ///
    /// Returns an empty payload when the header is missing, implausible, or
    /// declares more data than the carrier holds. A checksum mismatch is not
    /// an error: the bytes come back marked [`Integrity::Unverified`].
    pub fn extract(&self) -> AudioPayload {
        let mut stream = BitWriter::with_capacity(self.samples.len());
        for sample in &self.samples {
            stream.push_bit((*sample & 1) as u8);
        }
        let available_bits = stream.bit_len();

        if available_bits < FRAME_HEADER_BYTES * 8 {
            debug!(available_bits, "too few samples for a frame header");
            return AudioPayload::empty();
        }

        let bytes = stream.into_bytes();
        let mut length = [0u8; 4];
        length.copy_from_slice(&bytes[..4]);
        let length = u32::from_be_bytes(length) as usize;

        if length > MAX_PAYLOAD_BYTES {
            debug!(length, "declared length exceeds sanity bound");
            return AudioPayload::empty();
        }

        let needed_bits = (FRAME_HEADER_BYTES + length) * 8;
        if needed_bits > available_bits {
            debug!(needed_bits, available_bits, "declared length exceeds carrier");
            return AudioPayload::empty();
        }

        let data = bytes[FRAME_HEADER_BYTES..FRAME_HEADER_BYTES + length].to_vec();
        let integrity = if bytes[4..FRAME_HEADER_BYTES] == checksum(&data) {
            Integrity::Verified
        } else {
            warn!(length, "audio checksum mismatch, returning unverified data");
            Integrity::Unverified
        };

        AudioPayload { data, integrity }
    }

    /// Saves the audio to a WAV file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AudioStegoError> {
        let writer = WavWriter::create(path, self.spec)
            .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))?;
        self.write_samples(writer)
    }

    /// Returns the audio as WAV bytes.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, AudioStegoError> {
        let mut bytes = Vec::new();
        {
            let writer = WavWriter::new(Cursor::new(&mut bytes), self.spec)
                .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))?;
            self.write_samples(writer)?;
        }
        Ok(bytes)
    }

    fn write_samples<W: std::io::Write + Seek>(
        &self,
        mut writer: WavWriter<W>,
    ) -> Result<(), AudioStegoError> {
        for sample in &self.samples {
            writer
                .write_sample(*sample)
                .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))
    }

    /// Returns the audio specification.
    pub fn spec(&self) -> &WavSpec {
        &self.spec
    }

    /// Returns the samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Returns the number of samples.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

/// Only 16-bit integer PCM is supported.
fn check_spec(spec: &WavSpec) -> Result<(), AudioStegoError> {
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(AudioStegoError::UnsupportedFormat(format!(
            "Only 16-bit PCM WAV is supported, got {} bits {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }
    Ok(())
}

#[cfg(test)]
fn test_spec(channels: u16) -> WavSpec {
    WavSpec {
        channels,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Creates a simple test WAV audio.
#[cfg(test)]
fn create_test_audio(sample_count: usize) -> AudioStego {
    // Generate a simple sine wave
    let samples: Vec<i16> = (0..sample_count)
        .map(|i| {
            let t = i as f64 / 44100.0;
            let freq = 440.0; // A4 note
            (f64::sin(2.0 * std::f64::consts::PI * freq * t) * 16000.0) as i16
        })
        .collect();

    AudioStego {
        spec: test_spec(1),
        samples,
    }
}
