//! Symmetric authenticated encryption for pvdhide.
//!
//! AES-128 in EAX mode with a 16-byte random nonce and a 16-byte tag. The
//! output is a self-contained envelope the codecs carry as opaque bytes:
//!
//! `nonce (16 bytes) || tag (16 bytes) || ciphertext (message length)`

use aes::Aes128;
use eax::aead::{generic_array::GenericArray, AeadInPlace, KeyInit};
use eax::Eax;
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use super::keys::SharedKey;

type Aes128Eax = Eax<Aes128>;

/// Nonce size for AES-EAX.
pub const NONCE_SIZE: usize = 16;

/// Authentication tag size.
pub const TAG_SIZE: usize = 16;

/// Smallest valid envelope: nonce, tag and at least one ciphertext byte.
pub const MIN_ENVELOPE_SIZE: usize = NONCE_SIZE + TAG_SIZE + 1;

/// Errors that can occur during symmetric encryption.
#[derive(Error, Debug)]
pub enum SymmetricError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Encrypted data too short: {len} bytes, minimum 33 required")]
    EnvelopeTooShort { len: usize },

    #[error("Authentication failed: wrong key or tampered data")]
    AuthenticationFailed,

    #[error("Decrypted data is not valid UTF-8")]
    InvalidUtf8,
}

/// A borrowed, length-checked view of an encryption envelope.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    bytes: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Checks the minimum length and wraps the bytes.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, SymmetricError> {
        if bytes.len() < MIN_ENVELOPE_SIZE {
            return Err(SymmetricError::EnvelopeTooShort { len: bytes.len() });
        }
        Ok(Self { bytes })
    }

    pub fn nonce(&self) -> &'a [u8] {
        &self.bytes[..NONCE_SIZE]
    }

    pub fn tag(&self) -> &'a [u8] {
        &self.bytes[NONCE_SIZE..NONCE_SIZE + TAG_SIZE]
    }

    pub fn ciphertext(&self) -> &'a [u8] {
        &self.bytes[NONCE_SIZE + TAG_SIZE..]
    }

    /// The whole envelope.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Encrypts a message into an envelope under a fresh random nonce.
pub fn encrypt(message: &str, key: &SharedKey) -> Result<Vec<u8>, SymmetricError> {
    if message.is_empty() {
        return Err(SymmetricError::EmptyMessage);
    }
    seal(message.as_bytes(), key)
}

fn seal(plaintext: &[u8], key: &SharedKey) -> Result<Vec<u8>, SymmetricError> {
    let cipher = Aes128Eax::new_from_slice(key.as_bytes())
        .map_err(|e| SymmetricError::EncryptionFailed(e.to_string()))?;

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&nonce), b"", &mut buffer)
        .map_err(|e| SymmetricError::EncryptionFailed(e.to_string()))?;

    let mut envelope = Vec::with_capacity(NONCE_SIZE + TAG_SIZE + buffer.len());
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&tag);
    envelope.extend_from_slice(&buffer);

    Ok(envelope)
}

/// Decrypts an envelope back into the original message.
pub fn decrypt(envelope: &[u8], key: &SharedKey) -> Result<String, SymmetricError> {
    let envelope = Envelope::parse(envelope)?;

    let cipher = Aes128Eax::new_from_slice(key.as_bytes())
        .map_err(|_| SymmetricError::AuthenticationFailed)?;

    let mut buffer = envelope.ciphertext().to_vec();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(envelope.nonce()),
            b"",
            &mut buffer,
            GenericArray::from_slice(envelope.tag()),
        )
        .map_err(|_| SymmetricError::AuthenticationFailed)?;

    String::from_utf8(buffer).map_err(|_| SymmetricError::InvalidUtf8)
}
