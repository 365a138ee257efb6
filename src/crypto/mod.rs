//! Cryptographic operations for pvdhide.
//!
//! This module provides:
//! - Key pair generation and shared-key derivation (SHA-256, truncated to 16 bytes)
//! - Authenticated encryption of messages (AES-128-EAX)
//!
//! The key pair is two random strings hashed together, not a Diffie-Hellman
//! exchange: the recipient needs both halves to re-derive the key.

pub mod keys;
pub mod symmetric;

pub use keys::{derive_shared_key, KeyError, KeyPair, SharedKey, KEY_PART_SIZE, SHARED_KEY_SIZE};
pub use symmetric::{decrypt, encrypt, Envelope, SymmetricError, MIN_ENVELOPE_SIZE, NONCE_SIZE, TAG_SIZE};
