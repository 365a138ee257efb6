//! Console output shared by the embed and extract commands.

use pvdhide::metrics::CiphertextAnalysis;
use pvdhide::{EmbedMetrics, KeyPair, RevealedMessage, SharedKey};

pub fn print_keys(keypair: &KeyPair, shared_key: &SharedKey) {
    println!("Keys (both halves are needed to reveal the message):");
    println!("  Private key: {}", keypair.private_hex());
    println!("  Public key:  {}", keypair.public_hex());
    println!("  AES key:     {}", shared_key.to_hex());
}

/// `unit` is "pixel" or "sample".
pub fn print_embed_metrics(metrics: &EmbedMetrics, unit: &str) {
    println!("Metrics:");
    println!("  Encryption time:   {:.3} ms", metrics.encryption_ms);
    println!("  Embed time:        {:.3} ms", metrics.embed_ms);
    println!("  Total time:        {:.3} ms", metrics.total_ms());
    println!("  Capacity used:     {} bits", metrics.capacity_bits);
    println!("  Bits per {}:    {:.6}", unit, metrics.capacity_per_unit);
    println!("  Message size:      {} bytes", metrics.original_message_size);
    println!("  Encrypted size:    {} bytes", metrics.encrypted_data_size);
}

pub fn print_analysis(analysis: &CiphertextAnalysis) {
    println!("Ciphertext analysis:");
    println!(
        "  Lengths: ciphertext {} + tag {} + nonce {} = {} bytes",
        analysis.ciphertext_length,
        analysis.tag_length,
        analysis.nonce_length,
        analysis.total_encrypted_length
    );
    println!("  Entropy: {:.4} bits/byte", analysis.entropy);
    println!("  Tag:     {}", analysis.tag_hex);
    println!("  Hex:     {}", analysis.ciphertext_hex);
    println!("  Base64:  {}", analysis.ciphertext_base64);
}

pub fn print_revealed(revealed: &RevealedMessage) {
    println!("{}", revealed.message);
    eprintln!();
    eprintln!(
        "Extract: {:.3} ms, decrypt: {:.3} ms, total: {:.3} ms",
        revealed.extract_ms,
        revealed.decryption_ms,
        revealed.total_ms()
    );
}
