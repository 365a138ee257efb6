//! Integration tests for pvdhide
//!
//! Hide/reveal through the public pipeline API, through files on disk, and
//! the failure paths a recipient can hit: wrong keys, clean carriers,
//! carriers that are too small.

use hound::{SampleFormat, WavSpec};
use image::{Rgb, RgbImage};
use tempfile::tempdir;

use pvdhide::crypto::{decrypt, encrypt, SymmetricError};
use pvdhide::metrics::{psnr, snr};
use pvdhide::{
    hide_in_audio, hide_in_image, hide_in_image_with_keys, reveal_from_audio, reveal_from_image,
    AudioStego, AudioStegoError, DecoderError, EncoderConfig, EncoderError, ImageStego,
    ImageStegoError, Integrity, KeyPair,
};

/// Creates a textured test image.
fn create_test_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 17) % 256) as u8,
            ((y * 23) % 256) as u8,
            (((x + y) * 31) % 256) as u8,
        ])
    })
}

fn mono_spec() -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Creates a sine wave carrier.
fn create_test_audio(sample_count: usize) -> AudioStego {
    let samples = (0..sample_count)
        .map(|i| {
            let t = i as f64 / 44100.0;
            (f64::sin(2.0 * std::f64::consts::PI * 440.0 * t) * 16000.0) as i16
        })
        .collect();
    AudioStego::from_samples(mono_spec(), samples).unwrap()
}

/// Five bytes in 100,000 samples come back verified.
#[test]
fn test_audio_hello() {
    let mut audio = create_test_audio(100_000);
    audio.hide(b"HELLO").unwrap();

    let payload = audio.extract();
    assert_eq!(payload.data, b"HELLO");
    assert_eq!(payload.integrity, Integrity::Verified);
}

/// 50 bytes in a 100x100 image, with low distortion.
#[test]
fn test_image_fifty_bytes_quality() {
    let original = create_test_image(100, 100);
    let payload: Vec<u8> = (0..50u8).map(|i| i.wrapping_mul(37) ^ 0x5a).collect();

    let mut stego = ImageStego::from_rgb(original.clone());
    stego.hide(&payload).unwrap();

    assert_eq!(stego.extract(), payload);
    assert!(psnr(&original, stego.image()).unwrap() > 30.0);
}

/// A frame that doesn't fit is refused and the samples stay as they were.
#[test]
fn test_audio_over_capacity_untouched() {
    let mut audio = create_test_audio(100);
    let before = audio.samples().to_vec();

    let result = audio.hide(&[0xAB; 20]);
    assert!(matches!(
        result,
        Err(AudioStegoError::CapacityExceeded {
            max_bytes: 4,
            requested_bytes: 20
        })
    ));
    assert_eq!(audio.samples(), &before[..]);
}

#[test]
fn test_image_pipeline_roundtrip() {
    let message = "The eagle lands at dawn. Bring the map.";
    let embedding = hide_in_image(ImageStego::from_rgb(create_test_image(120, 90)), message)
        .unwrap();

    let revealed = reveal_from_image(&embedding.stego, &embedding.keypair).unwrap();
    assert_eq!(revealed.message, message);
    assert_eq!(revealed.integrity, None);
}

#[test]
fn test_audio_pipeline_roundtrip() {
    let message = "Ünïcödé survives the trip 🎵";
    let embedding = hide_in_audio(create_test_audio(50_000), message).unwrap();

    let revealed = reveal_from_audio(&embedding.stego, &embedding.keypair).unwrap();
    assert_eq!(revealed.message, message);
    assert_eq!(revealed.integrity, Some(Integrity::Verified));
    assert!(embedding.snr > 40.0);
}

/// The wrong key pair fails authentication rather than returning garbage.
#[test]
fn test_wrong_keys_fail_authentication() {
    let embedding = hide_in_audio(create_test_audio(20_000), "secret").unwrap();

    let result = reveal_from_audio(&embedding.stego, &KeyPair::generate());
    assert!(matches!(
        result,
        Err(DecoderError::Decryption(SymmetricError::AuthenticationFailed))
    ));
}

/// Swapping the halves changes the derived key.
#[test]
fn test_key_order_matters() {
    let keypair = KeyPair::generate();
    let swapped = KeyPair::from_parts(*keypair.public_key(), *keypair.private_key());

    let embedding = hide_in_image_with_keys(
        ImageStego::from_rgb(create_test_image(64, 64)),
        "order",
        keypair,
        &EncoderConfig::default(),
    )
    .unwrap();

    assert!(reveal_from_image(&embedding.stego, &swapped).is_err());
}

#[test]
fn test_clean_carriers_report_no_data() {
    let keypair = KeyPair::generate();

    let flat = ImageStego::from_rgb(RgbImage::from_pixel(40, 40, Rgb([128, 128, 128])));
    assert!(matches!(
        reveal_from_image(&flat, &keypair),
        Err(DecoderError::NoDataFound)
    ));

    let silent = AudioStego::from_samples(mono_spec(), vec![0; 10_000]).unwrap();
    assert!(matches!(
        reveal_from_audio(&silent, &keypair),
        Err(DecoderError::NoDataFound)
    ));
}

#[test]
fn test_small_image_capacity_error() {
    let result = hide_in_image(ImageStego::from_rgb(create_test_image(6, 6)), "too long");
    assert!(matches!(
        result,
        Err(EncoderError::Image(ImageStegoError::CapacityExceeded { .. }))
    ));
}

/// Stego image through a PNG file, keys through key files.
#[test]
fn test_png_and_key_files() {
    let dir = tempdir().unwrap();
    let carrier_path = dir.path().join("carrier.png");
    let stego_path = dir.path().join("stego.png");
    let key_base = dir.path().join("alice");

    create_test_image(80, 80).save(&carrier_path).unwrap();

    let carrier = ImageStego::from_file(&carrier_path).unwrap();
    let embedding = hide_in_image(carrier, "written to disk").unwrap();
    embedding.stego.save(&stego_path).unwrap();
    embedding.keypair.save_to_files(&key_base).unwrap();

    let keypair = KeyPair::load_from_files(&key_base).unwrap();
    let stego = ImageStego::from_file(&stego_path).unwrap();
    let revealed = reveal_from_image(&stego, &keypair).unwrap();
    assert_eq!(revealed.message, "written to disk");
}

/// A JPEG carrier is fine as input; the stego copy must be lossless.
#[test]
fn test_jpeg_carrier_png_output() {
    let dir = tempdir().unwrap();
    let carrier_path = dir.path().join("photo.jpg");
    create_test_image(96, 64).save(&carrier_path).unwrap();

    let carrier = ImageStego::from_file(&carrier_path).unwrap();
    let embedding = hide_in_image(carrier, "from a jpeg").unwrap();

    let lossy = embedding.stego.save(dir.path().join("stego.jpg"));
    assert!(matches!(lossy, Err(ImageStegoError::LossyFormat(_))));

    let png = embedding.stego.to_png_bytes().unwrap();
    let reloaded = ImageStego::from_bytes(&png).unwrap();
    let revealed = reveal_from_image(&reloaded, &embedding.keypair).unwrap();
    assert_eq!(revealed.message, "from a jpeg");
}

/// Stego audio through a WAV file, keys as hex.
#[test]
fn test_wav_file_and_hex_keys() {
    let dir = tempdir().unwrap();
    let carrier_path = dir.path().join("tone.wav");
    let stego_path = dir.path().join("tone_stego.wav");

    create_test_audio(30_000).save(&carrier_path).unwrap();

    let carrier = AudioStego::from_file(&carrier_path).unwrap();
    let original = carrier.samples().to_vec();
    let embedding = hide_in_audio(carrier, "over the wire").unwrap();
    embedding.stego.save(&stego_path).unwrap();

    let keypair = KeyPair::from_hex(
        &embedding.keypair.private_hex(),
        &embedding.keypair.public_hex(),
    )
    .unwrap();
    let stego = AudioStego::from_file(&stego_path).unwrap();
    assert!(snr(&original, stego.samples()).unwrap() > 40.0);

    let revealed = reveal_from_audio(&stego, &keypair).unwrap();
    assert_eq!(revealed.message, "over the wire");
}

/// Corrupting one payload bit breaks the checksum and the tag.
#[test]
fn test_flipped_audio_bit() {
    let keypair = KeyPair::generate();
    let envelope = encrypt("fragile", &keypair.shared_key()).unwrap();

    let mut audio = create_test_audio(5_000);
    audio.hide(&envelope).unwrap();

    let mut samples = audio.samples().to_vec();
    // First ciphertext bit: header (64) + nonce (128) + tag (128).
    samples[64 + 256] ^= 1;
    let tampered = AudioStego::from_samples(mono_spec(), samples).unwrap();

    let payload = tampered.extract();
    assert_eq!(payload.integrity, Integrity::Unverified);
    assert_eq!(payload.data.len(), envelope.len());
    assert!(matches!(
        decrypt(&payload.data, &keypair.shared_key()),
        Err(SymmetricError::AuthenticationFailed)
    ));

    assert!(matches!(
        reveal_from_audio(&tampered, &keypair),
        Err(DecoderError::Decryption(SymmetricError::AuthenticationFailed))
    ));
}
