//! Adaptive Pixel-Value-Differencing primitives.
//!
//! A pair of horizontally adjacent pixels carries data in the difference of
//! one color channel. Larger differences sit in wider quantization ranges and
//! therefore carry more bits, since changes there are harder to see.
//!
//! The [`SlotWalker`] is the one traversal used for the capacity dry run, for
//! embedding and for extraction, so all three agree on which
//! `(pair, channel)` slots carry bits.

use image::RgbImage;

/// Quantization range boundaries. Every range width is a power of two.
pub const RANGE_BOUNDARIES: [u16; 14] = [0, 2, 4, 8, 12, 16, 24, 32, 48, 64, 96, 128, 192, 256];

/// Number of color channels walked per pixel pair (R, G, B).
pub const CHANNELS: usize = 3;

/// The quantization range a pixel-pair difference falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffRange {
    /// Smallest difference in the range.
    pub lower: u8,
    /// Bits a slot in this range carries (log2 of the range width).
    pub bits: u8,
    /// Largest difference in the range.
    pub upper: u8,
}

/// Locates the range `[lower, upper]` holding `dif`.
pub fn quantize(dif: u8) -> DiffRange {
    let dif = u16::from(dif);
    // boundaries[0] == 0, so at least one boundary is <= dif.
    let idx = RANGE_BOUNDARIES.partition_point(|&b| b <= dif) - 1;
    let lower = RANGE_BOUNDARIES[idx];
    let next = RANGE_BOUNDARIES[idx + 1];

    DiffRange {
        lower: lower as u8,
        bits: (next - lower).trailing_zeros() as u8,
        upper: (next - 1) as u8,
    }
}

/// Changes the difference between `a` and `b` by `delta`.
///
/// Half of the change goes to each value. An odd leftover unit goes to the
/// value with more headroom when the difference grows, and to the value with
/// less headroom when it shrinks. Returns the new pair in the original order
/// (whichever of `a`/`b` was larger stays larger), or `None` if either value
/// would leave `[0, 255]`.
pub fn change_diff(delta: i32, a: u8, b: u8) -> Option<(u8, u8)> {
    let swapped = a > b;
    let (mut low, mut high) = if swapped {
        (i32::from(b), i32::from(a))
    } else {
        (i32::from(a), i32::from(b))
    };

    let sign = delta.signum();
    let half = sign * (delta.abs() / 2);
    let odd = sign * (delta.abs() % 2);

    low -= half;
    high += half;

    if low < 0 || high > 255 || (odd > 0 && low == 0 && high == 255) {
        return None;
    }

    if (odd > 0 && low > 255 - high) || (odd < 0 && low < 255 - high) {
        low -= odd;
    } else {
        high += odd;
    }

    let low = u8::try_from(low).ok()?;
    let high = u8::try_from(high).ok()?;

    if swapped {
        Some((high, low))
    } else {
        Some((low, high))
    }
}

/// One `(pair, channel)` position that carries bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Column of the left pixel (always even).
    pub x: u32,
    pub y: u32,
    pub channel: usize,
    /// Current absolute difference of the pair in this channel.
    pub dif: u8,
    pub range: DiffRange,
}

impl Slot {
    /// Probes a pair and returns a slot only if its difference can be pushed
    /// to the top of its range without leaving `[0, 255]`.
    fn probe(x: u32, y: u32, channel: usize, left: u8, right: u8) -> Option<Self> {
        let dif = left.abs_diff(right);
        let range = quantize(dif);
        change_diff(i32::from(range.upper) - i32::from(dif), left, right)?;
        Some(Self {
            x,
            y,
            channel,
            dif,
            range,
        })
    }

    /// The value this slot currently encodes.
    pub fn secret(&self) -> u32 {
        u32::from(self.dif - self.range.lower)
    }
}

/// Row-major cursor over the usable slots of an image.
///
/// The walker holds only its position; the image is passed to every call so
/// that the embedder can rewrite the pair it was just handed before asking
/// for the next one.
#[derive(Debug, Clone)]
pub struct SlotWalker {
    x: u32,
    y: u32,
    channel: usize,
    width: u32,
    height: u32,
}

impl SlotWalker {
    /// Starts a walk over `image`. An odd last column is never paired.
    pub fn new(image: &RgbImage) -> Self {
        let width = image.width() - image.width() % 2;
        let height = if width == 0 { 0 } else { image.height() };
        Self {
            x: 0,
            y: 0,
            channel: 0,
            width,
            height,
        }
    }

    /// Returns the next slot that carries bits, skipping unadjustable ones.
    pub fn next_slot(&mut self, image: &RgbImage) -> Option<Slot> {
        while self.y < self.height {
            let (x, y, channel) = (self.x, self.y, self.channel);
            self.advance();

            let left = image.get_pixel(x, y).0[channel];
            let right = image.get_pixel(x + 1, y).0[channel];
            if let Some(slot) = Slot::probe(x, y, channel, left, right) {
                return Some(slot);
            }
        }
        None
    }

    fn advance(&mut self) {
        self.channel += 1;
        if self.channel == CHANNELS {
            self.channel = 0;
            self.x += 2;
            if self.x >= self.width {
                self.x = 0;
                self.y += 1;
            }
        }
    }
}

/// Total bits the image can carry, header included.
pub fn capacity_bits(image: &RgbImage) -> usize {
    let mut walker = SlotWalker::new(image);
    let mut bits = 0usize;
    while let Some(slot) = walker.next_slot(image) {
        bits += usize::from(slot.range.bits);
    }
    bits
}
