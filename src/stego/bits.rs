//! MSB-first bit cursors shared by the image and audio codecs.
//!
//! [`BitReader`] walks a byte slice one field at a time during embedding and
//! [`BitWriter`] accumulates recovered bits during extraction. Both codecs use
//! the same bit order, so a payload serialized by one cursor is reassembled
//! byte-for-byte by the other.

/// Reads bits MSB-first from a byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Index of the next bit to read, counted from the MSB of `data[0]`.
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a reader positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Total number of bits in the underlying slice.
    pub fn len(&self) -> usize {
        self.data.len() * 8
    }

    /// Returns true if the underlying slice holds no bits at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bits not yet consumed.
    pub fn remaining(&self) -> usize {
        self.len() - self.pos
    }

    /// Number of bits consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Reads a single bit, or `None` once the slice is exhausted.
    pub fn read_bit(&mut self) -> Option<u8> {
        if self.pos >= self.len() {
            return None;
        }
        let byte = self.data[self.pos / 8];
        let bit = (byte >> (7 - self.pos % 8)) & 1;
        self.pos += 1;
        Some(bit)
    }

    /// Reads up to `count` bits (at most 32) and returns them right-aligned,
    /// together with the number of bits actually taken.
    ///
    /// Near the end of the slice fewer than `count` bits may be available;
    /// the returned value then holds only those bits in its low positions.
    pub fn take(&mut self, count: u8) -> (u32, u8) {
        debug_assert!(count <= 32);
        let mut value = 0u32;
        let mut taken = 0u8;
        while taken < count {
            match self.read_bit() {
                Some(bit) => {
                    value = (value << 1) | u32::from(bit);
                    taken += 1;
                }
                None => break,
            }
        }
        (value, taken)
    }
}

/// Accumulates bits MSB-first into a byte vector.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bits: usize,
}

impl BitWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bits: 0,
        }
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bits
    }

    /// Appends one bit (only the lowest bit of `bit` is used).
    pub fn push_bit(&mut self, bit: u8) {
        let offset = self.bits % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit & 1 == 1 {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.bits += 1;
    }

    /// Appends the low `count` bits of `value`, most significant first.
    pub fn push_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32);
        for shift in (0..count).rev() {
            self.push_bit(((value >> shift) & 1) as u8);
        }
    }

    /// Reads back the first 32 bits as a big-endian integer, if present.
    pub fn leading_u32(&self) -> Option<u32> {
        if self.bits < 32 {
            return None;
        }
        let head: [u8; 4] = self.bytes[..4].try_into().ok()?;
        Some(u32::from_be_bytes(head))
    }

    /// Consumes the writer. A trailing partial byte is left-aligned and
    /// zero-filled.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_msb_first() {
        let data = [0b1010_0000u8, 0xFF];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bit(), Some(1));
        assert_eq!(reader.read_bit(), Some(0));
        assert_eq!(reader.take(3), (0b100, 3));
        assert_eq!(reader.remaining(), 11);
    }

    #[test]
    fn test_reader_short_tail() {
        let data = [0b0000_0011u8];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.take(5), (0, 5));
        // Only 3 bits left, asked for 7.
        assert_eq!(reader.take(7), (0b011, 3));
        assert_eq!(reader.take(1), (0, 0));
        assert_eq!(reader.read_bit(), None);
    }

    #[test]
    fn test_writer_fields_cross_bytes() {
        let mut writer = BitWriter::new();
        writer.push_bits(0b101, 3);
        writer.push_bits(0b11111, 5);
        writer.push_bits(0b1, 1);

        assert_eq!(writer.bit_len(), 9);
        assert_eq!(writer.into_bytes(), vec![0b1011_1111, 0b1000_0000]);
    }

    #[test]
    fn test_writer_leading_u32() {
        let mut writer = BitWriter::with_capacity(40);
        writer.push_bits(0xDEAD_BEEF, 32);
        assert_eq!(writer.leading_u32(), Some(0xDEAD_BEEF));

        let mut short = BitWriter::new();
        short.push_bits(0xFF, 8);
        assert_eq!(short.leading_u32(), None);
    }

    #[test]
    fn test_reader_feeds_writer() {
        let data = b"pvd stream";
        let mut reader = BitReader::new(data);
        let mut writer = BitWriter::new();

        // Uneven field widths, as the PVD slots produce.
        for width in [1u8, 3, 2, 4, 5, 6, 7].iter().cycle() {
            let (value, taken) = reader.take(*width);
            if taken == 0 {
                break;
            }
            writer.push_bits(value, taken);
        }

        assert_eq!(writer.into_bytes(), data.to_vec());
    }
}
