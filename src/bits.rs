//! MSB-first bit packing for entropy-coded streams.
//!
//! The Huffman stage writes variable-length codes most-significant-bit first
//! and pads the final byte with zero bits. The reader walks the same stream
//! one bit at a time, which is all a canonical prefix decoder needs.

/// Accumulates variable-length codes into a byte buffer, MSB first.
#[derive(Debug, Default)]
pub struct BitWriterMsb {
    bytes: Vec<u8>,
    bit_buf: u32,
    bit_count: u32,
}

impl BitWriterMsb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { bytes: Vec::with_capacity(capacity), bit_buf: 0, bit_count: 0 }
    }

    /// Appends the low `count` bits of `value`, most significant first.
    ///
    /// `count` must be at most 24 so the accumulator cannot overflow.
    pub fn write_bits(&mut self, value: u32, count: u32) {
        debug_assert!(count <= 24);
        debug_assert!(value >> count == 0);
        self.bit_buf = (self.bit_buf << count) | value;
        self.bit_count += count;
        while self.bit_count >= 8 {
            self.bit_count -= 8;
            self.bytes.push((self.bit_buf >> self.bit_count) as u8);
        }
        // keep only the pending bits so the next shift cannot overflow
        self.bit_buf &= (1 << self.bit_count) - 1;
    }

    /// Number of complete and pending bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    /// Flushes any pending bits (zero-padded) and returns the buffer.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push((self.bit_buf << (8 - self.bit_count)) as u8);
        }
        self.bytes
    }
}

/// Reads a byte slice one bit at a time, MSB first.
#[derive(Debug)]
pub struct BitReaderMsb<'a> {
    input: &'a [u8],
    pos: usize,
    bit_buf: u32,
    bit_count: u32,
}

impl<'a> BitReaderMsb<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0, bit_buf: 0, bit_count: 0 }
    }

    /// Returns the next bit, or `None` once the input is exhausted.
    pub fn read_bit(&mut self) -> Option<u32> {
        if self.bit_count == 0 {
            let byte = *self.input.get(self.pos)?;
            self.pos += 1;
            self.bit_buf = byte as u32;
            self.bit_count = 8;
        }
        self.bit_count -= 1;
        Some((self.bit_buf >> self.bit_count) & 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_whole_bytes_msb_first() {
        let mut writer = BitWriterMsb::new();
        writer.write_bits(0b1011, 4);
        writer.write_bits(0b0010, 4);
        assert_eq!(writer.finish(), vec![0b1011_0010]);
    }

    #[test]
    fn pads_final_byte_with_zeros() {
        let mut writer = BitWriterMsb::new();
        writer.write_bits(0b101, 3);
        assert_eq!(writer.finish(), vec![0b1010_0000]);
    }

    #[test]
    fn splits_codes_across_byte_boundaries() {
        let mut writer = BitWriterMsb::new();
        writer.write_bits(0b11111, 5);
        writer.write_bits(0b000001, 6);
        // 11111_000 001 -> 0xF8, then 001 padded
        assert_eq!(writer.finish(), vec![0b1111_1000, 0b0010_0000]);
    }

    #[test]
    fn zero_length_write_is_a_no_op() {
        let mut writer = BitWriterMsb::new();
        writer.write_bits(0, 0);
        writer.write_bits(1, 1);
        assert_eq!(writer.bit_len(), 1);
        assert_eq!(writer.finish(), vec![0b1000_0000]);
    }

    #[test]
    fn reader_round_trips_writer_output() {
        let mut writer = BitWriterMsb::new();
        let pattern = [1, 0, 1, 1, 0, 0, 1, 0, 1, 1, 1];
        for &bit in &pattern {
            writer.write_bits(bit, 1);
        }
        let bytes = writer.finish();

        let mut reader = BitReaderMsb::new(&bytes);
        for &bit in &pattern {
            assert_eq!(reader.read_bit(), Some(bit));
        }
        // padding bits are still readable as zeros
        for _ in pattern.len()..bytes.len() * 8 {
            assert_eq!(reader.read_bit(), Some(0));
        }
        assert_eq!(reader.read_bit(), None);
    }

    #[test]
    fn reader_on_empty_input_is_immediately_exhausted() {
        let mut reader = BitReaderMsb::new(&[]);
        assert_eq!(reader.read_bit(), None);
    }
}
