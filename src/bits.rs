//! MSB-first bit packing.

/// Accumulates bits into bytes, most significant bit first.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bit_count: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bit_count: 0,
        }
    }

    pub fn push_bit(&mut self, bit: bool) {
        let bit_offset = self.bit_count % 8;
        if bit_offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            // bytes is never empty here
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << (7 - bit_offset);
            }
        }
        self.bit_count += 1;
    }

    pub fn push_bits(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.push_bit(bit);
        }
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Returns the packed bytes and how many bits of the last byte are meaningful.
    /// The second value is 8 when nothing was written.
    pub fn finish(self) -> (Vec<u8>, u8) {
        let last_byte_valid_bits = match self.bit_count % 8 {
            0 => 8,
            n => n as u8,
        };
        (self.bytes, last_byte_valid_bits)
    }
}

/// Cursor over packed bits that stops at the last valid bit instead of reading padding.
pub struct BitReader<'a> {
    bytes: &'a [u8],
    bit_cursor: usize,
    bit_len: usize,
}

impl<'a> BitReader<'a> {
    /// `last_byte_valid_bits` must be in 1..=8; it is ignored when `bytes` is empty.
    pub fn new(bytes: &'a [u8], last_byte_valid_bits: u8) -> Self {
        let bit_len = match bytes.len() {
            0 => 0,
            n => (n - 1) * 8 + last_byte_valid_bits as usize,
        };
        Self {
            bytes,
            bit_cursor: 0,
            bit_len,
        }
    }

    pub fn pop_bit(&mut self) -> Option<bool> {
        if self.bit_cursor >= self.bit_len {
            return None;
        }
        let byte = self.bytes[self.bit_cursor / 8];
        let bit = byte & (1 << (7 - self.bit_cursor % 8)) != 0;
        self.bit_cursor += 1;
        Some(bit)
    }

    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    pub fn remaining(&self) -> usize {
        self.bit_len - self.bit_cursor
    }
}
