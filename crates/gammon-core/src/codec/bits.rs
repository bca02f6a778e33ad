//! LSB-first bit packing shared by the two identifier encoders. Bit `i` of
//! the stream lands in byte `i / 8` at bit position `i % 8`.

#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    cursor: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bit(&mut self, bit: bool) {
        if self.cursor % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            let byte = self.bytes.len() - 1;
            self.bytes[byte] |= 1 << (self.cursor % 8);
        }
        self.cursor += 1;
    }

    /// Pushes the low `width` bits of `value`, least significant first.
    pub fn push_bits(&mut self, value: u32, width: usize) {
        for i in 0..width {
            self.push_bit((value >> i) & 1 == 1);
        }
    }

    pub fn bit_len(&self) -> usize {
        self.cursor
    }

    /// Finishes the stream at exactly `len` bytes, zero-padding the tail.
    /// Bits past the target length are dropped.
    pub fn into_bytes(mut self, len: usize) -> Vec<u8> {
        self.bytes.resize(len, 0);
        self.bytes
    }
}

#[derive(Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    pub fn read_bit(&mut self) -> bool {
        let byte = self.cursor / 8;
        let bit = self.cursor % 8;
        self.cursor += 1;
        byte < self.bytes.len() && (self.bytes[byte] >> bit) & 1 == 1
    }

    pub fn read_bits(&mut self, width: usize) -> u32 {
        let mut value = 0u32;
        for i in 0..width {
            if self.read_bit() {
                value |= 1 << i;
            }
        }
        value
    }
}
