//! Payload packing for the compress direction.

use crate::code::{Codeword, Dictionary};
use crate::error::{Error, Result};

/// Packs the codeword of every input byte into output bytes, MSB first.
///
/// Yields one output byte per call. The last byte is zero padded. The
/// remaining counter drops once per input byte, so the packer stops after
/// exactly `byte_count` symbols even if `input` has more.
pub struct BitPacker<'a, I> {
    dictionary: &'a Dictionary,
    input: I,
    remaining: u64,
    consumed: u64,
    current: Option<&'a Codeword>,
    code_pos: usize,
    bit_buffer: u8,
    bit_count: u8,
}

impl<'a, I> BitPacker<'a, I>
where
    I: Iterator<Item = u8>,
{
    pub fn new(dictionary: &'a Dictionary, input: I, byte_count: u64) -> Self {
        Self {
            dictionary,
            input,
            remaining: byte_count,
            consumed: 0,
            current: None,
            code_pos: 0,
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    fn take_buffer(&mut self) -> u8 {
        let byte = self.bit_buffer << (8 - self.bit_count);
        self.bit_buffer = 0;
        self.bit_count = 0;
        byte
    }

    fn load_next(&mut self) -> Result<()> {
        let Some(byte) = self.input.next() else {
            let expected = self.consumed + self.remaining;
            self.remaining = 0;
            return Err(Error::LengthMismatch {
                expected,
                actual: self.consumed,
            });
        };
        let Some(code) = self.dictionary.get(byte) else {
            self.remaining = 0;
            return Err(Error::UnknownSymbol(byte));
        };
        self.remaining -= 1;
        self.consumed += 1;
        self.current = Some(code);
        self.code_pos = 0;
        Ok(())
    }
}

impl<I> Iterator for BitPacker<'_, I>
where
    I: Iterator<Item = u8>,
{
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Result<u8>> {
        loop {
            let code = match self.current {
                Some(code) => code,
                None if self.remaining == 0 => {
                    return (self.bit_count > 0).then(|| Ok(self.take_buffer()));
                }
                None => {
                    if let Err(e) = self.load_next() {
                        self.current = None;
                        self.bit_count = 0;
                        return Some(Err(e));
                    }
                    continue;
                }
            };

            for &bit in &code.bits()[self.code_pos..] {
                self.bit_buffer = (self.bit_buffer << 1) | u8::from(bit);
                self.bit_count += 1;
                self.code_pos += 1;
                if self.bit_count == 8 {
                    break;
                }
            }
            if self.code_pos == code.len() {
                self.current = None;
            }
            if self.bit_count == 8 {
                return Some(Ok(self.take_buffer()));
            }
        }
    }
}
