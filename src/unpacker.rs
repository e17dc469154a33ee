//! Payload decoding for the decompress direction.

use std::collections::HashMap;
use std::io::{self, Read};

use bitstream_io::{BigEndian, BitRead, BitReader};

use crate::code::Codeword;
use crate::error::{FormatError, Result};
use crate::header::Header;

/// Decodes symbols by reading one bit at a time until the collected bits
/// match a codeword. The codes are prefix free, so the first match is the
/// only one and no backtracking is needed. Padding after the last symbol is
/// never read.
pub struct BitUnpacker<R: Read> {
    reverse: HashMap<Codeword, u8>,
    reader: BitReader<R, BigEndian>,
    remaining: u64,
    candidate: Codeword,
    max_len: usize,
}

impl<R: Read> BitUnpacker<R> {
    pub fn new(header: &Header, payload: R) -> Self {
        Self {
            reverse: header.dictionary.reverse(),
            reader: BitReader::endian(payload, BigEndian),
            remaining: header.byte_count,
            candidate: Codeword::new(),
            max_len: header.dictionary.max_len(),
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Returns the payload reader, positioned after the last byte touched.
    pub fn into_inner(self) -> R {
        self.reader.into_reader()
    }

    fn decode_symbol(&mut self) -> Result<u8> {
        self.candidate.clear();
        loop {
            let bit = match self.reader.read_bit() {
                Ok(bit) => bit,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(FormatError::TruncatedPayload {
                        remaining: self.remaining,
                    }
                    .into());
                }
                Err(e) => return Err(e.into()),
            };
            self.candidate.push(bit);

            if let Some(&symbol) = self.reverse.get(&self.candidate) {
                return Ok(symbol);
            }
            if self.candidate.len() >= self.max_len {
                return Err(FormatError::UnmatchedCodeword {
                    len: self.candidate.len(),
                }
                .into());
            }
        }
    }
}

impl<R: Read> Iterator for BitUnpacker<R> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Result<u8>> {
        if self.remaining == 0 {
            return None;
        }
        let decoded = self.decode_symbol();
        // An error ends the stream.
        self.remaining = match decoded {
            Ok(_) => self.remaining - 1,
            Err(_) => 0,
        };
        Some(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Dictionary;
    use crate::error::Error;

    fn header(byte_count: u64, entries: &[(u8, &str)]) -> Header {
        let dictionary = Dictionary::from_entries(entries.iter().map(|&(s, bits)| {
            (s, Codeword::from(bits.chars().map(|c| c == '1').collect::<Vec<_>>()))
        }))
        .unwrap();
        Header {
            byte_count,
            dictionary,
        }
    }

    #[test]
    fn test_decodes_across_bytes() {
        let header = header(9, &[(b'a', "0"), (b'b', "1")]);
        let payload: &[u8] = &[0b0110_1101, 0b1000_0000];
        let out: Vec<u8> = BitUnpacker::new(&header, payload)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(out, b"abbabbabb");
    }

    #[test]
    fn test_variable_length_codes() {
        let header = header(4, &[(b'x', "0"), (b'y', "10"), (b'z', "11")]);
        // z y x z -> 11 10 0 11
        let payload: &[u8] = &[0b1110_0110];
        let out: Vec<u8> = BitUnpacker::new(&header, payload)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(out, b"zyxz");
    }

    #[test]
    fn test_zero_count_reads_nothing() {
        let header = Header {
            byte_count: 0,
            dictionary: Dictionary::default(),
        };
        let payload: &[u8] = &[];
        let mut unpacker = BitUnpacker::new(&header, payload);
        assert!(unpacker.next().is_none());
    }

    #[test]
    fn test_padding_is_ignored() {
        let header = header(2, &[(b'x', "0"), (b'y', "10"), (b'z', "11")]);
        // y y, then six bits of padding that would decode as more symbols
        let payload: &[u8] = &[0b1010_1111, 0xFF];
        let out: Vec<u8> = BitUnpacker::new(&header, payload)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(out, b"yy");
    }

    #[test]
    fn test_truncated_mid_codeword() {
        let header = header(5, &[(b'x', "0"), (b'y', "10"), (b'z', "11")]);
        // four z codes use the whole byte, the fifth has nothing to read
        let payload: &[u8] = &[0xFF];
        let mut unpacker = BitUnpacker::new(&header, payload);
        for _ in 0..4 {
            assert_eq!(unpacker.next().unwrap().unwrap(), b'z');
        }
        let err = unpacker.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::TruncatedPayload { remaining: 1 })
        ));
        assert!(unpacker.next().is_none());
    }

    #[test]
    fn test_unmatched_bits() {
        // "11" is not assigned to anything
        let header = header(1, &[(b'x', "0"), (b'y', "10")]);
        let payload: &[u8] = &[0b1100_0000];
        let err = BitUnpacker::new(&header, payload)
            .collect::<Result<Vec<u8>>>()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::UnmatchedCodeword { len: 2 })
        ));
    }
}
