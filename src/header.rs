//! Self-describing header: original length and the dictionary.
//!
//! Both directions walk the same fixed sequence of sections:
//!
//! ```text
//! byte_count -> dict_key -> dict_key_len -> dict_value -> content
//! ```
//!
//! * `byte_count`: original length, big-endian, [`CountWidth`] bytes.
//! * `dict_key`: one byte per symbol, then the last symbol again as a sentinel.
//! * `dict_key_len`: one byte per symbol holding its codeword length in bits.
//! * `dict_value`: all codewords concatenated and packed MSB first, zero padded.
//!
//! An empty input stops after `byte_count`.

use std::io::{self, Read};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::code::{Codeword, Dictionary};
use crate::config::CountWidth;
use crate::error::{Error, FormatError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    ByteCount,
    DictKey,
    DictKeyLen,
    DictValue,
    Content,
}

impl HeaderState {
    pub fn name(self) -> &'static str {
        match self {
            HeaderState::ByteCount => "byte_count",
            HeaderState::DictKey => "dict_key",
            HeaderState::DictKeyLen => "dict_key_len",
            HeaderState::DictValue => "dict_value",
            HeaderState::Content => "content",
        }
    }

    fn next(self) -> Self {
        match self {
            HeaderState::ByteCount => HeaderState::DictKey,
            HeaderState::DictKey => HeaderState::DictKeyLen,
            HeaderState::DictKeyLen => HeaderState::DictValue,
            HeaderState::DictValue | HeaderState::Content => HeaderState::Content,
        }
    }
}

/// Decoded header contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub byte_count: u64,
    pub dictionary: Dictionary,
}

/// Emits header bytes one at a time, ending where the payload starts.
pub struct HeaderEncoder<'a> {
    state: HeaderState,
    count: [u8; 8],
    width: usize,
    entries: Vec<(u8, &'a Codeword)>,
    packed: Vec<u8>,
    index: usize,
}

impl<'a> HeaderEncoder<'a> {
    /// Checks every field width up front so no byte is produced for a stream
    /// that cannot be described.
    pub fn new(byte_count: u64, dictionary: &'a Dictionary, width: CountWidth) -> Result<Self> {
        if byte_count > width.max_count() {
            return Err(Error::Capacity {
                field: "byte count",
                value: byte_count,
                max: width.max_count(),
            });
        }
        let entries: Vec<(u8, &Codeword)> = dictionary.iter().collect();
        for (_, code) in &entries {
            if code.len() > usize::from(u8::MAX) {
                return Err(Error::Capacity {
                    field: "codeword length",
                    value: code.len() as u64,
                    max: u64::from(u8::MAX),
                });
            }
        }

        Ok(Self {
            state: HeaderState::ByteCount,
            count: byte_count.to_be_bytes(),
            width: width.bytes(),
            packed: pack_codewords(entries.iter().map(|(_, code)| *code))?,
            entries,
            index: 0,
        })
    }

    pub fn state(&self) -> HeaderState {
        self.state
    }

    fn advance(&mut self) {
        self.state = self.state.next();
        self.index = 0;
    }
}

impl Iterator for HeaderEncoder<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        loop {
            match self.state {
                HeaderState::ByteCount => {
                    if self.index < self.width {
                        let byte = self.count[8 - self.width + self.index];
                        self.index += 1;
                        return Some(byte);
                    }
                    self.advance();
                    if self.entries.is_empty() {
                        self.state = HeaderState::Content;
                    }
                }
                HeaderState::DictKey => {
                    if let Some(&(symbol, _)) = self.entries.get(self.index) {
                        self.index += 1;
                        return Some(symbol);
                    }
                    let sentinel = self.entries[self.index - 1].0;
                    self.advance();
                    return Some(sentinel);
                }
                HeaderState::DictKeyLen => {
                    if let Some((_, code)) = self.entries.get(self.index) {
                        self.index += 1;
                        return Some(code.len() as u8);
                    }
                    self.advance();
                }
                HeaderState::DictValue => {
                    if let Some(&byte) = self.packed.get(self.index) {
                        self.index += 1;
                        return Some(byte);
                    }
                    self.advance();
                }
                HeaderState::Content => return None,
            }
        }
    }
}

fn pack_codewords<'c>(codes: impl Iterator<Item = &'c Codeword>) -> io::Result<Vec<u8>> {
    let mut packed = Vec::new();
    let mut writer = BitWriter::endian(&mut packed, BigEndian);
    for code in codes {
        for &bit in code.bits() {
            writer.write_bit(bit)?;
        }
    }
    writer.byte_align()?;
    drop(writer);
    Ok(packed)
}

/// Rebuilds a [`Header`] from bytes fed in stream order.
#[derive(Debug)]
pub struct HeaderDecoder {
    state: HeaderState,
    width: usize,
    read: usize,
    byte_count: u64,
    symbols: Vec<u8>,
    lengths: Vec<u8>,
    packed: Vec<u8>,
    packed_len: usize,
    dictionary: Dictionary,
}

impl HeaderDecoder {
    pub fn new(width: CountWidth) -> Self {
        Self {
            state: HeaderState::ByteCount,
            width: width.bytes(),
            read: 0,
            byte_count: 0,
            symbols: Vec::new(),
            lengths: Vec::new(),
            packed: Vec::new(),
            packed_len: 0,
            dictionary: Dictionary::default(),
        }
    }

    pub fn state(&self) -> HeaderState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == HeaderState::Content
    }

    /// Consumes one header byte. Bytes pushed after completion are ignored.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        match self.state {
            HeaderState::ByteCount => {
                self.byte_count = (self.byte_count << 8) | u64::from(byte);
                self.read += 1;
                if self.read == self.width {
                    self.state = if self.byte_count == 0 {
                        HeaderState::Content
                    } else {
                        HeaderState::DictKey
                    };
                }
            }
            HeaderState::DictKey => match self.symbols.last().copied() {
                // the sentinel repeats the previous symbol
                Some(prev) if prev == byte => self.state = self.state.next(),
                _ if self.symbols.contains(&byte) => {
                    return Err(FormatError::DuplicateSymbol(byte).into());
                }
                _ => self.symbols.push(byte),
            },
            HeaderState::DictKeyLen => {
                let symbol = self.symbols[self.lengths.len()];
                if byte == 0 {
                    return Err(FormatError::ZeroLengthCodeword(symbol).into());
                }
                self.lengths.push(byte);
                if self.lengths.len() == self.symbols.len() {
                    let bits: usize = self.lengths.iter().map(|&len| usize::from(len)).sum();
                    self.packed_len = bits.div_ceil(8);
                    self.state = self.state.next();
                }
            }
            HeaderState::DictValue => {
                self.packed.push(byte);
                if self.packed.len() == self.packed_len {
                    self.dictionary = self.unpack_codewords()?;
                    self.state = self.state.next();
                }
            }
            HeaderState::Content => {}
        }
        Ok(())
    }

    fn unpack_codewords(&self) -> Result<Dictionary> {
        let mut reader = BitReader::endian(self.packed.as_slice(), BigEndian);
        let mut entries = Vec::with_capacity(self.symbols.len());
        for (&symbol, &len) in self.symbols.iter().zip(&self.lengths) {
            let mut code = Codeword::new();
            for _ in 0..len {
                code.push(reader.read_bit()?);
            }
            entries.push((symbol, code));
        }
        Ok(Dictionary::from_entries(entries)?)
    }

    pub fn finish(self) -> Result<Header> {
        if !self.is_complete() {
            return Err(FormatError::TruncatedHeader {
                state: self.state.name(),
            }
            .into());
        }
        Ok(Header {
            byte_count: self.byte_count,
            dictionary: self.dictionary,
        })
    }
}

/// Reads exactly the header bytes from `reader`, leaving it at the payload.
pub fn read_header<R: Read>(reader: &mut R, width: CountWidth) -> Result<Header> {
    let mut decoder = HeaderDecoder::new(width);
    let mut byte = [0u8; 1];
    while !decoder.is_complete() {
        match reader.read_exact(&mut byte) {
            Ok(()) => decoder.push(byte[0])?,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }
    }
    let header = decoder.finish()?;
    tracing::debug!(
        byte_count = header.byte_count,
        symbols = header.dictionary.len(),
        "header decoded"
    );
    Ok(header)
}
