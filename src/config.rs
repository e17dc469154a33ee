//! Codec configuration shared by both directions of a round trip.

use clap::ValueEnum;

use crate::code::{CodeAssigner, HuffmanAssigner, UnaryAssigner};
use crate::error::{Error, Result};

/// How codewords are assigned to symbols.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum Strategy {
    #[default]
    #[clap(help = "Huffman tree codes, shortest codes for frequent bytes (Default).")]
    Huffman,
    #[clap(help = "Unary codes ranked by frequency.")]
    Unary,
}

impl Strategy {
    pub fn assigner(self) -> &'static dyn CodeAssigner {
        match self {
            Strategy::Huffman => &HuffmanAssigner,
            Strategy::Unary => &UnaryAssigner,
        }
    }
}

/// Width in bytes of the original-length field at the start of the header.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CountWidth(u8);

impl CountWidth {
    pub const MAX_BYTES: u8 = 8;

    pub fn new(bytes: u8) -> Result<Self> {
        if bytes == 0 || bytes > Self::MAX_BYTES {
            return Err(Error::Capacity {
                field: "byte count width",
                value: u64::from(bytes),
                max: u64::from(Self::MAX_BYTES),
            });
        }
        Ok(Self(bytes))
    }

    pub fn bytes(self) -> usize {
        usize::from(self.0)
    }

    /// Largest byte count the field can carry.
    pub fn max_count(self) -> u64 {
        if self.0 == Self::MAX_BYTES {
            u64::MAX
        } else {
            (1u64 << (8 * u32::from(self.0))) - 1
        }
    }
}

impl Default for CountWidth {
    fn default() -> Self {
        Self(4)
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct CodecConfig {
    pub strategy: Strategy,
    pub count_width: CountWidth,
    /// Run the byte-delta filter before counting frequencies.
    pub delta: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_limits() {
        assert_eq!(CountWidth::new(1).unwrap().max_count(), 255);
        assert_eq!(CountWidth::new(2).unwrap().max_count(), 65_535);
        assert_eq!(CountWidth::default().max_count(), u32::MAX as u64);
        assert_eq!(CountWidth::new(8).unwrap().max_count(), u64::MAX);
    }

    #[test]
    fn test_width_out_of_range() {
        assert!(CountWidth::new(0).unwrap_err().is_capacity());
        assert!(CountWidth::new(9).unwrap_err().is_capacity());
    }
}
