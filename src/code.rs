//! Codewords, dictionaries and the strategies that assign them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::FormatError;
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanNode, build_tree};

/// Bit sequence assigned to one symbol, most significant bit first.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Codeword(Vec<bool>);

impl Codeword {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl From<Vec<bool>> for Codeword {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl fmt::Debug for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to codeword mapping for one run, iterated in ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    codes: BTreeMap<u8, Codeword>,
}

impl Dictionary {
    /// Builds a dictionary from decoded header entries, rejecting any set of
    /// codewords that could not be decoded greedily.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (u8, Codeword)>,
    ) -> Result<Self, FormatError> {
        let mut codes = BTreeMap::new();
        for (symbol, code) in entries {
            if code.is_empty() {
                return Err(FormatError::ZeroLengthCodeword(symbol));
            }
            if codes.insert(symbol, code).is_some() {
                return Err(FormatError::DuplicateSymbol(symbol));
            }
        }
        let dictionary = Self { codes };
        dictionary.check_prefix_free()?;
        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn get(&self, symbol: u8) -> Option<&Codeword> {
        self.codes.get(&symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Codeword)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    pub fn max_len(&self) -> usize {
        self.codes.values().map(Codeword::len).max().unwrap_or(0)
    }

    /// Codeword to symbol map used by the decoder.
    pub fn reverse(&self) -> HashMap<Codeword, u8> {
        self.codes
            .iter()
            .map(|(&symbol, code)| (code.clone(), symbol))
            .collect()
    }

    pub fn check_prefix_free(&self) -> Result<(), FormatError> {
        let mut sorted: Vec<(&Codeword, u8)> =
            self.codes.iter().map(|(&s, code)| (code, s)).collect();
        sorted.sort();
        // After sorting, a prefix always sits directly before one of its extensions.
        for pair in sorted.windows(2) {
            let (short, short_symbol) = pair[0];
            let (long, long_symbol) = pair[1];
            if short == long {
                return Err(FormatError::DuplicateCodeword);
            }
            if short.is_prefix_of(long) {
                return Err(FormatError::NotPrefixFree {
                    short: short_symbol,
                    long: long_symbol,
                });
            }
        }
        Ok(())
    }

    fn insert(&mut self, symbol: u8, code: Codeword) {
        self.codes.insert(symbol, code);
    }
}

/// Turns a frequency table into a dictionary.
pub trait CodeAssigner {
    fn name(&self) -> &'static str;
    fn assign(&self, table: FrequencyTable) -> Dictionary;
}

/// Codes read off the Huffman tree: left edges are 0, right edges are 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanAssigner;

impl HuffmanAssigner {
    fn walk(node: &HuffmanNode, path: &mut Codeword, dictionary: &mut Dictionary) {
        match node {
            HuffmanNode::Leaf { symbol, .. } => {
                // A lone leaf has an empty path; give it "0" so every byte costs a bit.
                let code = if path.is_empty() {
                    Codeword::from(vec![false])
                } else {
                    path.clone()
                };
                dictionary.insert(*symbol, code);
            }
            HuffmanNode::Internal { left, right, .. } => {
                path.push(false);
                Self::walk(left, path, dictionary);
                path.0.pop();

                path.push(true);
                Self::walk(right, path, dictionary);
                path.0.pop();
            }
        }
    }
}

impl CodeAssigner for HuffmanAssigner {
    fn name(&self) -> &'static str {
        "huffman"
    }

    fn assign(&self, table: FrequencyTable) -> Dictionary {
        let mut dictionary = Dictionary::default();
        if let Some(root) = build_tree(table) {
            Self::walk(&root, &mut Codeword::new(), &mut dictionary);
        }
        dictionary
    }
}

/// The Nth most frequent symbol gets N-1 one bits and a closing zero.
/// Equal counts rank the lower byte value first.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnaryAssigner;

impl CodeAssigner for UnaryAssigner {
    fn name(&self) -> &'static str {
        "unary"
    }

    fn assign(&self, table: FrequencyTable) -> Dictionary {
        let mut ranked: Vec<(u8, u64)> = table.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut dictionary = Dictionary::default();
        for (rank, (symbol, _)) in ranked.into_iter().enumerate() {
            let mut bits = vec![true; rank];
            bits.push(false);
            dictionary.insert(symbol, Codeword::from(bits));
        }
        dictionary
    }
}
