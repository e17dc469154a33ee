//! Byte frequency counting.

use std::collections::BTreeMap;

/// Occurrence count for every byte value present in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u64>,
}

impl FrequencyTable {
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, symbol: u8) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = (u8, u64)>>(iter: T) -> Self {
        let mut counts = BTreeMap::new();
        for (symbol, count) in iter {
            if count > 0 {
                *counts.entry(symbol).or_insert(0) += count;
            }
        }
        Self { counts }
    }
}

/// Result of one counting pass over the input.
#[derive(Debug, Clone)]
pub struct FrequencyModel {
    table: FrequencyTable,
    total: u64,
}

impl FrequencyModel {
    pub fn scan(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[usize::from(byte)] += 1;
        }
        let table = (0..=u8::MAX)
            .zip(counts)
            .filter(|&(_, count)| count > 0)
            .collect();

        Self {
            table,
            total: data.len() as u64,
        }
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn distinct(&self) -> usize {
        self.table.len()
    }

    /// Share of the input taken by each symbol, summing to 1.0 for non-empty input.
    pub fn probabilities(&self) -> Vec<(u8, f64)> {
        if self.total == 0 {
            return Vec::new();
        }
        self.table
            .iter()
            .map(|(symbol, count)| (symbol, count as f64 / self.total as f64))
            .collect()
    }

    /// Hands the table over to code assignment.
    pub fn into_table(self) -> FrequencyTable {
        self.table
    }
}
