//! Types for implementing a table of predictors.

use crate::branch::Outcome;
use crate::predictor::counter::*;

/// Interface to a table of predictor state.
///
/// Tables always hold a power-of-two number of entries, so masking an index
/// is an exact equivalent of taking it modulo the table size.
pub trait PredictorTable {
    /// The type of entry in the table.
    type Entry;

    /// Returns the number of entries in the table.
    fn size(&self) -> usize;

    /// Returns a reference to an entry in the table.
    fn entry(&self, idx: usize) -> &Self::Entry;

    /// Returns a mutable reference to an entry in the table.
    fn entry_mut(&mut self, idx: usize) -> &mut Self::Entry;

    /// Returns a bitmask corresponding to the number of entries in the table.
    fn index_mask(&self) -> usize {
        debug_assert!(self.size().is_power_of_two());
        self.size() - 1
    }
}

/// A table of [SaturatingCounter].
pub struct CounterTable {
    /// Saturating counter configuration
    cfg: SaturatingCounterConfig,

    /// Table of counters
    data: Vec<SaturatingCounter>,

    /// Number of entries
    size: usize,
}
impl CounterTable {
    pub fn new(index_bits: usize, cfg: SaturatingCounterConfig) -> Self {
        let size = 1 << index_bits;
        let data = vec![cfg.build(); size];
        Self { cfg, data, size }
    }

    /// Predicted direction of the counter at this index.
    pub fn predict(&self, idx: usize) -> Outcome {
        self.entry(idx).predict()
    }

    /// Number of storage bits this table models.
    pub fn storage_bits(&self) -> usize {
        self.cfg.storage_bits() * self.size
    }
}

impl PredictorTable for CounterTable {
    type Entry = SaturatingCounter;

    fn size(&self) -> usize { self.size }

    fn entry(&self, idx: usize) -> &SaturatingCounter {
        &self.data[idx & self.index_mask()]
    }

    fn entry_mut(&mut self, idx: usize) -> &mut SaturatingCounter {
        let mask = self.index_mask();
        &mut self.data[idx & mask]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_size_is_power_of_two() {
        for bits in 1..=12 {
            let table = CounterTable::new(
                bits, SaturatingCounterConfig::two_bit()
            );
            assert_eq!(table.size(), 1 << bits);
            assert_eq!(table.index_mask(), (1 << bits) - 1);
        }
    }

    #[test]
    fn entries_initialize_weakly_not_taken() {
        let table = CounterTable::new(4, SaturatingCounterConfig::two_bit());
        for idx in 0..table.size() {
            assert_eq!(table.predict(idx), Outcome::N);
            assert!(table.entry(idx).is_weak());
        }
    }

    #[test]
    fn indices_wrap_at_table_size() {
        let mut table = CounterTable::new(
            2, SaturatingCounterConfig::two_bit()
        );
        table.entry_mut(5).update(Outcome::T);
        // 5 & 0b11 == 1
        assert_eq!(table.predict(1), Outcome::T);
        assert_eq!(table.predict(5), Outcome::T);
        assert_eq!(table.predict(0), Outcome::N);
    }

    #[test]
    fn counter_storage_scales_with_size() {
        let table = CounterTable::new(
            10, SaturatingCounterConfig::two_bit()
        );
        assert_eq!(table.storage_bits(), 2 * 1024);
    }
}
