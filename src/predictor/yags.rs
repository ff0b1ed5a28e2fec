//! Implementation of a YAGS-style predictor: a gshare base table with
//! tagged exception tables that cache its known mistakes.

use crate::branch::Outcome;
use crate::history::GlobalHistoryRegister;
use crate::predictor::counter::SaturatingCounterConfig;
use crate::predictor::table::{CounterTable, PredictorTable};
use crate::predictor::{check_width, BranchPredictor, ConfigError};

/// A direct-mapped table of address tags.
///
/// Entries start empty and are overwritten in place, last-writer-wins;
/// there is no other eviction. An entry only ever speaks for the branch
/// whose tag it currently holds.
pub struct TagTable {
    data: Vec<Option<usize>>,
    size: usize,
    tag_bits: usize,
}
impl TagTable {
    pub fn new(index_bits: usize, tag_bits: usize) -> Self {
        let size = 1 << index_bits;
        Self {
            data: vec![None; size],
            size,
            tag_bits,
        }
    }

    /// Returns 'true' when the entry at this index currently holds this tag.
    pub fn matches(&self, idx: usize, tag: usize) -> bool {
        *self.entry(idx) == Some(tag)
    }

    /// Overwrite the entry at this index.
    pub fn set(&mut self, idx: usize, tag: usize) {
        *self.entry_mut(idx) = Some(tag);
    }

    /// Number of storage bits this table models.
    pub fn storage_bits(&self) -> usize {
        self.size * self.tag_bits
    }
}

impl PredictorTable for TagTable {
    type Entry = Option<usize>;

    fn size(&self) -> usize { self.size }

    fn entry(&self, idx: usize) -> &Option<usize> {
        &self.data[idx & self.index_mask()]
    }

    fn entry_mut(&mut self, idx: usize) -> &mut Option<usize> {
        let mask = self.index_mask();
        &mut self.data[idx & mask]
    }
}

/// Configuration for building a [`YagsPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct YagsConfig {
    /// Index width of the base counter table, and length of the tracked
    /// global history
    pub history_bits: usize,

    /// Index width of the exception tables
    pub exception_bits: usize,

    /// Width of the address fragment stored as a tag. Wider than the
    /// exception index, so the tag disambiguates beyond it; the reference
    /// pairs a 20-bit tag with a 10-bit index.
    pub tag_bits: usize,
}

impl Default for YagsConfig {
    fn default() -> Self {
        Self {
            history_bits: 17,
            exception_bits: 10,
            tag_bits: 20,
        }
    }
}

impl YagsConfig {
    pub fn build(self) -> Result<YagsPredictor, ConfigError> {
        check_width("history_bits", self.history_bits)?;
        check_width("exception_bits", self.exception_bits)?;
        check_width("tag_bits", self.tag_bits)?;
        if self.exception_bits >= self.history_bits {
            return Err(ConfigError::ExceptionTooWide {
                exception_bits: self.exception_bits,
                history_bits: self.history_bits,
            });
        }
        if self.tag_bits <= self.exception_bits {
            return Err(ConfigError::TagTooNarrow {
                tag_bits: self.tag_bits,
                exception_bits: self.exception_bits,
            });
        }

        let two_bit = SaturatingCounterConfig::two_bit();
        Ok(YagsPredictor {
            base: CounterTable::new(self.history_bits, two_bit),
            taken_exceptions: CounterTable::new(self.exception_bits, two_bit),
            not_taken_exceptions: CounterTable::new(
                self.exception_bits,
                two_bit,
            ),
            tags: TagTable::new(self.exception_bits, self.tag_bits),
            ghr: GlobalHistoryRegister::new(self.history_bits),
            tag_mask: (1 << self.tag_bits) - 1,
            cfg: self,
        })
    }
}

/// A gshare-style base predictor with two small tagged exception tables.
///
/// The exception tables remember, per address, the correction needed when
/// the base table is known to be wrong for that pc/history combination:
/// one table records "actually taken when the base said not-taken", the
/// other the reverse.
pub struct YagsPredictor {
    /// The configuration used to create this object
    pub cfg: YagsConfig,

    base: CounterTable,
    taken_exceptions: CounterTable,
    not_taken_exceptions: CounterTable,
    tags: TagTable,
    ghr: GlobalHistoryRegister,
    tag_mask: usize,
}

impl YagsPredictor {
    fn base_index(&self, pc: usize) -> usize {
        (pc ^ self.ghr.value()) & self.base.index_mask()
    }

    fn exception_index(&self, pc: usize) -> usize {
        (pc ^ self.ghr.value()) & self.tags.index_mask()
    }

    fn tag(&self, pc: usize) -> usize {
        pc & self.tag_mask
    }
}

impl BranchPredictor for YagsPredictor {
    fn name(&self) -> &'static str { "yags" }

    fn predict(&self, pc: usize) -> Outcome {
        let exc_idx = self.exception_index(pc);
        if self.tags.matches(exc_idx, self.tag(pc)) {
            // Both checks are advisory. A taken-exception counter at or
            // above weakly-taken wins outright; failing that, a
            // not-taken-exception counter at or below weakly-not-taken
            // wins; failing both, the exception entry has nothing useful
            // to say and the base vote stands.
            if self.taken_exceptions.predict(exc_idx) == Outcome::T {
                return Outcome::T;
            }
            if self.not_taken_exceptions.predict(exc_idx) == Outcome::N {
                return Outcome::N;
            }
        }
        self.base.predict(self.base_index(pc))
    }

    fn train(&mut self, pc: usize, outcome: Outcome) {
        let base_idx = self.base_index(pc);
        let base_vote = self.base.predict(base_idx);

        if base_vote == outcome {
            self.base.entry_mut(base_idx).update(outcome);
        } else {
            // The base table is left alone on a miss. Record the
            // exception instead: claim the tag entry for this branch and
            // push the counter matching the actual outcome.
            let exc_idx = self.exception_index(pc);
            self.tags.set(exc_idx, self.tag(pc));
            match outcome {
                Outcome::T => {
                    self.taken_exceptions
                        .entry_mut(exc_idx)
                        .update(Outcome::T);
                }
                Outcome::N => {
                    self.not_taken_exceptions
                        .entry_mut(exc_idx)
                        .update(Outcome::N);
                }
            }
        }

        self.ghr.record(outcome);
    }

    fn storage_bits(&self) -> usize {
        self.base.storage_bits()
            + self.taken_exceptions.storage_bits()
            + self.not_taken_exceptions.storage_bits()
            + self.tags.storage_bits()
            + self.ghr.len()
    }
}
