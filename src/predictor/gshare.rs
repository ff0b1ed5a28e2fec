//! Implementation of a gshare predictor.

use crate::branch::Outcome;
use crate::history::GlobalHistoryRegister;
use crate::predictor::counter::SaturatingCounterConfig;
use crate::predictor::table::{CounterTable, PredictorTable};
use crate::predictor::{check_width, BranchPredictor, ConfigError};

/// Configuration for building a [`GsharePredictor`].
#[derive(Clone, Copy, Debug)]
pub struct GshareConfig {
    /// Index width of the counter table, and length of the tracked
    /// global history
    pub history_bits: usize,
}
impl GshareConfig {
    pub fn build(self) -> Result<GsharePredictor, ConfigError> {
        check_width("history_bits", self.history_bits)?;
        Ok(GsharePredictor {
            pht: CounterTable::new(
                self.history_bits,
                SaturatingCounterConfig::two_bit(),
            ),
            ghr: GlobalHistoryRegister::new(self.history_bits),
            cfg: self,
        })
    }
}

/// A single table of counters shared by all branches, indexed by folding
/// the branch address together with global history.
///
/// XOR-folding the address and the history into one table trades aliasing
/// for table-size efficiency: distinct (pc, history) pairs may collide, and
/// that is part of the scheme.
pub struct GsharePredictor {
    /// The configuration used to create this object
    pub cfg: GshareConfig,

    pht: CounterTable,
    ghr: GlobalHistoryRegister,
}

impl GsharePredictor {
    fn index(&self, pc: usize) -> usize {
        let mask = self.pht.index_mask();
        (pc & mask) ^ (self.ghr.value() & mask)
    }
}

impl BranchPredictor for GsharePredictor {
    fn name(&self) -> &'static str { "gshare" }

    fn predict(&self, pc: usize) -> Outcome {
        self.pht.predict(self.index(pc))
    }

    fn train(&mut self, pc: usize, outcome: Outcome) {
        let idx = self.index(pc);
        self.pht.entry_mut(idx).update(outcome);
        self.ghr.record(outcome);
    }

    fn storage_bits(&self) -> usize {
        self.pht.storage_bits() + self.ghr.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gshare(history_bits: usize) -> GsharePredictor {
        GshareConfig { history_bits }.build().unwrap()
    }

    #[test]
    fn prediction_is_deterministic() {
        let p = gshare(8);
        for pc in [0usize, 0x40, 0x1234] {
            assert_eq!(p.predict(pc), p.predict(pc));
        }
    }

    #[test]
    fn history_walks_the_index() {
        // With two history bits and pc=0, three taken branches visit
        // indices 0, 1, 3 (the low bits of pc XOR history for history
        // values 0, 1, 3) and leave each visited counter weakly-taken.
        let mut p = gshare(2);

        assert_eq!(p.predict(0), Outcome::N);
        p.train(0, Outcome::T);

        assert_eq!(p.predict(0), Outcome::N);
        p.train(0, Outcome::T);

        assert_eq!(p.predict(0), Outcome::N);
        p.train(0, Outcome::T);

        // History is now 0b11. Each probe below hits one trained index:
        // pc=0 -> 3, pc=3 -> 0, pc=2 -> 1.
        assert_eq!(p.predict(0), Outcome::T);
        assert_eq!(p.predict(3), Outcome::T);
        assert_eq!(p.predict(2), Outcome::T);
        // pc=1 -> index 2, which was never visited.
        assert_eq!(p.predict(1), Outcome::N);
    }

    #[test]
    fn repeated_outcomes_saturate_a_stable_index() {
        // An always-taken branch at pc=0 pins the index once history
        // saturates to all ones.
        let mut p = gshare(4);
        for _ in 0..16 {
            p.train(0, Outcome::T);
        }
        assert_eq!(p.predict(0), Outcome::T);

        // One not-taken outcome must not flip a saturated counter.
        let idx_before = p.index(0);
        p.train(0, Outcome::N);
        assert_eq!(p.pht.predict(idx_before), Outcome::T);
    }

    #[test]
    fn aliasing_is_by_design() {
        // pc bits above the table width are ignored.
        let p = gshare(4);
        assert_eq!(p.index(0x3), p.index(0x10003));
    }
}
