//! Implementation of a tournament predictor.

use crate::branch::Outcome;
use crate::history::{GlobalHistoryRegister, LocalHistoryTable};
use crate::predictor::counter::SaturatingCounterConfig;
use crate::predictor::table::{CounterTable, PredictorTable};
use crate::predictor::{check_width, BranchPredictor, ConfigError};

/// Configuration for building a [`TournamentPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct TournamentConfig {
    /// Index width of the global and local counter tables
    pub history_bits: usize,

    /// Width of each tracked per-address history value
    pub local_history_bits: usize,

    /// Index width of the local history table
    pub local_index_bits: usize,

    /// Index width of the chooser table
    pub chooser_bits: usize,
}
impl TournamentConfig {
    pub fn build(self) -> Result<TournamentPredictor, ConfigError> {
        check_width("history_bits", self.history_bits)?;
        check_width("local_history_bits", self.local_history_bits)?;
        check_width("local_index_bits", self.local_index_bits)?;
        check_width("chooser_bits", self.chooser_bits)?;

        let two_bit = SaturatingCounterConfig::two_bit();
        Ok(TournamentPredictor {
            global_pht: CounterTable::new(self.history_bits, two_bit),
            local_pht: CounterTable::new(self.history_bits, two_bit),
            lht: LocalHistoryTable::new(
                self.local_index_bits,
                self.local_history_bits,
            ),
            chooser: CounterTable::new(self.chooser_bits, two_bit),
            ghr: GlobalHistoryRegister::new(self.history_bits),
            cfg: self,
        })
    }
}

/// Two competing sub-predictors with a per-address chooser.
///
/// The global side is a gshare-style table. The local side indexes its
/// counter table with the *history value* tracked for the branch address,
/// so it follows per-branch periodic patterns rather than the address
/// itself. The chooser counters reuse the taken/not-taken state space with
/// the taken side meaning "trust the global vote" (the reference encoding:
/// 0 strong local .. 3 strong global).
pub struct TournamentPredictor {
    /// The configuration used to create this object
    pub cfg: TournamentConfig,

    global_pht: CounterTable,
    local_pht: CounterTable,
    lht: LocalHistoryTable,
    chooser: CounterTable,
    ghr: GlobalHistoryRegister,
}

impl TournamentPredictor {
    fn global_index(&self, pc: usize) -> usize {
        let mask = self.global_pht.index_mask();
        (pc ^ self.ghr.value()) & mask
    }

    fn local_index(&self, pc: usize) -> usize {
        self.lht.value(pc) & self.local_pht.index_mask()
    }

    fn chooser_index(&self, pc: usize) -> usize {
        pc & self.chooser.index_mask()
    }
}

impl BranchPredictor for TournamentPredictor {
    fn name(&self) -> &'static str { "tournament" }

    fn predict(&self, pc: usize) -> Outcome {
        let global_vote = self.global_pht.predict(self.global_index(pc));
        let local_vote = self.local_pht.predict(self.local_index(pc));
        match self.chooser.predict(self.chooser_index(pc)) {
            Outcome::T => global_vote,
            Outcome::N => local_vote,
        }
    }

    fn train(&mut self, pc: usize, outcome: Outcome) {
        // Indices and votes must reflect pre-update state; they have to
        // match the values used for the prediction just made.
        let global_idx = self.global_index(pc);
        let local_idx = self.local_index(pc);
        let chooser_idx = self.chooser_index(pc);
        let global_vote = self.global_pht.predict(global_idx);
        let local_vote = self.local_pht.predict(local_idx);

        // Move the chooser toward whichever side was uniquely correct
        if global_vote == outcome && local_vote != outcome {
            self.chooser.entry_mut(chooser_idx).update(Outcome::T);
        } else if global_vote != outcome && local_vote == outcome {
            self.chooser.entry_mut(chooser_idx).update(Outcome::N);
        }

        self.local_pht.entry_mut(local_idx).update(outcome);
        self.global_pht.entry_mut(global_idx).update(outcome);
        self.lht.record(pc, outcome);
        self.ghr.record(outcome);
    }

    fn storage_bits(&self) -> usize {
        self.global_pht.storage_bits()
            + self.local_pht.storage_bits()
            + self.chooser.storage_bits()
            + self.lht.size() * self.cfg.local_history_bits
            + self.ghr.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tournament() -> TournamentPredictor {
        TournamentConfig {
            history_bits: 4,
            local_history_bits: 4,
            local_index_bits: 2,
            chooser_bits: 2,
        }
        .build()
        .unwrap()
    }

    #[test]
    fn initial_prediction_follows_the_local_vote() {
        // The chooser starts weakly-local; both votes start not-taken.
        let mut p = tournament();
        assert_eq!(p.predict(0), Outcome::N);

        // Force the votes apart: global says taken, local says not-taken.
        let gi = p.global_index(0);
        p.global_pht.entry_mut(gi).set_direction(Outcome::T);
        assert_eq!(p.predict(0), Outcome::N);
    }

    #[test]
    fn chooser_saturates_toward_a_consistently_correct_global() {
        let mut p = tournament();
        let pc = 0;

        // Keep the global side right and the local side wrong for the
        // same branch, over and over.
        for _ in 0..8 {
            let gi = p.global_index(pc);
            let li = p.local_index(pc);
            p.global_pht.entry_mut(gi).set_direction(Outcome::T);
            p.global_pht.entry_mut(gi).set_strength(1);
            p.local_pht.entry_mut(li).set_direction(Outcome::N);
            p.local_pht.entry_mut(li).set_strength(1);
            p.train(pc, Outcome::T);
        }

        // The chooser is now strongly global: the prediction follows the
        // global vote even though the local vote disagrees.
        let gi = p.global_index(pc);
        let li = p.local_index(pc);
        p.global_pht.entry_mut(gi).set_direction(Outcome::T);
        p.local_pht.entry_mut(li).set_direction(Outcome::N);
        assert_eq!(p.predict(pc), Outcome::T);

        let ci = p.chooser_index(pc);
        assert_eq!(p.chooser.predict(ci), Outcome::T);
        assert!(!p.chooser.entry(ci).is_weak());

        // And it stays there under more of the same.
        let before = p.chooser.predict(ci);
        for _ in 0..8 {
            let gi = p.global_index(pc);
            let li = p.local_index(pc);
            p.global_pht.entry_mut(gi).set_direction(Outcome::T);
            p.local_pht.entry_mut(li).set_direction(Outcome::N);
            p.train(pc, Outcome::T);
        }
        assert_eq!(p.chooser.predict(ci), before);
        assert!(!p.chooser.entry(ci).is_weak());
    }

    #[test]
    fn chooser_is_unchanged_when_votes_agree() {
        let mut p = tournament();
        let pc = 3;
        let ci = p.chooser_index(pc);

        // Both sides start not-taken; a not-taken outcome makes both
        // correct, so the chooser must not move off weakly-local.
        for _ in 0..4 {
            p.train(pc, Outcome::N);
        }
        assert_eq!(p.chooser.predict(ci), Outcome::N);
        assert!(p.chooser.entry(ci).is_weak());
    }

    #[test]
    fn local_side_learns_a_periodic_pattern() {
        // A strict alternation is invisible to a per-address counter but
        // trivial for history-value indexing: each phase of the pattern
        // trains its own local counter.
        let mut p = TournamentConfig {
            history_bits: 4,
            local_history_bits: 2,
            local_index_bits: 2,
            chooser_bits: 2,
        }
        .build()
        .unwrap();
        let pc = 1;

        let mut outcome = Outcome::T;
        for _ in 0..32 {
            p.train(pc, outcome);
            outcome = !outcome;
        }

        // After warm-up the local counters for the two history phases
        // disagree with each other and match the pattern.
        let even_phase = p.local_pht.predict(0b01);
        let odd_phase = p.local_pht.predict(0b10);
        assert_ne!(even_phase, odd_phase);
    }

    #[test]
    fn update_order_uses_pre_update_votes() {
        // If the local counter were updated before the chooser compared
        // votes, an initially-wrong local side would look correct and the
        // chooser would not move. One round with global right and local
        // wrong must move the chooser off its reset state.
        let mut p = tournament();
        let pc = 0;
        let gi = p.global_index(pc);
        p.global_pht.entry_mut(gi).set_direction(Outcome::T);

        let ci = p.chooser_index(pc);
        assert!(p.chooser.entry(ci).is_weak());
        p.train(pc, Outcome::T);
        assert_eq!(p.chooser.predict(ci), Outcome::T);
    }
}
