//! Trivial predictors that guess an outcome without accepting feedback
//! from the rest of the machine.

use crate::branch::Outcome;
use crate::predictor::BranchPredictor;

/// Always predicts taken.
pub struct TakenPredictor;
impl BranchPredictor for TakenPredictor {
    fn name(&self) -> &'static str { "static" }
    fn predict(&self, _pc: usize) -> Outcome { Outcome::T }
    fn train(&mut self, _pc: usize, _outcome: Outcome) {}
}

/// Always predicts not-taken.
pub struct NotTakenPredictor;
impl BranchPredictor for NotTakenPredictor {
    fn name(&self) -> &'static str { "not-taken" }
    fn predict(&self, _pc: usize) -> Outcome { Outcome::N }
    fn train(&mut self, _pc: usize, _outcome: Outcome) {}
}

/// Predicts a uniformly random direction.
pub struct RandomPredictor;
impl BranchPredictor for RandomPredictor {
    fn name(&self) -> &'static str { "random" }
    fn predict(&self, _pc: usize) -> Outcome {
        rand::random::<bool>().into()
    }
    fn train(&mut self, _pc: usize, _outcome: Outcome) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_predictor_always_takes() {
        let mut p = TakenPredictor;
        for pc in [0usize, 0x100, 0xffff_ffff] {
            assert_eq!(p.predict(pc), Outcome::T);
            p.train(pc, Outcome::N);
            assert_eq!(p.predict(pc), Outcome::T);
        }
    }

    #[test]
    fn not_taken_predictor_never_takes() {
        let p = NotTakenPredictor;
        assert_eq!(p.predict(0x4000), Outcome::N);
    }
}
