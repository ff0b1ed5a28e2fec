//! The record-by-record evaluation loop.

use crate::branch::BranchRecord;
use crate::branch::Outcome;
use crate::predictor::BranchPredictor;
use crate::stats::TraceStats;

/// Evaluate a predictor against a stream of branch records.
///
/// Each conditional record drives exactly one predict-then-train cycle, in
/// input order; the prediction always reflects state from before its own
/// record's training. Records that are not conditional branches are passed
/// over without touching the predictor.
pub fn run(
    predictor: &mut dyn BranchPredictor,
    records: impl IntoIterator<Item = BranchRecord>,
) -> TraceStats {
    run_with(predictor, records, |_, _| {})
}

/// Like [run], but invokes an observer with every record evaluated and the
/// direction predicted for it, before the predictor is trained.
pub fn run_with(
    predictor: &mut dyn BranchPredictor,
    records: impl IntoIterator<Item = BranchRecord>,
    mut observer: impl FnMut(&BranchRecord, Outcome),
) -> TraceStats {
    let mut stats = TraceStats::new();
    for record in records {
        if !record.is_conditional() {
            continue;
        }
        let predicted = predictor.predict(record.pc);
        stats.update_global(&record, predicted);
        stats.update_per_branch(&record, predicted);
        observer(&record, predicted);
        predictor.train(record.pc, record.outcome);
    }
    stats
}
