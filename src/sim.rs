//! Replaying branch records through a predictor.

use crate::Outcome;
use crate::predictor::DirectionPredictor;
use crate::stats::TraceStats;
use crate::trace::BranchRecord;

/// Predict and then train on each record in order, returning the
/// statistics collected along the way.
pub fn replay<'a>(p: &mut impl DirectionPredictor,
    records: impl IntoIterator<Item = &'a BranchRecord>) -> TraceStats
{
    let mut stat = TraceStats::new();
    for record in records {
        let prediction = step(p, record);
        stat.update(record, prediction);
    }
    stat
}

/// Make a prediction for a single record, then train the predictor with the
/// resolved outcome. Returns the prediction.
pub fn step(p: &mut impl DirectionPredictor, record: &BranchRecord)
    -> Outcome
{
    let prediction = p.predict(record.pc);
    p.train(record.pc, record.outcome);
    prediction
}

/// Return the sequence of predictions made while replaying some records.
pub fn predictions<'a>(p: &mut impl DirectionPredictor,
    records: impl IntoIterator<Item = &'a BranchRecord>) -> Vec<Outcome>
{
    records.into_iter().map(|r| step(p, r)).collect()
}
