use crate::engine::MergeOutput;
use crate::error::ReconError;
use crate::model::MergeSummary;

/// Compute registry counts and check that every input landed in exactly one
/// row: `total == old + new - matched`.
pub fn compute_summary(
    output: &MergeOutput,
    old_records: usize,
    new_records: usize,
) -> Result<MergeSummary, ReconError> {
    let matched = output.matched;
    let expected = old_records + new_records - matched;
    let total = output.records.len();
    if total != expected {
        return Err(ReconError::Accounting {
            expected,
            actual: total,
        });
    }

    Ok(MergeSummary {
        old_records,
        new_records,
        matched,
        old_only: old_records - matched,
        new_only: new_records - matched,
        total,
    })
}
