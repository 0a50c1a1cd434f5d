use crate::types::{ComparisonResult, CumulativeSummary};

/// Sum every result's summary.
///
/// Returns `None` for fewer than two results, since a single repository's
/// totals would just repeat that repository.
#[must_use]
pub fn aggregate<'a, I>(results: I) -> Option<CumulativeSummary>
where
    I: IntoIterator<Item = &'a ComparisonResult>,
{
    let (count, total) = results.into_iter().fold(
        (0usize, CumulativeSummary::default()),
        |(count, acc), result| {
            (
                count + 1,
                CumulativeSummary {
                    files: acc.files + result.summary.files,
                    insertions: acc.insertions + result.summary.insertions,
                    deletions: acc.deletions + result.summary.deletions,
                },
            )
        },
    );
    (count > 1).then_some(total)
}
