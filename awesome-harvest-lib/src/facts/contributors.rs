/// One minus the top contributor's share of all commits.
///
/// `None` when there are no contributors or no commits.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "commit counts are far below 2^52")]
pub fn distribution_score(totals: &[u64]) -> Option<f64> {
    let sum: u64 = totals.iter().sum();
    let max = totals.iter().copied().max()?;

    if sum == 0 {
        return None;
    }

    Some(1.0 - max as f64 / sum as f64)
}
