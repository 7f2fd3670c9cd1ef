//! Annotator-agreement math for the discrepancy engine.
//!
//! An example is auto-flagged as discrepant when no single label reaches
//! the project's configured percentage of the total votes. An example with
//! zero annotations is never flagged.

use std::collections::BTreeMap;

/// Vote count for one label on one example.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVotes {
    pub label: String,
    pub count: i64,
}

/// Per-label percentage shares of the total vote count.
///
/// Returns an empty map when there are no votes at all.
pub fn label_shares(votes: &[LabelVotes]) -> BTreeMap<String, f64> {
    let total: i64 = votes.iter().map(|v| v.count).sum();
    if total <= 0 {
        return BTreeMap::new();
    }
    votes
        .iter()
        .map(|v| (v.label.clone(), v.count as f64 / total as f64 * 100.0))
        .collect()
}

/// The largest single-label share, or `None` when there are no votes.
pub fn max_label_share(votes: &[LabelVotes]) -> Option<f64> {
    let shares = label_shares(votes);
    shares.values().cloned().fold(None, |acc, s| match acc {
        Some(m) if m >= s => Some(m),
        _ => Some(s),
    })
}

/// Whether an example's vote distribution counts as a discrepancy under
/// `threshold_pct`.
///
/// The comparison is strict: a max share exactly equal to the threshold is
/// NOT a discrepancy. Ties between labels are not special-cased; only the
/// single max share matters.
pub fn is_discrepant(votes: &[LabelVotes], threshold_pct: f64) -> bool {
    match max_label_share(votes) {
        Some(max) => max < threshold_pct,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn votes(pairs: &[(&str, i64)]) -> Vec<LabelVotes> {
        pairs
            .iter()
            .map(|(l, c)| LabelVotes {
                label: l.to_string(),
                count: *c,
            })
            .collect()
    }

    #[test]
    fn zero_annotations_never_flagged() {
        assert!(!is_discrepant(&[], 50.0));
        assert!(!is_discrepant(&[], 100.0));
        assert_eq!(max_label_share(&[]), None);
    }

    #[test]
    fn even_split_at_threshold_is_not_flagged() {
        // 3 positive / 3 negative at threshold 50: max share == 50, not < 50.
        let v = votes(&[("positive", 3), ("negative", 3)]);
        assert_eq!(max_label_share(&v), Some(50.0));
        assert!(!is_discrepant(&v, 50.0));
    }

    #[test]
    fn majority_above_threshold_is_not_flagged() {
        // 4 positive / 3 negative: max share ~57%, above 50.
        let v = votes(&[("positive", 4), ("negative", 3)]);
        assert!(!is_discrepant(&v, 50.0));

        // 2 positive / 4 negative: max share ~66.7%, above 50.
        let v = votes(&[("positive", 2), ("negative", 4)]);
        assert!(!is_discrepant(&v, 50.0));
    }

    #[test]
    fn below_threshold_is_flagged() {
        // 3/1/1 split: max share 60%, below a 70% threshold.
        let v = votes(&[("positive", 3), ("negative", 1), ("neutral", 1)]);
        let max = max_label_share(&v).unwrap();
        assert!((max - 60.0).abs() < 1e-9);
        assert!(is_discrepant(&v, 70.0));
        assert!(!is_discrepant(&v, 60.0));
    }

    #[test]
    fn shares_sum_to_one_hundred() {
        let v = votes(&[("a", 1), ("b", 2), ("c", 3)]);
        let total: f64 = label_shares(&v).values().sum();
        assert!((total - 100.0).abs() < 1e-9);
    }
}
