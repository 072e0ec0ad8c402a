//! Count-based ranking shared by the classifier, mechanism counter and aggregator.

/// Sort `(key, count)` pairs by descending count.
///
/// The sort is stable, so equal counts keep the order the caller supplied
/// (vocabulary order or first occurrence).
pub fn rank_by_count<T>(mut items: Vec<(T, usize)>) -> Vec<(T, usize)> {
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items
}

/// Percentage of `count` over `total`, 0.0 for an empty corpus.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}
