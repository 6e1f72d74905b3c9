//! Group-by helpers over in-memory records. All functions are pure and
//! deterministic: equal counts (or rates) are ordered by key ascending.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count<K> {
    pub key: K,
    pub count: usize,
}

/// Mean of a boolean within one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rate<K> {
    pub key: K,
    pub rate: f64,
    /// Rows where the value was true.
    pub hits: usize,
    /// Rows in the group.
    pub total: usize,
}

/// Number of distinct non-missing keys.
pub fn distinct<T, K, F>(items: &[T], key: F) -> usize
where
    K: Ord,
    F: Fn(&T) -> Option<K>,
{
    items.iter().filter_map(key).collect::<BTreeSet<_>>().len()
}

/// Rows per key, largest group first. Rows whose key is None are skipped.
pub fn count_by<T, K, F>(items: &[T], key: F) -> Vec<Count<K>>
where
    K: Ord,
    F: Fn(&T) -> Option<K>,
{
    count_where(items, key, |_| true)
}

/// Like `count_by`, but only rows passing `counted` add to their group.
/// Groups whose rows all fail `counted` are kept with a count of 0.
pub fn count_where<T, K, F, C>(items: &[T], key: F, counted: C) -> Vec<Count<K>>
where
    K: Ord,
    F: Fn(&T) -> Option<K>,
    C: Fn(&T) -> bool,
{
    let mut groups: BTreeMap<K, usize> = BTreeMap::new();
    for item in items {
        let Some(k) = key(item) else { continue };
        let entry = groups.entry(k).or_default();
        if counted(item) {
            *entry += 1;
        }
    }
    let mut counts: Vec<Count<K>> = groups
        .into_iter()
        .map(|(key, count)| Count { key, count })
        .collect();
    // Stable sort keeps the map's key order for ties.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Mean of `value` per key over rows passing `filter`, highest rate first.
pub fn mean_by<T, K, P, F, V>(items: &[T], filter: P, key: F, value: V) -> Vec<Rate<K>>
where
    K: Ord,
    P: Fn(&T) -> bool,
    F: Fn(&T) -> Option<K>,
    V: Fn(&T) -> bool,
{
    let mut groups: BTreeMap<K, (usize, usize)> = BTreeMap::new();
    for item in items {
        if !filter(item) {
            continue;
        }
        let Some(k) = key(item) else { continue };
        let entry = groups.entry(k).or_default();
        entry.1 += 1;
        if value(item) {
            entry.0 += 1;
        }
    }
    let mut rates: Vec<Rate<K>> = groups
        .into_iter()
        .map(|(key, (hits, total))| Rate {
            key,
            rate: hits as f64 / total as f64,
            hits,
            total,
        })
        .collect();
    rates.sort_by(|a, b| b.rate.total_cmp(&a.rate));
    rates
}

/// The first `n` entries of a ranking produced by `count_by`.
pub fn top_n<K: Clone>(ranked: &[Count<K>], n: usize) -> Vec<Count<K>> {
    ranked.iter().take(n).cloned().collect()
}
