//! Numeric helpers shared by the aggregators.

use crate::{Error, Result};
use std::collections::HashMap;
use std::hash::Hash;

/// Sum of all values. An empty slice sums to 0; overflow is an error.
pub fn sum(values: &[i64]) -> Result<i64> {
    values
        .iter()
        .try_fold(0i64, |acc, value| acc.checked_add(*value))
        .ok_or_else(|| Error::Overflow("sum".to_string()))
}

/// Most frequent value.
///
/// When several values share the highest count, the one that first appears
/// earliest in `values` wins.
pub fn mode<T>(values: &[T]) -> Result<&T>
where
    T: Eq + Hash,
{
    let mut counts: HashMap<&T, usize> = HashMap::with_capacity(values.len());
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let max = counts.values().copied().max().unwrap_or(0);

    values
        .iter()
        .find(|value| counts.get(value).copied() == Some(max))
        .ok_or_else(|| Error::EmptyDataset("mode".to_string()))
}

/// Inclusive linear-interpolation percentile, rounded half away from zero.
///
/// `q` is clamped into `[0, 1]`. The input slice is left untouched; sorting
/// happens on a copy.
pub fn percentile(values: &[f64], q: f64) -> Result<i64> {
    if values.is_empty() {
        return Err(Error::EmptyDataset("percentile".to_string()));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q = q.clamp(0.0, 1.0);
    let pos = (sorted.len() - 1) as f64 * q;
    let base = pos.floor() as usize;
    let rest = pos - base as f64;

    let value = match sorted.get(base + 1) {
        Some(next) => sorted[base] + rest * (next - sorted[base]),
        None => sorted[base],
    };

    Ok(value.round() as i64)
}
