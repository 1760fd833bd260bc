//! Portfolio-wide reductions: totals, means, medians and sector attribution.

use crate::{Error, Result};
use std::collections::HashMap;

/// Sum a numeric field across rows. An empty slice sums to zero.
pub fn sum_by<T, F>(rows: &[T], field: F) -> f64
where
    F: Fn(&T) -> f64,
{
    rows.iter().map(field).sum()
}

/// Arithmetic mean of a numeric field.
///
/// Fails with [`Error::EmptyPortfolio`] when there are no rows.
pub fn mean_by<T, F>(rows: &[T], field: F) -> Result<f64>
where
    F: Fn(&T) -> f64,
{
    if rows.is_empty() {
        return Err(Error::EmptyPortfolio("mean".to_string()));
    }
    Ok(sum_by(rows, field) / rows.len() as f64)
}

/// Mean of a fallible per-row metric, stopping at the first row that fails.
pub fn try_mean_by<T, F>(rows: &[T], field: F) -> Result<f64>
where
    F: Fn(&T) -> Result<f64>,
{
    if rows.is_empty() {
        return Err(Error::EmptyPortfolio("mean".to_string()));
    }
    let mut total = 0.0;
    for row in rows {
        total += field(row)?;
    }
    Ok(total / rows.len() as f64)
}

/// Median of a set of values: the middle value for an odd count, the mean of the two
/// middle values for an even count.
pub fn median(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(Error::EmptyPortfolio("median".to_string()));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Ok(sorted[mid])
    } else {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Sum `value` per distinct `group_key`, returned in ascending order of the sums.
///
/// Groups with equal sums keep the order in which each group first appears in `rows`.
/// Horizontal bar charts rely on this order to draw the largest group on top.
pub fn group_sum<T, K, V>(rows: &[T], group_key: K, value: V) -> Vec<(String, f64)>
where
    K: Fn(&T) -> &str,
    V: Fn(&T) -> f64,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, f64)> = Vec::new();

    for row in rows {
        let key = group_key(row);
        let amount = value(row);
        match index.get(key) {
            Some(&i) => groups[i].1 += amount,
            None => {
                index.insert(key, groups.len());
                groups.push((key.to_string(), amount));
            }
        }
    }

    // sort_by is stable, so ties stay in first-appearance order
    groups.sort_by(|a, b| a.1.total_cmp(&b.1));
    groups
}

/// Herfindahl-Hirschman concentration: the sum of squared group shares.
///
/// Ranges from `1/N` (evenly spread over N groups) to `1.0` (a single group).
pub fn herfindahl_concentration(group_sums: &[(String, f64)]) -> Result<f64> {
    let total: f64 = group_sums.iter().map(|(_, v)| v).sum();
    if group_sums.is_empty() || total == 0.0 {
        return Err(Error::EmptyPortfolio("concentration index".to_string()));
    }

    Ok(group_sums
        .iter()
        .map(|(_, v)| {
            let share = v / total;
            share * share
        })
        .sum())
}

/// Diversification on a 0-100 scale: `(1 - herfindahl) * 100`.
pub fn diversification_score(group_sums: &[(String, f64)]) -> Result<f64> {
    Ok((1.0 - herfindahl_concentration(group_sums)?) * 100.0)
}
