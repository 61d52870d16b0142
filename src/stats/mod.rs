//! Summary statistics over queried measurement values
//!
//! The functions here operate on flat numeric collections extracted
//! upstream via path queries; they have no knowledge of the study
//! structure. Every function strips undefined entries (`NaN`) before
//! computing, so a collection containing gaps yields the same statistics
//! as the collection with those entries removed.
//!
//! [`StudyStats`] is a convenience facade composing a [`Study`] reference:
//! it runs a query, extracts the numeric values, and delegates here.

use itertools::Itertools;
use serde_json::Value;

use crate::error::Result;
use crate::models::study::Study;
use crate::query::PathExpr;

/// Default lower percentile of the confidence interval
pub const CI_LOW: f64 = 2.5;
/// Default upper percentile of the confidence interval
pub const CI_HIGH: f64 = 97.5;

/// Extract the numeric entries of a query result, dropping everything else.
#[must_use]
pub fn numeric_values(values: &[Value]) -> Vec<f64> {
    values.iter().filter_map(Value::as_f64).collect()
}

/// Arithmetic mean, `None` for an empty (post-filtering) collection
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    let values = defined(values);
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median, averaging the two middle entries for even-length collections
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    let values = sorted(values);
    let n = values.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(values[n / 2])
    } else {
        Some((values[n / 2 - 1] + values[n / 2]) / 2.0)
    }
}

/// Population standard deviation (ddof = 0)
#[must_use]
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let values = defined(values);
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// The pair of percentile values bounding the central interval.
///
/// Percentiles are linearly interpolated between order statistics.
#[must_use]
pub fn confidence_interval(values: &[f64], low: f64, high: f64) -> Option<(f64, f64)> {
    let values = sorted(values);
    if values.is_empty() {
        return None;
    }
    Some((percentile(&values, low), percentile(&values, high)))
}

/// Occurrence count per distinct value, ascending by value
#[must_use]
pub fn category_counts(values: &[f64]) -> Vec<(f64, usize)> {
    sorted(values)
        .into_iter()
        .dedup_with_count()
        .map(|(count, value)| (value, count))
        .collect()
}

/// The most frequent value and its count; ties resolve to the smallest value
#[must_use]
pub fn mode(values: &[f64]) -> Option<(f64, usize)> {
    category_counts(values)
        .into_iter()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
}

/// Distinct values and their counts as a raw pair.
///
/// Same computation as [`category_counts`], exposed as parallel sequences
/// for callers that consume the two separately.
#[must_use]
pub fn gap_fraction(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    category_counts(values).into_iter().unzip()
}

/// Drop undefined entries
fn defined(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Drop undefined entries and sort ascending
fn sorted(values: &[f64]) -> Vec<f64> {
    let mut values = defined(values);
    values.sort_by(f64::total_cmp);
    values
}

/// Linearly interpolated percentile over a sorted, non-empty collection
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let fraction = rank - lower as f64;
    if lower + 1 < n {
        sorted[lower] + fraction * (sorted[lower + 1] - sorted[lower])
    } else {
        sorted[n - 1]
    }
}

/// Statistics facade over a study: query, extract, compute.
///
/// Holds nothing beyond the study reference.
#[derive(Debug, Clone, Copy)]
pub struct StudyStats<'a> {
    study: &'a Study,
}

impl<'a> StudyStats<'a> {
    /// Wrap a study
    #[must_use]
    pub fn new(study: &'a Study) -> Self {
        Self { study }
    }

    /// Numeric values matched by a query over the cohort tree
    pub fn values(&self, expr: &PathExpr) -> Result<Vec<f64>> {
        Ok(numeric_values(&self.study.query(expr)?))
    }

    /// Mean of the queried values
    pub fn mean(&self, expr: &PathExpr) -> Result<Option<f64>> {
        Ok(mean(&self.values(expr)?))
    }

    /// Median of the queried values
    pub fn median(&self, expr: &PathExpr) -> Result<Option<f64>> {
        Ok(median(&self.values(expr)?))
    }

    /// Population standard deviation of the queried values
    pub fn std_dev(&self, expr: &PathExpr) -> Result<Option<f64>> {
        Ok(std_dev(&self.values(expr)?))
    }

    /// Percentile interval of the queried values
    pub fn confidence_interval(
        &self,
        expr: &PathExpr,
        low: f64,
        high: f64,
    ) -> Result<Option<(f64, f64)>> {
        Ok(confidence_interval(&self.values(expr)?, low, high))
    }

    /// Occurrence counts of the queried values
    pub fn category_counts(&self, expr: &PathExpr) -> Result<Vec<(f64, usize)>> {
        Ok(category_counts(&self.values(expr)?))
    }

    /// Most frequent queried value and its count
    pub fn mode(&self, expr: &PathExpr) -> Result<Option<(f64, usize)>> {
        Ok(mode(&self.values(expr)?))
    }

    /// Distinct queried values and their counts as a raw pair
    pub fn gap_fraction(&self, expr: &PathExpr) -> Result<(Vec<f64>, Vec<usize>)> {
        Ok(gap_fraction(&self.values(expr)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_ignores_undefined_entries() {
        let with_gaps = [70.0, f64::NAN, 80.0];
        assert_eq!(mean(&with_gaps), mean(&[70.0, 80.0]));
        assert_eq!(mean(&with_gaps), Some(75.0));
    }

    #[test]
    fn median_of_even_length_averages_middle() {
        assert_eq!(median(&[1.0, 3.0, 2.0, 4.0]), Some(2.5));
        assert_eq!(median(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn std_dev_is_population() {
        // values 2, 4: mean 3, squared deviations 1, 1 -> sqrt(1) = 1
        assert_eq!(std_dev(&[2.0, 4.0]), Some(1.0));
    }

    #[test]
    fn empty_after_filtering_yields_none() {
        assert_eq!(mean(&[f64::NAN]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(std_dev(&[f64::NAN, f64::NAN]), None);
        assert_eq!(confidence_interval(&[], CI_LOW, CI_HIGH), None);
    }

    #[test]
    fn confidence_interval_interpolates() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let (low, high) = confidence_interval(&values, CI_LOW, CI_HIGH).unwrap();
        assert!((low - 3.475).abs() < 1e-9);
        assert!((high - 97.525).abs() < 1e-9);
    }

    #[test]
    fn category_counts_are_ascending() {
        let counts = category_counts(&[2.0, 1.0, 2.0, f64::NAN]);
        assert_eq!(counts, vec![(1.0, 1), (2.0, 2)]);
    }

    #[test]
    fn mode_ties_resolve_to_smallest() {
        assert_eq!(mode(&[3.0, 1.0, 3.0, 1.0]), Some((1.0, 2)));
        assert_eq!(mode(&[5.0, 5.0, 2.0]), Some((5.0, 2)));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn gap_fraction_mirrors_category_counts() {
        let (values, counts) = gap_fraction(&[1.0, 2.0, 2.0]);
        assert_eq!(values, vec![1.0, 2.0]);
        assert_eq!(counts, vec![1, 2]);
    }
}
