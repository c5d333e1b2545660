//! Binning a numeric column and per-label percentage computation.
//!
//! Backs the clustered bar plot: splits a numeric column into bins (explicit
//! edges or quantiles) and computes, per bin and per label, the percentage of
//! that label's rows falling in the bin.

use crate::{naming, schema, DataFrame, PlotError, Result};
use polars::prelude::df;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Default number of requested quantiles.
pub const DEFAULT_BIN_COUNT: usize = 5;

/// Binning policy for [`binned_percentages`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinOptions {
    /// Requested quantile count; ignored when `edges` is set.
    pub bins: usize,
    /// Explicit ascending bin edges. Overrides quantile binning; values at
    /// or below the first edge or above the last are excluded.
    pub edges: Option<Vec<f64>>,
    /// Display names for the produced bins. Length must match the number of
    /// bins actually produced.
    pub labels: Option<Vec<String>>,
}

impl BinOptions {
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    pub fn with_edges(mut self, edges: Vec<f64>) -> Self {
        self.edges = Some(edges);
        self
    }

    pub fn with_labels(mut self, labels: Vec<impl Into<String>>) -> Self {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }
}

impl Default for BinOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BIN_COUNT,
            edges: None,
            labels: None,
        }
    }
}

/// Bin `data_col` and compute each label's per-bin share of rows.
///
/// Pure over the input frame. Returns a derived frame with columns
/// `{data_col}_binned`, the label column, `count` and `{data_col}_percent`,
/// ordered by (bin position, label).
///
/// Percentages divide a bin's count by the label's total non-null row
/// count, so with explicit edges that exclude values a label's percentages
/// can sum below 100. (bin, label) pairs with no rows are absent from the
/// result, not zero-filled.
///
/// Quantile binning collapses duplicate edges silently; with `options.labels`
/// set, the supplied count must match the bins actually produced or the call
/// fails with [`PlotError::BinLabelMismatch`].
pub fn binned_percentages(
    df: &DataFrame,
    data_col: &str,
    label_col: &str,
    options: &BinOptions,
) -> Result<DataFrame> {
    let values = schema::numeric_values(df, data_col)?;
    let labels = schema::string_values(df, label_col)?;

    let (edges, include_lowest) = match &options.edges {
        Some(edges) => {
            validate_edges(edges)?;
            (edges.clone(), false)
        }
        None => {
            let non_null: Vec<f64> = values.iter().flatten().copied().collect();
            (quantile_edges(&non_null, options.bins, data_col)?, true)
        }
    };
    let bin_count = edges.len() - 1;
    if options.edges.is_none() && bin_count < options.bins {
        warn!(
            requested = options.bins,
            produced = bin_count,
            "duplicate quantile edges dropped"
        );
    }
    let bin_names = bin_names(&edges, options.labels.as_deref(), include_lowest)?;

    // Label totals count every non-null value for the label, binned or not.
    let mut totals: BTreeMap<String, u32> = BTreeMap::new();
    let mut cells: BTreeMap<(usize, String), u32> = BTreeMap::new();
    for (label, value) in labels.iter().zip(values.iter()) {
        let (Some(label), Some(value)) = (label, value) else {
            continue;
        };
        *totals.entry(label.clone()).or_insert(0) += 1;
        if let Some(bin) = assign_bin(*value, &edges, include_lowest) {
            *cells.entry((bin, label.clone())).or_insert(0) += 1;
        }
    }
    debug!(
        bins = bin_count,
        labels = totals.len(),
        occupied = cells.len(),
        "binned rows"
    );

    let mut bin_out = Vec::with_capacity(cells.len());
    let mut label_out = Vec::with_capacity(cells.len());
    let mut count_out = Vec::with_capacity(cells.len());
    let mut percent_out = Vec::with_capacity(cells.len());
    for ((bin, label), count) in &cells {
        bin_out.push(bin_names[*bin].clone());
        label_out.push(label.clone());
        count_out.push(*count);
        percent_out.push(f64::from(*count) * 100.0 / f64::from(totals[label]));
    }

    Ok(df!(
        naming::binned_column(data_col).as_str() => bin_out,
        label_col => label_out,
        naming::COUNT_COLUMN => count_out,
        naming::percent_column(data_col).as_str() => percent_out,
    )?)
}

fn validate_edges(edges: &[f64]) -> Result<()> {
    if edges.len() < 2 {
        return Err(PlotError::StatError(
            "bin edges need at least two cut points".to_string(),
        ));
    }
    if edges.windows(2).any(|w| w[0] >= w[1]) {
        return Err(PlotError::StatError(
            "bin edges must be strictly ascending".to_string(),
        ));
    }
    Ok(())
}

/// Quantile cut points with linear interpolation, duplicates collapsed.
fn quantile_edges(values: &[f64], bins: usize, data_col: &str) -> Result<Vec<f64>> {
    if bins == 0 {
        return Err(PlotError::StatError(
            "quantile binning needs at least one bin".to_string(),
        ));
    }
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Err(PlotError::StatError(format!(
            "cannot bin '{data_col}': no non-null values"
        )));
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut edges: Vec<f64> = (0..=bins)
        .map(|i| quantile_linear(&sorted, i as f64 / bins as f64))
        .collect();
    edges.dedup();
    if edges.len() < 2 {
        return Err(PlotError::StatError(format!(
            "cannot bin '{data_col}': all quantile edges are identical"
        )));
    }
    Ok(edges)
}

/// Linearly interpolated quantile of pre-sorted values.
fn quantile_linear(sorted: &[f64], q: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    if lo + 1 < sorted.len() {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    } else {
        sorted[lo]
    }
}

/// Assign a value to its right-closed interval `(lo, hi]`, or `None` when it
/// falls outside every interval. With `include_lowest` the first interval
/// also admits its lower edge.
fn assign_bin(value: f64, edges: &[f64], include_lowest: bool) -> Option<usize> {
    if include_lowest && value == edges[0] {
        return Some(0);
    }
    (0..edges.len() - 1).find(|&i| value > edges[i] && value <= edges[i + 1])
}

/// Display names for each produced bin: user labels when supplied (count
/// checked), interval notation otherwise.
fn bin_names(
    edges: &[f64],
    user_labels: Option<&[String]>,
    include_lowest: bool,
) -> Result<Vec<String>> {
    let produced = edges.len() - 1;
    if let Some(labels) = user_labels {
        if labels.len() != produced {
            return Err(PlotError::BinLabelMismatch {
                supplied: labels.len(),
                produced,
            });
        }
        return Ok(labels.to_vec());
    }
    Ok((0..produced)
        .map(|i| {
            let open = if include_lowest && i == 0 { '[' } else { '(' };
            format!(
                "{}{}, {}]",
                open,
                format_edge(edges[i]),
                format_edge(edges[i + 1])
            )
        })
        .collect())
}

/// Render an edge with up to three decimals, trailing zeros trimmed but at
/// least one decimal kept.
fn format_edge(value: f64) -> String {
    let s = format!("{value:.3}");
    let trimmed = s.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use polars::prelude::*;

    fn percents(df: &DataFrame, data_col: &str) -> Vec<f64> {
        df.column(&naming::percent_column(data_col))
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    fn counts(df: &DataFrame) -> Vec<u32> {
        df.column(naming::COUNT_COLUMN)
            .unwrap()
            .as_materialized_series()
            .u32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    #[test]
    fn test_quantile_binning_four_equal_bins() {
        // 100 distinct uniformly spaced values, four quantiles: 25 rows each.
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let labels = vec!["g"; 100];
        let df = df!("score" => values, "group" => labels).unwrap();

        let out = binned_percentages(
            &df,
            "score",
            "group",
            &BinOptions::default().with_bins(4),
        )
        .unwrap();
        assert_eq!(out.height(), 4);
        assert_eq!(counts(&out), vec![25, 25, 25, 25]);
        for p in percents(&out, "score") {
            assert_relative_eq!(p, 25.0);
        }
    }

    #[test]
    fn test_duplicate_quantile_edges_collapse() {
        // Heavy ties at the median collapse quantile boundaries; fewer bins
        // result and that is accepted, not an error.
        let values = vec![1.0f64, 1.0, 1.0, 1.0, 2.0];
        let df = df!("v" => values, "g" => vec!["g"; 5]).unwrap();
        let out = binned_percentages(&df, "v", "g", &BinOptions::default().with_bins(4)).unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(counts(&out), vec![5]);
    }

    #[test]
    fn test_explicit_edges_exclude_outside_values() {
        // 0 sits on the first edge (excluded by right-closed cut), 25 is
        // past the last edge. Both still count toward the label's total.
        let df = df!(
            "v" => [0.0f64, 5.0, 25.0],
            "g" => ["a", "a", "a"]
        )
        .unwrap();
        let out = binned_percentages(
            &df,
            "v",
            "g",
            &BinOptions::default().with_edges(vec![0.0, 10.0, 20.0]),
        )
        .unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(counts(&out), vec![1]);
        assert_relative_eq!(percents(&out, "v")[0], 100.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_explicit_edges_bound_bin_count() {
        // k+1 edges yield at most k distinct bin categories.
        let values: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let df = df!("v" => values, "g" => vec!["g"; 30]).unwrap();
        let out = binned_percentages(
            &df,
            "v",
            "g",
            &BinOptions::default().with_edges(vec![0.0, 10.0, 20.0, 30.0]),
        )
        .unwrap();
        assert_eq!(out.height(), 3);
        let total: f64 = percents(&out, "v").iter().sum();
        assert_relative_eq!(total, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_label_count_mismatch_fails() {
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let df = df!("v" => values, "g" => vec!["g"; 10]).unwrap();
        let err = binned_percentages(
            &df,
            "v",
            "g",
            &BinOptions::default()
                .with_bins(2)
                .with_labels(vec!["low", "mid", "high"]),
        )
        .unwrap_err();
        assert!(
            matches!(err, PlotError::BinLabelMismatch { supplied: 3, produced: 2 }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_matching_labels_rename_bins() {
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let df = df!("v" => values, "g" => vec!["g"; 10]).unwrap();
        let out = binned_percentages(
            &df,
            "v",
            "g",
            &BinOptions::default()
                .with_bins(2)
                .with_labels(vec!["low", "high"]),
        )
        .unwrap();
        let bins: Vec<String> = out
            .column("v_binned")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        assert_eq!(bins, vec!["low", "high"]);
    }

    #[test]
    fn test_percentages_sum_to_100_per_label() {
        let values: Vec<f64> = (0..40).map(|i| (i % 13) as f64).collect();
        let labels: Vec<&str> = (0..40).map(|i| if i % 3 == 0 { "a" } else { "b" }).collect();
        let df = df!("v" => values, "g" => labels).unwrap();
        let out = binned_percentages(&df, "v", "g", &BinOptions::default()).unwrap();

        let group: Vec<String> = out
            .column("g")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        let mut sums: std::collections::BTreeMap<String, f64> = Default::default();
        for (label, pct) in group.iter().zip(percents(&out, "v")) {
            *sums.entry(label.clone()).or_insert(0.0) += pct;
        }
        for (label, sum) in sums {
            assert_relative_eq!(sum, 100.0, epsilon = 1e-9, max_relative = 1e-9);
            let _ = label;
        }
    }

    #[test]
    fn test_sparse_bins_are_absent() {
        // Label "b" has no rows in the upper interval; no zero-filled row
        // appears for it.
        let df = df!(
            "v" => [1.0f64, 15.0, 2.0],
            "g" => ["a", "a", "b"]
        )
        .unwrap();
        let out = binned_percentages(
            &df,
            "v",
            "g",
            &BinOptions::default().with_edges(vec![0.0, 10.0, 20.0]),
        )
        .unwrap();
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn test_interval_names_format() {
        let names = bin_names(&[0.0, 2.5, 5.0], None, true).unwrap();
        assert_eq!(names, vec!["[0.0, 2.5]", "(2.5, 5.0]"]);
        let names = bin_names(&[0.0, 2.5, 5.0], None, false).unwrap();
        assert_eq!(names, vec!["(0.0, 2.5]", "(2.5, 5.0]"]);
    }

    #[test]
    fn test_non_numeric_column_rejected() {
        let df = df!("v" => ["x", "y"], "g" => ["a", "b"]).unwrap();
        let err = binned_percentages(&df, "v", "g", &BinOptions::default()).unwrap_err();
        assert!(matches!(err, PlotError::WrongColumnType { .. }));
    }
}
