//! Cross-tabulation of two discrete columns.

use crate::{schema, DataFrame, Result};
use std::collections::BTreeMap;

/// Counts of label × category combinations.
///
/// Rows are the distinct values of the label column, columns the distinct
/// values of the data column, both in sorted observed order. Cells with no
/// rows hold zero. Rows where either column is null are skipped.
#[derive(Debug, Clone)]
pub struct CrossTab {
    /// Distinct label values, sorted (one matrix row each).
    pub labels: Vec<String>,
    /// Distinct category values, sorted (one matrix column each).
    pub categories: Vec<String>,
    /// Count matrix, `counts[label_idx][category_idx]`.
    pub counts: Vec<Vec<u32>>,
}

impl CrossTab {
    /// Tabulate `label_col` × `data_col` counts from a frame.
    pub fn from_dataframe(df: &DataFrame, data_col: &str, label_col: &str) -> Result<Self> {
        let categories = schema::string_values(df, data_col)?;
        let labels = schema::string_values(df, label_col)?;

        let mut cells: BTreeMap<(String, String), u32> = BTreeMap::new();
        for (label, category) in labels.iter().zip(categories.iter()) {
            if let (Some(label), Some(category)) = (label, category) {
                *cells.entry((label.clone(), category.clone())).or_insert(0) += 1;
            }
        }

        let labels = super::sort_observed(
            cells
                .keys()
                .map(|(l, _)| l.clone())
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect(),
        );
        let categories = super::sort_observed(
            cells
                .keys()
                .map(|(_, c)| c.clone())
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect(),
        );

        let counts = labels
            .iter()
            .map(|label| {
                categories
                    .iter()
                    .map(|category| {
                        cells
                            .get(&(label.clone(), category.clone()))
                            .copied()
                            .unwrap_or(0)
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            labels,
            categories,
            counts,
        })
    }

    /// Row-normalized proportions: each label row sums to 1.
    ///
    /// A label with no counted rows cannot occur (labels are observed), so
    /// every row total is positive.
    pub fn proportions(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .map(|row| {
                let total: u32 = row.iter().sum();
                row.iter()
                    .map(|&count| f64::from(count) / f64::from(total))
                    .collect()
            })
            .collect()
    }
}
