//! Kernel density estimation, one curve per group.

use crate::{schema, DataFrame, PlotError, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Gaussian kernel normalization constant: 1/sqrt(2*pi)
const GAUSSIAN_NORM: f64 = 0.3989422804014327;

/// Number of evaluation points per curve.
pub const GRID_POINTS: usize = 512;

/// A density estimate for one group of the label column.
#[derive(Debug, Clone)]
pub struct DensityCurve {
    pub label: String,
    /// Evaluation grid, spanning exactly the group's observed range.
    pub x: Vec<f64>,
    /// Density at each grid point; each curve integrates to ~1 on its own.
    pub density: Vec<f64>,
}

/// Estimate one Gaussian KDE per distinct value of `label_col`.
///
/// Bandwidth follows Silverman's rule of thumb (R's `stats::bw.nrd0()`):
/// `0.9 * min(sd, iqr / 1.34) * n^(-1/5)`, computed per group. The grid is
/// clipped to the group's observed `[min, max]`, so curves never
/// extrapolate past the data. Groups are normalized independently, making
/// curve shapes comparable regardless of group size.
pub fn kde_by_group(df: &DataFrame, data_col: &str, label_col: &str) -> Result<Vec<DensityCurve>> {
    let values = schema::numeric_values(df, data_col)?;
    let labels = schema::string_values(df, label_col)?;

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (label, value) in labels.iter().zip(values.iter()) {
        if let (Some(label), Some(value)) = (label, value) {
            if value.is_finite() {
                groups.entry(label.clone()).or_default().push(*value);
            }
        }
    }

    let order = super::sort_observed(groups.keys().cloned().collect());
    let mut curves = Vec::with_capacity(order.len());
    for label in order {
        let mut group = groups.remove(&label).unwrap_or_default();
        group.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        if group.len() < 2 {
            return Err(PlotError::StatError(format!(
                "density for '{data_col}' needs at least two observations in group '{label}'"
            )));
        }
        let (min, max) = (group[0], group[group.len() - 1]);
        if (max - min).abs() < 1e-8 {
            // Zero range is guaranteed to also have zero variance.
            return Err(PlotError::StatError(format!(
                "density for '{data_col}' needs non-zero range data in group '{label}'"
            )));
        }

        let bw = silverman_bandwidth(&group).ok_or_else(|| {
            PlotError::StatError(format!(
                "density for '{data_col}' could not derive a bandwidth in group '{label}'"
            ))
        })?;
        debug!(%label, n = group.len(), bandwidth = bw, "estimated group density");

        let (x, density) = gaussian_kde(&group, bw, min, max);
        curves.push(DensityCurve { label, x, density });
    }
    Ok(curves)
}

/// Silverman's rule-of-thumb bandwidth over sorted values.
///
/// Returns `None` when both the standard deviation and the IQR are zero.
fn silverman_bandwidth(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let sd = (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
    let iqr = quantile_linear(sorted, 0.75) - quantile_linear(sorted, 0.25);

    let mut spread = sd.min(iqr / 1.34);
    if spread <= 0.0 {
        spread = sd.max(iqr / 1.34);
    }
    if spread <= 0.0 || !spread.is_finite() {
        return None;
    }
    Some(0.9 * spread * n.powf(-0.2))
}

/// Linearly interpolated quantile of pre-sorted values (R type 7).
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

/// Evaluate a Gaussian KDE on an evenly spaced grid over `[min, max]`.
fn gaussian_kde(values: &[f64], bw: f64, min: f64, max: f64) -> (Vec<f64>, Vec<f64>) {
    let n = values.len() as f64;
    let step = (max - min) / (GRID_POINTS - 1) as f64;
    let mut grid = Vec::with_capacity(GRID_POINTS);
    let mut density = Vec::with_capacity(GRID_POINTS);
    for i in 0..GRID_POINTS {
        let x = min + step * i as f64;
        let sum: f64 = values
            .iter()
            .map(|v| {
                let u = (x - v) / bw;
                (-0.5 * u * u).exp()
            })
            .sum();
        grid.push(x);
        density.push(sum * GAUSSIAN_NORM / (n * bw));
    }
    (grid, density)
}
