//! Tabular aggregation primitives backing the charts.
//!
//! Each stat is a pure function over columns extracted from the caller's
//! frame; the frame itself is never mutated.

pub mod bin;
pub mod crosstab;
pub mod density;

use std::cmp::Ordering;

/// Sort observed category values the way a cross-tabulation index sorts:
/// numerically when every key parses as a number, lexicographically
/// otherwise.
pub(crate) fn sort_observed(mut keys: Vec<String>) -> Vec<String> {
    let all_numeric = keys.iter().all(|k| k.parse::<f64>().is_ok());
    if all_numeric {
        keys.sort_by(|a, b| {
            let x: f64 = a.parse().unwrap_or(f64::NAN);
            let y: f64 = b.parse().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        });
    } else {
        keys.sort();
    }
    keys
}
