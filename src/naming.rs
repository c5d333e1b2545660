//! Naming conventions for derived columns.
//!
//! Stat transforms add columns to derived frames; the names are centralised
//! here so builders, stats and writers agree on them.

/// Count column added by the binning stat.
pub const COUNT_COLUMN: &str = "count";

/// Density column added by the KDE stat.
pub const DENSITY_COLUMN: &str = "density";

/// Proportion column of the long-form frame the stacked bar builder
/// assembles from crosstab output.
pub const PROPORTION_COLUMN: &str = "proportion";

/// Synthetic field carrying an annotation's vertical position. The double
/// underscore pattern keeps synthetic names clear of user column names.
pub const ANNOTATION_Y_FIELD: &str = "__plotkit_annotation_y__";

/// Synthetic field carrying an annotation's text.
pub const ANNOTATION_TEXT_FIELD: &str = "__plotkit_annotation_text__";

/// Name of the bin-category column derived from a data column.
pub fn binned_column(data_col: &str) -> String {
    format!("{data_col}_binned")
}

/// Name of the percent-of-label column derived from a data column.
pub fn percent_column(data_col: &str) -> String {
    format!("{data_col}_percent")
}
