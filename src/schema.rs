//! Column presence and type checks.
//!
//! Every chart operation validates the columns it touches before computing
//! anything, so callers get a descriptive [`PlotError`] instead of whatever
//! the underlying aggregation would raise. Also provides the column
//! extraction helpers the stats are built on.

use crate::{PlotError, Result};
use polars::prelude::{Column, DataFrame, DataType};

/// Whether a dtype is suitable for numeric aggregation (KDE, binning, box
/// extents).
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Whether a dtype is suitable for grouping.
/// Discrete: String, Boolean, Categorical.
pub fn is_discrete_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Boolean) || dtype.is_categorical()
}

/// Look up a column, failing with [`PlotError::MissingColumn`].
pub fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| PlotError::MissingColumn(name.to_string()))
}

/// Look up a column and require a numeric dtype.
pub fn require_numeric<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    let col = column(df, name)?;
    if !is_numeric_dtype(col.dtype()) {
        return Err(PlotError::WrongColumnType {
            column: name.to_string(),
            expected: "a numeric type",
            actual: col.dtype().to_string(),
        });
    }
    Ok(col)
}

/// Look up a column and require a discrete (grouping) dtype.
pub fn require_discrete<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    let col = column(df, name)?;
    if !is_discrete_dtype(col.dtype()) {
        return Err(PlotError::WrongColumnType {
            column: name.to_string(),
            expected: "a discrete type (String, Boolean or Categorical)",
            actual: col.dtype().to_string(),
        });
    }
    Ok(col)
}

/// Extract a numeric column as `f64` values, nulls preserved.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = require_numeric(df, name)?;
    let casted = col.as_materialized_series().cast(&DataType::Float64)?;
    let ca = casted.f64()?;
    Ok(ca.into_iter().collect())
}

/// Extract a discrete column as string values, nulls preserved.
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let col = require_discrete(df, name)?;
    let casted = col.as_materialized_series().cast(&DataType::String)?;
    let ca = casted.str()?;
    Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlotError;
    use polars::prelude::*;

    fn sample() -> DataFrame {
        df!(
            "value" => [1.0f64, 2.0, 3.0],
            "label" => ["a", "b", "a"],
            "flag" => [true, false, true]
        )
        .unwrap()
    }

    #[test]
    fn test_missing_column() {
        let df = sample();
        let err = column(&df, "absent").unwrap_err();
        assert!(matches!(err, PlotError::MissingColumn(name) if name == "absent"));
    }

    #[test]
    fn test_require_numeric_rejects_strings() {
        let df = sample();
        assert!(require_numeric(&df, "value").is_ok());
        let err = require_numeric(&df, "label").unwrap_err();
        assert!(matches!(err, PlotError::WrongColumnType { column, .. } if column == "label"));
    }

    #[test]
    fn test_require_discrete_accepts_bool() {
        let df = sample();
        assert!(require_discrete(&df, "label").is_ok());
        assert!(require_discrete(&df, "flag").is_ok());
        assert!(require_discrete(&df, "value").is_err());
    }

    #[test]
    fn test_numeric_values_casts_integers() {
        let df = df!("n" => [1i32, 2, 3]).unwrap();
        let values = numeric_values(&df, "n").unwrap();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_string_values_preserve_nulls() {
        let df = df!("label" => [Some("a"), None, Some("b")]).unwrap();
        let values = string_values(&df, "label").unwrap();
        assert_eq!(
            values,
            vec![Some("a".to_string()), None, Some("b".to_string())]
        );
    }
}
