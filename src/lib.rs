/*!
# plotkit - DataFrame charting helpers

Convenience chart construction over tabular data for exploratory analysis.
A [`ChartBuilder`] owns a polars [`DataFrame`] and an explicit [`PlotStyle`];
each of its operations reshapes the table with a standard aggregation
(cross-tabulation, kernel density estimation, binning) and produces a
[`Chart`] value describing one styled plot.

## Example

```rust,ignore
use plotkit::{ChartBuilder, VegaLiteWriter, Writer};

let builder = ChartBuilder::new(df);
let chart = builder.plot_stack_barplot("grade", "cohort", None)?;

let writer = VegaLiteWriter::new();
let json = writer.write(&chart)?;
// Hand the Vega-Lite spec to vega-embed (or any Vega-Lite host) to display.
```

## Architecture

plotkit splits chart production at the stat/render boundary:
- **Stat computation** → [`stat`] reshapes the dataset (crosstab, KDE, binning)
- **Chart assembly** → [`builder`] pairs stat output with marks, encodings and style
- **Output** → rendered via pluggable [`writer`]s (Vega-Lite JSON)

Styling is explicit configuration carried by each chart: two builders with
different styles never interfere, and no process-wide state exists.

## Core Components

- [`builder`] - chart operations over an owned dataset
- [`stat`] - tabular aggregation primitives backing the charts
- [`schema`] - fail-fast column presence and type checks
- [`writer`] - output format abstraction layer
*/

pub mod builder;
pub mod chart;
pub mod naming;
pub mod palettes;
pub mod schema;
pub mod stat;
pub mod style;
pub mod writer;

// Re-export key types for convenience
pub use builder::ChartBuilder;
pub use chart::{Annotation, Channel, ChannelType, Chart, Encoding, Mark};
pub use stat::bin::BinOptions;
pub use style::{FigSize, PlotStyle, Theme};
pub use writer::{VegaLiteWriter, Writer};

// DataFrame abstraction (wraps Polars)
pub use polars::prelude::DataFrame;

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("Missing column: '{0}'")]
    MissingColumn(String),

    #[error("Wrong type for column '{column}': expected {expected}, found {actual}")]
    WrongColumnType {
        column: String,
        expected: &'static str,
        actual: String,
    },

    #[error("Bin label mismatch: {supplied} labels supplied for {produced} bins")]
    BinLabelMismatch { supplied: usize, produced: usize },

    #[error("Stat error: {0}")]
    StatError(String),

    #[error("Output generation error: {0}")]
    WriterError(String),

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, PlotError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use polars::prelude::*;

    /// The canonical ten-rows-per-cohort example: cohort A has grades
    /// x:3, y:7 and cohort B has grades x:5, y:5.
    fn example_df() -> DataFrame {
        let mut cohorts = Vec::new();
        let mut grades = Vec::new();
        for (cohort, grade, n) in [("A", "x", 3), ("A", "y", 7), ("B", "x", 5), ("B", "y", 5)] {
            for _ in 0..n {
                cohorts.push(cohort);
                grades.push(grade);
            }
        }
        df!("cohort" => cohorts, "grade" => grades).unwrap()
    }

    #[test]
    fn test_end_to_end_stacked_bar_annotations() {
        // Only the bottom segment of each bar carries a percentage label.
        let builder = ChartBuilder::new(example_df());
        let chart = builder.plot_stack_barplot("grade", "cohort", None).unwrap();

        assert_eq!(chart.annotations.len(), 2);
        let texts: Vec<&str> = chart.annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["30.0%", "50.0%"]);

        let writer = VegaLiteWriter::new();
        let json = writer.write(&chart).unwrap();
        let spec: serde_json::Value = serde_json::from_str(&json).unwrap();

        // The annotation layer carries exactly the two bottom-segment labels.
        let layers = spec["layer"].as_array().unwrap();
        assert_eq!(layers.len(), 2);
        let texts = layers[1]["data"]["values"].as_array().unwrap();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0][naming::ANNOTATION_TEXT_FIELD], "30.0%");
        assert_eq!(texts[1][naming::ANNOTATION_TEXT_FIELD], "50.0%");
    }

    #[test]
    fn test_end_to_end_distribution_encoding() {
        let df = df!(
            "value" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 2.5, 3.5, 1.5, 4.5, 2.0],
            "group" => ["a", "a", "a", "a", "a", "b", "b", "b", "b", "b"]
        )
        .unwrap();
        let builder = ChartBuilder::new(df);
        let chart = builder.plot_distribution("value", "group", None).unwrap();

        let writer = VegaLiteWriter::new();
        let json = writer.write(&chart).unwrap();
        let spec: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(spec["mark"]["type"], "line");
        assert_eq!(spec["encoding"]["x"]["type"], "quantitative");
        assert_eq!(spec["encoding"]["x"]["field"], "value");
        assert_eq!(spec["encoding"]["y"]["field"], "density");
        assert_eq!(spec["encoding"]["color"]["field"], "group");
        // Default figure size is 10x6 units at 100 px/unit.
        assert_eq!(spec["width"], 1000.0);
        assert_eq!(spec["height"], 600.0);
    }

    #[test]
    fn test_end_to_end_cluster_barplot() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let groups: Vec<&str> = (0..100)
            .map(|i| if i % 2 == 0 { "even" } else { "odd" })
            .collect();
        let df = df!("score" => values, "parity" => groups).unwrap();

        let builder = ChartBuilder::new(df);
        let chart = builder
            .plot_cluster_barplot("score", "parity", None, &BinOptions::default())
            .unwrap();

        let writer = VegaLiteWriter::new();
        let json = writer.write(&chart).unwrap();
        let spec: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(spec["mark"]["type"], "bar");
        assert_eq!(spec["encoding"]["xOffset"]["field"], "parity");
        // Percent axis pinned to 0-100.
        assert_eq!(spec["encoding"]["y"]["scale"]["domain"][0], 0.0);
        assert_eq!(spec["encoding"]["y"]["scale"]["domain"][1], 100.0);
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let builder = ChartBuilder::new(example_df());
        let err = builder.plot_boxplot("nope", "cohort", None).unwrap_err();
        assert!(matches!(err, PlotError::MissingColumn(name) if name == "nope"));
    }

    #[test]
    fn test_builders_do_not_interfere() {
        // Explicit style configuration: a second builder with a different
        // scale leaves the first builder's charts untouched.
        let a = ChartBuilder::new(example_df());
        let b = ChartBuilder::with_style(
            example_df(),
            PlotStyle {
                font_scale: 2.0,
                ..PlotStyle::default()
            },
        );
        let chart_a = a.plot_stack_barplot("grade", "cohort", None).unwrap();
        let chart_b = b.plot_stack_barplot("grade", "cohort", None).unwrap();
        assert_eq!(chart_a.style.font_scale, 0.5);
        assert_eq!(chart_b.style.font_scale, 2.0);
    }
}
