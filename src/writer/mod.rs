//! Output writer abstraction layer.
//!
//! Writers turn a [`Chart`] into a concrete output format. Chart display is
//! the host's job: a Vega-Lite spec is handed to vega-embed (or any other
//! Vega-Lite host), which also owns save/export.
//!
//! # Example
//!
//! ```rust,ignore
//! use plotkit::{ChartBuilder, VegaLiteWriter, Writer};
//!
//! let chart = ChartBuilder::new(df).plot_boxplot("value", "group", None)?;
//! let json = VegaLiteWriter::new().write(&chart)?;
//! ```

use crate::{Chart, Result};

pub mod vegalite;

pub use vegalite::VegaLiteWriter;

/// Trait for chart output writers.
///
/// # Associated Types
///
/// * `Output` - The type returned by `write()`. `String` for text formats,
///   `Vec<u8>` for binary ones.
pub trait Writer {
    /// The output type produced by this writer.
    type Output;

    /// Generate output from a chart description.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PlotError::WriterError`] if the chart's data cannot
    /// be represented in this writer's format or output generation fails.
    fn write(&self, chart: &Chart) -> Result<Self::Output>;
}
