//! Chart operations over an owned dataset.

use crate::chart::{Annotation, Channel, Chart, Encoding, Mark};
use crate::stat::bin::{binned_percentages, BinOptions};
use crate::stat::crosstab::CrossTab;
use crate::stat::density::kde_by_group;
use crate::style::{FigSize, PlotStyle};
use crate::{naming, palettes, schema, DataFrame, Result};
use polars::prelude::df;
use tracing::debug;

/// Font size of the stacked-bar percentage labels (not affected by the
/// style's text scale).
const STACK_LABEL_FONT_SIZE: f64 = 15.0;

/// Pixel nudge that places a percentage label slightly left of bar center.
const STACK_LABEL_DX: f64 = -17.0;

/// X tick rotation for the stacked bar plot.
const STACK_TICK_ANGLE: f64 = -45.0;

/// Builds styled charts over a tabular dataset.
///
/// The builder owns its [`DataFrame`] and never mutates it; every operation
/// derives what it needs into an ephemeral [`Chart`]. Styling is explicit
/// per-builder configuration, so builders with different styles coexist.
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    df: DataFrame,
    style: PlotStyle,
}

impl ChartBuilder {
    /// Builder with the default style (darkgrid, text scale 0.5).
    pub fn new(df: DataFrame) -> Self {
        Self::with_style(df, PlotStyle::default())
    }

    /// Builder with an explicit style.
    pub fn with_style(df: DataFrame, style: PlotStyle) -> Self {
        Self { df, style }
    }

    /// The dataset this builder draws from.
    pub fn data(&self) -> &DataFrame {
        &self.df
    }

    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    /// Kernel-density plot of `data_col`, one independently normalized curve
    /// per distinct value of `label_col`. Curves are clipped to each group's
    /// observed range. `figsize` defaults to 10x6.
    pub fn plot_distribution(
        &self,
        data_col: &str,
        label_col: &str,
        figsize: Option<FigSize>,
    ) -> Result<Chart> {
        debug!(data_col, label_col, "building distribution chart");
        let curves = kde_by_group(&self.df, data_col, label_col)?;

        let points: usize = curves.iter().map(|c| c.x.len()).sum();
        let mut x = Vec::with_capacity(points);
        let mut density = Vec::with_capacity(points);
        let mut group = Vec::with_capacity(points);
        for curve in &curves {
            x.extend_from_slice(&curve.x);
            density.extend_from_slice(&curve.density);
            group.extend(std::iter::repeat(curve.label.clone()).take(curve.x.len()));
        }
        let data = df!(
            data_col => x,
            naming::DENSITY_COLUMN => density,
            label_col => group,
        )?;

        Ok(Chart {
            mark: Mark::Line,
            data,
            encoding: Encoding {
                x: Channel::quantitative(data_col),
                y: Channel::quantitative(naming::DENSITY_COLUMN).with_title("Density"),
                color: Some(Channel::nominal(label_col)),
                x_offset: None,
            },
            annotations: Vec::new(),
            palette: None,
            style: self.style,
            figsize: figsize.unwrap_or(FigSize::WIDE),
            x_label_angle: None,
            legend_orient: None,
            show_legend: true,
            display: false,
        })
    }

    /// Horizontal boxplot of `data_col`, one box per distinct value of
    /// `label_col`, boxes colored from the Set2 palette. `figsize` defaults
    /// to 4x6.
    pub fn plot_boxplot(
        &self,
        data_col: &str,
        label_col: &str,
        figsize: Option<FigSize>,
    ) -> Result<Chart> {
        debug!(data_col, label_col, "building boxplot chart");
        schema::require_numeric(&self.df, data_col)?;
        schema::require_discrete(&self.df, label_col)?;
        let data = self.df.select([data_col, label_col])?;

        Ok(Chart {
            mark: Mark::Boxplot,
            data,
            encoding: Encoding {
                x: Channel::quantitative(data_col),
                y: Channel::nominal(label_col),
                color: Some(Channel::nominal(label_col)),
                x_offset: None,
            },
            annotations: Vec::new(),
            palette: Some(palettes::SET2),
            style: self.style,
            figsize: figsize.unwrap_or(FigSize::NARROW),
            x_label_angle: None,
            legend_orient: None,
            show_legend: false,
            display: false,
        })
    }

    /// 100%-stacked bar chart of `data_col` category proportions per
    /// `label_col` value, Pastel2 segments, legend at lower left, x ticks
    /// rotated 45°. Only the bottom segment of each bar is annotated with
    /// its percentage. The chart is flagged for immediate display.
    /// `figsize` defaults to 10x6.
    pub fn plot_stack_barplot(
        &self,
        data_col: &str,
        label_col: &str,
        figsize: Option<FigSize>,
    ) -> Result<Chart> {
        debug!(data_col, label_col, "building stacked bar chart");
        let crosstab = CrossTab::from_dataframe(&self.df, data_col, label_col)?;
        let proportions = crosstab.proportions();

        let cells = crosstab.labels.len() * crosstab.categories.len();
        let mut label_out = Vec::with_capacity(cells);
        let mut category_out = Vec::with_capacity(cells);
        let mut proportion_out = Vec::with_capacity(cells);
        let mut annotations = Vec::with_capacity(crosstab.labels.len());
        for (row, label) in crosstab.labels.iter().enumerate() {
            for (col, category) in crosstab.categories.iter().enumerate() {
                label_out.push(label.clone());
                category_out.push(category.clone());
                proportion_out.push(proportions[row][col]);
            }
            // Only the bottom-most stacked segment carries a label; its
            // cumulative boundary equals its own proportion.
            let bottom = proportions[row][0];
            annotations.push(Annotation {
                x: label.clone(),
                y: bottom,
                text: format!("{:.1}%", bottom * 100.0),
                font_size: STACK_LABEL_FONT_SIZE,
                bold: true,
                dx: STACK_LABEL_DX,
            });
        }
        let data = df!(
            label_col => label_out,
            data_col => category_out,
            naming::PROPORTION_COLUMN => proportion_out,
        )?;

        Ok(Chart {
            mark: Mark::Bar { stacked: true },
            data,
            encoding: Encoding {
                x: Channel::nominal(label_col).with_sort(crosstab.labels.clone()),
                y: Channel::quantitative(naming::PROPORTION_COLUMN).with_title("Proportion"),
                color: Some(Channel::nominal(data_col).with_sort(crosstab.categories.clone())),
                x_offset: None,
            },
            annotations,
            palette: Some(palettes::PASTEL2),
            style: self.style,
            figsize: figsize.unwrap_or(FigSize::WIDE),
            x_label_angle: Some(STACK_TICK_ANGLE),
            legend_orient: Some("bottom-left"),
            show_legend: true,
            display: true,
        })
    }

    /// Grouped bar chart of percentage-of-label within bins of `data_col`,
    /// percent axis fixed to 0-100. Binning policy comes from `options`
    /// (quantiles by default, explicit edges when given). `figsize` defaults
    /// to 10x6.
    pub fn plot_cluster_barplot(
        &self,
        data_col: &str,
        label_col: &str,
        figsize: Option<FigSize>,
        options: &BinOptions,
    ) -> Result<Chart> {
        debug!(data_col, label_col, "building clustered bar chart");
        let data = binned_percentages(&self.df, data_col, label_col, options)?;

        // The binned frame is ordered by bin position; keep that order on
        // the x axis rather than re-sorting the interval names as text.
        let binned_col = naming::binned_column(data_col);
        let casted = schema::column(&data, &binned_col)?
            .as_materialized_series()
            .cast(&polars::prelude::DataType::String)?;
        let mut bin_order: Vec<String> = Vec::new();
        for name in casted.str()?.into_iter().flatten() {
            if bin_order.last().map(String::as_str) != Some(name) {
                bin_order.push(name.to_string());
            }
        }

        Ok(Chart {
            mark: Mark::Bar { stacked: false },
            data,
            encoding: Encoding {
                x: Channel::nominal(&binned_col).with_sort(bin_order),
                y: Channel::quantitative(naming::percent_column(data_col)).with_domain(0.0, 100.0),
                color: Some(Channel::nominal(label_col)),
                x_offset: Some(Channel::nominal(label_col)),
            },
            annotations: Vec::new(),
            palette: None,
            style: self.style,
            figsize: figsize.unwrap_or(FigSize::WIDE),
            x_label_angle: None,
            legend_orient: None,
            show_legend: true,
            display: false,
        })
    }
}
