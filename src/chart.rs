//! Chart description types.
//!
//! A [`Chart`] is the ephemeral product of one builder operation: the
//! stat-transformed data plus the mark, encodings, annotations and style a
//! writer needs to produce output. It holds no handle to the builder and no
//! shared state.

use crate::style::{FigSize, PlotStyle};
use crate::DataFrame;

/// Geometric mark drawn from the chart's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// One line per color group (density curves).
    Line,
    /// Horizontal box-and-whisker composite (Tukey 1.5 IQR whiskers).
    Boxplot,
    /// Bars; stacked when `stacked`, grouped side by side otherwise.
    Bar { stacked: bool },
}

/// Measurement level of an encoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Quantitative,
    Nominal,
}

/// One aesthetic channel bound to a data column.
#[derive(Debug, Clone)]
pub struct Channel {
    pub field: String,
    pub channel_type: ChannelType,
    /// Axis or legend title override; `None` keeps the field name.
    pub title: Option<String>,
    /// Fixed axis domain, e.g. 0-100 for percent axes.
    pub domain: Option<(f64, f64)>,
    /// Explicit category order for discrete channels.
    pub sort: Option<Vec<String>>,
}

impl Channel {
    pub fn quantitative(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            channel_type: ChannelType::Quantitative,
            title: None,
            domain: None,
            sort: None,
        }
    }

    pub fn nominal(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            channel_type: ChannelType::Nominal,
            title: None,
            domain: None,
            sort: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_domain(mut self, min: f64, max: f64) -> Self {
        self.domain = Some((min, max));
        self
    }

    pub fn with_sort(mut self, order: Vec<String>) -> Self {
        self.sort = Some(order);
        self
    }
}

/// Channel assignment for a chart.
#[derive(Debug, Clone)]
pub struct Encoding {
    pub x: Channel,
    pub y: Channel,
    /// Grouping channel; colors one mark per distinct value.
    pub color: Option<Channel>,
    /// Within-x-band offset channel for grouped bars.
    pub x_offset: Option<Channel>,
}

/// A text label pinned to an (x category, y value) position.
#[derive(Debug, Clone)]
pub struct Annotation {
    /// X-band category the text belongs to.
    pub x: String,
    pub y: f64,
    pub text: String,
    pub font_size: f64,
    pub bold: bool,
    /// Horizontal nudge in pixels (negative moves left of band center).
    pub dx: f64,
}

/// A fully described chart, ready for a writer.
#[derive(Debug, Clone)]
pub struct Chart {
    pub mark: Mark,
    /// Stat-transformed data backing the marks.
    pub data: DataFrame,
    pub encoding: Encoding,
    pub annotations: Vec<Annotation>,
    /// Fixed qualitative palette for the color channel; `None` leaves the
    /// writer's default categorical colors.
    pub palette: Option<&'static [&'static str]>,
    pub style: PlotStyle,
    pub figsize: FigSize,
    /// X tick label rotation in degrees; labels are right-aligned when set.
    pub x_label_angle: Option<f64>,
    /// Legend placement, e.g. "bottom-left"; `None` keeps the default.
    pub legend_orient: Option<&'static str>,
    /// Whether the color legend is drawn at all.
    pub show_legend: bool,
    /// Hosts should present this chart immediately after rendering.
    pub display: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_builders() {
        let ch = Channel::quantitative("percent")
            .with_title("Share")
            .with_domain(0.0, 100.0);
        assert_eq!(ch.channel_type, ChannelType::Quantitative);
        assert_eq!(ch.title.as_deref(), Some("Share"));
        assert_eq!(ch.domain, Some((0.0, 100.0)));

        let ch = Channel::nominal("bin").with_sort(vec!["a".into(), "b".into()]);
        assert_eq!(ch.channel_type, ChannelType::Nominal);
        assert_eq!(ch.sort.as_deref().map(|s| s.len()), Some(2));
    }
}
