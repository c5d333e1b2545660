//! Explicit chart styling configuration
//!
//! Style is plain data carried by each [`crate::Chart`]: theme, text scale
//! and gridline width. Nothing here touches process-wide state, so charts
//! built from different styles never interfere.

use serde::{Deserialize, Serialize};

/// Default text scale applied to labels, ticks and legends.
pub const DEFAULT_FONT_SCALE: f64 = 0.5;

/// Default gridline width in points.
pub const DEFAULT_GRID_WIDTH: f64 = 0.6;

/// Base font size (points) for axis titles before scaling.
const BASE_TITLE_SIZE: f64 = 11.0;

/// Base font size (points) for tick and legend labels before scaling.
const BASE_LABEL_SIZE: f64 = 10.0;

/// Background theme for a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    /// Muted grey plotting area with white gridlines.
    #[default]
    DarkGrid,
    /// White plotting area with light grey gridlines.
    WhiteGrid,
    /// White plotting area, no gridlines.
    White,
}

/// Figure size in chart units (one unit renders as 100 pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigSize {
    pub width: f64,
    pub height: f64,
}

impl FigSize {
    /// Wide layout used by most charts.
    pub const WIDE: FigSize = FigSize {
        width: 10.0,
        height: 6.0,
    };

    /// Narrow upright layout used by boxplots.
    pub const NARROW: FigSize = FigSize {
        width: 4.0,
        height: 6.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width-to-height ratio.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

impl Default for FigSize {
    fn default() -> Self {
        FigSize::WIDE
    }
}

/// Visual theme applied to every chart a builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    pub theme: Theme,
    /// Multiplier for label, tick and legend text size.
    pub font_scale: f64,
    /// Gridline width in points.
    pub grid_width: f64,
}

impl PlotStyle {
    /// Style with a custom text scale, everything else default.
    pub fn with_font_scale(font_scale: f64) -> Self {
        Self {
            font_scale,
            ..Self::default()
        }
    }

    /// Scaled font size for axis titles.
    pub fn title_font_size(&self) -> f64 {
        BASE_TITLE_SIZE * self.font_scale
    }

    /// Scaled font size for tick and legend labels.
    pub fn label_font_size(&self) -> f64 {
        BASE_LABEL_SIZE * self.font_scale
    }
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            theme: Theme::DarkGrid,
            font_scale: DEFAULT_FONT_SCALE,
            grid_width: DEFAULT_GRID_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_style() {
        let style = PlotStyle::default();
        assert_eq!(style.theme, Theme::DarkGrid);
        assert_relative_eq!(style.font_scale, 0.5);
        assert_relative_eq!(style.grid_width, 0.6);
    }

    #[test]
    fn test_font_sizes_scale() {
        let style = PlotStyle::with_font_scale(2.0);
        assert_relative_eq!(style.title_font_size(), 22.0);
        assert_relative_eq!(style.label_font_size(), 20.0);
    }

    #[test]
    fn test_figsize_aspect() {
        assert_relative_eq!(FigSize::WIDE.aspect(), 10.0 / 6.0);
        assert_relative_eq!(FigSize::new(4.0, 6.0).aspect(), 2.0 / 3.0);
    }

    #[test]
    fn test_style_roundtrips_through_json() {
        let style = PlotStyle::with_font_scale(1.5);
        let json = serde_json::to_string(&style).unwrap();
        let back: PlotStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, style);
    }
}
