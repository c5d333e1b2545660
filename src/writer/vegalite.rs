//! Vega-Lite JSON writer implementation
//!
//! Converts charts into Vega-Lite v6 specifications for web-based display.
//!
//! # Mapping Strategy
//!
//! - plotkit mark → Vega-Lite mark type
//! - plotkit channels → Vega-Lite encoding channels
//! - plotkit annotations → a text-mark layer
//! - Polars DataFrame → Vega-Lite inline data
//! - PlotStyle → Vega-Lite config (background, grid, fonts)

use crate::chart::{Annotation, Channel, ChannelType, Chart, Encoding, Mark};
use crate::style::{PlotStyle, Theme};
use crate::writer::Writer;
use crate::{naming, DataFrame, PlotError, Result};
use polars::prelude::{Column, DataType};
use serde_json::{json, Map, Value};

/// Pixels rendered per figure unit.
const UNIT_TO_PIXELS: f64 = 100.0;

/// Vega-Lite JSON writer
///
/// Generates Vega-Lite v6 specifications from charts.
pub struct VegaLiteWriter {
    /// Vega-Lite schema version
    schema: String,
}

impl VegaLiteWriter {
    /// Create a new Vega-Lite writer with default settings
    pub fn new() -> Self {
        Self {
            schema: "https://vega.github.io/schema/vega-lite/v6.json".to_string(),
        }
    }

    /// Convert a Polars DataFrame to Vega-Lite data values (array of objects)
    fn dataframe_to_values(&self, df: &DataFrame) -> Result<Vec<Value>> {
        let column_names = df.get_column_names();
        let columns: Vec<Vec<Value>> = df
            .get_columns()
            .iter()
            .map(|col| self.column_values(col))
            .collect::<Result<_>>()?;

        let mut values = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let mut obj = Map::new();
            for (name, column) in column_names.iter().zip(columns.iter()) {
                obj.insert(name.to_string(), column[row].clone());
            }
            values.push(Value::Object(obj));
        }
        Ok(values)
    }

    /// Extract a whole column as JSON values, nulls mapped to `null`.
    fn column_values(&self, column: &Column) -> Result<Vec<Value>> {
        let series = column.as_materialized_series();
        match series.dtype() {
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
                let casted = series.cast(&DataType::Int64)?;
                Ok(casted
                    .i64()?
                    .into_iter()
                    .map(|v| v.map(|v| json!(v)).unwrap_or(Value::Null))
                    .collect())
            }
            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
                let casted = series.cast(&DataType::UInt64)?;
                Ok(casted
                    .u64()?
                    .into_iter()
                    .map(|v| v.map(|v| json!(v)).unwrap_or(Value::Null))
                    .collect())
            }
            DataType::Float32 | DataType::Float64 => {
                let casted = series.cast(&DataType::Float64)?;
                // json! maps non-finite floats to null as well.
                Ok(casted
                    .f64()?
                    .into_iter()
                    .map(|v| v.map(|v| json!(v)).unwrap_or(Value::Null))
                    .collect())
            }
            DataType::Boolean => Ok(series
                .bool()?
                .into_iter()
                .map(|v| v.map(|v| json!(v)).unwrap_or(Value::Null))
                .collect()),
            DataType::String => Ok(series
                .str()?
                .into_iter()
                .map(|v| v.map(|v| json!(v)).unwrap_or(Value::Null))
                .collect()),
            dtype if dtype.is_categorical() => {
                let casted = series.cast(&DataType::String)?;
                Ok(casted
                    .str()?
                    .into_iter()
                    .map(|v| v.map(|v| json!(v)).unwrap_or(Value::Null))
                    .collect())
            }
            other => Err(PlotError::WriterError(format!(
                "unsupported column type {other} in chart data for column '{}'",
                column.name()
            ))),
        }
    }

    fn mark_object(&self, mark: Mark) -> Value {
        match mark {
            Mark::Line => json!({"type": "line"}),
            // Tukey whiskers at 1.5 IQR.
            Mark::Boxplot => json!({"type": "boxplot", "extent": 1.5}),
            Mark::Bar { .. } => json!({"type": "bar"}),
        }
    }

    fn channel_object(&self, channel: &Channel) -> Map<String, Value> {
        let mut obj = Map::new();
        obj.insert("field".to_string(), json!(channel.field));
        let channel_type = match channel.channel_type {
            ChannelType::Quantitative => "quantitative",
            ChannelType::Nominal => "nominal",
        };
        obj.insert("type".to_string(), json!(channel_type));
        if let Some(title) = &channel.title {
            obj.insert("title".to_string(), json!(title));
        }
        if let Some((min, max)) = channel.domain {
            obj.insert("scale".to_string(), json!({"domain": [min, max]}));
        }
        if let Some(sort) = &channel.sort {
            obj.insert("sort".to_string(), json!(sort));
        }
        obj
    }

    fn encoding_object(&self, chart: &Chart) -> Value {
        let Encoding {
            x,
            y,
            color,
            x_offset,
        } = &chart.encoding;

        let mut encoding = Map::new();

        let mut x_obj = self.channel_object(x);
        if let Some(angle) = chart.x_label_angle {
            x_obj.insert(
                "axis".to_string(),
                json!({"labelAngle": angle, "labelAlign": "right"}),
            );
        }
        encoding.insert("x".to_string(), Value::Object(x_obj));
        encoding.insert("y".to_string(), Value::Object(self.channel_object(y)));

        if let Some(color) = color {
            let mut color_obj = self.channel_object(color);
            if let Some(palette) = chart.palette {
                color_obj.insert("scale".to_string(), json!({"range": palette}));
            }
            if !chart.show_legend {
                color_obj.insert("legend".to_string(), Value::Null);
            } else if let Some(orient) = chart.legend_orient {
                color_obj.insert("legend".to_string(), json!({"orient": orient}));
            }
            encoding.insert("color".to_string(), Value::Object(color_obj));

            // Pin the stack order to the category sort so the first
            // category forms the bottom segment.
            if chart.mark == (Mark::Bar { stacked: true }) {
                encoding.insert(
                    "order".to_string(),
                    json!({"field": color.field, "sort": "ascending"}),
                );
            }
        }
        if let Some(x_offset) = x_offset {
            encoding.insert(
                "xOffset".to_string(),
                Value::Object(self.channel_object(x_offset)),
            );
        }
        Value::Object(encoding)
    }

    /// Text layer carrying the chart's annotations.
    ///
    /// Position and text live under synthetic field names so a user column
    /// named `y` or `text` cannot clash with them.
    fn annotation_layer(&self, chart: &Chart, annotations: &[Annotation]) -> Value {
        let x_field = &chart.encoding.x.field;
        let values: Vec<Value> = annotations
            .iter()
            .map(|a| {
                json!({
                    x_field.as_str(): a.x,
                    naming::ANNOTATION_Y_FIELD: a.y,
                    naming::ANNOTATION_TEXT_FIELD: a.text,
                })
            })
            .collect();

        // Annotations of one chart share font properties.
        let first = &annotations[0];
        let mut x_obj = Map::new();
        x_obj.insert("field".to_string(), json!(x_field));
        x_obj.insert("type".to_string(), json!("nominal"));
        if let Some(sort) = &chart.encoding.x.sort {
            x_obj.insert("sort".to_string(), json!(sort));
        }

        json!({
            "data": {"values": values},
            "mark": {
                "type": "text",
                "fontSize": first.font_size,
                "fontWeight": if first.bold { "bold" } else { "normal" },
                "dx": first.dx,
                "baseline": "bottom",
                "color": "black",
            },
            "encoding": {
                "x": Value::Object(x_obj),
                "y": {"field": naming::ANNOTATION_Y_FIELD, "type": "quantitative"},
                "text": {"field": naming::ANNOTATION_TEXT_FIELD, "type": "nominal"},
            }
        })
    }

    fn config_object(&self, style: &PlotStyle) -> Value {
        let (view_fill, grid, grid_color) = match style.theme {
            Theme::DarkGrid => ("#EAEAF2", true, "white"),
            Theme::WhiteGrid => ("white", true, "#DDDDDD"),
            Theme::White => ("white", false, "white"),
        };
        json!({
            "background": "white",
            "view": {"fill": view_fill, "stroke": Value::Null},
            "axis": {
                "grid": grid,
                "gridColor": grid_color,
                "gridWidth": style.grid_width,
                "domain": false,
                "labelFontSize": style.label_font_size(),
                "titleFontSize": style.title_font_size(),
            },
            "legend": {
                "labelFontSize": style.label_font_size(),
                "titleFontSize": style.title_font_size(),
            }
        })
    }
}

impl Default for VegaLiteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for VegaLiteWriter {
    type Output = String;

    fn write(&self, chart: &Chart) -> Result<String> {
        let values = self.dataframe_to_values(&chart.data)?;

        let mut spec = Map::new();
        spec.insert("$schema".to_string(), json!(self.schema));
        spec.insert(
            "width".to_string(),
            json!(chart.figsize.width * UNIT_TO_PIXELS),
        );
        spec.insert(
            "height".to_string(),
            json!(chart.figsize.height * UNIT_TO_PIXELS),
        );
        spec.insert("config".to_string(), self.config_object(&chart.style));
        spec.insert("data".to_string(), json!({"values": values}));

        if chart.annotations.is_empty() {
            spec.insert("mark".to_string(), self.mark_object(chart.mark));
            spec.insert("encoding".to_string(), self.encoding_object(chart));
        } else {
            let base = json!({
                "mark": self.mark_object(chart.mark),
                "encoding": self.encoding_object(chart),
            });
            let text = self.annotation_layer(chart, &chart.annotations);
            spec.insert("layer".to_string(), json!([base, text]));
        }

        serde_json::to_string_pretty(&Value::Object(spec))
            .map_err(|e| PlotError::WriterError(format!("failed to serialize Vega-Lite spec: {e}")))
    }
}
