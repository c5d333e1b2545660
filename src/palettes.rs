//! Fixed qualitative color palettes.
//!
//! Hex tables for the ColorBrewer palettes the charts use. Writers map a
//! palette onto the color scale's output range; when a chart carries no
//! palette the output format's default categorical colors apply.

/// ColorBrewer Set2 - saturated qualitative palette (boxplots).
pub const SET2: &[&str] = &[
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

/// ColorBrewer Pastel2 - muted qualitative palette (stacked bars).
pub const PASTEL2: &[&str] = &[
    "#b3e2cd", "#fdcdac", "#cbd5e8", "#f4cae4", "#e6f5c9", "#fff2ae", "#f1e2cc", "#cccccc",
];

/// Look up a qualitative palette by name.
pub fn get_color_palette(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "set2" => Some(SET2),
        "pastel2" => Some(PASTEL2),
        _ => None,
    }
}
