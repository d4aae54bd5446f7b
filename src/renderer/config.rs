//! SVG output options
//!
//! Layout geometry is expressed in abstract radius units; `scale` turns those
//! into pixels. Everything here can be set from the `[svg]` table of a chart
//! configuration file.

use serde::Deserialize;

/// How a chart layout is written out as SVG
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    /// Pixels per layout radius unit
    pub scale: f64,

    /// Extra space around the outer rim, in pixels
    pub viewbox_padding: f64,

    /// Body glyph font size, in pixels
    pub glyph_size: f64,

    /// Degree label and house number font size, in pixels
    pub label_size: f64,

    /// Emit an XML declaration before the root element
    pub standalone: bool,

    /// One element per line, indented by group depth
    pub pretty_print: bool,

    /// Prepended to every CSS class, so `hc-` yields `hc-glyph`
    pub class_prefix: Option<String>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            scale: 30.0,
            viewbox_padding: 10.0,
            glyph_size: 16.0,
            label_size: 8.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("hc-".to_string()),
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set glyph and label font sizes together
    pub fn with_font_sizes(mut self, glyph: f64, label: f64) -> Self {
        self.glyph_size = glyph;
        self.label_size = label;
        self
    }

    /// Output suitable for inlining into an HTML page: no XML declaration,
    /// no whitespace between elements
    pub fn inline(mut self) -> Self {
        self.standalone = false;
        self.pretty_print = false;
        self
    }

    /// Replace the class prefix; `None` emits bare class names
    pub fn with_class_prefix(mut self, prefix: Option<&str>) -> Self {
        self.class_prefix = prefix.map(str::to_string);
        self
    }

    /// Outer edge of the drawing in pixels, padding included
    pub fn half_extent(&self, chart_radius: f64) -> f64 {
        chart_radius * self.scale + self.viewbox_padding
    }
}
