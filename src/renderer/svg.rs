//! SVG generation from chart layouts
//!
//! Layout bearings are mathematical angles (counter-clockwise, y up). SVG has
//! y pointing down, so a point at radius `r` and bearing `θ` lands at
//! `x = cx + r·cos θ`, `y = cy − r·sin θ`. The chart center is the origin.

use std::f64::consts::PI;

use crate::layout::{ArcSegment, ChartLayout, RingLayout};
use crate::stylesheet::Stylesheet;
use crate::zodiac::ZODIAC_DEGREES;

use super::SvgConfig;

/// Horizontal alignment of a text element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// A point in SVG user space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<String>,
    elements: Vec<String>,
    chords: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            chords: vec![],
            indent: 1,
        }
    }

    /// Add CSS custom properties from a stylesheet
    pub fn add_stylesheet(&mut self, stylesheet: &Stylesheet) {
        let mut css = String::from(":root {\n");
        for (token, value) in &stylesheet.colors {
            css.push_str(&format!("    --{}: {};\n", token, value));
        }
        css.push_str("  }\n");
        let prefix = self.prefix();
        css.push_str(&format!(
            "  .{}glyph, .{}label {{ dominant-baseline: middle; }}",
            prefix, prefix
        ));
        self.styles.push(css);
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn class_list(&self, kind: &str, classes: &[String]) -> String {
        let prefix = self.prefix();
        std::iter::once(format!("{}{}", prefix, kind))
            .chain(classes.iter().map(|c| format!("{}{}", prefix, c)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Convert a layout radius and bearing (radians) to SVG coordinates
    pub fn polar(&self, radius: f64, angle: f64) -> Point {
        let r = radius * self.config.scale;
        Point {
            x: round(r * angle.cos()),
            y: round(-r * angle.sin()),
        }
    }

    /// Add a circle centered on the chart origin
    pub fn add_circle(&mut self, radius: f64, classes: &[String], styles: &str) {
        let class_list = self.class_list("circle", classes);
        self.elements.push(format!(
            r#"{}<circle class="{}" cx="0" cy="0" r="{}"{}/>"#,
            self.indent_str(),
            class_list,
            round(radius * self.config.scale),
            styles
        ));
    }

    /// Add a radial line between two radii at one bearing
    pub fn add_radial_line(
        &mut self,
        inner: f64,
        outer: f64,
        angle: f64,
        classes: &[String],
        styles: &str,
    ) {
        let from = self.polar(inner, angle);
        let to = self.polar(outer, angle);
        self.add_line(from, to, classes, styles);
    }

    /// Add a line element
    pub fn add_line(&mut self, from: Point, to: Point, classes: &[String], styles: &str) {
        let class_list = self.class_list("line", classes);
        self.elements.push(format!(
            r#"{}<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            self.indent_str(),
            class_list,
            from.x,
            from.y,
            to.x,
            to.y,
            styles
        ));
    }

    /// Add an aspect chord; chords are drawn beneath everything else
    pub fn add_chord(&mut self, from: Point, to: Point, classes: &[String], styles: &str) {
        let class_list = self.class_list("aspect", classes);
        self.chords.push(format!(
            r#"{}<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            self.indent_str(),
            class_list,
            from.x,
            from.y,
            to.x,
            to.y,
            styles
        ));
    }

    /// Add an annular band between two radii over one arc
    pub fn add_band(
        &mut self,
        inner: f64,
        outer: f64,
        arc: &ArcSegment,
        classes: &[String],
        styles: &str,
    ) {
        let class_list = self.class_list("band", classes);
        let d = band_path(
            inner * self.config.scale,
            outer * self.config.scale,
            arc.start,
            arc.end,
        );
        self.elements.push(format!(
            r#"{}<path class="{}" d="{}"{}/>"#,
            self.indent_str(),
            class_list,
            d,
            styles
        ));
    }

    /// Add a text element at a radius and bearing
    pub fn add_text(
        &mut self,
        text: &str,
        radius: f64,
        angle: f64,
        anchor: TextAnchor,
        classes: &[String],
        styles: &str,
    ) {
        let at = self.polar(radius, angle);
        let class_list = self.class_list("text", classes);
        self.elements.push(format!(
            r#"{}<text class="{}" x="{}" y="{}" text-anchor="{}"{}>{}</text>"#,
            self.indent_str(),
            class_list,
            at.x,
            at.y,
            anchor.as_str(),
            styles,
            escape_xml(text)
        ));
    }

    /// Add a group element with optional ID and classes
    pub fn start_group(&mut self, id: Option<&str>, classes: &[String]) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, i)).unwrap_or_default();
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            let prefix = self.prefix();
            format!(
                r#" class="{}""#,
                classes
                    .iter()
                    .map(|c| format!("{}{}", prefix, c))
                    .collect::<Vec<_>>()
                    .join(" ")
            )
        };

        self.elements
            .push(format!("{}<g{}{}>", self.indent_str(), id_attr, class_attr));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string for a chart of the given radius
    pub fn build(self, chart_radius: f64) -> String {
        let half = self.config.half_extent(chart_radius);
        let size = 2.0 * half;

        let nl = self.newline();

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}">"#,
            -half, -half, size, size, size, size
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        for chord in &self.chords {
            svg.push_str(chord);
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Render a layout to an SVG string (with default stylesheet)
pub fn render_svg(layout: &ChartLayout, config: &SvgConfig) -> String {
    render_svg_with_stylesheet(layout, config, &Stylesheet::default())
}

/// Render a layout to an SVG string with a custom stylesheet
pub fn render_svg_with_stylesheet(
    layout: &ChartLayout,
    config: &SvgConfig,
    stylesheet: &Stylesheet,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_stylesheet(stylesheet);

    let dims = &layout.config;

    builder.add_circle(
        dims.chart_radius,
        &["background".to_string()],
        r#" fill="var(--background)" stroke="none""#,
    );

    render_zodiac_band(layout, &mut builder);

    for radius in [dims.sign_ring_inner, dims.sign_ring_outer, dims.aspect_radius] {
        builder.add_circle(
            radius,
            &["ring".to_string()],
            r#" fill="none" stroke="var(--line-ring)""#,
        );
    }

    render_houses(layout, &mut builder);
    render_axes(layout, &mut builder);

    for ring in &layout.rings {
        render_ring(ring, layout, &mut builder);
    }

    for line in &layout.aspects {
        let from = builder.polar(dims.aspect_radius, line.first_angle);
        let to = builder.polar(dims.aspect_radius, line.second_angle);
        builder.add_chord(
            from,
            to,
            &[line.kind.name().to_ascii_lowercase()],
            &format!(r#" stroke="var(--{})""#, line.style_token),
        );
    }

    builder.build(dims.chart_radius)
}

fn render_zodiac_band(layout: &ChartLayout, builder: &mut SvgBuilder) {
    let dims = &layout.config;
    builder.start_group(Some("zodiac"), &["zodiac".to_string()]);

    for wedge in &layout.wedges {
        let parity = if wedge.sign.index() % 2 == 0 {
            "sign-even"
        } else {
            "sign-odd"
        };
        for arc in &wedge.arcs {
            builder.add_band(
                dims.sign_ring_inner,
                dims.sign_ring_outer,
                arc,
                &["sign".to_string(), parity.to_string()],
                &format!(r#" fill="var(--{})" stroke="var(--line-ring)""#, parity),
            );
        }
        builder.add_text(
            wedge.sign.symbol(),
            (dims.sign_ring_inner + dims.sign_ring_outer) / 2.0,
            wedge.mid_angle,
            TextAnchor::Middle,
            &["glyph".to_string()],
            r#" fill="var(--sign-glyph)""#,
        );
    }

    builder.end_group();
}

fn render_houses(layout: &ChartLayout, builder: &mut SvgBuilder) {
    if layout.houses.is_empty() {
        return;
    }
    let dims = &layout.config;
    builder.start_group(Some("houses"), &["houses".to_string()]);

    for house in &layout.houses {
        builder.add_radial_line(
            dims.aspect_radius,
            dims.sign_ring_inner,
            house.cusp_angle,
            &["house".to_string()],
            r#" stroke="var(--line-house)""#,
        );
        builder.add_text(
            &house.number.to_string(),
            dims.house_number_radius,
            house.mid_angle,
            TextAnchor::Middle,
            &["label".to_string(), "house-number".to_string()],
            &format!(
                r#" fill="var(--text-house)" font-size="{}""#,
                builder.config.label_size
            ),
        );
    }

    builder.end_group();
}

fn render_axes(layout: &ChartLayout, builder: &mut SvgBuilder) {
    let dims = &layout.config;
    for axis in &layout.axes {
        // Horizon and meridian run through the wheel: DSC and IC sit opposite
        for angle in [axis.angle, axis.angle + PI] {
            builder.add_radial_line(
                dims.aspect_radius,
                dims.sign_ring_outer,
                angle,
                &["axis".to_string()],
                r#" stroke="var(--line-axis)" stroke-width="2""#,
            );
        }
        builder.add_text(
            axis.label,
            (dims.sign_ring_outer + dims.chart_radius) / 2.0,
            axis.angle,
            TextAnchor::Middle,
            &["label".to_string(), "axis-label".to_string()],
            &format!(
                r#" fill="var(--text-label)" font-size="{}""#,
                builder.config.label_size
            ),
        );
    }
}

fn render_ring(ring: &RingLayout, layout: &ChartLayout, builder: &mut SvgBuilder) {
    let id = format!("ring-{}", ring.kind);
    builder.start_group(Some(&id), &["ring-group".to_string(), ring.kind.to_string()]);

    for placement in &ring.placements {
        let color = format!(r#" fill="var({})""#, css_var(&placement.id.color_token()));

        builder.add_radial_line(
            layout.config.sign_ring_inner - 0.2,
            layout.config.sign_ring_inner,
            placement.angle,
            &["tick".to_string()],
            r#" stroke="var(--line-axis)""#,
        );
        builder.add_text(
            placement.id.symbol(),
            placement.radius,
            placement.angle,
            TextAnchor::Middle,
            &["glyph".to_string(), "body".to_string(), placement.id.key().to_string()],
            &format!(r#"{} font-size="{}""#, color, builder.config.glyph_size),
        );

        let mut label = placement.position.short();
        if placement.retrograde {
            label.push_str(" R");
        }
        builder.add_text(
            &label,
            placement.radius - 0.5,
            placement.angle,
            TextAnchor::Middle,
            &["label".to_string(), "degree".to_string()],
            &format!(
                r#" fill="var(--text-label)" font-size="{}""#,
                builder.config.label_size
            ),
        );
    }

    builder.end_group();
}

fn css_var(token: &str) -> String {
    format!("--{}", token)
}

/// SVG path for an annular sector between two bearings (degrees)
fn band_path(inner: f64, outer: f64, start: f64, end: f64) -> String {
    let sweep = end - start;
    let large_arc = if sweep > ZODIAC_DEGREES / 2.0 { 1 } else { 0 };
    let (start, end) = (start.to_radians(), end.to_radians());

    let at = |r: f64, a: f64| (round(r * a.cos()), round(-r * a.sin()));
    let (ox1, oy1) = at(outer, start);
    let (ox2, oy2) = at(outer, end);
    let (ix2, iy2) = at(inner, end);
    let (ix1, iy1) = at(inner, start);

    // Counter-clockwise on screen is sweep-flag 0
    format!(
        "M{} {} A{} {} 0 {} 0 {} {} L{} {} A{} {} 0 {} 1 {} {} Z",
        ox1,
        oy1,
        outer,
        outer,
        large_arc,
        ox2,
        oy2,
        ix2,
        iy2,
        inner,
        inner,
        large_arc,
        ix1,
        iy1
    )
}

/// Round to two decimals; also turns -0 into 0
fn round(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
