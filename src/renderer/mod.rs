//! SVG renderer for chart layouts
//!
//! This module takes a [`ChartLayout`](crate::layout::ChartLayout) and
//! produces an SVG string with CSS classes and palette variables for styling.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_svg, render_svg_with_stylesheet};
