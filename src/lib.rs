//! Horoscope - astrological charts from recorded ephemeris data
//!
//! This library turns body longitudes and house cusps into a chart: sign and
//! house per point, aspects between points, and a collision-avoiding wheel
//! layout that renders to SVG.
//!
//! # Example
//!
//! ```rust
//! use horoscope::zodiac::{find_aspects, format_degree, Point, PointId};
//!
//! let sun = Point::fixed(PointId::Sun, 280.5);
//! let saturn = Point::fixed(PointId::Saturn, 283.5);
//!
//! assert_eq!(format_degree(sun.longitude).to_string(), "Capricorn 10°30'");
//! assert_eq!(find_aspects(&[sun, saturn]).len(), 1);
//! ```

pub mod cache;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod layout;
pub mod location;
pub mod logging;
pub mod renderer;
pub mod report;
pub mod stylesheet;
pub mod zodiac;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

pub use chart::{
    compute_chart, parse_moment, progressed_moment, Chart, ChartRequest, ChartScope, ChartService,
    GeoLocation, RingAspects, TransitMoment, Wheel, WheelOptions,
};
pub use ephemeris::{EphemerisProvider, TableEphemeris};
pub use error::ChartError;
pub use layout::{ChartLayout, LayoutConfig, RingKind};
pub use renderer::{render_svg, render_svg_with_stylesheet, SvgConfig};
pub use report::{wheel_report, Report};
pub use stylesheet::Stylesheet;
pub use zodiac::{AspectEngine, AspectOptions};

/// Configuration for the complete pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Aspect detection options
    pub aspects: AspectOptions,
    /// Stylesheet for color resolution
    pub stylesheet: Stylesheet,
}

/// TOML structure for deserializing a configuration file
#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlChartConfig {
    layout: LayoutConfig,
    svg: SvgConfig,
    aspects: AspectOptions,
    /// Palette overrides layered on the default stylesheet
    colors: BTreeMap<String, String>,
}

impl ChartConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ChartError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ChartError::io(path.display().to_string(), e))?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing sections keep defaults
    pub fn from_str(content: &str) -> Result<Self, ChartError> {
        let parsed: TomlChartConfig = toml::from_str(content)?;
        let mut stylesheet = Stylesheet::default();
        stylesheet.colors.extend(parsed.colors);

        Ok(Self {
            layout: parsed.layout,
            svg: parsed.svg,
            aspects: parsed.aspects,
            stylesheet,
        })
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the aspect options
    pub fn with_aspects(mut self, options: AspectOptions) -> Self {
        self.aspects = options;
        self
    }

    /// Layer a stylesheet over the current one
    pub fn with_stylesheet(mut self, stylesheet: &Stylesheet) -> Self {
        self.stylesheet = self.stylesheet.merged_with(stylesheet);
        self
    }

    /// Aspect engine built from these options
    pub fn aspect_engine(&self) -> AspectEngine {
        AspectEngine::new(self.aspects.clone())
    }
}

/// Lay out a wheel and render it to SVG
pub fn render_wheel(wheel: &Wheel, config: &ChartConfig) -> String {
    let chart_layout = layout::compute(wheel, &config.layout);
    render_svg_with_stylesheet(&chart_layout, &config.svg, &config.stylesheet)
}

/// Compute a wheel with `provider` and render it to SVG in one call
pub fn render_chart<P: EphemerisProvider>(
    provider: P,
    request: &ChartRequest,
    options: WheelOptions,
    config: &ChartConfig,
) -> Result<String, ChartError> {
    let service = ChartService::with_engine(provider, config.aspect_engine());
    let wheel = service.wheel(request, options)?;
    Ok(render_wheel(&wheel, config))
}
