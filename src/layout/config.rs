//! Configuration for the layout engine

use serde::Deserialize;

use super::types::RingKind;

/// Radii are in chart units; the renderer scales them to pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Forward gap (degrees) below which a point is considered crowded
    pub crowd_threshold: f64,

    /// Radial distance between the base and displaced tiers
    pub displacement_step: f64,

    /// Displaced points never go closer to the center than this
    pub min_radius: f64,

    /// Base radius of the natal ring
    pub natal_radius: f64,

    /// Base radius of the progressed ring
    pub progressed_radius: f64,

    /// Base radius of the transit ring
    pub transit_radius: f64,

    /// Inner edge of the sign band
    pub sign_ring_inner: f64,

    /// Outer edge of the sign band
    pub sign_ring_outer: f64,

    /// Radius at which house numbers are written
    pub house_number_radius: f64,

    /// Radius of the circle aspect chords are drawn on
    pub aspect_radius: f64,

    /// Overall chart radius, including labels
    pub chart_radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            crowd_threshold: 8.0,
            displacement_step: 0.8,
            min_radius: 1.0,
            natal_radius: 7.5,
            progressed_radius: 6.0,
            transit_radius: 4.5,
            sign_ring_inner: 8.0,
            sign_ring_outer: 9.5,
            house_number_radius: 6.5,
            aspect_radius: 3.0,
            chart_radius: 10.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the crowding threshold in degrees
    pub fn with_crowd_threshold(mut self, degrees: f64) -> Self {
        self.crowd_threshold = degrees;
        self
    }

    /// Set the displacement step
    pub fn with_displacement_step(mut self, step: f64) -> Self {
        self.displacement_step = step;
        self
    }

    /// Set the minimum radius for displaced points
    pub fn with_min_radius(mut self, radius: f64) -> Self {
        self.min_radius = radius;
        self
    }

    /// Set the base radius of one ring
    pub fn with_ring_radius(mut self, kind: RingKind, radius: f64) -> Self {
        match kind {
            RingKind::Natal => self.natal_radius = radius,
            RingKind::Progressed => self.progressed_radius = radius,
            RingKind::Transit => self.transit_radius = radius,
        }
        self
    }

    /// Base radius of a ring
    pub fn ring_radius(&self, kind: RingKind) -> f64 {
        match kind {
            RingKind::Natal => self.natal_radius,
            RingKind::Progressed => self.progressed_radius,
            RingKind::Transit => self.transit_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.crowd_threshold, 8.0);
        assert_eq!(config.displacement_step, 0.8);
        assert_eq!(config.min_radius, 1.0);
        assert_eq!(config.ring_radius(RingKind::Natal), 7.5);
        assert_eq!(config.ring_radius(RingKind::Progressed), 6.0);
        assert_eq!(config.ring_radius(RingKind::Transit), 4.5);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new()
            .with_crowd_threshold(10.0)
            .with_displacement_step(0.5)
            .with_ring_radius(RingKind::Transit, 5.0);

        assert_eq!(config.crowd_threshold, 10.0);
        assert_eq!(config.displacement_step, 0.5);
        assert_eq!(config.transit_radius, 5.0);
    }

    #[test]
    fn test_partial_toml() {
        let config: LayoutConfig = toml::from_str("crowd_threshold = 15.0").unwrap();
        assert_eq!(config.crowd_threshold, 15.0);
        assert_eq!(config.natal_radius, 7.5);
    }
}
