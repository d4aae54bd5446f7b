//! Chart rotation
//!
//! Maps ecliptic longitudes to render bearings so that the ascendant always
//! sits at the left edge of the wheel.
//!
//! ## Convention
//!
//! Bearings are measured counter-clockwise from the positive x axis, in the
//! mathematical sense (the renderer flips y for SVG):
//! - 0° = right
//! - 90° = top
//! - 180° = left, where the ascendant is drawn
//! - 270° = bottom
//!
//! Longitude increases counter-clockwise, so the zodiac runs the way it does
//! on a printed chart.

use crate::zodiac::{normalize, ZodiacSign, DEGREES_PER_SIGN, ZODIAC_DEGREES};

use super::types::{ArcSegment, SignWedge};

/// Render bearing of the ascendant, degrees
pub const ASCENDANT_BEARING: f64 = 180.0;

/// How longitudes are turned into render bearings
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartRotation {
    /// Ascendant pinned to [`ASCENDANT_BEARING`]
    Ascendant { ascendant: f64 },
    /// No ascendant is known (houses undefined); 0° Aries is drawn at the right
    Unrotated,
}

impl ChartRotation {
    /// Rotation for an optional ascendant
    pub fn from_ascendant(ascendant: Option<f64>) -> Self {
        match ascendant {
            Some(ascendant) => ChartRotation::Ascendant {
                ascendant: normalize(ascendant),
            },
            None => ChartRotation::Unrotated,
        }
    }

    /// Whether an ascendant rotation is in effect
    pub fn is_available(&self) -> bool {
        matches!(self, ChartRotation::Ascendant { .. })
    }

    /// Degrees added to every longitude
    pub fn offset(&self) -> f64 {
        match self {
            ChartRotation::Ascendant { ascendant } => ASCENDANT_BEARING - ascendant,
            ChartRotation::Unrotated => 0.0,
        }
    }

    /// Render bearing of a longitude, degrees in `[0, 360)`
    pub fn render_degrees(&self, longitude: f64) -> f64 {
        normalize(longitude + self.offset())
    }

    /// Render bearing of a longitude, radians
    pub fn render_angle(&self, longitude: f64) -> f64 {
        self.render_degrees(longitude).to_radians()
    }

    /// The twelve sign bands in render bearings
    pub fn sign_wedges(&self) -> Vec<SignWedge> {
        ZodiacSign::ALL
            .iter()
            .map(|&sign| {
                let start = self.render_degrees(sign.start());
                let end = self.render_degrees(sign.start() + DEGREES_PER_SIGN);
                SignWedge {
                    sign,
                    arcs: split_arc(start, end),
                    mid_angle: self.render_angle(sign.start() + DEGREES_PER_SIGN / 2.0),
                }
            })
            .collect()
    }
}

/// Split a counter-clockwise arc that may cross the 0° bearing.
///
/// When `end < start` the arc becomes `start..360` and `0..end`; the second
/// piece is dropped when it would be empty.
pub fn split_arc(start: f64, end: f64) -> Vec<ArcSegment> {
    if end >= start {
        return vec![ArcSegment::new(start, end)];
    }

    let mut arcs = vec![ArcSegment::new(start, ZODIAC_DEGREES)];
    if end > 0.0 {
        arcs.push(ArcSegment::new(0.0, end));
    }
    arcs
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ascendant_renders_at_left() {
        for asc in [0.0, 10.0, 123.45, 179.9, 180.0, 270.0, 359.99] {
            let rotation = ChartRotation::from_ascendant(Some(asc));
            assert_relative_eq!(rotation.render_degrees(asc), ASCENDANT_BEARING, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_render_angle_is_radians() {
        let rotation = ChartRotation::from_ascendant(Some(90.0));
        assert_relative_eq!(rotation.render_angle(90.0), std::f64::consts::PI);
        assert_relative_eq!(rotation.render_degrees(0.0), 90.0);
    }

    #[test]
    fn test_unrotated_fallback() {
        let rotation = ChartRotation::from_ascendant(None);
        assert!(!rotation.is_available());
        assert_eq!(rotation.offset(), 0.0);
        assert_eq!(rotation.render_degrees(-30.0), 330.0);
    }

    #[test]
    fn test_split_arc() {
        assert_eq!(split_arc(10.0, 40.0), vec![ArcSegment::new(10.0, 40.0)]);
        assert_eq!(
            split_arc(350.0, 20.0),
            vec![ArcSegment::new(350.0, 360.0), ArcSegment::new(0.0, 20.0)]
        );
        // Ending exactly on the 0° bearing leaves no second piece
        assert_eq!(split_arc(330.0, 0.0), vec![ArcSegment::new(330.0, 360.0)]);
    }

    #[test]
    fn test_wedges_cover_circle_once() {
        let rotation = ChartRotation::from_ascendant(Some(10.0));
        let wedges = rotation.sign_wedges();
        assert_eq!(wedges.len(), 12);

        let total: f64 = wedges
            .iter()
            .flat_map(|w| w.arcs.iter())
            .map(ArcSegment::sweep)
            .sum();
        assert_relative_eq!(total, 360.0, epsilon = 1e-9);

        // Asc 10° puts 0° Aries at bearing 170°, so Libra straddles 0°
        assert_relative_eq!(wedges[0].arcs[0].start, 170.0);
        let split: Vec<_> = wedges.iter().filter(|w| w.arcs.len() == 2).collect();
        assert_eq!(split.len(), 1);
        assert_eq!(split[0].sign, ZodiacSign::Libra);
    }
}
