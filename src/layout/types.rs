//! Core types for the layout engine

use std::fmt;

use crate::zodiac::{AspectKind, DegreePosition, PointId, ZodiacSign};

use super::config::LayoutConfig;
use super::rotation::ChartRotation;

/// One concentric ring of points
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RingKind {
    Natal,
    Progressed,
    Transit,
}

impl RingKind {
    pub const ALL: [RingKind; 3] = [RingKind::Natal, RingKind::Progressed, RingKind::Transit];

    pub fn name(self) -> &'static str {
        match self {
            RingKind::Natal => "natal",
            RingKind::Progressed => "progressed",
            RingKind::Transit => "transit",
        }
    }
}

impl fmt::Display for RingKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Radial tier of a placed point
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RadialTier {
    #[default]
    Base,
    Displaced,
}

impl RadialTier {
    /// The other tier
    pub fn alternate(self) -> Self {
        match self {
            RadialTier::Base => RadialTier::Displaced,
            RadialTier::Displaced => RadialTier::Base,
        }
    }
}

/// Where a single point is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub id: PointId,
    /// Ecliptic longitude in `[0, 360)`
    pub longitude: f64,
    /// Render bearing in degrees, after rotation
    pub degrees: f64,
    /// Render bearing in radians, after rotation
    pub angle: f64,
    pub tier: RadialTier,
    pub radius: f64,
    pub retrograde: bool,
    pub position: DegreePosition,
}

/// Placements of one ring
#[derive(Debug, Clone, PartialEq)]
pub struct RingLayout {
    pub kind: RingKind,
    pub base_radius: f64,
    /// In sweep order (ascending longitude)
    pub placements: Vec<Placement>,
}

impl RingLayout {
    pub fn placement(&self, id: PointId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }
}

/// Counter-clockwise arc between two render bearings, in degrees, `start <= end`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcSegment {
    pub start: f64,
    pub end: f64,
}

impl ArcSegment {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn sweep(&self) -> f64 {
        self.end - self.start
    }
}

/// One sign's band, split in two if it crosses the 0° bearing
#[derive(Debug, Clone, PartialEq)]
pub struct SignWedge {
    pub sign: ZodiacSign,
    pub arcs: Vec<ArcSegment>,
    /// Bearing of the wedge center, radians
    pub mid_angle: f64,
}

/// A house cusp line and the position of its number
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HouseMarker {
    pub number: u8,
    pub cusp_angle: f64,
    pub mid_angle: f64,
}

/// ASC or MC, drawn at a fixed bearing with a fixed label
#[derive(Debug, Clone, PartialEq)]
pub struct AxisMarker {
    pub id: PointId,
    pub angle: f64,
    pub label: &'static str,
}

/// A chord between two aspecting points
#[derive(Debug, Clone, PartialEq)]
pub struct AspectLine {
    pub first: (RingKind, PointId),
    pub second: (RingKind, PointId),
    pub first_angle: f64,
    pub second_angle: f64,
    pub kind: AspectKind,
    pub style_token: &'static str,
}

/// Everything the renderer needs to draw a wheel
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub rotation: ChartRotation,
    pub config: LayoutConfig,
    pub wedges: Vec<SignWedge>,
    /// Empty when houses are unknown
    pub houses: Vec<HouseMarker>,
    pub axes: Vec<AxisMarker>,
    pub rings: Vec<RingLayout>,
    pub aspects: Vec<AspectLine>,
}

impl ChartLayout {
    pub fn ring(&self, kind: RingKind) -> Option<&RingLayout> {
        self.rings.iter().find(|r| r.kind == kind)
    }
}
