//! Chart points: bodies, sensitive points and derived points

use std::fmt;
use std::str::FromStr;

use super::normalize;

/// Identity of every point a chart can carry
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointId {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    /// Black Moon Lilith (mean lunar apogee)
    Lilith,
    /// Mean lunar node, the head of the node axis
    NorthNode,
    /// Always `NorthNode + 180°`; never queried from the ephemeris
    SouthNode,
    Ascendant,
    Midheaven,
}

impl PointId {
    /// Bodies whose positions come from the ephemeris, in display order
    pub const BODIES: [PointId; 13] = [
        PointId::Sun,
        PointId::Moon,
        PointId::Mercury,
        PointId::Venus,
        PointId::Mars,
        PointId::Jupiter,
        PointId::Saturn,
        PointId::Uranus,
        PointId::Neptune,
        PointId::Pluto,
        PointId::Chiron,
        PointId::Lilith,
        PointId::NorthNode,
    ];

    /// Every point identity
    pub const ALL: [PointId; 16] = [
        PointId::Sun,
        PointId::Moon,
        PointId::Mercury,
        PointId::Venus,
        PointId::Mars,
        PointId::Jupiter,
        PointId::Saturn,
        PointId::Uranus,
        PointId::Neptune,
        PointId::Pluto,
        PointId::Chiron,
        PointId::Lilith,
        PointId::NorthNode,
        PointId::SouthNode,
        PointId::Ascendant,
        PointId::Midheaven,
    ];

    pub fn is_luminary(self) -> bool {
        matches!(self, PointId::Sun | PointId::Moon)
    }

    /// Ascendant and midheaven: fixed axes, not swept for collisions
    pub fn is_sensitive(self) -> bool {
        matches!(self, PointId::Ascendant | PointId::Midheaven)
    }

    pub fn is_derived(self) -> bool {
        matches!(self, PointId::SouthNode)
    }

    /// True for the head/tail pair, which is in exact opposition by construction
    pub fn is_node_axis(a: PointId, b: PointId) -> bool {
        matches!(
            (a, b),
            (PointId::NorthNode, PointId::SouthNode) | (PointId::SouthNode, PointId::NorthNode)
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            PointId::Sun => "Sun",
            PointId::Moon => "Moon",
            PointId::Mercury => "Mercury",
            PointId::Venus => "Venus",
            PointId::Mars => "Mars",
            PointId::Jupiter => "Jupiter",
            PointId::Saturn => "Saturn",
            PointId::Uranus => "Uranus",
            PointId::Neptune => "Neptune",
            PointId::Pluto => "Pluto",
            PointId::Chiron => "Chiron",
            PointId::Lilith => "Lilith",
            PointId::NorthNode => "North Node",
            PointId::SouthNode => "South Node",
            PointId::Ascendant => "ASC",
            PointId::Midheaven => "MC",
        }
    }

    /// Glyph drawn on the chart; sensitive points use their short label
    pub fn symbol(self) -> &'static str {
        match self {
            PointId::Sun => "☉",
            PointId::Moon => "☽",
            PointId::Mercury => "☿",
            PointId::Venus => "♀",
            PointId::Mars => "♂",
            PointId::Jupiter => "♃",
            PointId::Saturn => "♄",
            PointId::Uranus => "♅",
            PointId::Neptune => "♆",
            PointId::Pluto => "♇",
            PointId::Chiron => "⚷",
            PointId::Lilith => "⚸",
            PointId::NorthNode => "☊",
            PointId::SouthNode => "☋",
            PointId::Ascendant => "ASC",
            PointId::Midheaven => "MC",
        }
    }

    /// Snake-case key used in ephemeris tables and stylesheet tokens
    pub fn key(self) -> &'static str {
        match self {
            PointId::Sun => "sun",
            PointId::Moon => "moon",
            PointId::Mercury => "mercury",
            PointId::Venus => "venus",
            PointId::Mars => "mars",
            PointId::Jupiter => "jupiter",
            PointId::Saturn => "saturn",
            PointId::Uranus => "uranus",
            PointId::Neptune => "neptune",
            PointId::Pluto => "pluto",
            PointId::Chiron => "chiron",
            PointId::Lilith => "lilith",
            PointId::NorthNode => "north_node",
            PointId::SouthNode => "south_node",
            PointId::Ascendant => "ascendant",
            PointId::Midheaven => "midheaven",
        }
    }

    /// Stylesheet token for this point's color
    pub fn color_token(self) -> String {
        format!("body-{}", self.key().replace('_', "-"))
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for PointId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        PointId::ALL
            .into_iter()
            .find(|id| id.key() == key)
            .ok_or_else(|| format!("unknown point '{}'", s))
    }
}

/// A point placed on the zodiac
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point {
    pub id: PointId,
    /// Ecliptic longitude in `[0, 360)`
    pub longitude: f64,
    /// Negative apparent speed; always false for sensitive and derived points
    pub retrograde: bool,
}

impl Point {
    pub fn new(id: PointId, longitude: f64, retrograde: bool) -> Self {
        Self {
            id,
            longitude: normalize(longitude),
            retrograde: retrograde && !id.is_sensitive() && !id.is_derived(),
        }
    }

    /// A point with no motion flag (axes, derived points, test fixtures)
    pub fn fixed(id: PointId, longitude: f64) -> Self {
        Self::new(id, longitude, false)
    }

    /// Build a point from an ephemeris longitude and speed
    pub fn from_motion(id: PointId, longitude: f64, speed: f64) -> Self {
        Self::new(id, longitude, speed < 0.0)
    }

    /// The tail of the node axis, recomputed from the head
    pub fn south_node_of(head: &Point) -> Self {
        Self::fixed(PointId::SouthNode, head.longitude + 180.0)
    }

    pub fn is_luminary(&self) -> bool {
        self.id.is_luminary()
    }
}
