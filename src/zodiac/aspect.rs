//! Aspect detection between chart points
//!
//! A pair of points forms an aspect when the minor-arc separation between
//! them lies strictly within the orb of one of the canonical angles. The orb
//! widens when either point is a luminary.

use std::fmt;

use serde::Deserialize;

use super::point::{Point, PointId};
use super::separation;

/// The five major aspects
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl AspectKind {
    pub fn name(self) -> &'static str {
        match self {
            AspectKind::Conjunction => "Conjunction",
            AspectKind::Sextile => "Sextile",
            AspectKind::Square => "Square",
            AspectKind::Trine => "Trine",
            AspectKind::Opposition => "Opposition",
        }
    }

    /// Stylesheet token for aspect lines of this kind
    pub fn style_token(self) -> &'static str {
        match self {
            AspectKind::Conjunction => "aspect-conjunction",
            AspectKind::Sextile => "aspect-sextile",
            AspectKind::Square => "aspect-square",
            AspectKind::Trine => "aspect-trine",
            AspectKind::Opposition => "aspect-opposition",
        }
    }

    pub fn definition(self) -> &'static AspectDefinition {
        &ASPECTS[self as usize]
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// One row of the aspect table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectDefinition {
    pub kind: AspectKind,
    /// Canonical angle in degrees
    pub angle: f64,
    /// Maximum orb before the luminary bonus
    pub orb: f64,
    pub symbol: &'static str,
}

/// Aspect table, indexed by `AspectKind`
pub const ASPECTS: [AspectDefinition; 5] = [
    AspectDefinition {
        kind: AspectKind::Conjunction,
        angle: 0.0,
        orb: 8.0,
        symbol: "☌",
    },
    AspectDefinition {
        kind: AspectKind::Sextile,
        angle: 60.0,
        orb: 4.0,
        symbol: "⚹",
    },
    AspectDefinition {
        kind: AspectKind::Square,
        angle: 90.0,
        orb: 7.0,
        symbol: "□",
    },
    AspectDefinition {
        kind: AspectKind::Trine,
        angle: 120.0,
        orb: 8.0,
        symbol: "△",
    },
    AspectDefinition {
        kind: AspectKind::Opposition,
        angle: 180.0,
        orb: 8.0,
        symbol: "☍",
    },
];

/// Extra orb granted when the Sun or Moon is involved
pub const LUMINARY_ORB_BONUS: f64 = 2.0;

/// A detected aspect between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectMatch {
    pub first: PointId,
    pub second: PointId,
    pub kind: AspectKind,
    /// Minor-arc separation between the two points
    pub separation: f64,
    /// Absolute deviation from the canonical angle
    pub orb: f64,
}

impl AspectMatch {
    pub fn definition(&self) -> &'static AspectDefinition {
        self.kind.definition()
    }

    /// True if this match is between `a` and `b` in either order
    pub fn involves(&self, a: PointId, b: PointId) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// Tunables for aspect detection
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AspectOptions {
    /// Orb bonus when either point is a luminary
    pub luminary_bonus: f64,
    /// Whether ASC and MC take part in aspects
    pub include_sensitive_points: bool,
}

impl Default for AspectOptions {
    fn default() -> Self {
        Self {
            luminary_bonus: LUMINARY_ORB_BONUS,
            include_sensitive_points: true,
        }
    }
}

/// Aspect matcher over a fixed definition table
#[derive(Debug, Clone)]
pub struct AspectEngine {
    definitions: Vec<AspectDefinition>,
    options: AspectOptions,
}

impl Default for AspectEngine {
    fn default() -> Self {
        Self::new(AspectOptions::default())
    }
}

impl AspectEngine {
    pub fn new(options: AspectOptions) -> Self {
        Self {
            definitions: ASPECTS.to_vec(),
            options,
        }
    }

    pub fn options(&self) -> &AspectOptions {
        &self.options
    }

    /// All aspects among one set of points.
    ///
    /// Each unordered pair is tested once against every definition. The node
    /// axis pair is skipped since it is an exact opposition by construction.
    pub fn find(&self, points: &[Point]) -> Vec<AspectMatch> {
        let points: Vec<&Point> = points.iter().filter(|p| self.participates(p)).collect();
        let mut matches = Vec::new();

        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                if a.id == b.id || PointId::is_node_axis(a.id, b.id) {
                    continue;
                }
                matches.extend(self.match_pair(a, b));
            }
        }

        tracing::debug!(points = points.len(), aspects = matches.len(), "aspects found");
        matches
    }

    /// Aspects between two separate sets, e.g. transiting bodies against natal ones.
    ///
    /// `first` of each match comes from `left`, `second` from `right`. Every
    /// cross pair is tested, including a body against its own natal position.
    pub fn find_between(&self, left: &[Point], right: &[Point]) -> Vec<AspectMatch> {
        let mut matches = Vec::new();
        for a in left.iter().filter(|p| self.participates(p)) {
            for b in right.iter().filter(|p| self.participates(p)) {
                matches.extend(self.match_pair(a, b));
            }
        }
        matches
    }

    fn participates(&self, point: &Point) -> bool {
        self.options.include_sensitive_points || !point.id.is_sensitive()
    }

    fn effective_orb(&self, definition: &AspectDefinition, a: &Point, b: &Point) -> f64 {
        if a.is_luminary() || b.is_luminary() {
            definition.orb + self.options.luminary_bonus
        } else {
            definition.orb
        }
    }

    fn match_pair<'a>(
        &'a self,
        a: &'a Point,
        b: &'a Point,
    ) -> impl Iterator<Item = AspectMatch> + 'a {
        let sep = separation(a.longitude, b.longitude);
        self.definitions.iter().filter_map(move |definition| {
            let orb = (sep - definition.angle).abs();
            // Strict: a pair exactly on the orb limit does not match
            (orb < self.effective_orb(definition, a, b)).then_some(AspectMatch {
                first: a.id,
                second: b.id,
                kind: definition.kind,
                separation: sep,
                orb,
            })
        })
    }
}

/// All aspects among `points` with the default table and options
pub fn find_aspects(points: &[Point]) -> Vec<AspectMatch> {
    AspectEngine::default().find(points)
}

/// Cross aspects between two point sets with the default table and options
pub fn find_aspects_between(left: &[Point], right: &[Point]) -> Vec<AspectMatch> {
    AspectEngine::default().find_between(left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: PointId, longitude: f64) -> Point {
        Point::fixed(id, longitude)
    }

    #[test]
    fn test_table_indexed_by_kind() {
        for def in &ASPECTS {
            assert_eq!(def.kind.definition(), def);
        }
    }

    #[test]
    fn test_luminary_bonus_widens_conjunction() {
        let with_sun = find_aspects(&[p(PointId::Sun, 0.0), p(PointId::Saturn, 9.0)]);
        assert_eq!(with_sun.len(), 1);
        assert_eq!(with_sun[0].kind, AspectKind::Conjunction);
        assert_eq!(with_sun[0].orb, 9.0);

        let without = find_aspects(&[p(PointId::Mars, 0.0), p(PointId::Saturn, 9.0)]);
        assert!(without.is_empty());
    }

    #[test]
    fn test_orb_boundary_is_exclusive() {
        let at_limit = find_aspects(&[p(PointId::Mars, 0.0), p(PointId::Saturn, 8.0)]);
        assert!(at_limit.is_empty());

        let below = find_aspects(&[p(PointId::Mars, 0.0), p(PointId::Saturn, 7.0)]);
        assert_eq!(below.len(), 1);

        let sextile_limit = find_aspects(&[p(PointId::Mars, 0.0), p(PointId::Venus, 64.0)]);
        assert!(sextile_limit.is_empty());
        let sextile = find_aspects(&[p(PointId::Mars, 0.0), p(PointId::Venus, 63.0)]);
        assert_eq!(sextile[0].kind, AspectKind::Sextile);
    }

    #[test]
    fn test_symmetric_in_pair_order() {
        let a = p(PointId::Moon, 14.25);
        let b = p(PointId::Sun, 280.5);
        let ab = find_aspects(&[a, b]);
        let ba = find_aspects(&[b, a]);
        assert_eq!(ab.len(), 1);
        assert_eq!(ba.len(), 1);
        assert_eq!(ab[0].kind, ba[0].kind);
        assert_eq!(ab[0].orb, ba[0].orb);
        assert!(ba[0].involves(PointId::Moon, PointId::Sun));
    }

    #[test]
    fn test_wraparound_separation() {
        let matches = find_aspects(&[p(PointId::Mars, 355.0), p(PointId::Jupiter, 2.0)]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].kind, AspectKind::Conjunction);
        assert_eq!(matches[0].separation, 7.0);
    }

    #[test]
    fn test_node_axis_excluded() {
        let head = p(PointId::NorthNode, 100.0);
        let tail = Point::south_node_of(&head);
        assert!(find_aspects(&[head, tail]).is_empty());
    }

    #[test]
    fn test_sensitive_points_can_be_excluded() {
        let points = [p(PointId::Ascendant, 10.0), p(PointId::Mars, 12.0)];
        assert_eq!(find_aspects(&points).len(), 1);

        let engine = AspectEngine::new(AspectOptions {
            include_sensitive_points: false,
            ..AspectOptions::default()
        });
        assert!(engine.find(&points).is_empty());
    }

    #[test]
    fn test_cross_aspects_include_same_body() {
        let natal = [p(PointId::Sun, 100.0)];
        let transit = [p(PointId::Sun, 280.0), p(PointId::Mars, 101.0)];
        let matches = find_aspects_between(&transit, &natal);
        assert_eq!(matches.len(), 2);
        assert!(matches
            .iter()
            .any(|m| m.first == PointId::Sun && m.kind == AspectKind::Opposition));
        assert!(matches
            .iter()
            .any(|m| m.first == PointId::Mars && m.kind == AspectKind::Conjunction));
    }

    #[test]
    fn test_no_points_no_aspects() {
        assert!(find_aspects(&[]).is_empty());
        assert!(find_aspects(&[p(PointId::Sun, 0.0)]).is_empty());
    }
}
