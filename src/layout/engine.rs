//! Layout computation
//!
//! Turns a [`Wheel`] into a [`ChartLayout`]: render bearings for every point,
//! radial tiers that keep crowded neighbours apart, sign wedges, house
//! markers, axes and aspect chords.

use crate::chart::{Chart, Wheel};
use crate::zodiac::{format_degree, forward_gap, Point, PointId};

use super::config::LayoutConfig;
use super::rotation::ChartRotation;
use super::types::{
    AspectLine, AxisMarker, ChartLayout, HouseMarker, Placement, RadialTier, RingKind, RingLayout,
};

/// Assign a radial tier to each swept point.
///
/// Points are sorted by longitude and folded left to right. A point whose
/// forward gap from its predecessor is below `threshold` takes the opposite
/// tier of that predecessor; any other point returns to the base tier. The
/// first point has no predecessor and is always at the base tier, and the
/// sweep does not wrap from the last point back to the first.
///
/// ASC and MC are not swept.
///
/// Three or more points inside one threshold window alternate tiers but may
/// still overlap; only adjacent pairs are separated.
pub fn assign_tiers(points: &[Point], threshold: f64) -> Vec<(Point, RadialTier)> {
    let mut swept: Vec<Point> = points
        .iter()
        .filter(|p| !p.id.is_sensitive())
        .copied()
        .collect();
    swept.sort_by(|a, b| a.longitude.total_cmp(&b.longitude));

    swept.into_iter().fold(Vec::new(), |mut placed, point| {
        let tier = match placed.last() {
            Some((previous, previous_tier))
                if forward_gap(previous.longitude, point.longitude) < threshold =>
            {
                previous_tier.alternate()
            }
            _ => RadialTier::Base,
        };
        placed.push((point, tier));
        placed
    })
}

/// Radius for a tier of a ring.
///
/// Displaced points move inward by one step, or outward if that would cross
/// the minimum radius.
pub fn tier_radius(tier: RadialTier, base_radius: f64, config: &LayoutConfig) -> f64 {
    match tier {
        RadialTier::Base => base_radius,
        RadialTier::Displaced => {
            let inward = base_radius - config.displacement_step;
            if inward >= config.min_radius {
                inward
            } else {
                base_radius + config.displacement_step
            }
        }
    }
}

/// Lay out one ring independently of every other ring
pub fn layout_ring(
    kind: RingKind,
    points: &[Point],
    rotation: &ChartRotation,
    config: &LayoutConfig,
) -> RingLayout {
    let base_radius = config.ring_radius(kind);

    let placements = assign_tiers(points, config.crowd_threshold)
        .into_iter()
        .map(|(point, tier)| {
            tracing::trace!(ring = %kind, point = %point.id, ?tier, "placed");
            let degrees = rotation.render_degrees(point.longitude);
            Placement {
                id: point.id,
                longitude: point.longitude,
                degrees,
                angle: degrees.to_radians(),
                tier,
                radius: tier_radius(tier, base_radius, config),
                retrograde: point.retrograde,
                position: format_degree(point.longitude),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        ring = %kind,
        points = placements.len(),
        displaced = placements
            .iter()
            .filter(|p| p.tier == RadialTier::Displaced)
            .count(),
        "ring laid out"
    );

    RingLayout {
        kind,
        base_radius,
        placements,
    }
}

fn house_markers(chart: &Chart, rotation: &ChartRotation) -> Vec<HouseMarker> {
    let Some(houses) = chart.houses else {
        return Vec::new();
    };

    (1..=12u8)
        .filter_map(|number| {
            let cusp = houses.cusps.cusp(number)?;
            let mid = houses.cusps.midpoint(number)?;
            Some(HouseMarker {
                number,
                cusp_angle: rotation.render_angle(cusp),
                mid_angle: rotation.render_angle(mid),
            })
        })
        .collect()
}

fn axis_markers(chart: &Chart, rotation: &ChartRotation) -> Vec<AxisMarker> {
    [PointId::Ascendant, PointId::Midheaven]
        .into_iter()
        .filter_map(|id| chart.point(id))
        .map(|point| AxisMarker {
            id: point.id,
            angle: rotation.render_angle(point.longitude),
            label: point.id.symbol(),
        })
        .collect()
}

fn aspect_lines(wheel: &Wheel, rotation: &ChartRotation) -> Vec<AspectLine> {
    let mut lines = Vec::new();

    for ring_aspects in &wheel.aspects {
        let (Some(from), Some(to)) = (wheel.chart(ring_aspects.from), wheel.chart(ring_aspects.to))
        else {
            continue;
        };

        for aspect in &ring_aspects.matches {
            let (Some(first), Some(second)) = (from.point(aspect.first), to.point(aspect.second))
            else {
                tracing::warn!(first = %aspect.first, second = %aspect.second, "aspect point missing from ring");
                continue;
            };
            lines.push(AspectLine {
                first: (ring_aspects.from, aspect.first),
                second: (ring_aspects.to, aspect.second),
                first_angle: rotation.render_angle(first.longitude),
                second_angle: rotation.render_angle(second.longitude),
                kind: aspect.kind,
                style_token: aspect.kind.style_token(),
            });
        }
    }

    lines
}

/// Compute the full layout of a wheel
pub fn compute(wheel: &Wheel, config: &LayoutConfig) -> ChartLayout {
    let rotation = ChartRotation::from_ascendant(wheel.natal.ascendant());
    if !rotation.is_available() {
        tracing::warn!("no ascendant available; drawing the chart unrotated");
    }

    let rings = RingKind::ALL
        .into_iter()
        .filter_map(|kind| {
            wheel
                .chart(kind)
                .map(|chart| layout_ring(kind, &chart.points, &rotation, config))
        })
        .collect();

    ChartLayout {
        rotation,
        config: config.clone(),
        wedges: rotation.sign_wedges(),
        houses: house_markers(&wheel.natal, &rotation),
        axes: axis_markers(&wheel.natal, &rotation),
        rings,
        aspects: aspect_lines(wheel, &rotation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{GeoLocation, Wheel};
    use crate::ephemeris::HousePositions;
    use crate::zodiac::{AspectEngine, HouseCusps};
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn p(id: PointId, longitude: f64) -> Point {
        Point::fixed(id, longitude)
    }

    fn tiers(points: &[Point]) -> Vec<(PointId, RadialTier)> {
        assign_tiers(points, 8.0)
            .into_iter()
            .map(|(point, tier)| (point.id, tier))
            .collect()
    }

    #[test]
    fn test_close_pair_split_far_point_base() {
        let result = tiers(&[
            p(PointId::Sun, 10.0),
            p(PointId::Moon, 14.0),
            p(PointId::Mars, 200.0),
        ]);
        assert_eq!(
            result,
            vec![
                (PointId::Sun, RadialTier::Base),
                (PointId::Moon, RadialTier::Displaced),
                (PointId::Mars, RadialTier::Base),
            ]
        );
    }

    #[test]
    fn test_sweep_uses_longitude_order_not_input_order() {
        let result = tiers(&[
            p(PointId::Mars, 200.0),
            p(PointId::Moon, 14.0),
            p(PointId::Sun, 10.0),
        ]);
        assert_eq!(result[0], (PointId::Sun, RadialTier::Base));
        assert_eq!(result[1], (PointId::Moon, RadialTier::Displaced));
    }

    #[test]
    fn test_crowded_run_alternates() {
        let result = tiers(&[
            p(PointId::Sun, 100.0),
            p(PointId::Moon, 103.0),
            p(PointId::Mercury, 106.0),
            p(PointId::Venus, 109.0),
        ]);
        let only_tiers: Vec<_> = result.into_iter().map(|(_, t)| t).collect();
        assert_eq!(
            only_tiers,
            vec![
                RadialTier::Base,
                RadialTier::Displaced,
                RadialTier::Base,
                RadialTier::Displaced
            ]
        );
    }

    #[test]
    fn test_gap_at_threshold_is_not_crowded() {
        let result = tiers(&[p(PointId::Sun, 10.0), p(PointId::Moon, 18.0)]);
        assert_eq!(result[1].1, RadialTier::Base);
    }

    #[test]
    fn test_sweep_does_not_wrap() {
        // 358 and 2 are 4° apart across 0°, but 2 is swept first
        let result = tiers(&[p(PointId::Sun, 358.0), p(PointId::Moon, 2.0)]);
        assert_eq!(
            result,
            vec![(PointId::Moon, RadialTier::Base), (PointId::Sun, RadialTier::Base)]
        );
    }

    #[test]
    fn test_sensitive_points_not_swept() {
        let result = tiers(&[
            p(PointId::Sun, 10.0),
            p(PointId::Ascendant, 12.0),
            p(PointId::Moon, 30.0),
        ]);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|(_, t)| *t == RadialTier::Base));
    }

    #[test]
    fn test_tier_radius_inward_then_outward() {
        let config = LayoutConfig::default();
        assert_eq!(tier_radius(RadialTier::Base, 7.5, &config), 7.5);
        assert_relative_eq!(tier_radius(RadialTier::Displaced, 7.5, &config), 6.7);
        assert_relative_eq!(tier_radius(RadialTier::Displaced, 1.5, &config), 2.3);
    }

    #[test]
    fn test_layout_ring_rotates() {
        let rotation = ChartRotation::from_ascendant(Some(10.0));
        let ring = layout_ring(
            RingKind::Natal,
            &[p(PointId::Sun, 10.0), p(PointId::Moon, 100.0)],
            &rotation,
            &LayoutConfig::default(),
        );
        let sun = ring.placement(PointId::Sun).unwrap();
        assert_relative_eq!(sun.degrees, 180.0);
        assert_relative_eq!(sun.angle, std::f64::consts::PI);
        assert_eq!(sun.radius, 7.5);
        assert_relative_eq!(ring.placement(PointId::Moon).unwrap().degrees, 270.0);
    }

    fn chart(points: Vec<Point>, houses: Option<HousePositions>) -> Arc<Chart> {
        Arc::new(Chart {
            moment: Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap(),
            location: GeoLocation::new(35.69, 139.692).unwrap(),
            points,
            houses,
        })
    }

    #[test]
    fn test_compute_with_transit_ring() {
        let houses = HousePositions {
            cusps: HouseCusps::equal(40.0),
            ascendant: 40.0,
            midheaven: 310.0,
        };
        let natal = chart(
            vec![
                p(PointId::Sun, 40.0),
                p(PointId::Moon, 43.0),
                p(PointId::Ascendant, 40.0),
                p(PointId::Midheaven, 310.0),
            ],
            Some(houses),
        );
        let transit = chart(vec![p(PointId::Mars, 130.0)], None);
        let wheel = Wheel::new(&AspectEngine::default(), natal, None, Some(transit));

        let layout = compute(&wheel, &LayoutConfig::default());

        assert!(layout.rotation.is_available());
        assert_eq!(layout.rings.len(), 2);
        assert_eq!(layout.houses.len(), 12);
        assert_eq!(layout.axes.len(), 2);
        assert_relative_eq!(layout.axes[0].angle, std::f64::consts::PI);

        let natal_ring = layout.ring(RingKind::Natal).unwrap();
        assert_eq!(natal_ring.placements.len(), 2);
        assert_eq!(
            natal_ring.placement(PointId::Moon).unwrap().tier,
            RadialTier::Displaced
        );
        assert_eq!(layout.ring(RingKind::Transit).unwrap().base_radius, 4.5);

        // Transit Mars squares natal Sun and Moon
        let to_luminaries: Vec<_> = layout
            .aspects
            .iter()
            .filter(|l| l.first.0 == RingKind::Transit)
            .filter(|l| matches!(l.second.1, PointId::Sun | PointId::Moon))
            .collect();
        assert_eq!(to_luminaries.len(), 2);
        assert!(to_luminaries
            .iter()
            .all(|l| l.style_token == "aspect-square" && l.second.0 == RingKind::Natal));
    }

    #[test]
    fn test_compute_without_houses_is_unrotated() {
        let natal = chart(vec![p(PointId::Sun, 90.0)], None);
        let wheel = Wheel::new(&AspectEngine::default(), natal, None, None);
        let layout = compute(&wheel, &LayoutConfig::default());

        assert!(!layout.rotation.is_available());
        assert!(layout.houses.is_empty());
        assert!(layout.axes.is_empty());
        assert_relative_eq!(
            layout.ring(RingKind::Natal).unwrap().placements[0].degrees,
            90.0
        );
    }
}
