//! Plain-text position and aspect tables

use std::fmt;

use crate::chart::{Chart, Wheel};
use crate::zodiac::{format_degree, AspectKind, AspectMatch, PointId, ZodiacSign};

/// One line of the position table
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRow {
    pub id: PointId,
    pub glyph: &'static str,
    pub sign: ZodiacSign,
    /// `DD°MM'` within the sign
    pub degree: String,
    pub retrograde: bool,
    pub house: Option<u8>,
}

/// One line of the aspect table
#[derive(Debug, Clone, PartialEq)]
pub struct AspectRow {
    pub first: PointId,
    pub second: PointId,
    pub kind: AspectKind,
    pub orb: f64,
}

impl AspectRow {
    pub fn pair(&self) -> String {
        format!("{} - {}", self.first, self.second)
    }
}

/// Position and aspect tables for one chart
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub positions: Vec<PositionRow>,
    /// Sorted by orb, tightest first; ties by aspect angle
    pub aspects: Vec<AspectRow>,
}

impl Report {
    /// Build both tables. Houses come from `chart`, so they are `None` when
    /// the chart has no house cusps.
    pub fn from_chart(chart: &Chart, matches: &[AspectMatch]) -> Self {
        let positions = chart
            .points
            .iter()
            .map(|point| {
                let position = format_degree(point.longitude);
                PositionRow {
                    id: point.id,
                    glyph: point.id.symbol(),
                    sign: position.sign,
                    degree: position.short(),
                    retrograde: point.retrograde,
                    house: chart.house_of(point.longitude),
                }
            })
            .collect();

        let mut aspects: Vec<AspectRow> = matches
            .iter()
            .map(|m| AspectRow {
                first: m.first,
                second: m.second,
                kind: m.kind,
                orb: m.orb,
            })
            .collect();
        aspects.sort_by(|a, b| {
            a.orb
                .total_cmp(&b.orb)
                .then_with(|| a.kind.definition().angle.total_cmp(&b.kind.definition().angle))
        });

        Self { positions, aspects }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{:<12}{:<4}{:<12}{:<8}{:<3}House",
            "Point", "", "Sign", "Degree", "R"
        )?;
        for row in &self.positions {
            let house = row
                .house
                .map(|h| h.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "{:<12}{:<4}{:<12}{:<8}{:<3}{}",
                row.id.to_string(),
                row.glyph,
                row.sign.to_string(),
                row.degree,
                if row.retrograde { "R" } else { "" },
                house
            )?;
        }

        if self.aspects.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "{:<20}{:<13}Orb", "Pair", "Aspect")?;
        for row in &self.aspects {
            writeln!(
                f,
                "{:<20}{:<13}{:.2}",
                row.pair(),
                row.kind.to_string(),
                row.orb
            )?;
        }
        Ok(())
    }
}

/// Reports for every ring of a wheel, with a heading per section
pub fn wheel_report(wheel: &Wheel) -> String {
    let mut out = String::new();

    for ring_aspects in &wheel.aspects {
        let Some(chart) = wheel.chart(ring_aspects.from) else {
            continue;
        };
        let heading = if ring_aspects.from == ring_aspects.to {
            format!("== {} ({}) ==", ring_aspects.from, chart.moment.format("%Y-%m-%d %H:%M UTC"))
        } else {
            format!(
                "== {} ({}) to {} ==",
                ring_aspects.from,
                chart.moment.format("%Y-%m-%d %H:%M UTC"),
                ring_aspects.to
            )
        };
        out.push_str(&heading);
        out.push('\n');
        out.push_str(&Report::from_chart(chart, &ring_aspects.matches).to_string());
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::GeoLocation;
    use crate::ephemeris::HousePositions;
    use crate::zodiac::{find_aspects, HouseCusps, Point};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn chart(houses: bool) -> Chart {
        Chart {
            moment: Utc.with_ymd_and_hms(1990, 1, 1, 3, 0, 0).unwrap(),
            location: GeoLocation::new(35.69, 139.692).unwrap(),
            points: vec![
                Point::new(PointId::Sun, 280.5, false),
                Point::new(PointId::Moon, 14.25, false),
                Point::new(PointId::Mercury, 275.0, true),
                Point::new(PointId::Saturn, 283.5, false),
            ],
            houses: houses.then(|| HousePositions {
                cusps: HouseCusps::equal(10.0),
                ascendant: 10.0,
                midheaven: 280.0,
            }),
        }
    }

    #[test]
    fn test_report_snapshot() {
        let chart = chart(true);
        let report = Report::from_chart(&chart, &find_aspects(&chart.points));

        insta::assert_snapshot!(report.to_string(), @r"
        Point           Sign        Degree  R  House
        Sun         ☉   Capricorn   10°30'     10
        Moon        ☽   Aries       14°15'     1
        Mercury     ☿   Capricorn   05°00'  R  9
        Saturn      ♄   Capricorn   13°30'     10

        Pair                Aspect       Orb
        Moon - Saturn       Square       0.75
        Sun - Saturn        Conjunction  3.00
        Sun - Moon          Square       3.75
        Sun - Mercury       Conjunction  5.50
        ");
    }

    #[test]
    fn test_missing_houses_show_dash() {
        let chart = chart(false);
        let report = Report::from_chart(&chart, &[]);
        assert!(report.positions.iter().all(|row| row.house.is_none()));
        let text = report.to_string();
        assert!(text.lines().nth(1).unwrap().ends_with(" -"));
        assert!(!text.contains("Pair"));
    }

    #[test]
    fn test_rows() {
        let chart = chart(true);
        let report = Report::from_chart(&chart, &find_aspects(&chart.points));
        assert_eq!(
            report.positions[2],
            PositionRow {
                id: PointId::Mercury,
                glyph: "☿",
                sign: ZodiacSign::Capricorn,
                degree: "05°00'".to_string(),
                retrograde: true,
                house: Some(9),
            }
        );
        assert_eq!(report.aspects[0].pair(), "Moon - Saturn");
    }

    #[test]
    fn test_aspect_ties_sorted_by_angle() {
        let matches = [
            AspectMatch {
                first: PointId::Mars,
                second: PointId::Venus,
                kind: AspectKind::Trine,
                separation: 121.0,
                orb: 1.0,
            },
            AspectMatch {
                first: PointId::Sun,
                second: PointId::Pluto,
                kind: AspectKind::Sextile,
                separation: 61.0,
                orb: 1.0,
            },
        ];
        let report = Report::from_chart(&chart(true), &matches);
        assert_eq!(report.aspects[0].kind, AspectKind::Sextile);
        assert_eq!(report.aspects[1].kind, AspectKind::Trine);
    }

    #[test]
    fn test_wheel_report_headings() {
        let natal = Arc::new(chart(true));
        let transit = Arc::new(chart(false));
        let wheel = Wheel::new(&Default::default(), natal, None, Some(transit));
        let text = wheel_report(&wheel);
        assert!(text.starts_with("== natal (1990-01-01 03:00 UTC) ==\n"));
        assert!(text.contains("== transit (1990-01-01 03:00 UTC) to natal ==\n"));
    }
}
