//! Ephemeris provider interface and a table-backed implementation
//!
//! The chart engine never computes astronomy itself. It asks an
//! [`EphemerisProvider`] for body longitudes/speeds and for house cusps at a
//! Julian day. [`TableEphemeris`] answers from samples recorded in a TOML
//! file, interpolating linearly between them.
//!
//! ```toml
//! [metadata]
//! latitude = 35.690     # where the recorded houses were cast
//! longitude = 139.692
//!
//! [[sample]]
//! moment = "1990-01-01T03:00:00Z"   # or: julian_day = 2447892.625
//! [sample.bodies]
//! sun = { longitude = 280.5, speed = 1.02 }
//! [sample.houses]
//! cusps = [10.0, 42.0, 68.0, 95.0, 124.0, 158.0, 190.0, 222.0, 248.0, 275.0, 304.0, 338.0]
//! ascendant = 10.0
//! midheaven = 275.0
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::error::ChartError;
use crate::zodiac::{normalize, HouseCusps, PointId};

/// Days since noon, 1 January 4713 BC (Julian calendar), in UT
pub type JulianDay = f64;

/// Julian day of the Unix epoch
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Two samples closer than this (in days) are the same instant
const JD_EPSILON: f64 = 1e-6;

/// Degrees within which a request matches the table's recorded site
const SITE_EPSILON: f64 = 1e-3;

/// Latitude beyond which Placidus houses are undefined
pub const POLAR_CIRCLE_LATITUDE: f64 = 66.56;

/// Errors reported by an ephemeris provider
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EphemerisError {
    /// Required data files or tables are absent
    #[error("{0}")]
    Unavailable(String),

    /// The house system is mathematically undefined at this location
    #[error("{0}")]
    HouseComputation(String),
}

/// Convert a UT instant to a Julian day (proleptic Gregorian calendar)
pub fn julian_day(moment: DateTime<Utc>) -> JulianDay {
    moment.timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_JD
}

/// Convert a Julian day back to a UT instant, rounded to the millisecond
pub fn moment_from_julian_day(jd: JulianDay) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }
    let millis = ((jd - UNIX_EPOCH_JD) * MILLIS_PER_DAY).round() as i64;
    Utc.timestamp_millis_opt(millis).single()
}

/// Options passed with a position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationFlags {
    /// Also report the daily motion in longitude
    pub speed: bool,
}

impl Default for CalculationFlags {
    fn default() -> Self {
        Self { speed: true }
    }
}

/// House systems a provider may be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HouseSystem {
    #[default]
    Placidus,
}

impl HouseSystem {
    /// Single-letter code conventionally used by ephemeris libraries
    pub fn code(self) -> char {
        match self {
            HouseSystem::Placidus => 'P',
        }
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HouseSystem::Placidus => f.pad("Placidus"),
        }
    }
}

/// Ecliptic longitude and daily motion of a body
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BodyPosition {
    pub longitude: f64,
    #[serde(default)]
    pub speed: f64,
}

/// Houses and angles for one instant and location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HousePositions {
    pub cusps: HouseCusps,
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Source of astronomical positions
pub trait EphemerisProvider {
    /// Longitude and speed of `body` at `jd`
    fn position_of(
        &self,
        jd: JulianDay,
        body: PointId,
        flags: CalculationFlags,
    ) -> Result<BodyPosition, EphemerisError>;

    /// House cusps, ascendant and midheaven at `jd` for a geographic location
    fn houses_of(
        &self,
        jd: JulianDay,
        latitude: f64,
        longitude: f64,
        system: HouseSystem,
    ) -> Result<HousePositions, EphemerisError>;
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn position_of(
        &self,
        jd: JulianDay,
        body: PointId,
        flags: CalculationFlags,
    ) -> Result<BodyPosition, EphemerisError> {
        (**self).position_of(jd, body, flags)
    }

    fn houses_of(
        &self,
        jd: JulianDay,
        latitude: f64,
        longitude: f64,
        system: HouseSystem,
    ) -> Result<HousePositions, EphemerisError> {
        (**self).houses_of(jd, latitude, longitude, system)
    }
}

/// TOML structure for deserializing ephemeris tables
#[derive(Deserialize)]
struct TomlTable {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    sample: Vec<TomlSample>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Deserialize)]
struct TomlSample {
    moment: Option<String>,
    julian_day: Option<f64>,
    #[serde(default)]
    bodies: HashMap<String, BodyPosition>,
    houses: Option<TomlHouses>,
}

#[derive(Deserialize)]
struct TomlHouses {
    cusps: Vec<f64>,
    ascendant: f64,
    midheaven: f64,
}

#[derive(Debug, Clone)]
struct Sample {
    julian_day: JulianDay,
    bodies: HashMap<PointId, BodyPosition>,
    houses: Option<HousePositions>,
}

/// Ephemeris answering from recorded samples.
///
/// Body positions between two samples are interpolated along the short arc.
/// Requests outside the recorded span are unavailable. Houses depend on time
/// and place, so they are only answered for a recorded sample instant at the
/// site named in the table metadata.
#[derive(Debug, Clone, Default)]
pub struct TableEphemeris {
    /// Optional name from the table metadata
    pub name: Option<String>,
    /// (latitude, longitude) the recorded houses were cast for
    pub site: Option<(f64, f64)>,
    samples: Vec<Sample>,
}

impl TableEphemeris {
    /// Load a table from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ChartError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ChartError::io(path.display().to_string(), e))?;
        Self::from_str(&content)
    }

    /// Load a table from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ChartError> {
        let parsed: TomlTable = toml::from_str(content)?;

        let mut samples = parsed
            .sample
            .into_iter()
            .map(Sample::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        samples.sort_by(|a, b| a.julian_day.total_cmp(&b.julian_day));

        let (name, site) = match parsed.metadata {
            Some(m) => (m.name, m.latitude.zip(m.longitude)),
            None => (None, None),
        };
        if site.is_none() && samples.iter().any(|s| s.houses.is_some()) {
            return Err(ChartError::input_format(
                "metadata",
                "tables with houses must give the latitude and longitude they were cast for",
            ));
        }

        tracing::debug!(samples = samples.len(), ?site, "loaded ephemeris table");
        Ok(Self {
            name,
            site,
            samples,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First and last recorded Julian days
    pub fn span(&self) -> Option<(JulianDay, JulianDay)> {
        Some((self.samples.first()?.julian_day, self.samples.last()?.julian_day))
    }

    fn sample_at(&self, jd: JulianDay) -> Option<&Sample> {
        self.samples
            .iter()
            .find(|s| (s.julian_day - jd).abs() < JD_EPSILON)
    }

    fn lookup(&self, sample: &Sample, body: PointId) -> Result<BodyPosition, EphemerisError> {
        sample.bodies.get(&body).copied().ok_or_else(|| {
            EphemerisError::Unavailable(format!(
                "no {} position recorded at JD {:.5}",
                body, sample.julian_day
            ))
        })
    }
}

impl TryFrom<TomlSample> for Sample {
    type Error = ChartError;

    fn try_from(raw: TomlSample) -> Result<Self, Self::Error> {
        let julian_day = match (raw.julian_day, raw.moment.as_deref()) {
            (Some(jd), _) => jd,
            (None, Some(moment)) => {
                let parsed = DateTime::parse_from_rfc3339(moment)
                    .map_err(|e| ChartError::input_format(moment, e.to_string()))?;
                julian_day(parsed.with_timezone(&Utc))
            }
            (None, None) => {
                return Err(ChartError::input_format(
                    "sample",
                    "either 'moment' or 'julian_day' is required",
                ))
            }
        };

        let mut bodies = HashMap::new();
        for (key, position) in raw.bodies {
            let id: PointId = key
                .parse()
                .map_err(|reason: String| ChartError::input_format(&key, reason))?;
            if id.is_derived() || id.is_sensitive() {
                return Err(ChartError::input_format(
                    key,
                    "derived and sensitive points are not tabulated",
                ));
            }
            bodies.insert(
                id,
                BodyPosition {
                    longitude: normalize(position.longitude),
                    speed: position.speed,
                },
            );
        }

        let houses = raw
            .houses
            .map(|h| {
                let cusps = HouseCusps::from_slice(&h.cusps).ok_or_else(|| {
                    ChartError::input_format(
                        "houses.cusps",
                        format!("expected 12 cusps, found {}", h.cusps.len()),
                    )
                })?;
                Ok::<_, ChartError>(HousePositions {
                    cusps,
                    ascendant: normalize(h.ascendant),
                    midheaven: normalize(h.midheaven),
                })
            })
            .transpose()?;

        Ok(Sample {
            julian_day,
            bodies,
            houses,
        })
    }
}

fn interpolate(a: BodyPosition, b: BodyPosition, t: f64) -> BodyPosition {
    // Signed short-arc delta so 359° -> 1° moves forward by 2°
    let delta = (b.longitude - a.longitude + 540.0).rem_euclid(360.0) - 180.0;
    BodyPosition {
        longitude: normalize(a.longitude + delta * t),
        speed: a.speed + (b.speed - a.speed) * t,
    }
}

impl EphemerisProvider for TableEphemeris {
    fn position_of(
        &self,
        jd: JulianDay,
        body: PointId,
        flags: CalculationFlags,
    ) -> Result<BodyPosition, EphemerisError> {
        if body.is_derived() || body.is_sensitive() {
            return Err(EphemerisError::Unavailable(format!(
                "{} is not an ephemeris body",
                body
            )));
        }

        let position = match self.sample_at(jd) {
            Some(sample) => self.lookup(sample, body)?,
            None => {
                let after = self.samples.partition_point(|s| s.julian_day < jd);
                if after == 0 || after == self.samples.len() {
                    return Err(EphemerisError::Unavailable(format!(
                        "JD {:.5} is outside the recorded ephemeris span",
                        jd
                    )));
                }
                let before = &self.samples[after - 1];
                let next = &self.samples[after];
                let t = (jd - before.julian_day) / (next.julian_day - before.julian_day);
                interpolate(self.lookup(before, body)?, self.lookup(next, body)?, t)
            }
        };

        Ok(BodyPosition {
            speed: if flags.speed { position.speed } else { 0.0 },
            ..position
        })
    }

    fn houses_of(
        &self,
        jd: JulianDay,
        latitude: f64,
        longitude: f64,
        system: HouseSystem,
    ) -> Result<HousePositions, EphemerisError> {
        if !latitude.is_finite() || latitude.abs() > POLAR_CIRCLE_LATITUDE {
            return Err(EphemerisError::HouseComputation(format!(
                "{} houses are undefined at latitude {:.3}",
                system, latitude
            )));
        }

        let at_site = self.site.is_some_and(|(lat, lon)| {
            (lat - latitude).abs() < SITE_EPSILON && (lon - longitude).abs() < SITE_EPSILON
        });
        if !at_site {
            return Err(EphemerisError::Unavailable(format!(
                "no houses recorded for latitude {:.3}, longitude {:.3}",
                latitude, longitude
            )));
        }

        self.sample_at(jd)
            .and_then(|s| s.houses)
            .ok_or_else(|| {
                EphemerisError::Unavailable(format!("no houses recorded at JD {:.5}", jd))
            })
    }
}
