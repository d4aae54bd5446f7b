//! Chart orchestration
//!
//! Sequences ephemeris queries into charts: natal, progressed (one day of
//! motion per year of life) and transit snapshots. [`ChartService`] wraps a
//! provider with memo caches for everything that does not depend on the
//! current moment.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::cache::{CacheKey, MemoCache, ProgressedKey};
use crate::ephemeris::{
    julian_day, CalculationFlags, EphemerisProvider, HousePositions, HouseSystem,
};
use crate::error::ChartError;
use crate::layout::RingKind;
use crate::zodiac::{AspectEngine, AspectMatch, Point, PointId};

/// Days in a tropical year, used for secondary progressions
const DAYS_PER_YEAR: f64 = 365.25;

/// A geographic position in decimal degrees (north and east positive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ChartError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ChartError::input_format(
                latitude.to_string(),
                "latitude must be within [-90, 90]",
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ChartError::input_format(
                longitude.to_string(),
                "longitude must be within [-180, 180]",
            ));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// One birth or transit query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartRequest {
    pub moment: DateTime<Utc>,
    pub location: GeoLocation,
}

impl ChartRequest {
    pub fn new(moment: DateTime<Utc>, location: GeoLocation) -> Self {
        Self { moment, location }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            self.moment,
            self.location.latitude,
            self.location.longitude,
        )
    }
}

/// Parse a civil date, time and UTC offset into a UT instant.
///
/// Accepts `YYYY-MM-DD`, `HH:MM` or `HH:MM:SS`, and `+HH:MM` / `-HH:MM`.
pub fn parse_moment(date: &str, time: &str, offset: &str) -> Result<DateTime<Utc>, ChartError> {
    let date_value = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| ChartError::input_format(date, e.to_string()))?;
    let time_value = NaiveTime::parse_from_str(time.trim(), "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M"))
        .map_err(|e| ChartError::input_format(time, e.to_string()))?;
    let offset_value = parse_offset(offset)?;

    offset_value
        .from_local_datetime(&date_value.and_time(time_value))
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ChartError::input_format(offset, "ambiguous local time"))
}

fn parse_offset(offset: &str) -> Result<FixedOffset, ChartError> {
    let trimmed = offset.trim();
    let invalid = || ChartError::input_format(offset, "expected an offset like +09:00");

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 14 || minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Which parts of a chart to ask the provider for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartScope {
    /// Bodies plus houses, ascendant and midheaven
    Full,
    /// Bodies only; used for progressed and transit rings
    BodiesOnly,
}

/// Positions for one moment and place
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub moment: DateTime<Utc>,
    pub location: GeoLocation,
    /// Bodies, the derived south node, and ASC/MC when houses are known
    pub points: Vec<Point>,
    /// `None` when houses were not requested or are undefined at the location
    pub houses: Option<HousePositions>,
}

impl Chart {
    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn ascendant(&self) -> Option<f64> {
        self.houses.map(|h| h.ascendant)
    }

    pub fn midheaven(&self) -> Option<f64> {
        self.houses.map(|h| h.midheaven)
    }

    /// House number of a longitude, if houses are known
    pub fn house_of(&self, longitude: f64) -> Option<u8> {
        self.houses.and_then(|h| h.cusps.house_of(longitude))
    }

    /// Points that are not ASC/MC
    pub fn bodies(&self) -> impl Iterator<Item = &Point> {
        self.points.iter().filter(|p| !p.id.is_sensitive())
    }
}

/// Query the provider and assemble a chart.
///
/// A house computation failure degrades to a chart without houses; any other
/// provider failure aborts.
pub fn compute_chart<P: EphemerisProvider + ?Sized>(
    provider: &P,
    request: &ChartRequest,
    scope: ChartScope,
) -> Result<Chart, ChartError> {
    let jd = julian_day(request.moment);
    let flags = CalculationFlags::default();

    let mut points = Vec::with_capacity(PointId::ALL.len());
    for body in PointId::BODIES {
        let position = provider.position_of(jd, body, flags)?;
        points.push(Point::from_motion(body, position.longitude, position.speed));
    }

    if let Some(head) = points.iter().find(|p| p.id == PointId::NorthNode) {
        let tail = Point::south_node_of(head);
        points.push(tail);
    }

    let houses = match scope {
        ChartScope::BodiesOnly => None,
        ChartScope::Full => match provider.houses_of(
            jd,
            request.location.latitude,
            request.location.longitude,
            HouseSystem::Placidus,
        ) {
            Ok(houses) => Some(houses),
            Err(err) => {
                let err = ChartError::from(err);
                if err.is_terminal() {
                    return Err(err);
                }
                tracing::warn!(
                    latitude = request.location.latitude,
                    "{}; continuing without houses, ascendant and midheaven",
                    err
                );
                None
            }
        },
    };

    if let Some(h) = houses {
        points.push(Point::fixed(PointId::Ascendant, h.ascendant));
        points.push(Point::fixed(PointId::Midheaven, h.midheaven));
    }

    tracing::debug!(
        moment = %request.moment,
        points = points.len(),
        houses = houses.is_some(),
        "computed chart"
    );

    Ok(Chart {
        moment: request.moment,
        location: request.location,
        points,
        houses,
    })
}

/// Moment whose positions stand for `epoch` under day-for-a-year progression
pub fn progressed_moment(birth: DateTime<Utc>, epoch: DateTime<Utc>) -> DateTime<Utc> {
    let elapsed_days = (epoch - birth).num_milliseconds() as f64 / 86_400_000.0;
    let offset_millis = (elapsed_days / DAYS_PER_YEAR * 86_400_000.0).round() as i64;
    birth + Duration::milliseconds(offset_millis)
}

/// Aspects between two rings of a wheel
#[derive(Debug, Clone, PartialEq)]
pub struct RingAspects {
    /// Ring of each match's `first` point
    pub from: RingKind,
    /// Ring of each match's `second` point
    pub to: RingKind,
    pub matches: Vec<AspectMatch>,
}

/// Natal chart plus optional progressed and transit rings, with aspects
#[derive(Debug, Clone)]
pub struct Wheel {
    pub natal: Arc<Chart>,
    pub progressed: Option<Arc<Chart>>,
    pub transit: Option<Arc<Chart>>,
    /// Natal-to-natal first, then each outer ring against natal
    pub aspects: Vec<RingAspects>,
}

impl Wheel {
    /// Build a wheel and compute every ring's aspects against natal
    pub fn new(
        engine: &AspectEngine,
        natal: Arc<Chart>,
        progressed: Option<Arc<Chart>>,
        transit: Option<Arc<Chart>>,
    ) -> Self {
        let mut aspects = vec![RingAspects {
            from: RingKind::Natal,
            to: RingKind::Natal,
            matches: engine.find(&natal.points),
        }];
        for (kind, chart) in [
            (RingKind::Progressed, &progressed),
            (RingKind::Transit, &transit),
        ] {
            if let Some(chart) = chart {
                aspects.push(RingAspects {
                    from: kind,
                    to: RingKind::Natal,
                    matches: engine.find_between(&chart.points, &natal.points),
                });
            }
        }

        Self {
            natal,
            progressed,
            transit,
            aspects,
        }
    }

    pub fn chart(&self, kind: RingKind) -> Option<&Chart> {
        match kind {
            RingKind::Natal => Some(&self.natal),
            RingKind::Progressed => self.progressed.as_deref(),
            RingKind::Transit => self.transit.as_deref(),
        }
    }

    /// Aspects within the natal chart
    pub fn natal_aspects(&self) -> &[AspectMatch] {
        self.aspects
            .iter()
            .find(|a| a.from == RingKind::Natal && a.to == RingKind::Natal)
            .map(|a| a.matches.as_slice())
            .unwrap_or(&[])
    }
}

/// When to take the transit ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitMoment {
    /// The current moment, read from the system clock
    Now,
    At(DateTime<Utc>),
}

/// Extra rings to add around a natal chart
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelOptions {
    pub progressed_epoch: Option<DateTime<Utc>>,
    pub transit: Option<TransitMoment>,
}

/// Chart computation with memoization of moment-independent results
#[derive(Debug)]
pub struct ChartService<P> {
    provider: P,
    engine: AspectEngine,
    natal_cache: MemoCache<CacheKey, Chart>,
    progressed_cache: MemoCache<ProgressedKey, Chart>,
}

impl<P: EphemerisProvider> ChartService<P> {
    pub fn new(provider: P) -> Self {
        Self::with_engine(provider, AspectEngine::default())
    }

    pub fn with_engine(provider: P, engine: AspectEngine) -> Self {
        Self {
            provider,
            engine,
            natal_cache: MemoCache::new(),
            progressed_cache: MemoCache::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn engine(&self) -> &AspectEngine {
        &self.engine
    }

    /// Natal chart, served from cache when the same request was seen before
    pub fn natal(&self, request: &ChartRequest) -> Result<Arc<Chart>, ChartError> {
        self.natal_cache
            .get_or_try_insert_with(request.cache_key(), || {
                compute_chart(&self.provider, request, ChartScope::Full)
            })
    }

    /// Progressed chart for `epoch`, cached by request and epoch
    pub fn progressed(
        &self,
        request: &ChartRequest,
        epoch: DateTime<Utc>,
    ) -> Result<Arc<Chart>, ChartError> {
        let key = ProgressedKey {
            natal: request.cache_key(),
            epoch,
        };
        self.progressed_cache.get_or_try_insert_with(key, || {
            let progressed = ChartRequest::new(
                progressed_moment(request.moment, epoch),
                request.location,
            );
            compute_chart(&self.provider, &progressed, ChartScope::BodiesOnly)
        })
    }

    /// Transit chart at a given moment; never cached
    pub fn transit_at(
        &self,
        moment: DateTime<Utc>,
        location: GeoLocation,
    ) -> Result<Chart, ChartError> {
        compute_chart(
            &self.provider,
            &ChartRequest::new(moment, location),
            ChartScope::BodiesOnly,
        )
    }

    /// Transit chart for the current moment; never cached
    pub fn transit_now(&self, location: GeoLocation) -> Result<Chart, ChartError> {
        self.transit_at(Utc::now(), location)
    }

    /// Assemble a wheel with the requested rings and their aspects
    pub fn wheel(&self, request: &ChartRequest, options: WheelOptions) -> Result<Wheel, ChartError> {
        let natal = self.natal(request)?;
        let progressed = options
            .progressed_epoch
            .map(|epoch| self.progressed(request, epoch))
            .transpose()?;
        let transit = options
            .transit
            .map(|when| match when {
                TransitMoment::Now => self.transit_now(request.location),
                TransitMoment::At(moment) => self.transit_at(moment, request.location),
            })
            .transpose()?
            .map(Arc::new);

        Ok(Wheel::new(&self.engine, natal, progressed, transit))
    }

    /// Number of cached natal and progressed charts
    pub fn cached(&self) -> (usize, usize) {
        (self.natal_cache.len(), self.progressed_cache.len())
    }
}
