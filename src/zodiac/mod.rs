//! Zodiac domain model: points, signs, houses and aspects
//!
//! Everything here is a pure function over in-memory values. Longitudes are
//! ecliptic degrees and are always canonicalized to `[0, 360)` before any
//! comparison.

pub mod aspect;
pub mod house;
pub mod point;
pub mod sign;

pub use aspect::{
    find_aspects, find_aspects_between, AspectDefinition, AspectEngine, AspectKind, AspectMatch,
    AspectOptions, ASPECTS, LUMINARY_ORB_BONUS,
};
pub use house::HouseCusps;
pub use point::{Point, PointId};
pub use sign::{format_degree, DegreePosition, ZodiacSign};

/// Degrees in a full turn of the zodiac
pub const ZODIAC_DEGREES: f64 = 360.0;

/// Degrees covered by one sign
pub const DEGREES_PER_SIGN: f64 = 30.0;

/// Canonicalize a longitude to `[0, 360)`.
///
/// Negative inputs wrap (`-10` becomes `350`). `rem_euclid` can round a tiny
/// negative value up to exactly `360.0`, which is folded back to zero.
pub fn normalize(longitude: f64) -> f64 {
    let n = longitude.rem_euclid(ZODIAC_DEGREES);
    if n >= ZODIAC_DEGREES {
        0.0
    } else {
        n
    }
}

/// Minor-arc separation between two longitudes, in `[0, 180]`
pub fn separation(a: f64, b: f64) -> f64 {
    let diff = (normalize(a) - normalize(b)).abs();
    if diff > 180.0 {
        ZODIAC_DEGREES - diff
    } else {
        diff
    }
}

/// Forward (counter-clockwise) gap from `from` to `to`, in `[0, 360)`
pub fn forward_gap(from: f64, to: f64) -> f64 {
    normalize(to - from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_wraps_negative() {
        assert_eq!(normalize(-10.0), 350.0);
        assert_eq!(normalize(370.0), 10.0);
        assert_eq!(normalize(720.0), 0.0);
        assert_eq!(normalize(-1e-20), 0.0);
    }

    #[test]
    fn test_separation_takes_minor_arc() {
        assert_eq!(separation(10.0, 350.0), 20.0);
        assert_eq!(separation(350.0, 10.0), 20.0);
        assert_eq!(separation(0.0, 180.0), 180.0);
        assert_eq!(separation(45.0, 45.0), 0.0);
    }

    #[test]
    fn test_forward_gap() {
        assert_eq!(forward_gap(10.0, 14.0), 4.0);
        assert_eq!(forward_gap(355.0, 5.0), 10.0);
        assert_eq!(forward_gap(14.0, 10.0), 356.0);
    }
}
