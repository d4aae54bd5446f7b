//! Zodiac signs and degree formatting

use std::fmt;

use super::{normalize, DEGREES_PER_SIGN};

/// One of the twelve fixed 30° wedges of the zodiac
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZodiacSign {
    Aries = 0,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// All signs in zodiacal order
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign at a zero-based index, wrapping past Pisces
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn from_longitude(longitude: f64) -> Self {
        let sign_index = (normalize(longitude) / DEGREES_PER_SIGN).floor() as usize;
        Self::from_index(sign_index.min(11))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Longitude where this sign begins
    pub fn start(self) -> f64 {
        self.index() as f64 * DEGREES_PER_SIGN
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "♈",
            ZodiacSign::Taurus => "♉",
            ZodiacSign::Gemini => "♊",
            ZodiacSign::Cancer => "♋",
            ZodiacSign::Leo => "♌",
            ZodiacSign::Virgo => "♍",
            ZodiacSign::Libra => "♎",
            ZodiacSign::Scorpio => "♏",
            ZodiacSign::Sagittarius => "♐",
            ZodiacSign::Capricorn => "♑",
            ZodiacSign::Aquarius => "♒",
            ZodiacSign::Pisces => "♓",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A longitude broken down into sign, whole degrees and whole minutes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DegreePosition {
    pub sign: ZodiacSign,
    /// Whole degrees within the sign, `0..30`
    pub degrees: u8,
    /// Whole arc-minutes within the degree, `0..60`
    pub minutes: u8,
}

impl DegreePosition {
    /// Degree and minute without the sign, e.g. `10°05'`
    pub fn short(&self) -> String {
        format!("{:02}°{:02}'", self.degrees, self.minutes)
    }
}

impl fmt::Display for DegreePosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&format!("{} {}", self.sign.name(), self.short()))
    }
}

/// Split a longitude into (sign, degree, minute).
///
/// Total over all finite inputs: the longitude is normalized first, minutes
/// are truncated rather than rounded so `29°59.99'` stays in the same sign.
pub fn format_degree(longitude: f64) -> DegreePosition {
    let normalized = normalize(longitude);
    let sign = ZodiacSign::from_longitude(normalized);
    let within_sign = normalized % DEGREES_PER_SIGN;
    let degrees = within_sign.floor();
    let minutes = ((within_sign - degrees) * 60.0).floor().clamp(0.0, 59.0);

    DegreePosition {
        sign,
        degrees: degrees as u8,
        minutes: minutes as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_degree_basic() {
        let pos = format_degree(280.5);
        assert_eq!(pos.sign, ZodiacSign::Capricorn);
        assert_eq!(pos.degrees, 10);
        assert_eq!(pos.minutes, 30);
        assert_eq!(pos.to_string(), "Capricorn 10°30'");
    }

    #[test]
    fn test_format_degree_negative_wraps() {
        let pos = format_degree(-0.25);
        assert_eq!(pos.sign, ZodiacSign::Pisces);
        assert_eq!(pos.degrees, 29);
        assert_eq!(pos.minutes, 45);
    }

    #[test]
    fn test_format_degree_sign_index_matches_floor() {
        let mut d = -720.0;
        while d < 720.0 {
            let pos = format_degree(d);
            let expected = (normalize(d) / 30.0).floor() as usize;
            assert_eq!(pos.sign.index(), expected, "longitude {}", d);
            assert!(pos.minutes < 60);
            assert!(pos.degrees < 30);
            d += 0.37;
        }
    }

    #[test]
    fn test_sign_boundaries() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(29.999), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(30.0), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_longitude(359.999), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(360.0), ZodiacSign::Aries);
    }

    #[test]
    fn test_short_form_zero_pads() {
        assert_eq!(format_degree(35.25).short(), "05°15'");
    }
}
