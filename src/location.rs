//! Birth-place lookup table
//!
//! Latitude/longitude of the 47 Japanese prefectural capitals, keyed by the
//! romanized prefecture name.

use crate::chart::GeoLocation;
use crate::error::ChartError;

/// A named place on the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Place {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    pub fn location(&self) -> GeoLocation {
        GeoLocation {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

const fn place(name: &'static str, latitude: f64, longitude: f64) -> Place {
    Place {
        name,
        latitude,
        longitude,
    }
}

pub const PREFECTURES: [Place; 47] = [
    place("Hokkaido", 43.064, 141.348),
    place("Aomori", 40.825, 140.741),
    place("Iwate", 39.704, 141.153),
    place("Miyagi", 38.269, 140.872),
    place("Akita", 39.719, 140.102),
    place("Yamagata", 38.240, 140.364),
    place("Fukushima", 37.750, 140.468),
    place("Ibaraki", 36.342, 140.447),
    place("Tochigi", 36.566, 139.884),
    place("Gunma", 36.391, 139.060),
    place("Saitama", 35.857, 139.649),
    place("Chiba", 35.605, 140.123),
    place("Tokyo", 35.690, 139.692),
    place("Kanagawa", 35.448, 139.643),
    place("Niigata", 37.902, 139.023),
    place("Toyama", 36.695, 137.211),
    place("Ishikawa", 36.594, 136.626),
    place("Fukui", 36.065, 136.222),
    place("Yamanashi", 35.664, 138.568),
    place("Nagano", 36.651, 138.181),
    place("Gifu", 35.391, 136.722),
    place("Shizuoka", 34.977, 138.383),
    place("Aichi", 35.180, 136.907),
    place("Mie", 34.730, 136.509),
    place("Shiga", 35.005, 135.869),
    place("Kyoto", 35.021, 135.756),
    place("Osaka", 34.686, 135.520),
    place("Hyogo", 34.691, 135.183),
    place("Nara", 34.685, 135.833),
    place("Wakayama", 34.226, 135.168),
    place("Tottori", 35.504, 134.238),
    place("Shimane", 35.472, 133.051),
    place("Okayama", 34.662, 133.934),
    place("Hiroshima", 34.396, 132.459),
    place("Yamaguchi", 34.186, 131.471),
    place("Tokushima", 34.066, 134.559),
    place("Kagawa", 34.340, 134.043),
    place("Ehime", 33.842, 132.765),
    place("Kochi", 33.560, 133.531),
    place("Fukuoka", 33.607, 130.418),
    place("Saga", 33.249, 130.299),
    place("Nagasaki", 32.745, 129.874),
    place("Kumamoto", 32.790, 130.742),
    place("Oita", 33.238, 131.613),
    place("Miyazaki", 31.911, 131.424),
    place("Kagoshima", 31.560, 130.558),
    place("Okinawa", 26.212, 127.681),
];

/// Find a place by name, ignoring case and surrounding whitespace
pub fn lookup(name: &str) -> Result<&'static Place, ChartError> {
    let wanted = name.trim();
    PREFECTURES
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ChartError::input_format(name, "unknown place"))
}
