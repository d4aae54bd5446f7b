//! House boundaries and house lookup
//!
//! Twelve cusps split the circle into contiguous arcs. Arc `i` runs from
//! `cusps[i]` to `cusps[(i + 1) % 12]` and is left-closed, right-open, so a
//! longitude sitting exactly on a cusp belongs to the house that starts there.
//! An arc whose end is numerically smaller than its start wraps through 0°.

use super::{forward_gap, normalize};

/// Twelve house cusps in zodiacal order; index 0 is the cusp of house 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseCusps([f64; 12]);

impl HouseCusps {
    pub fn new(cusps: [f64; 12]) -> Self {
        Self(cusps.map(normalize))
    }

    /// Build from a provider-supplied sequence; `None` unless exactly 12 values
    pub fn from_slice(cusps: &[f64]) -> Option<Self> {
        let cusps: [f64; 12] = cusps.try_into().ok()?;
        Some(Self::new(cusps))
    }

    /// Evenly spaced cusps starting at `first` (equal-house layout)
    pub fn equal(first: f64) -> Self {
        Self::new(std::array::from_fn(|i| first + 30.0 * i as f64))
    }

    pub fn as_array(&self) -> &[f64; 12] {
        &self.0
    }

    /// Cusp longitude of a house, `house` in `1..=12`
    pub fn cusp(&self, house: u8) -> Option<f64> {
        match house {
            1..=12 => Some(self.0[house as usize - 1]),
            _ => None,
        }
    }

    /// The (start, end) arc of each house, in house order
    pub fn arcs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        (0..12).map(move |i| (self.0[i], self.0[(i + 1) % 12]))
    }

    /// House number (1..=12) containing a longitude.
    ///
    /// Returns `None` when no arc matches, which only happens for a cusp
    /// sequence that is not in zodiacal order.
    pub fn house_of(&self, longitude: f64) -> Option<u8> {
        let longitude = normalize(longitude);
        self.arcs()
            .position(|(start, end)| arc_contains(start, end, longitude))
            .map(|i| i as u8 + 1)
    }

    /// Midpoint longitude of a house arc, wrap-aware
    pub fn midpoint(&self, house: u8) -> Option<f64> {
        let start = self.cusp(house)?;
        let end = self.0[house as usize % 12];
        Some(normalize(start + forward_gap(start, end) / 2.0))
    }
}

fn arc_contains(start: f64, end: f64, longitude: f64) -> bool {
    if start <= end {
        start <= longitude && longitude < end
    } else {
        longitude >= start || longitude < end
    }
}
