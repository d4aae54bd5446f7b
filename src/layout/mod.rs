//! Layout engine for placing chart elements on the wheel
//!
//! This module takes a computed wheel and produces a [`ChartLayout`]: render
//! bearings after ascendant rotation, per-ring radial tiers, sign wedges,
//! house and axis markers, and aspect chords.

pub mod config;
pub mod engine;
pub mod rotation;
pub mod types;

pub use config::LayoutConfig;
pub use engine::{assign_tiers, compute, layout_ring, tier_radius};
pub use rotation::{split_arc, ChartRotation, ASCENDANT_BEARING};
pub use types::*;
