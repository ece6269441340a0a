//! Tolerance and timing defaults (internal).
//!
//! Policy
//! - Defaults are fixed constants so call sites never juggle tolerances.
//!   Generation parameters that a user edits live in `WorldParams` instead.

/// Denominator threshold below which two segments count as parallel.
pub(crate) const INTERSECTION_EPS: f64 = 1e-3;
/// Slack applied to the minimum gap between building footprints.
pub(crate) const SPACING_EPS: f64 = 1e-3;
/// Ray-casting origin for point-in-polygon; lies outside any bounded world.
pub(crate) const OUTER_POINT: (f64, f64) = (-1.0e6, -1.0e6);
/// Consecutive rejected samples after which tree scattering stops.
pub(crate) const TREE_MAX_MISSES: u32 = 100;
/// Angular steps of a tree footprint (full turn).
pub(crate) const TREE_LEVEL_STEPS: usize = 32;

/// Animation frames per scheduler tick (one tick per second at 60 FPS).
pub const FRAMES_PER_TICK: u64 = 60;
/// Ticks a light stays green inside its slot.
pub const GREEN_DURATION: u64 = 2;
/// Ticks a light stays orange inside its slot.
pub const ORANGE_DURATION: u64 = 1;
/// Fixed footprint height of a traffic light marking.
pub const LIGHT_HEIGHT: f64 = 18.0;
/// Default extrusion height of buildings and trees (for fake-3D renderers).
pub const DEFAULT_ITEM_HEIGHT: f64 = 200.0;
