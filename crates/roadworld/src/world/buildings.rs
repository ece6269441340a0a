//! Building placement along road-parallel guides.
//!
//! Model
//! - Oversized envelopes (`road + building + 2·spacing` wide) are unioned;
//!   their boundary runs one spacing plus half a building away from the road
//!   edge, so footprints centered on it keep clear of the asphalt.
//! - Each guide long enough for one building is cut into the largest number
//!   of equal slots `>= building_min_length`, separated by `spacing`.
//! - Footprints from different guides may collide near junctions; a later
//!   footprint is dropped when it overlaps or comes closer than `spacing`
//!   to an earlier survivor.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::params::WorldParams;
use crate::cfg::{DEFAULT_ITEM_HEIGHT, SPACING_EPS};
use crate::geom2::{union, Envelope, Polygon, Segment};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub base: Polygon,
    pub height: f64,
}

impl Building {
    pub fn new(base: Polygon) -> Self {
        Self {
            base,
            height: DEFAULT_ITEM_HEIGHT,
        }
    }
}

/// Guide segments along which buildings are laid out.
pub fn building_guides(roads: &[Segment], params: &WorldParams) -> Vec<Segment> {
    let width = params.road_width + params.building_width + params.spacing * 2.0;
    let envelopes: Vec<Polygon> = roads
        .iter()
        .map(|s| Envelope::new(*s, width, params.road_roundness).poly)
        .collect();
    union(&envelopes)
        .into_iter()
        .filter(|g| g.length() >= params.building_min_length)
        .collect()
}

/// Consecutive support segments along `guide`, one per building slot.
pub fn subdivide_guide(guide: &Segment, min_length: f64, spacing: f64) -> Vec<Segment> {
    let len = guide.length() + spacing;
    let count = (len / (min_length + spacing)).floor() as usize;
    if count == 0 {
        return Vec::new();
    }
    let slot = len / count as f64 - spacing;
    let dir = guide.direction_vector();
    let mut supports = Vec::with_capacity(count);
    let mut q1 = guide.p1;
    for _ in 0..count {
        let q2 = q1 + dir * slot;
        supports.push(Segment::new(q1, q2));
        q1 = q2 + dir * spacing;
    }
    supports
}

fn too_close(a: &Polygon, b: &Polygon, spacing: f64) -> bool {
    if a.intersects_poly(b) {
        return true;
    }
    if a.contains_point(b.points()[0]) || b.contains_point(a.points()[0]) {
        return true;
    }
    a.distance_to_poly(b).min(b.distance_to_poly(a)) < spacing - SPACING_EPS
}

/// Drop every footprint that conflicts with an earlier surviving one.
pub fn prune_overlaps(bases: Vec<Polygon>, spacing: f64) -> Vec<Polygon> {
    let mut kept: Vec<Polygon> = Vec::with_capacity(bases.len());
    for base in bases {
        if kept.iter().all(|k| !too_close(k, &base, spacing)) {
            kept.push(base);
        }
    }
    kept
}

pub fn generate_buildings(roads: &[Segment], params: &WorldParams) -> Vec<Building> {
    let guides = building_guides(roads, params);
    let supports: Vec<Segment> = guides
        .iter()
        .flat_map(|g| subdivide_guide(g, params.building_min_length, params.spacing))
        .collect();
    let bases: Vec<Polygon> = supports
        .iter()
        .map(|s| Envelope::rect(*s, params.building_width).poly)
        .collect();
    let candidates = bases.len();
    let kept = prune_overlaps(bases, params.spacing);
    debug!(
        guides = guides.len(),
        candidates,
        kept = kept.len(),
        "buildings placed"
    );
    kept.into_iter().map(Building::new).collect()
}
