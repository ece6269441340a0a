//! Buffered capsule ("stadium") polygons around a skeleton segment.
//!
//! Model
//! - Half-circle arcs of radius `width / 2` at both skeleton ends, sampled in
//!   `max(1, roundness)` angular steps. `roundness = 0` collapses each arc to
//!   its two end points, giving a plain rectangle.
//! - The sweep's upper bound carries half a step of slack so the final arc
//!   point survives floating-point accumulation.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

use super::polygon::Polygon;
use super::types::Segment;
use super::util::{angle, subtract, translate};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub skeleton: Segment,
    pub width: f64,
    pub roundness: u32,
    pub poly: Polygon,
}

impl Envelope {
    pub fn new(skeleton: Segment, width: f64, roundness: u32) -> Self {
        let poly = capsule(&skeleton, width, roundness);
        Self {
            skeleton,
            width,
            roundness,
            poly,
        }
    }

    /// Flat-ended envelope (roundness 0).
    #[inline]
    pub fn rect(skeleton: Segment, width: f64) -> Self {
        Self::new(skeleton, width, 0)
    }
}

fn capsule(skeleton: &Segment, width: f64, roundness: u32) -> Polygon {
    let (p1, p2) = (skeleton.p1, skeleton.p2);
    let radius = width / 2.0;
    let alpha = angle(subtract(p1, p2));
    let alpha_cw = alpha + FRAC_PI_2;
    let alpha_ccw = alpha - FRAC_PI_2;
    let step = PI / f64::from(roundness.max(1));
    let eps = step / 2.0;

    let mut points = Vec::with_capacity(2 * (roundness.max(1) as usize + 1));
    let mut a = alpha_ccw;
    while a <= alpha_cw + eps {
        points.push(translate(p1, a, radius));
        a += step;
    }
    let mut a = alpha_ccw;
    while a <= alpha_cw + eps {
        points.push(translate(p2, PI + a, radius));
        a += step;
    }
    Polygon::new(points)
}
