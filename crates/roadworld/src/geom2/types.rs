//! Basic 2D types: points, segments, intersections, bounds.
//!
//! - `Point`: plain `Vector2<f64>`; equality is exact coordinate equality.
//! - `Segment`: ordered pair of points, compared as an undirected edge.
//! - `Intersection`, `Projection`: results of the kernel's segment queries.
//! - `Bounds2`: axis-aligned box used by the tree sampler.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::util::{distance, dot, lerp2d, magnitude, normalize, subtract};

/// World-space point (also used for free vectors).
pub type Point = Vector2<f64>;

/// Crossing of two segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub point: Point,
    /// Parameter along the first segment (0 at its start, 1 at its end).
    pub offset: f64,
    /// Parameter along the second segment.
    pub other_offset: f64,
}

impl Intersection {
    /// True when the crossing lies strictly inside both segments.
    #[inline]
    pub fn is_interior(&self) -> bool {
        self.offset > 0.0 && self.offset < 1.0 && self.other_offset > 0.0 && self.other_offset < 1.0
    }
}

/// Foot of the perpendicular from a point onto a segment's supporting line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub point: Point,
    /// 0 at `p1`, 1 at `p2`; values outside [0,1] fall beyond the segment.
    pub offset: f64,
}

/// Line segment `p1 → p2`.
///
/// Equality is undirected: `(a,b) == (b,a)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    #[inline]
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// Endpoint-set equality in either order.
    #[inline]
    pub fn equals(&self, other: &Segment) -> bool {
        self.includes(other.p1) && self.includes(other.p2)
    }

    #[inline]
    pub fn includes(&self, p: Point) -> bool {
        self.p1 == p || self.p2 == p
    }

    #[inline]
    pub fn length(&self) -> f64 {
        distance(self.p1, self.p2)
    }

    /// Unit vector from `p1` to `p2`.
    #[inline]
    pub fn direction_vector(&self) -> Point {
        normalize(subtract(self.p2, self.p1))
    }

    #[inline]
    pub fn midpoint(&self) -> Point {
        lerp2d(self.p1, self.p2, 0.5)
    }

    /// Project `p` onto the infinite line through the segment.
    pub fn project_point(&self, p: Point) -> Projection {
        let a = subtract(p, self.p1);
        let b = subtract(self.p2, self.p1);
        let dir = normalize(b);
        let along = dot(a, dir);
        Projection {
            point: self.p1 + dir * along,
            offset: along / magnitude(b),
        }
    }

    /// Distance from `p` to the closed segment.
    pub fn distance_to_point(&self, p: Point) -> f64 {
        let proj = self.project_point(p);
        if proj.offset > 0.0 && proj.offset < 1.0 {
            distance(p, proj.point)
        } else {
            distance(p, self.p1).min(distance(p, self.p2))
        }
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds2 {
    pub min: Point,
    pub max: Point,
}

impl Bounds2 {
    /// Tight box around `points`; `None` when the iterator is empty.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = Bounds2 {
            min: first,
            max: first,
        };
        for p in it {
            b.min.x = b.min.x.min(p.x);
            b.min.y = b.min.y.min(p.y);
            b.max.x = b.max.x.max(p.x);
            b.max.y = b.max.y.max(p.y);
        }
        Some(b)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}
