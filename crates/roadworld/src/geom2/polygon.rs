//! Closed polygons with explicit edge lists.
//!
//! Invariants:
//! - At least 3 points; closure is implicit (last → first).
//! - `segments[k] == (points[k], points[(k+1) % n])` and
//!   `segments.len() == points.len()`. Edge splitting keeps both lists in sync.

use serde::{Deserialize, Serialize};

use super::types::{Bounds2, Point, Segment};
use super::util::{average, get_intersection};
use crate::cfg::OUTER_POINT;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonRepr", into = "PolygonRepr")]
pub struct Polygon {
    points: Vec<Point>,
    segments: Vec<Segment>,
}

#[derive(Clone, Serialize, Deserialize)]
struct PolygonRepr {
    points: Vec<Point>,
}

impl TryFrom<PolygonRepr> for Polygon {
    type Error = String;

    fn try_from(repr: PolygonRepr) -> Result<Self, Self::Error> {
        if repr.points.len() < 3 {
            return Err(format!(
                "polygon needs at least 3 points, got {}",
                repr.points.len()
            ));
        }
        Ok(Polygon::new(repr.points))
    }
}

impl From<Polygon> for PolygonRepr {
    fn from(poly: Polygon) -> Self {
        PolygonRepr {
            points: poly.points,
        }
    }
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        debug_assert!(points.len() >= 3, "polygon needs at least 3 points");
        let segments = edges_of(&points);
        Self { points, segments }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn bounds(&self) -> Bounds2 {
        // Non-empty by construction.
        Bounds2::from_points(self.points.iter().copied()).unwrap_or(Bounds2 {
            min: Point::zeros(),
            max: Point::zeros(),
        })
    }

    /// Ray casting from `OUTER_POINT`; odd crossing count means inside.
    pub fn contains_point(&self, p: Point) -> bool {
        let outer = Point::new(OUTER_POINT.0, OUTER_POINT.1);
        let crossings = self
            .segments
            .iter()
            .filter(|s| get_intersection(outer, p, s.p1, s.p2).is_some())
            .count();
        crossings % 2 == 1
    }

    /// Midpoint containment.
    #[inline]
    pub fn contains_segment(&self, seg: &Segment) -> bool {
        self.contains_point(average(seg.p1, seg.p2))
    }

    /// True if any edge of `self` crosses or touches any edge of `other`.
    pub fn intersects_poly(&self, other: &Polygon) -> bool {
        self.segments.iter().any(|s1| {
            other
                .segments
                .iter()
                .any(|s2| get_intersection(s1.p1, s1.p2, s2.p1, s2.p2).is_some())
        })
    }

    pub fn distance_to_point(&self, p: Point) -> f64 {
        self.segments
            .iter()
            .map(|s| s.distance_to_point(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Smallest distance from one of our vertices to `other`'s boundary.
    pub fn distance_to_poly(&self, other: &Polygon) -> f64 {
        self.points
            .iter()
            .map(|p| other.distance_to_point(*p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Split edge `k` at `p`: edge `k` now ends at `p` and a new edge from `p`
    /// to the old end is inserted after it.
    pub fn split_edge(&mut self, k: usize, p: Point) {
        let old = self.segments[k];
        self.segments[k] = Segment::new(old.p1, p);
        self.segments.insert(k + 1, Segment::new(p, old.p2));
        self.points.insert(k + 1, p);
    }

    /// Split every edge at its listed cut points in one pass.
    ///
    /// `cuts[k]` holds `(offset, point)` pairs along edge `k` with offsets in
    /// (0,1). Edges are processed back to front so pending indices stay valid.
    pub fn split_edges(&mut self, mut cuts: Vec<Vec<(f64, Point)>>) {
        debug_assert_eq!(cuts.len(), self.segments.len());
        for k in (0..cuts.len()).rev() {
            let edge_cuts = &mut cuts[k];
            edge_cuts.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
            edge_cuts.dedup_by(|a, b| a.1 == b.1);
            for &(_, p) in edge_cuts.iter() {
                let seg = self.segments[k];
                if seg.includes(p) {
                    continue;
                }
                self.split_edge(k, p);
            }
        }
    }
}

fn edges_of(points: &[Point]) -> Vec<Segment> {
    let n = points.len();
    (0..n)
        .map(|k| Segment::new(points[k], points[(k + 1) % n]))
        .collect()
}
