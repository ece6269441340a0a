//! Road graph: unique points plus undirected segments between them.
//!
//! Purpose
//! - Hold the sparse user-edited skeleton the world is generated from.
//!
//! Model
//! - Points live in an arena addressed by `PointId`. Removal tombstones the
//!   slot; ids are never reused, so a stale id simply resolves to `None`.
//! - Segments reference points by id, so moving a point (dragging) moves
//!   every incident segment with it.
//!
//! Invariants
//! - No two live points share coordinates.
//! - No self loops, no duplicate segments (in either direction).
//! - Every segment endpoint is a live point; removing a point cascades.

mod types;

pub use types::{Fingerprint, GraphSegment, PointId};

use tracing::trace;
use xxhash_rust::xxh3::Xxh3;

use crate::geom2::{distance, Point, Segment};

#[derive(Clone, Debug, Default)]
pub struct RoadGraph {
    points: Vec<Option<Point>>,
    segments: Vec<GraphSegment>,
}

impl RoadGraph {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditionally append a point.
    ///
    /// Callers that cannot rule out a coordinate clash use `try_add_point`.
    pub fn add_point(&mut self, p: Point) -> PointId {
        debug_assert!(self.find_point(p).is_none(), "duplicate point {p:?}");
        self.points.push(Some(p));
        PointId(self.points.len() - 1)
    }

    /// Add `p` unless a point with equal coordinates already exists.
    pub fn try_add_point(&mut self, p: Point) -> Option<PointId> {
        if self.find_point(p).is_some() {
            return None;
        }
        Some(self.add_point(p))
    }

    /// Id of the live point at exactly `p`.
    pub fn find_point(&self, p: Point) -> Option<PointId> {
        self.points()
            .find_map(|(id, q)| if q == p { Some(id) } else { None })
    }

    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        self.find_point(p).is_some()
    }

    /// Coordinates of a live point.
    #[inline]
    pub fn point(&self, id: PointId) -> Option<Point> {
        self.points.get(id.0).copied().flatten()
    }

    /// Live points in insertion order.
    pub fn points(&self) -> impl Iterator<Item = (PointId, Point)> + '_ {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(k, p)| p.map(|p| (PointId(k), p)))
    }

    pub fn point_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    /// Remove a point and every segment incident to it.
    ///
    /// Returns the number of segments removed, or `None` for a dead id.
    pub fn remove_point(&mut self, id: PointId) -> Option<usize> {
        let slot = self.points.get_mut(id.0)?;
        slot.take()?;
        let before = self.segments.len();
        self.segments.retain(|s| !s.includes(id));
        let removed = before - self.segments.len();
        trace!(point = id.0, segments = removed, "point removed");
        Some(removed)
    }

    /// Move a live point. Refused if another point already sits at `to`.
    pub fn move_point(&mut self, id: PointId, to: Point) -> bool {
        if self.point(id).is_none() {
            return false;
        }
        if let Some(other) = self.find_point(to) {
            return other == id;
        }
        self.points[id.0] = Some(to);
        true
    }

    /// Unconditionally append a segment between two live points.
    pub fn add_segment(&mut self, a: PointId, b: PointId) {
        debug_assert!(self.point(a).is_some() && self.point(b).is_some());
        self.segments.push(GraphSegment::new(a, b));
    }

    /// Add `a-b` unless it is a self loop, a duplicate, or references a dead
    /// point (coordinate-equal endpoints also count as a self loop).
    pub fn try_add_segment(&mut self, a: PointId, b: PointId) -> bool {
        let (Some(pa), Some(pb)) = (self.point(a), self.point(b)) else {
            return false;
        };
        if a == b || pa == pb || self.contains_segment(a, b) {
            return false;
        }
        self.add_segment(a, b);
        true
    }

    #[inline]
    pub fn contains_segment(&self, a: PointId, b: PointId) -> bool {
        let probe = GraphSegment::new(a, b);
        self.segments.iter().any(|s| *s == probe)
    }

    /// Remove `a-b` (either direction). Returns whether it existed.
    pub fn remove_segment(&mut self, a: PointId, b: PointId) -> bool {
        let probe = GraphSegment::new(a, b);
        match self.segments.iter().position(|s| *s == probe) {
            Some(k) => {
                self.segments.remove(k);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn graph_segments(&self) -> &[GraphSegment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Resolve a graph segment to geometry.
    pub fn resolve(&self, s: &GraphSegment) -> Option<Segment> {
        Some(Segment::new(self.point(s.a)?, self.point(s.b)?))
    }

    /// All segments as geometry, in insertion order.
    pub fn segments(&self) -> Vec<Segment> {
        self.segments.iter().filter_map(|s| self.resolve(s)).collect()
    }

    pub fn segments_incident_to(&self, id: PointId) -> Vec<GraphSegment> {
        self.segments
            .iter()
            .filter(|s| s.includes(id))
            .copied()
            .collect()
    }

    #[inline]
    pub fn degree(&self, id: PointId) -> usize {
        self.segments.iter().filter(|s| s.includes(id)).count()
    }

    /// Points with more than two incident segments.
    pub fn intersections(&self) -> Vec<(PointId, Point)> {
        self.points()
            .filter(|(id, _)| self.degree(*id) > 2)
            .collect()
    }

    /// Live point nearest to `p`, strictly within `threshold`.
    pub fn nearest_point(&self, p: Point, threshold: f64) -> Option<PointId> {
        let mut best: Option<(PointId, f64)> = None;
        for (id, q) in self.points() {
            let d = distance(p, q);
            if d < threshold && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Segment nearest to `p`, strictly within `threshold`.
    pub fn nearest_segment(&self, p: Point, threshold: f64) -> Option<GraphSegment> {
        let mut best: Option<(GraphSegment, f64)> = None;
        for s in &self.segments {
            let Some(geo) = self.resolve(s) else {
                continue;
            };
            let d = geo.distance_to_point(p);
            if d < threshold && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((*s, d));
            }
        }
        best.map(|(s, _)| s)
    }

    /// Drop every point and segment. Old ids stay dead.
    pub fn clear(&mut self) {
        for slot in &mut self.points {
            *slot = None;
        }
        self.segments.clear();
    }

    /// Structural hash over live point coordinates and segment endpoints.
    ///
    /// Not cryptographic; only used to skip regeneration of an unchanged graph.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut h = Xxh3::new();
        for (_, p) in self.points() {
            h.update(&p.x.to_le_bytes());
            h.update(&p.y.to_le_bytes());
        }
        // Separator so points and segments never alias.
        h.update(&[0xff]);
        for s in self.segments() {
            for q in [s.p1, s.p2] {
                h.update(&q.x.to_le_bytes());
                h.update(&q.y.to_le_bytes());
            }
        }
        Fingerprint(h.digest())
    }
}
