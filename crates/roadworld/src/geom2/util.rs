//! Vector helpers over `Point` (free functions, no failure modes).
//!
//! Zero-length `normalize` produces NaN components; callers must not feed
//! degenerate vectors (the road graph rejects zero-length segments).

use super::types::{Intersection, Point, Segment};
use crate::cfg::INTERSECTION_EPS;

#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

#[inline]
pub fn add(a: Point, b: Point) -> Point {
    a + b
}

#[inline]
pub fn subtract(a: Point, b: Point) -> Point {
    a - b
}

#[inline]
pub fn scale(p: Point, s: f64) -> Point {
    p * s
}

#[inline]
pub fn dot(a: Point, b: Point) -> f64 {
    a.dot(&b)
}

#[inline]
pub fn magnitude(p: Point) -> f64 {
    p.x.hypot(p.y)
}

#[inline]
pub fn normalize(p: Point) -> Point {
    p / magnitude(p)
}

/// Counter-clockwise normal `(-y, x)`.
#[inline]
pub fn perpendicular(p: Point) -> Point {
    Point::new(-p.y, p.x)
}

/// Direction angle of `p` (atan2).
#[inline]
pub fn angle(p: Point) -> f64 {
    p.y.atan2(p.x)
}

/// Polar offset of `loc` by `dist` along `angle`.
#[inline]
pub fn translate(loc: Point, angle: f64, dist: f64) -> Point {
    Point::new(loc.x + angle.cos() * dist, loc.y + angle.sin() * dist)
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub fn lerp2d(a: Point, b: Point, t: f64) -> Point {
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Midpoint of `a` and `b`.
#[inline]
pub fn average(a: Point, b: Point) -> Point {
    (a + b) / 2.0
}

/// Index of the point nearest to `target`, if strictly closer than `threshold`.
///
/// Ties keep the earliest point.
pub fn nearest_point(target: Point, points: &[Point], threshold: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (k, p) in points.iter().enumerate() {
        let d = distance(*p, target);
        if d >= threshold {
            continue;
        }
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((k, d));
        }
    }
    best.map(|(k, _)| k)
}

/// Index of the segment nearest to `target`, if strictly closer than `threshold`.
pub fn nearest_segment(target: Point, segments: &[Segment], threshold: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (k, s) in segments.iter().enumerate() {
        let d = s.distance_to_point(target);
        if d < threshold && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((k, d));
        }
    }
    best.map(|(k, _)| k)
}

/// Intersection of segments `a→b` and `c→d`.
///
/// Returns `None` for (near-)parallel segments or when either parametric
/// offset leaves [0,1]. `offset` is measured along `a→b`, `other_offset`
/// along `c→d`.
pub fn get_intersection(a: Point, b: Point, c: Point, d: Point) -> Option<Intersection> {
    let t_top = (d.x - c.x) * (a.y - c.y) - (d.y - c.y) * (a.x - c.x);
    let u_top = (c.y - a.y) * (a.x - b.x) - (c.x - a.x) * (a.y - b.y);
    let bottom = (d.y - c.y) * (b.x - a.x) - (d.x - c.x) * (b.y - a.y);
    if bottom.abs() <= INTERSECTION_EPS {
        return None;
    }
    let t = t_top / bottom;
    let u = u_top / bottom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Intersection {
            point: lerp2d(a, b, t),
            offset: t,
            other_offset: u,
        })
    } else {
        None
    }
}
