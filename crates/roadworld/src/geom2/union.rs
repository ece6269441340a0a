//! Boolean union of possibly-overlapping polygons, as a boundary line soup.
//!
//! Purpose
//! - Merge road envelopes into visible borders and guide segments.
//!
//! Model
//! - Phase 1 (pairwise splitting): for every pair `i < j`, collect the
//!   crossings strictly interior to an edge of both polygons, then split both
//!   edge lists once. Endpoint touches (offset 0 or 1) never split.
//! - Phase 2 (boundary extraction): an edge survives iff no other polygon
//!   has an equal edge or contains its midpoint.
//!
//! Notes
//! - The result is not reassembled into closed cycles; T-junctions of three
//!   or more envelopes may leave open fragments. Renderers draw segments.
//! - O(n²) in total edge count. Road networks stay small.

use tracing::trace;

use super::polygon::Polygon;
use super::types::{Point, Segment};
use super::util::get_intersection;

/// Outer boundary segments of the union of `polygons`.
///
/// Input polygons are not modified; splitting happens on copies.
pub fn union(polygons: &[Polygon]) -> Vec<Segment> {
    let mut polys: Vec<Polygon> = polygons.to_vec();
    multi_break(&mut polys);
    let mut kept = Vec::new();
    for (i, poly) in polys.iter().enumerate() {
        for seg in poly.segments() {
            let covered = polys
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && is_covered_by(seg, other));
            if !covered {
                kept.push(*seg);
            }
        }
    }
    trace!(
        polygons = polygons.len(),
        segments = kept.len(),
        "union boundary extracted"
    );
    kept
}

fn is_covered_by(seg: &Segment, other: &Polygon) -> bool {
    other.segments().iter().any(|s| s.equals(seg)) || other.contains_segment(seg)
}

/// Split every pair of polygons at their mutual interior crossings.
pub fn multi_break(polys: &mut [Polygon]) {
    for i in 0..polys.len() {
        for j in (i + 1)..polys.len() {
            let (head, tail) = polys.split_at_mut(j);
            break_pair(&mut head[i], &mut tail[0]);
        }
    }
}

/// Split both polygons at every crossing strictly inside an edge of each.
pub fn break_pair(a: &mut Polygon, b: &mut Polygon) {
    let mut cuts_a: Vec<Vec<(f64, Point)>> = vec![Vec::new(); a.segments().len()];
    let mut cuts_b: Vec<Vec<(f64, Point)>> = vec![Vec::new(); b.segments().len()];
    let mut hits = 0usize;
    for (i, sa) in a.segments().iter().enumerate() {
        for (j, sb) in b.segments().iter().enumerate() {
            let Some(hit) = get_intersection(sa.p1, sa.p2, sb.p1, sb.p2) else {
                continue;
            };
            if !hit.is_interior() {
                continue;
            }
            cuts_a[i].push((hit.offset, hit.point));
            cuts_b[j].push((hit.other_offset, hit.point));
            hits += 1;
        }
    }
    if hits == 0 {
        return;
    }
    a.split_edges(cuts_a);
    b.split_edges(cuts_b);
}
