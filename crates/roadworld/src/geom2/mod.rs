//! 2D geometry kernel: points, segments, polygons, envelopes, union.
//!
//! Purpose
//! - Provide the small set of primitives the world generator is built from:
//!   vector helpers, segment intersection/projection, ray-cast containment,
//!   capsule envelopes, and the boundary-soup polygon union.
//!
//! Conventions
//! - `Point` is `nalgebra::Vector2<f64>`; equality is exact.
//! - Queries that can fail return `Option` (no intersection, no nearest
//!   point); nothing here panics or returns errors on degenerate input.
//! - Tolerances live in `crate::cfg`.

mod envelope;
mod polygon;
mod types;
pub mod union;
mod util;

pub use envelope::Envelope;
pub use polygon::Polygon;
pub use types::{Bounds2, Intersection, Point, Projection, Segment};
pub use union::union;
pub use util::{
    add, angle, average, distance, dot, get_intersection, lerp, lerp2d, magnitude, nearest_point,
    nearest_segment, normalize, perpendicular, scale, subtract, translate,
};
