//! Procedural road worlds from a sparse graph of user-placed roads.
//!
//! Layers (bottom-up)
//! - `geom2`: 2D kernel (segments, polygons, envelopes, boundary union).
//! - `graph`: editable road skeleton with stable point handles.
//! - `world`: generation of road borders, lane guides, buildings and trees.
//! - `markings` + `lights`: user-placed markings and the traffic-light
//!   round-robin scheduler.
//! - `snapshot`: JSON persistence of a whole world.
//!
//! API Policy
//! - Geometry predicates never fail; they return `Option`/`bool`.
//! - Fallible entry points (params, snapshots) return `Result<_, WorldError>`.
//! - Logging goes through `tracing` at debug/trace level; installing a
//!   subscriber is the caller's business.

pub mod cfg;
pub mod error;
pub mod geom2;
pub mod graph;
pub mod lights;
pub mod markings;
pub mod snapshot;
pub mod world;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::WorldError;
pub use graph::RoadGraph;
pub use snapshot::Snapshot;
pub use world::{World, WorldParams};

/// Common exports for editors and renderers.
pub mod prelude {
    pub use crate::geom2::{Envelope, Point, Polygon, Segment};
    pub use crate::graph::{Fingerprint, PointId, RoadGraph};
    pub use crate::lights::{tick_for_frame, FrameClock};
    pub use crate::markings::{LightState, Marking, MarkingKind};
    pub use crate::snapshot::Snapshot;
    pub use crate::world::{Building, Item, Tree, World, WorldParams};
    pub use crate::WorldError;
    pub use nalgebra::Vector2 as Vec2;
}
