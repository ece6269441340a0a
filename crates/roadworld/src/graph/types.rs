//! Handle types for the road graph.

use serde::{Deserialize, Serialize};

/// Stable handle into the graph's point arena. Never reused after removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointId(pub usize);

/// Undirected road segment between two live points.
#[derive(Clone, Copy, Debug, Eq, Serialize, Deserialize)]
pub struct GraphSegment {
    pub a: PointId,
    pub b: PointId,
}

impl GraphSegment {
    #[inline]
    pub fn new(a: PointId, b: PointId) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn includes(&self, id: PointId) -> bool {
        self.a == id || self.b == id
    }
}

impl PartialEq for GraphSegment {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

/// Cheap structural hash of a graph; equal graphs give equal fingerprints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub u64);
