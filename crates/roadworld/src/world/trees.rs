//! Tree scattering by rejection sampling around roads and buildings.
//!
//! Model
//! - Sample uniformly in the bounding box of road borders and buildings.
//! - Accept a sample iff it is clear of every illegal polygon (outside and at
//!   least `tree_size / 2` away), at least `tree_size` from every tree, and
//!   within `2 · tree_size` of some illegal polygon.
//! - Stop after `TREE_MAX_MISSES` consecutive rejections; there is no target
//!   count.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

use crate::cfg::{DEFAULT_ITEM_HEIGHT, TREE_LEVEL_STEPS, TREE_MAX_MISSES};
use crate::geom2::{distance, lerp, translate, Bounds2, Point, Polygon, Segment};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "TreeRepr", into = "TreeRepr")]
pub struct Tree {
    pub center: Point,
    pub size: f64,
    pub height: f64,
    /// Noisy round footprint, derived from `center` and `size`.
    pub base: Polygon,
}

#[derive(Clone, Serialize, Deserialize)]
struct TreeRepr {
    center: Point,
    size: f64,
    #[serde(default = "default_height")]
    height: f64,
}

fn default_height() -> f64 {
    DEFAULT_ITEM_HEIGHT
}

impl From<TreeRepr> for Tree {
    fn from(r: TreeRepr) -> Self {
        let mut t = Tree::new(r.center, r.size);
        t.height = r.height;
        t
    }
}

impl From<Tree> for TreeRepr {
    fn from(t: Tree) -> Self {
        TreeRepr {
            center: t.center,
            size: t.size,
            height: t.height,
        }
    }
}

impl Tree {
    pub fn new(center: Point, size: f64) -> Self {
        Self {
            center,
            size,
            height: DEFAULT_ITEM_HEIGHT,
            base: tree_level(center.x, center, size),
        }
    }
}

/// Wobbly disc of diameter ~`size` around `at`.
///
/// The wobble depends only on `center_x` (the tree's own center), so every
/// level of a stacked fake-3D rendering shares one silhouette.
pub fn tree_level(center_x: f64, at: Point, size: f64) -> Polygon {
    let rad = size / 2.0;
    let points = (0..TREE_LEVEL_STEPS)
        .map(|k| {
            let a = k as f64 * 2.0 * PI / TREE_LEVEL_STEPS as f64;
            let wobble = (((a + center_x) * size) % 17.0).cos().powi(2);
            translate(at, a, rad * lerp(0.5, 1.0, wobble))
        })
        .collect();
    Polygon::new(points)
}

/// Scatter trees around `illegal` polygons inside `bounds`.
pub fn scatter_trees<R: Rng>(
    bounds: Bounds2,
    illegal: &[&Polygon],
    tree_size: f64,
    rng: &mut R,
) -> Vec<Tree> {
    let mut trees: Vec<Tree> = Vec::new();
    if illegal.is_empty() {
        return trees;
    }
    let mut misses = 0u32;
    while misses < TREE_MAX_MISSES {
        let p = Point::new(
            lerp(bounds.min.x, bounds.max.x, rng.gen::<f64>()),
            lerp(bounds.min.y, bounds.max.y, rng.gen::<f64>()),
        );
        if accepts(p, illegal, &trees, tree_size) {
            trees.push(Tree::new(p, tree_size));
            misses = 0;
        } else {
            misses += 1;
        }
    }
    trees
}

fn accepts(p: Point, illegal: &[&Polygon], trees: &[Tree], tree_size: f64) -> bool {
    let blocked = illegal
        .iter()
        .any(|poly| poly.contains_point(p) || poly.distance_to_point(p) < tree_size / 2.0);
    if blocked {
        return false;
    }
    if trees.iter().any(|t| distance(t.center, p) < tree_size) {
        return false;
    }
    illegal
        .iter()
        .any(|poly| poly.distance_to_point(p) < tree_size * 2.0)
}

/// Trees for a generated road network.
pub fn generate_trees<R: Rng>(
    borders: &[Segment],
    buildings: &[Polygon],
    road_envelopes: &[Polygon],
    tree_size: f64,
    rng: &mut R,
) -> Vec<Tree> {
    let corners = borders
        .iter()
        .flat_map(|s| [s.p1, s.p2])
        .chain(buildings.iter().flat_map(|b| b.points().iter().copied()));
    let Some(bounds) = Bounds2::from_points(corners) else {
        return Vec::new();
    };
    let illegal: Vec<&Polygon> = buildings.iter().chain(road_envelopes.iter()).collect();
    let trees = scatter_trees(bounds, &illegal, tree_size, rng);
    debug!(trees = trees.len(), illegal = illegal.len(), "trees scattered");
    trees
}
