//! World generator: roads, buildings, trees and markings derived from a graph.
//!
//! Purpose
//! - Turn the sparse road graph into everything a renderer draws: road
//!   envelopes and their merged borders, lane guides, building footprints and
//!   scattered trees. Markings are user-placed and survive regeneration.
//!
//! Model
//! - `generate()` is a pure function of (graph, params): the tree sampler is
//!   seeded from `params.seed` mixed with the graph fingerprint.
//! - `refresh()` regenerates only when the graph fingerprint or the params
//!   differ from the last generation; editors call it once per frame.
//!
//! Notes
//! - Road borders are an unordered line soup; T-junctions leave them open.

pub mod buildings;
mod params;
pub mod trees;

pub use buildings::Building;
pub use params::WorldParams;
pub use trees::Tree;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::error::WorldError;
use crate::geom2::{nearest_segment, union, Envelope, Point, Polygon, Segment};
use crate::graph::{Fingerprint, RoadGraph};
use crate::lights;
use crate::markings::{Marking, MarkingKind};

/// Everything derived from the graph by one generation pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub envelopes: Vec<Envelope>,
    pub road_borders: Vec<Segment>,
    pub lane_guides: Vec<Segment>,
    pub buildings: Vec<Building>,
    pub trees: Vec<Tree>,
}

/// A drawable item with a footprint, as handed to the renderer.
#[derive(Clone, Copy, Debug)]
pub enum Item<'a> {
    Building(&'a Building),
    Tree(&'a Tree),
}

impl<'a> Item<'a> {
    pub fn base(&self) -> &'a Polygon {
        match self {
            Item::Building(b) => &b.base,
            Item::Tree(t) => &t.base,
        }
    }
}

#[derive(Clone, Debug)]
pub struct World {
    pub(crate) graph: RoadGraph,
    pub(crate) params: WorldParams,
    pub(crate) markings: Vec<Marking>,
    pub(crate) generated: Generation,
    /// Inputs of the last generation pass; `None` before the first one.
    pub(crate) generated_for: Option<(Fingerprint, WorldParams)>,
}

// SplitMix64 finalizer.
pub(crate) fn mix(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

fn tree_rng(seed: u64, fp: Fingerprint) -> StdRng {
    StdRng::seed_from_u64(mix(seed ^ mix(fp.0)))
}

/// Envelope polygons of `roads` at `width`.
fn envelopes(roads: &[Segment], width: f64, roundness: u32) -> Vec<Envelope> {
    roads
        .iter()
        .map(|s| Envelope::new(*s, width, roundness))
        .collect()
}

fn envelopes_polys(roads: &[Segment], width: f64, roundness: u32) -> Vec<Polygon> {
    envelopes(roads, width, roundness)
        .into_iter()
        .map(|e| e.poly)
        .collect()
}

/// One full generation pass over `graph`.
pub fn generate_world(graph: &RoadGraph, params: &WorldParams) -> Generation {
    let roads = graph.segments();
    let envelopes = envelopes(&roads, params.road_width, params.road_roundness);
    let road_polys: Vec<Polygon> = envelopes.iter().map(|e| e.poly.clone()).collect();
    let road_borders = union(&road_polys);

    let buildings = buildings::generate_buildings(&roads, params);
    let bases: Vec<Polygon> = buildings.iter().map(|b| b.base.clone()).collect();
    let mut rng = tree_rng(params.seed, graph.fingerprint());
    let trees = trees::generate_trees(
        &road_borders,
        &bases,
        &road_polys,
        params.tree_size,
        &mut rng,
    );

    let lane_polys = envelopes_polys(&roads, params.road_width / 2.0, params.road_roundness);
    let lane_guides = union(&lane_polys);

    debug!(
        roads = roads.len(),
        borders = road_borders.len(),
        guides = lane_guides.len(),
        buildings = buildings.len(),
        trees = trees.len(),
        "world generated"
    );
    Generation {
        envelopes,
        road_borders,
        lane_guides,
        buildings,
        trees,
    }
}

impl World {
    /// Validate `params` and run the first generation pass.
    pub fn new(graph: RoadGraph, params: WorldParams) -> Result<Self, WorldError> {
        params.validate()?;
        let mut world = Self {
            graph,
            params,
            markings: Vec::new(),
            generated: Generation::default(),
            generated_for: None,
        };
        world.generate();
        Ok(world)
    }

    /// Regenerate unconditionally.
    pub fn generate(&mut self) {
        self.generated = generate_world(&self.graph, &self.params);
        self.generated_for = Some((self.graph.fingerprint(), self.params));
    }

    /// Regenerate if the graph or params changed since the last pass.
    pub fn refresh(&mut self) -> bool {
        let fp = self.graph.fingerprint();
        if self.generated_for == Some((fp, self.params)) {
            debug!(fingerprint = fp.0, "regeneration skipped");
            return false;
        }
        self.generate();
        true
    }

    #[inline]
    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    /// Mutable graph access for editing; call `refresh` afterwards.
    #[inline]
    pub fn graph_mut(&mut self) -> &mut RoadGraph {
        &mut self.graph
    }

    #[inline]
    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    /// Replace the params; takes effect on the next `refresh`.
    pub fn set_params(&mut self, params: WorldParams) -> Result<(), WorldError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    #[inline]
    pub fn generation(&self) -> &Generation {
        &self.generated
    }

    /// Fingerprint of the graph the current generation was built from.
    #[inline]
    pub fn generated_fingerprint(&self) -> Option<Fingerprint> {
        self.generated_for.map(|(fp, _)| fp)
    }

    #[inline]
    pub fn envelopes(&self) -> &[Envelope] {
        &self.generated.envelopes
    }

    #[inline]
    pub fn road_borders(&self) -> &[Segment] {
        &self.generated.road_borders
    }

    #[inline]
    pub fn lane_guides(&self) -> &[Segment] {
        &self.generated.lane_guides
    }

    #[inline]
    pub fn buildings(&self) -> &[Building] {
        &self.generated.buildings
    }

    #[inline]
    pub fn trees(&self) -> &[Tree] {
        &self.generated.trees
    }

    #[inline]
    pub fn markings(&self) -> &[Marking] {
        &self.markings
    }

    pub fn add_marking(&mut self, marking: Marking) {
        self.markings.push(marking);
    }

    /// Remove the first marking whose footprint contains `p`.
    pub fn remove_marking_at(&mut self, p: Point) -> Option<Marking> {
        let k = self.markings.iter().position(|m| m.poly().contains_point(p))?;
        Some(self.markings.remove(k))
    }

    pub fn clear_markings(&mut self) {
        self.markings.clear();
    }

    /// Snap a new marking of `kind` to the segment nearest `cursor` and add it.
    ///
    /// Crossings snap to graph segments, everything else to lane guides.
    /// Nothing is placed when no target lies within `threshold` or the cursor
    /// projects beyond the target's ends.
    pub fn place_marking(
        &mut self,
        kind: MarkingKind,
        cursor: Point,
        threshold: f64,
    ) -> Option<&Marking> {
        let targets = if kind.snaps_to_graph() {
            self.graph.segments()
        } else {
            self.generated.lane_guides.clone()
        };
        let seg = targets[nearest_segment(cursor, &targets, threshold)?];
        let proj = seg.project_point(cursor);
        if !(0.0..=1.0).contains(&proj.offset) {
            return None;
        }
        let (width, height) = kind.default_size(self.params.road_width);
        self.markings.push(Marking::new(
            kind,
            proj.point,
            seg.direction_vector(),
            width,
            height,
        ));
        self.markings.last()
    }

    /// Recompute traffic-light states for scheduler tick `tick`.
    pub fn update_lights(&mut self, tick: u64) {
        lights::update_lights(&self.graph, &mut self.markings, tick);
    }

    /// Buildings and trees ordered for painting: farthest from `view` first.
    pub fn items_back_to_front(&self, view: Point) -> Vec<Item<'_>> {
        let mut items: Vec<(f64, Item<'_>)> = self
            .generated
            .buildings
            .iter()
            .map(Item::Building)
            .chain(self.generated.trees.iter().map(Item::Tree))
            .map(|it| (it.base().distance_to_point(view), it))
            .collect();
        items.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        items.into_iter().map(|(_, it)| it).collect()
    }

    /// Drop user content: markings. The graph is cleared via `graph_mut().clear()`.
    pub fn dispose(&mut self) {
        self.markings.clear();
    }
}
