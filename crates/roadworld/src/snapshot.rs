//! JSON snapshots of a world: graph, params, markings and cached generation.
//!
//! Model
//! - The graph is stored by coordinates: live points in arena order, then
//!   segments as coordinate pairs. Rebuilding from this form reproduces the
//!   same fingerprint.
//! - The generation cache is optional and records the graph fingerprint and
//!   params it was built from, next to the artifacts themselves. On load it
//!   is restored verbatim when both match the rebuilt graph and the stored
//!   params, and regenerated otherwise.
//!
//! Invariants (checked on load)
//! - Supported `version`; valid params.
//! - Distinct points; every segment endpoint is a stored point; no self loop
//!   or duplicate segment.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;
use crate::geom2::{Point, Segment};
use crate::graph::{Fingerprint, RoadGraph};
use crate::markings::Marking;
use crate::world::{Generation, World, WorldParams};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub points: Vec<Point>,
    pub segments: Vec<Segment>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSnapshot {
    pub fingerprint: Fingerprint,
    /// Params of the pass that built `generation`; may lag the world's
    /// params when they were changed without a refresh.
    pub params: WorldParams,
    #[serde(flatten)]
    pub generation: Generation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub params: WorldParams,
    pub graph: GraphSnapshot,
    #[serde(default)]
    pub markings: Vec<Marking>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<GeneratedSnapshot>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, WorldError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, WorldError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Rebuild the road graph, rejecting inconsistent point/segment lists.
    pub fn build_graph(&self) -> Result<RoadGraph, WorldError> {
        let mut graph = RoadGraph::new();
        for p in &self.graph.points {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(WorldError::snapshot(format!("non-finite point {p:?}")));
            }
            if graph.try_add_point(*p).is_none() {
                return Err(WorldError::snapshot(format!("duplicate point {p:?}")));
            }
        }
        for s in &self.graph.segments {
            let a = graph
                .find_point(s.p1)
                .ok_or_else(|| WorldError::snapshot(format!("unknown endpoint {:?}", s.p1)))?;
            let b = graph
                .find_point(s.p2)
                .ok_or_else(|| WorldError::snapshot(format!("unknown endpoint {:?}", s.p2)))?;
            if !graph.try_add_segment(a, b) {
                return Err(WorldError::snapshot(format!(
                    "self loop or duplicate segment {:?} -> {:?}",
                    s.p1, s.p2
                )));
            }
        }
        Ok(graph)
    }
}

impl World {
    pub fn to_snapshot(&self) -> Snapshot {
        let generated = self
            .generated_for
            .map(|(fingerprint, params)| GeneratedSnapshot {
                fingerprint,
                params,
                generation: self.generated.clone(),
            });
        Snapshot {
            version: SNAPSHOT_VERSION,
            params: self.params,
            graph: GraphSnapshot {
                points: self.graph.points().map(|(_, p)| p).collect(),
                segments: self.graph.segments(),
            },
            markings: self.markings.clone(),
            generated,
        }
    }

    /// Restore a world; a missing cache, or one built for another graph or
    /// other params, is regenerated.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, WorldError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(WorldError::snapshot(format!(
                "unsupported version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }
        snapshot.params.validate()?;
        let graph = snapshot.build_graph()?;
        if let Some(m) = snapshot.markings.iter().find(|m| m.direction().norm() == 0.0) {
            return Err(WorldError::snapshot(format!(
                "marking at {:?} has no direction",
                m.center()
            )));
        }
        let fp = graph.fingerprint();
        let mut world = World {
            graph,
            params: snapshot.params,
            markings: snapshot.markings,
            generated: Generation::default(),
            generated_for: None,
        };
        match snapshot.generated {
            Some(cached) if cached.fingerprint == fp && cached.params == world.params => {
                debug!(fingerprint = fp.0, "restored cached generation");
                world.generated = cached.generation;
                world.generated_for = Some((fp, world.params));
            }
            _ => world.generate(),
        }
        Ok(world)
    }

    pub fn to_json(&self) -> Result<String, WorldError> {
        self.to_snapshot().to_json()
    }

    pub fn from_json(text: &str) -> Result<Self, WorldError> {
        Self::from_snapshot(Snapshot::from_json(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markings::{LightState, MarkingKind};
    use nalgebra::vector;

    fn town() -> World {
        let mut g = RoadGraph::new();
        let c = g.add_point(vector![0.0, 0.0]);
        for p in [
            vector![500.0, 0.0],
            vector![0.0, 450.5],
            vector![-400.25, 0.0],
        ] {
            let id = g.add_point(p);
            assert!(g.try_add_segment(c, id));
        }
        let mut w = World::new(g, WorldParams::default()).unwrap();
        w.add_marking(Marking::new(
            MarkingKind::light(),
            vector![100.0, 25.0],
            vector![1.0, 0.0],
            50.0,
            50.0,
        ));
        w.add_marking(Marking::new(
            MarkingKind::Crossing,
            vector![-200.0, 0.0],
            vector![-1.0, 0.0],
            100.0,
            50.0,
        ));
        w.update_lights(1);
        w
    }

    #[test]
    fn json_round_trip_is_exact() {
        let w = town();
        assert_eq!(w.markings()[0].light_state(), Some(LightState::Green));
        let text = w.to_json().unwrap();
        let back = World::from_json(&text).unwrap();
        assert_eq!(back.params(), w.params());
        assert_eq!(back.graph().fingerprint(), w.graph().fingerprint());
        assert_eq!(back.markings(), w.markings());
        assert_eq!(back.generation(), w.generation());
        assert_eq!(back.to_snapshot(), w.to_snapshot());
    }

    #[test]
    fn stale_cache_is_regenerated() {
        let w = town();
        let mut snap = w.to_snapshot();
        snap.graph.points[1] = vector![600.0, 0.0];
        snap.graph.segments[0] = Segment::new(vector![0.0, 0.0], vector![600.0, 0.0]);
        let back = World::from_snapshot(snap).unwrap();
        assert_ne!(back.generation(), w.generation());
        assert_eq!(
            back.generated_fingerprint(),
            Some(back.graph().fingerprint())
        );
    }

    #[test]
    fn cache_built_for_other_params_is_regenerated() {
        let mut w = town();
        let wide = WorldParams {
            road_width: 300.0,
            ..WorldParams::default()
        };
        // Saved before the pending refresh: new params, old artifacts.
        w.set_params(wide).unwrap();
        let text = w.to_json().unwrap();
        let back = World::from_json(&text).unwrap();

        let fresh = World::new(w.graph().clone(), wide).unwrap();
        assert_eq!(back.generation(), fresh.generation());
        assert!((back.envelopes()[0].width - 300.0).abs() < 1e-12);
        assert!(!World::from_json(&text).unwrap().refresh());

        // Hand-edited params next to a cache built for the defaults.
        let mut edited = town().to_snapshot();
        edited.params.seed = 42;
        let back = World::from_snapshot(edited).unwrap();
        let reseeded = World::new(
            w.graph().clone(),
            WorldParams {
                seed: 42,
                ..WorldParams::default()
            },
        )
        .unwrap();
        assert_eq!(back.trees(), reseeded.trees());
    }

    #[test]
    fn cache_artifacts_sit_beside_fingerprint() {
        let text = town().to_json().unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        let generated = &doc["generated"];
        assert!(generated["fingerprint"].is_u64());
        assert_eq!(generated["params"]["roadWidth"], 100.0);
        assert!(generated["envelopes"].is_array());
        assert!(generated["roadBorders"].is_array());
        assert!(generated["trees"].is_array());
        assert!(generated.get("generation").is_none());
    }

    #[test]
    fn missing_cache_is_generated() {
        let w = town();
        let mut snap = w.to_snapshot();
        snap.generated = None;
        let back = World::from_snapshot(snap).unwrap();
        assert_eq!(back.generation(), w.generation());
    }

    #[test]
    fn inconsistent_graphs_are_rejected() {
        let w = town();

        let mut dup = w.to_snapshot();
        dup.graph.points.push(vector![0.0, 0.0]);
        assert!(matches!(
            World::from_snapshot(dup),
            Err(WorldError::Snapshot { .. })
        ));

        let mut dangling = w.to_snapshot();
        dangling
            .graph
            .segments
            .push(Segment::new(vector![0.0, 0.0], vector![9.0, 9.0]));
        assert!(World::from_snapshot(dangling).is_err());

        let mut twice = w.to_snapshot();
        let s = twice.graph.segments[0];
        twice.graph.segments.push(Segment::new(s.p2, s.p1));
        assert!(World::from_snapshot(twice).is_err());

        let mut old = w.to_snapshot();
        old.version = 0;
        assert!(World::from_snapshot(old).is_err());
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            World::from_json("{ not json"),
            Err(WorldError::Json(_))
        ));
    }

    #[test]
    fn minimal_document_loads_with_defaults() {
        let text = r#"{
            "version": 1,
            "graph": {
                "points": [[0.0, 0.0], [300.0, 0.0]],
                "segments": [{"p1": [0.0, 0.0], "p2": [300.0, 0.0]}]
            },
            "markings": [
                {"type": "stop-sign", "center": [150.0, 25.0],
                 "directionVector": [1.0, 0.0], "width": 50.0, "height": 50.0}
            ]
        }"#;
        let w = World::from_json(text).unwrap();
        assert_eq!(*w.params(), WorldParams::default());
        assert_eq!(w.graph().segment_count(), 1);
        assert_eq!(w.markings()[0].kind(), MarkingKind::StopSign);
        assert!(!w.road_borders().is_empty());
    }
}
