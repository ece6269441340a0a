//! Traffic-light scheduler: round-robin control centers per intersection.
//!
//! Purpose
//! - Derive every light's colour from (graph topology, marking list, tick)
//!   alone. Nothing is persisted between ticks except the caller's counter.
//!
//! Model
//! - Intersections are graph points of degree > 2. Each light joins the
//!   control center of its nearest intersection (unbounded radius).
//! - A center with `n` lights cycles every `n · (GREEN + ORANGE)` ticks.
//!   Phase 0 is all-red. Otherwise light `phase / (GREEN + ORANGE)` is green
//!   for the first `GREEN` ticks of its slot and orange after; the rest are red.
//! - Lights are ordered by their position in the marking list.
//! - If the graph has no intersection, lights keep their current state.

use std::collections::BTreeMap;

use tracing::trace;

use crate::cfg::{FRAMES_PER_TICK, GREEN_DURATION, ORANGE_DURATION};
use crate::geom2::{distance, Point};
use crate::graph::{PointId, RoadGraph};
use crate::markings::{LightState, Marking};

const SLOT: u64 = GREEN_DURATION + ORANGE_DURATION;

/// Scheduler tick for an animation frame.
#[inline]
pub fn tick_for_frame(frame: u64) -> u64 {
    frame / FRAMES_PER_TICK
}

/// Explicit frame counter owned by the caller (one `advance` per rendered frame).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameClock {
    frame: u64,
}

impl FrameClock {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        tick_for_frame(self.frame)
    }

    /// Return the tick for the current frame, then move to the next frame.
    pub fn advance(&mut self) -> u64 {
        let t = self.tick();
        self.frame += 1;
        t
    }
}

/// Lights sharing one intersection.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlCenter {
    pub intersection: PointId,
    pub position: Point,
    /// Indices into the marking list, in list order.
    pub lights: Vec<usize>,
}

impl ControlCenter {
    /// Cycle length in ticks.
    #[inline]
    pub fn cycle_length(&self) -> u64 {
        self.lights.len() as u64 * SLOT
    }

    /// Colour of the `k`-th light of this center at `tick`.
    pub fn state_at(&self, k: usize, tick: u64) -> LightState {
        let cycle = self.cycle_length();
        if cycle == 0 {
            return LightState::Red;
        }
        let phase = tick % cycle;
        if phase == 0 {
            return LightState::Red;
        }
        let active = (phase / SLOT) as usize;
        if k != active {
            LightState::Red
        } else if phase % SLOT < GREEN_DURATION {
            LightState::Green
        } else {
            LightState::Orange
        }
    }
}

/// Group the lights of `markings` around their nearest intersection.
pub fn control_centers(graph: &RoadGraph, markings: &[Marking]) -> Vec<ControlCenter> {
    let intersections = graph.intersections();
    if intersections.is_empty() {
        return Vec::new();
    }
    let mut centers: BTreeMap<PointId, ControlCenter> = BTreeMap::new();
    for (k, m) in markings.iter().enumerate() {
        if !m.kind().is_light() {
            continue;
        }
        let Some(&(id, pos)) = intersections.iter().min_by(|a, b| {
            distance(a.1, m.center())
                .partial_cmp(&distance(b.1, m.center()))
                .unwrap_or(std::cmp::Ordering::Equal)
        }) else {
            continue;
        };
        centers
            .entry(id)
            .or_insert_with(|| ControlCenter {
                intersection: id,
                position: pos,
                lights: Vec::new(),
            })
            .lights
            .push(k);
    }
    centers.into_values().collect()
}

/// Recompute every light's state for `tick`.
pub fn update_lights(graph: &RoadGraph, markings: &mut [Marking], tick: u64) {
    let centers = control_centers(graph, markings);
    for center in &centers {
        for (k, &idx) in center.lights.iter().enumerate() {
            markings[idx].set_light_state(center.state_at(k, tick));
        }
    }
    trace!(tick, centers = centers.len(), "lights updated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markings::MarkingKind;
    use nalgebra::vector;

    fn crossroads() -> RoadGraph {
        let mut g = RoadGraph::new();
        let c = g.add_point(vector![0.0, 0.0]);
        for p in [
            vector![200.0, 0.0],
            vector![0.0, 200.0],
            vector![-200.0, 0.0],
            vector![0.0, -200.0],
        ] {
            let id = g.add_point(p);
            assert!(g.try_add_segment(c, id));
        }
        g
    }

    fn light_at(x: f64, y: f64) -> Marking {
        Marking::new(MarkingKind::light(), vector![x, y], vector![1.0, 0.0], 50.0, 50.0)
    }

    #[test]
    fn frame_clock_counts_ticks() {
        let mut clock = FrameClock::new();
        for _ in 0..59 {
            assert_eq!(clock.advance(), 0);
        }
        assert_eq!(clock.advance(), 0);
        assert_eq!(clock.frame(), 60);
        assert_eq!(clock.tick(), 1);
        assert_eq!(tick_for_frame(125), 2);
    }

    #[test]
    fn groups_lights_by_nearest_intersection() {
        let g = crossroads();
        let markings = vec![
            light_at(30.0, 0.0),
            Marking::new(MarkingKind::Crossing, vector![50.0, 0.0], vector![1.0, 0.0], 100.0, 50.0),
            light_at(0.0, 30.0),
            light_at(-30.0, 0.0),
        ];
        let centers = control_centers(&g, &markings);
        assert_eq!(centers.len(), 1);
        assert_eq!(centers[0].lights, vec![0, 2, 3]);
        assert_eq!(centers[0].cycle_length(), 9);
    }

    #[test]
    fn round_robin_with_all_red_phase() {
        let g = crossroads();
        let mut markings = vec![light_at(30.0, 0.0), light_at(0.0, 30.0), light_at(-30.0, 0.0)];
        let expected = [
            // tick: states of light 0,1,2
            (0, [LightState::Red, LightState::Red, LightState::Red]),
            (1, [LightState::Green, LightState::Red, LightState::Red]),
            (2, [LightState::Orange, LightState::Red, LightState::Red]),
            (3, [LightState::Red, LightState::Green, LightState::Red]),
            (4, [LightState::Red, LightState::Green, LightState::Red]),
            (5, [LightState::Red, LightState::Orange, LightState::Red]),
            (6, [LightState::Red, LightState::Red, LightState::Green]),
            (8, [LightState::Red, LightState::Red, LightState::Orange]),
            (9, [LightState::Red, LightState::Red, LightState::Red]),
        ];
        for (tick, states) in expected {
            update_lights(&g, &mut markings, tick);
            let got: Vec<_> = markings.iter().filter_map(Marking::light_state).collect();
            assert_eq!(got, states.to_vec(), "tick {tick}");
        }
    }

    #[test]
    fn at_most_one_light_non_red_per_center() {
        let g = crossroads();
        let mut markings: Vec<Marking> = (0..4)
            .map(|k| light_at(20.0 * k as f64 + 10.0, 5.0))
            .collect();
        for tick in 0..48 {
            update_lights(&g, &mut markings, tick);
            let lit = markings
                .iter()
                .filter(|m| m.light_state() != Some(LightState::Red))
                .count();
            assert!(lit <= 1, "tick {tick}");
            if tick % 12 == 0 {
                assert_eq!(lit, 0);
            }
        }
    }

    #[test]
    fn no_intersection_leaves_lights_untouched() {
        let mut g = RoadGraph::new();
        let a = g.add_point(vector![0.0, 0.0]);
        let b = g.add_point(vector![100.0, 0.0]);
        assert!(g.try_add_segment(a, b));
        let mut markings = vec![light_at(50.0, 0.0)];
        update_lights(&g, &mut markings, 7);
        assert_eq!(markings[0].light_state(), Some(LightState::Off));
    }
}
