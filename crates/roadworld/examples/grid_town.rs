//! Generate a small grid town and print what an editor would draw.
//!
//! Usage:
//!   cargo run -p roadworld --example grid_town
//!   cargo run -p roadworld --example grid_town -- 4
//!
//! Prints counts per artifact, then a few seconds of traffic-light states at
//! the central intersection.

use roadworld::geom2::Point;
use roadworld::lights::FrameClock;
use roadworld::markings::MarkingKind;
use roadworld::{RoadGraph, World, WorldParams};

fn main() {
    let k: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3);
    let pitch = 800.0;
    let mut graph = RoadGraph::new();
    let mut ids = Vec::new();
    for i in 0..k {
        for j in 0..k {
            ids.push(graph.add_point(Point::new(i as f64 * pitch, j as f64 * pitch)));
        }
    }
    for i in 0..k {
        for j in 0..k {
            if i + 1 < k {
                graph.add_segment(ids[i * k + j], ids[(i + 1) * k + j]);
            }
            if j + 1 < k {
                graph.add_segment(ids[i * k + j], ids[i * k + j + 1]);
            }
        }
    }

    let mut world = match World::new(graph, WorldParams::default()) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("grid_town: {e}");
            return;
        }
    };
    println!(
        "grid {k}x{k}: borders={} guides={} buildings={} trees={}",
        world.road_borders().len(),
        world.lane_guides().len(),
        world.buildings().len(),
        world.trees().len()
    );

    // Four lights around the intersection nearest the middle of the grid.
    let mid = (k / 2) as f64 * pitch;
    let off = WorldParams::default().road_width / 4.0;
    for cursor in [
        Point::new(mid + 200.0, off),
        Point::new(mid - 200.0, -off),
        Point::new(mid + off, 200.0),
        Point::new(mid - off, -200.0),
    ] {
        let cursor = cursor + Point::new(0.0, mid);
        if world.place_marking(MarkingKind::light(), cursor, 60.0).is_none() {
            println!("no lane guide near {:?}", (cursor.x, cursor.y));
        }
    }

    let mut clock = FrameClock::new();
    for _ in 0..(8 * 60) {
        let tick = clock.advance();
        if clock.frame() % 60 != 1 {
            continue;
        }
        world.update_lights(tick);
        let states: Vec<String> = world
            .markings()
            .iter()
            .filter_map(|m| m.light_state())
            .map(|s| format!("{s:?}"))
            .collect();
        println!("tick {tick}: {}", states.join(" "));
    }
}
