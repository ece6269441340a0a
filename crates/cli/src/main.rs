use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roadworld::lights::{control_centers, tick_for_frame};
use roadworld::{Snapshot, World};
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

#[derive(Parser)]
#[command(name = "roadworld")]
#[command(about = "Generate and inspect road worlds stored as JSON snapshots")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Regenerate a world from a snapshot and write it with a provenance sidecar
    Generate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Override the tree seed stored in the snapshot
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print traffic-light states at an animation frame
    Lights {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 0)]
        frame: u64,
    },
    /// Print artifact counts of a stored world
    Stats {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print library version and code revision
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Generate { input, out, seed } => {
            let sidecar = generate(&input, &out, seed)?;
            println!("{}", sidecar.display());
            Ok(())
        }
        Action::Lights { input, frame } => print_json(&lights(&load(&input)?, frame)),
        Action::Stats { input } => print_json(&serde_json::to_value(stats(&load(&input)?))?),
        Action::Report => print_json(&report()),
    }
}

fn print_json(v: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Snapshot::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load(path: &Path) -> Result<World> {
    let world = World::from_snapshot(read_snapshot(path)?)
        .with_context(|| format!("loading {}", path.display()))?;
    tracing::info!(
        input = %path.display(),
        points = world.graph().point_count(),
        segments = world.graph().segment_count(),
        "loaded world"
    );
    Ok(world)
}

/// Load, regenerate and store a world; returns the sidecar path.
fn generate(input: &Path, out: &Path, seed: Option<u64>) -> Result<PathBuf> {
    let mut snapshot = read_snapshot(input)?;
    if let Some(seed) = seed {
        snapshot.params.seed = seed;
    }
    let mut world = World::from_snapshot(snapshot)
        .with_context(|| format!("loading {}", input.display()))?;
    world.generate();
    tracing::info!(
        input = %input.display(),
        out = %out.display(),
        buildings = world.buildings().len(),
        trees = world.trees().len(),
        "generate"
    );

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(out, world.to_json()?).with_context(|| format!("writing {}", out.display()))?;

    let payload = provenance::Payload::new(serde_json::to_value(world.params())?)
        .input(input)
        .fingerprint(world.graph().fingerprint().0);
    provenance::write_sidecar(out, payload)
}

fn lights(world: &World, frame: u64) -> Value {
    let tick = tick_for_frame(frame);
    let mut world = world.clone();
    world.update_lights(tick);
    let centers: Vec<Value> = control_centers(world.graph(), world.markings())
        .iter()
        .map(|c| {
            let lights: Vec<Value> = c
                .lights
                .iter()
                .map(|&k| {
                    let m = &world.markings()[k];
                    json!({
                        "marking": k,
                        "center": [m.center().x, m.center().y],
                        "state": m.light_state(),
                    })
                })
                .collect();
            json!({
                "intersection": [c.position.x, c.position.y],
                "cycle": c.cycle_length(),
                "lights": lights,
            })
        })
        .collect();
    tracing::info!(frame, tick, centers = centers.len(), "lights");
    json!({ "frame": frame, "tick": tick, "centers": centers })
}

#[derive(Debug, Serialize)]
struct Stats {
    points: usize,
    segments: usize,
    intersections: usize,
    borders: usize,
    guides: usize,
    buildings: usize,
    trees: usize,
    markings: usize,
}

fn stats(world: &World) -> Stats {
    Stats {
        points: world.graph().point_count(),
        segments: world.graph().segment_count(),
        intersections: world.graph().intersections().len(),
        borders: world.road_borders().len(),
        guides: world.lane_guides().len(),
        buildings: world.buildings().len(),
        trees: world.trees().len(),
        markings: world.markings().len(),
    }
}

fn report() -> Value {
    json!({
        "roadworld_version": roadworld::VERSION,
        "code_rev": provenance::current_git_rev(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CROSSROADS: &str = r#"{
        "version": 1,
        "graph": {
            "points": [[0, 0], [600, 0], [0, 600], [-600, 0], [0, -600]],
            "segments": [
                {"p1": [0, 0], "p2": [600, 0]},
                {"p1": [0, 0], "p2": [0, 600]},
                {"p1": [0, 0], "p2": [-600, 0]},
                {"p1": [0, 0], "p2": [0, -600]}
            ]
        },
        "markings": [
            {"type": "light", "center": [100, 25], "directionVector": [1, 0],
             "width": 50, "height": 18},
            {"type": "light", "center": [-100, -25], "directionVector": [1, 0],
             "width": 50, "height": 18}
        ]
    }"#;

    #[test]
    fn generate_writes_world_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.json");
        fs::write(&input, CROSSROADS).unwrap();
        let out = dir.path().join("out").join("town.json");
        let sidecar = generate(&input, &out, Some(9)).unwrap();
        assert_eq!(sidecar, dir.path().join("out").join("town.provenance.json"));

        let world = load(&out).unwrap();
        assert_eq!(world.params().seed, 9);
        assert_eq!(
            world.generated_fingerprint(),
            Some(world.graph().fingerprint())
        );
        let s = stats(&world);
        assert_eq!(s.points, 5);
        assert_eq!(s.intersections, 1);
        assert_eq!(s.markings, 2);
        assert!(s.buildings > 0);
    }

    #[test]
    fn lights_follow_frame_clock() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.json");
        fs::write(&input, CROSSROADS).unwrap();
        let world = load(&input).unwrap();

        let at0 = lights(&world, 0);
        assert_eq!(at0["tick"], 0);
        assert_eq!(at0["centers"][0]["lights"][0]["state"], "red");

        let at60 = lights(&world, 60);
        assert_eq!(at60["tick"], 1);
        assert_eq!(at60["centers"][0]["cycle"], 6);
        assert_eq!(at60["centers"][0]["lights"][0]["state"], "green");
        assert_eq!(at60["centers"][0]["lights"][1]["state"], "red");
    }

    #[test]
    fn missing_input_reports_path() {
        let err = load(Path::new("/nonexistent/world.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/world.json"));
    }
}
