//! Generation parameters.

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Knobs for road, building and tree generation (world units).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldParams {
    pub road_width: f64,
    /// Arc steps per road end cap.
    pub road_roundness: u32,
    pub building_width: f64,
    pub building_min_length: f64,
    /// Gap between buildings, and between buildings and the road.
    pub spacing: f64,
    pub tree_size: f64,
    /// Mixed with the graph fingerprint to seed the tree sampler.
    pub seed: u64,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            road_width: 100.0,
            road_roundness: 10,
            building_width: 150.0,
            building_min_length: 150.0,
            spacing: 150.0,
            tree_size: 160.0,
            seed: 0,
        }
    }
}

impl WorldParams {
    pub fn validate(&self) -> Result<(), WorldError> {
        let finite = [
            self.road_width,
            self.building_width,
            self.building_min_length,
            self.spacing,
            self.tree_size,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(WorldError::invalid("all sizes must be finite"));
        }
        if self.road_width <= 0.0 {
            return Err(WorldError::invalid("road_width must be > 0"));
        }
        if self.building_width <= 0.0 {
            return Err(WorldError::invalid("building_width must be > 0"));
        }
        if self.building_min_length <= 0.0 {
            return Err(WorldError::invalid("building_min_length must be > 0"));
        }
        if self.spacing < 0.0 {
            return Err(WorldError::invalid("spacing must be >= 0"));
        }
        if self.tree_size <= 0.0 {
            return Err(WorldError::invalid("tree_size must be > 0"));
        }
        Ok(())
    }
}
