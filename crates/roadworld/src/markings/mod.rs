//! Road markings: oriented rectangular footprints with a closed set of kinds.
//!
//! Model
//! - A marking is placed at `center`, aligned with `direction` (usually the
//!   direction of the guide it snapped to), with `width` across and `height`
//!   along the direction.
//! - The footprint polygon is a flat envelope around the support segment
//!   `center ± direction * height / 2`.
//! - Kinds differ only in which footprint edges they draw as borders and in
//!   the light state carried by traffic lights.

use serde::{Deserialize, Serialize};

use crate::cfg::LIGHT_HEIGHT;
use crate::geom2::{angle, translate, Envelope, Point, Polygon, Segment};

/// Colour shown by a traffic light.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightState {
    #[default]
    Off,
    Green,
    Orange,
    Red,
}

/// Closed set of marking kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkingKind {
    Crossing,
    Light { state: LightState },
    Parking,
    Start,
    StopSign,
    Target,
    Yield,
}

impl MarkingKind {
    pub fn light() -> Self {
        MarkingKind::Light {
            state: LightState::Off,
        }
    }

    #[inline]
    pub fn is_light(&self) -> bool {
        matches!(self, MarkingKind::Light { .. })
    }

    /// Kinds placed on graph segments rather than on lane guides.
    #[inline]
    pub fn snaps_to_graph(&self) -> bool {
        matches!(self, MarkingKind::Crossing)
    }

    /// Default `(width, height)` for a world with the given road width.
    pub fn default_size(&self, road_width: f64) -> (f64, f64) {
        match self {
            MarkingKind::Crossing => (road_width, road_width / 2.0),
            _ => (road_width / 2.0, road_width / 2.0),
        }
    }

    /// Footprint edge indices drawn as borders.
    fn border_edges(&self) -> &'static [usize] {
        match self {
            MarkingKind::Crossing | MarkingKind::Parking => &[0, 2],
            MarkingKind::Light { .. } => &[0],
            MarkingKind::StopSign | MarkingKind::Yield => &[2],
            MarkingKind::Start | MarkingKind::Target => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MarkingRepr", into = "MarkingRepr")]
pub struct Marking {
    kind: MarkingKind,
    center: Point,
    direction: Point,
    width: f64,
    height: f64,
    poly: Polygon,
}

/// Type tag written to snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum MarkingTag {
    Crossing,
    Light,
    Parking,
    Start,
    StopSign,
    Target,
    Yield,
}

/// Snapshot form: the footprint is rebuilt on load.
#[derive(Clone, Serialize, Deserialize)]
struct MarkingRepr {
    #[serde(rename = "type")]
    tag: MarkingTag,
    center: Point,
    #[serde(rename = "directionVector")]
    direction: Point,
    width: f64,
    height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<LightState>,
}

impl TryFrom<MarkingRepr> for Marking {
    type Error = String;

    fn try_from(r: MarkingRepr) -> Result<Self, Self::Error> {
        if r.direction.x == 0.0 && r.direction.y == 0.0 {
            return Err("marking direction must be non-zero".to_string());
        }
        let kind = match r.tag {
            MarkingTag::Crossing => MarkingKind::Crossing,
            MarkingTag::Light => MarkingKind::Light {
                state: r.state.unwrap_or_default(),
            },
            MarkingTag::Parking => MarkingKind::Parking,
            MarkingTag::Start => MarkingKind::Start,
            MarkingTag::StopSign => MarkingKind::StopSign,
            MarkingTag::Target => MarkingKind::Target,
            MarkingTag::Yield => MarkingKind::Yield,
        };
        Ok(Marking::new(kind, r.center, r.direction, r.width, r.height))
    }
}

impl From<Marking> for MarkingRepr {
    fn from(m: Marking) -> Self {
        let (tag, state) = match m.kind {
            MarkingKind::Crossing => (MarkingTag::Crossing, None),
            MarkingKind::Light { state } => (MarkingTag::Light, Some(state)),
            MarkingKind::Parking => (MarkingTag::Parking, None),
            MarkingKind::Start => (MarkingTag::Start, None),
            MarkingKind::StopSign => (MarkingTag::StopSign, None),
            MarkingKind::Target => (MarkingTag::Target, None),
            MarkingKind::Yield => (MarkingTag::Yield, None),
        };
        MarkingRepr {
            tag,
            center: m.center,
            direction: m.direction,
            width: m.width,
            height: m.height,
            state,
        }
    }
}

impl Marking {
    /// Build a marking; traffic lights always use the fixed light height.
    pub fn new(kind: MarkingKind, center: Point, direction: Point, width: f64, height: f64) -> Self {
        let height = if kind.is_light() { LIGHT_HEIGHT } else { height };
        let a = angle(direction);
        let support = Segment::new(
            translate(center, a, height / 2.0),
            translate(center, a, -height / 2.0),
        );
        let poly = Envelope::rect(support, width).poly;
        Self {
            kind,
            center,
            direction,
            width,
            height,
            poly,
        }
    }

    #[inline]
    pub fn kind(&self) -> MarkingKind {
        self.kind
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn direction(&self) -> Point {
        self.direction
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Footprint used for hit-testing and rendering.
    #[inline]
    pub fn poly(&self) -> &Polygon {
        &self.poly
    }

    pub fn borders(&self) -> Vec<Segment> {
        self.kind
            .border_edges()
            .iter()
            .map(|&k| self.poly.segments()[k])
            .collect()
    }

    /// Light colour, `None` for non-light markings.
    pub fn light_state(&self) -> Option<LightState> {
        match self.kind {
            MarkingKind::Light { state } => Some(state),
            _ => None,
        }
    }

    /// Set the light colour; ignored for non-light markings.
    pub fn set_light_state(&mut self, new: LightState) {
        if let MarkingKind::Light { state } = &mut self.kind {
            *state = new;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn footprint_is_width_by_height_rectangle() {
        let m = Marking::new(
            MarkingKind::Crossing,
            vector![10.0, 0.0],
            vector![1.0, 0.0],
            100.0,
            50.0,
        );
        let b = m.poly().bounds();
        assert_eq!(m.poly().points().len(), 4);
        assert!((b.width() - 50.0).abs() < 1e-9);
        assert!((b.height() - 100.0).abs() < 1e-9);
        assert!(m.poly().contains_point(vector![10.0, 0.0]));
        assert_eq!(m.borders().len(), 2);
    }

    #[test]
    fn light_forces_height_and_starts_off() {
        let mut m = Marking::new(
            MarkingKind::light(),
            vector![0.0, 0.0],
            vector![0.0, 1.0],
            50.0,
            50.0,
        );
        assert_eq!(m.height(), LIGHT_HEIGHT);
        assert_eq!(m.light_state(), Some(LightState::Off));
        m.set_light_state(LightState::Green);
        assert_eq!(m.kind(), MarkingKind::Light { state: LightState::Green });
        assert_eq!(m.borders().len(), 1);

        let mut stop = Marking::new(
            MarkingKind::StopSign,
            vector![0.0, 0.0],
            vector![0.0, 1.0],
            50.0,
            50.0,
        );
        stop.set_light_state(LightState::Red);
        assert_eq!(stop.light_state(), None);
    }

    #[test]
    fn json_uses_type_tag_and_rebuilds_footprint() {
        let m = Marking::new(
            MarkingKind::Light {
                state: LightState::Orange,
            },
            vector![3.0, 4.0],
            vector![1.0, 0.0],
            50.0,
            18.0,
        );
        let text = serde_json::to_string(&m).unwrap();
        assert!(text.contains("\"type\":\"light\""));
        assert!(text.contains("\"state\":\"orange\""));
        let back: Marking = serde_json::from_str(&text).unwrap();
        assert_eq!(back, m);

        let stop = r#"{"type":"stop-sign","center":[0,0],"directionVector":[0,1],"width":50,"height":50}"#;
        let s: Marking = serde_json::from_str(stop).unwrap();
        assert_eq!(s.kind(), MarkingKind::StopSign);

        let bad = r#"{"type":"yield","center":[0,0],"directionVector":[0,0],"width":50,"height":50}"#;
        assert!(serde_json::from_str::<Marking>(bad).is_err());
    }
}
