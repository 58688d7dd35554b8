use serde::{Deserialize, Serialize};

/// A point or direction as it crosses the wire. `z` may be omitted for
/// planar input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Input message that moves or clears the attractor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttractorUpdate {
    /// Optional attractor position (None means no attractor/free flying)
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// 2-D full-window canvas flock.
    Canvas,
    /// 3-D scene flock inside a cube.
    Scene,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Boundary {
    Wrap,
    Clamp,
    Bounce,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Falloff {
    Uniform,
    InverseDistance,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Response {
    Steer,
    Direct,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WorldBounds {
    pub min: Position,
    pub max: Position,
}

/// Simulation configuration overrides.
///
/// Every field is optional; anything left out keeps the value of the chosen
/// preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    pub preset: Option<Preset>,
    pub dimensions: Option<usize>,
    pub agents: Option<usize>,
    pub seed: Option<u64>,
    pub bounds: Option<WorldBounds>,
    pub boundary: Option<Boundary>,
    pub alignment_radius: Option<f64>,
    pub cohesion_radius: Option<f64>,
    pub separation_radius: Option<f64>,
    pub attraction_radius: Option<f64>,
    pub alignment_weight: Option<f64>,
    pub cohesion_weight: Option<f64>,
    pub separation_weight: Option<f64>,
    pub attraction_weight: Option<f64>,
    pub max_speed: Option<f64>,
    pub max_force: Option<f64>,
    pub limit_steering: Option<bool>,
    pub separation_falloff: Option<Falloff>,
    pub separation_response: Option<Response>,
    pub attraction_enabled: Option<bool>,
    pub initial_speed: Option<[f64; 2]>,
    pub time_step: Option<f64>,
    pub attractor: Option<Position>,
}

impl SimulationSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Fields set in `other` win over fields set in `self`.
    pub fn merged_with(self, other: SimulationSettings) -> Self {
        Self {
            preset: other.preset.or(self.preset),
            dimensions: other.dimensions.or(self.dimensions),
            agents: other.agents.or(self.agents),
            seed: other.seed.or(self.seed),
            bounds: other.bounds.or(self.bounds),
            boundary: other.boundary.or(self.boundary),
            alignment_radius: other.alignment_radius.or(self.alignment_radius),
            cohesion_radius: other.cohesion_radius.or(self.cohesion_radius),
            separation_radius: other.separation_radius.or(self.separation_radius),
            attraction_radius: other.attraction_radius.or(self.attraction_radius),
            alignment_weight: other.alignment_weight.or(self.alignment_weight),
            cohesion_weight: other.cohesion_weight.or(self.cohesion_weight),
            separation_weight: other.separation_weight.or(self.separation_weight),
            attraction_weight: other.attraction_weight.or(self.attraction_weight),
            max_speed: other.max_speed.or(self.max_speed),
            max_force: other.max_force.or(self.max_force),
            limit_steering: other.limit_steering.or(self.limit_steering),
            separation_falloff: other.separation_falloff.or(self.separation_falloff),
            separation_response: other.separation_response.or(self.separation_response),
            attraction_enabled: other.attraction_enabled.or(self.attraction_enabled),
            initial_speed: other.initial_speed.or(self.initial_speed),
            time_step: other.time_step.or(self.time_step),
            attractor: other.attractor.or(self.attractor),
        }
    }
}

/// One agent's post-tick state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgentState {
    pub position: Position,
    pub velocity: Position,
}

/// Read-only view of a whole flock after a completed tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlockSnapshot {
    pub tick: u64,
    pub agents: Vec<AgentState>,
}

/// Aggregate status of a running simulation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlockStatus {
    pub agent_count: usize,
    pub tick: u64,
    pub mean_speed: f64,
    pub polarization: f64,
    pub centroid: Position,
    pub attractor_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_z_defaults_to_zero() {
        let p: Position = serde_json::from_str(r#"{"x": 1.0, "y": 2.0}"#).unwrap();
        assert_eq!(p, Position::planar(1.0, 2.0));
    }

    #[test]
    fn test_attractor_update_clear() {
        let update: AttractorUpdate = serde_json::from_str(r#"{"position": null}"#).unwrap();
        assert_eq!(update.position, None);
    }

    #[test]
    fn test_settings_partial_json() {
        let settings = SimulationSettings::from_json(
            r#"{
                "preset": "scene",
                "boundary": "bounce",
                "separation_falloff": "inverse-distance",
                "max_speed": 0.5
            }"#,
        )
        .unwrap();

        assert_eq!(settings.preset, Some(Preset::Scene));
        assert_eq!(settings.boundary, Some(Boundary::Bounce));
        assert_eq!(settings.separation_falloff, Some(Falloff::InverseDistance));
        assert_eq!(settings.max_speed, Some(0.5));
        assert_eq!(settings.max_force, None);
    }

    #[test]
    fn test_settings_reject_unknown_fields() {
        assert!(SimulationSettings::from_json(r#"{"max_sped": 1.0}"#).is_err());
    }

    #[test]
    fn test_settings_merge_prefers_other() {
        let file = SimulationSettings {
            agents: Some(100),
            max_speed: Some(3.0),
            ..Default::default()
        };
        let flags = SimulationSettings {
            agents: Some(10),
            seed: Some(7),
            ..Default::default()
        };
        let merged = file.merged_with(flags);
        assert_eq!(merged.agents, Some(10));
        assert_eq!(merged.seed, Some(7));
        assert_eq!(merged.max_speed, Some(3.0));
    }
}
