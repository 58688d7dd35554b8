use anyhow::{Context, Result};
use flock_core::{
    BoundaryPolicy, Bounds, Dimensions, Flock, Parameters, SeparationFalloff, SeparationResponse,
    Vector,
};
use flock_shared::{
    AgentState, AttractorUpdate, Boundary, Falloff, FlockSnapshot, FlockStatus, Position, Preset,
    Response, SimulationSettings,
};

/// Everything needed to build a flock, after presets and overrides are
/// resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPlan {
    pub agents: usize,
    pub bounds: Bounds,
    pub dims: Dimensions,
    pub params: Parameters,
    pub boundary: BoundaryPolicy,
    pub seed: Option<u64>,
    pub attractor: Option<Vector>,
}

impl SimulationPlan {
    /// Starts from the preset's values and applies every override present
    /// in `settings`.
    pub fn resolve(settings: &SimulationSettings) -> Result<Self> {
        let mut plan = match settings.preset.unwrap_or(Preset::Canvas) {
            Preset::Canvas => Self {
                agents: 200,
                bounds: Bounds::canvas(800.0, 600.0),
                dims: Dimensions::Two,
                params: Parameters::canvas(),
                boundary: BoundaryPolicy::Wrap,
                seed: None,
                attractor: None,
            },
            Preset::Scene => Self {
                agents: 50,
                bounds: Bounds::cube(5.0),
                dims: Dimensions::Three,
                params: Parameters::scene(),
                boundary: BoundaryPolicy::Clamp,
                seed: None,
                attractor: None,
            },
        };

        if let Some(n) = settings.dimensions {
            plan.dims = Dimensions::try_from(n).context("Invalid dimensions setting")?;
        }
        if let Some(agents) = settings.agents {
            plan.agents = agents;
        }
        if let Some(bounds) = settings.bounds {
            plan.bounds = Bounds::new(to_vector(bounds.min), to_vector(bounds.max));
        }
        if let Some(boundary) = settings.boundary {
            plan.boundary = match boundary {
                Boundary::Wrap => BoundaryPolicy::Wrap,
                Boundary::Clamp => BoundaryPolicy::Clamp,
                Boundary::Bounce => BoundaryPolicy::Bounce,
            };
        }
        plan.seed = settings.seed.or(plan.seed);
        plan.attractor = settings.attractor.map(to_vector);

        let p = &mut plan.params;
        let overrides = [
            (&mut p.alignment_radius, settings.alignment_radius),
            (&mut p.cohesion_radius, settings.cohesion_radius),
            (&mut p.separation_radius, settings.separation_radius),
            (&mut p.attraction_radius, settings.attraction_radius),
            (&mut p.alignment_weight, settings.alignment_weight),
            (&mut p.cohesion_weight, settings.cohesion_weight),
            (&mut p.separation_weight, settings.separation_weight),
            (&mut p.attraction_weight, settings.attraction_weight),
            (&mut p.max_speed, settings.max_speed),
            (&mut p.max_force, settings.max_force),
            (&mut p.time_step, settings.time_step),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(limit) = settings.limit_steering {
            p.limit_steering = limit;
        }
        if let Some(falloff) = settings.separation_falloff {
            p.separation_falloff = match falloff {
                Falloff::Uniform => SeparationFalloff::Uniform,
                Falloff::InverseDistance => SeparationFalloff::InverseDistance,
            };
        }
        if let Some(response) = settings.separation_response {
            p.separation_response = match response {
                Response::Steer => SeparationResponse::Steer,
                Response::Direct => SeparationResponse::Direct,
            };
        }
        if let Some(enabled) = settings.attraction_enabled {
            p.attraction_enabled = enabled;
        }
        if let Some([min, max]) = settings.initial_speed {
            p.initial_speed = (min, max);
        }
        // an attractor without an explicit switch turns the rule on
        if plan.attractor.is_some() && settings.attraction_enabled.is_none() {
            p.attraction_enabled = true;
        }

        Ok(plan)
    }

    pub fn build(&self) -> Result<Flock> {
        let flock = match self.seed {
            Some(seed) => Flock::seeded(self.agents, self.bounds, self.dims, self.params, seed),
            None => Flock::new(self.agents, self.bounds, self.dims, self.params),
        };
        let mut flock = flock
            .context("Failed to build flock")?
            .with_boundary(self.boundary);
        flock.set_attractor(self.attractor);
        Ok(flock)
    }
}

pub fn load_settings(path: &std::path::Path) -> Result<SimulationSettings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    SimulationSettings::from_json(&json)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))
}

/// Parses a recorded attractor trace: one JSON [`AttractorUpdate`] per line,
/// blank lines skipped.
pub fn parse_attractor_updates(text: &str) -> Result<Vec<AttractorUpdate>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Invalid attractor update on line {}", n + 1))
        })
        .collect()
}

pub fn load_attractor_updates(path: &std::path::Path) -> Result<Vec<AttractorUpdate>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read attractor file {}", path.display()))?;
    parse_attractor_updates(&text)
        .with_context(|| format!("Failed to parse attractor file {}", path.display()))
}

/// Parses `x,y` or `x,y,z`.
pub fn parse_point(s: &str) -> Result<Position> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid point '{}'", s))?;

    match parts.as_slice() {
        [x, y] => Ok(Position::planar(*x, *y)),
        [x, y, z] => Ok(Position::new(*x, *y, *z)),
        _ => anyhow::bail!("Point '{}' must have 2 or 3 components", s),
    }
}

pub fn apply_attractor_update(flock: &mut Flock, update: &AttractorUpdate) {
    flock.set_attractor(update.position.map(to_vector));
}

pub fn snapshot(flock: &Flock) -> FlockSnapshot {
    FlockSnapshot {
        tick: flock.tick(),
        agents: flock
            .agents()
            .iter()
            .map(|a| AgentState {
                position: to_position(a.position()),
                velocity: to_position(a.velocity()),
            })
            .collect(),
    }
}

pub fn status(flock: &Flock) -> FlockStatus {
    let env = flock.environment();
    FlockStatus {
        agent_count: flock.len(),
        tick: flock.tick(),
        mean_speed: flock.mean_speed(),
        polarization: flock.polarization(),
        centroid: to_position(flock.centroid()),
        attractor_active: env.params.attraction_enabled && env.attractor().is_some(),
    }
}

fn to_vector(p: Position) -> Vector {
    Vector::new(p.x, p.y, p.z)
}

fn to_position(v: Vector) -> Position {
    Position::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("1,2").unwrap(), Position::planar(1.0, 2.0));
        assert_eq!(
            parse_point(" 1.5, -2 ,3 ").unwrap(),
            Position::new(1.5, -2.0, 3.0)
        );
        assert!(parse_point("1").is_err());
        assert!(parse_point("1,2,3,4").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn test_default_plan_is_canvas() {
        let plan = SimulationPlan::resolve(&SimulationSettings::default()).unwrap();
        assert_eq!(plan.agents, 200);
        assert_eq!(plan.dims, Dimensions::Two);
        assert_eq!(plan.params, Parameters::canvas());
        assert_eq!(plan.boundary, BoundaryPolicy::Wrap);
    }

    #[test]
    fn test_attractor_enables_attraction() {
        let settings = SimulationSettings {
            attractor: Some(Position::planar(10.0, 10.0)),
            ..Default::default()
        };
        let plan = SimulationPlan::resolve(&settings).unwrap();
        assert!(plan.params.attraction_enabled);

        let settings = SimulationSettings {
            attraction_enabled: Some(false),
            ..settings
        };
        let plan = SimulationPlan::resolve(&settings).unwrap();
        assert!(!plan.params.attraction_enabled);
    }

    #[test]
    fn test_parse_attractor_updates() {
        let updates = parse_attractor_updates(
            "{\"position\": {\"x\": 1.0, \"y\": 2.0}}\n\n{\"position\": null}\n",
        )
        .unwrap();
        assert_eq!(
            updates,
            vec![
                AttractorUpdate {
                    position: Some(Position::planar(1.0, 2.0))
                },
                AttractorUpdate { position: None },
            ]
        );

        let err = parse_attractor_updates("{\"position\": null}\n{\"position\": ").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let settings = SimulationSettings {
            dimensions: Some(4),
            ..Default::default()
        };
        assert!(SimulationPlan::resolve(&settings).is_err());
    }
}
