use anyhow::Result;
use flock_cli::{
    apply_attractor_update, parse_attractor_updates, snapshot, status, SimulationPlan,
};
use flock_core::{BoundaryPolicy, Dimensions, SeparationFalloff, SeparationResponse};
use flock_shared::{AttractorUpdate, FlockSnapshot, Position, SimulationSettings};
use serde_json::json;

fn settings(value: serde_json::Value) -> SimulationSettings {
    serde_json::from_value(value).unwrap()
}

#[test]
fn scene_settings_with_overrides() -> Result<()> {
    let plan = SimulationPlan::resolve(&settings(json!({
        "preset": "scene",
        "agents": 30,
        "seed": 99,
        "boundary": "bounce",
        "separation_falloff": "uniform",
        "separation_response": "steer",
        "max_speed": 0.3,
        "initial_speed": [0.05, 0.1]
    })))?;

    assert_eq!(plan.agents, 30);
    assert_eq!(plan.dims, Dimensions::Three);
    assert_eq!(plan.boundary, BoundaryPolicy::Bounce);
    assert_eq!(plan.params.separation_falloff, SeparationFalloff::Uniform);
    assert_eq!(plan.params.separation_response, SeparationResponse::Steer);
    assert_eq!(plan.params.max_speed, 0.3);
    // untouched fields keep the preset's value
    assert_eq!(plan.params.separation_radius, 1.0);
    assert_eq!(plan.params.initial_speed, (0.05, 0.1));

    let mut flock = plan.build()?;
    flock.step_n(25);

    let s = status(&flock);
    assert_eq!(s.agent_count, 30);
    assert_eq!(s.tick, 25);
    assert!(s.mean_speed <= 0.3 + 1e-9);
    assert!((0.0..=1.0 + 1e-9).contains(&s.polarization));
    assert!(!s.attractor_active);
    Ok(())
}

#[test]
fn seeded_plans_produce_identical_snapshots() -> Result<()> {
    let run = || -> Result<FlockSnapshot> {
        let plan = SimulationPlan::resolve(&settings(json!({ "agents": 40, "seed": 5 })))?;
        let mut flock = plan.build()?;
        flock.step_n(20);
        Ok(snapshot(&flock))
    };

    let first = run()?;
    assert_eq!(first.tick, 20);
    assert_eq!(first.agents.len(), 40);
    assert_eq!(first, run()?);
    Ok(())
}

#[test]
fn snapshot_serializes_positions_and_velocities() -> Result<()> {
    let plan = SimulationPlan::resolve(&settings(json!({ "agents": 3, "seed": 1 })))?;
    let flock = plan.build()?;

    let value = serde_json::to_value(snapshot(&flock))?;
    assert_eq!(value["tick"], 0);
    let agents = value["agents"].as_array().unwrap();
    assert_eq!(agents.len(), 3);
    for agent in agents {
        assert!(agent["position"]["x"].is_f64());
        assert_eq!(agent["position"]["z"], 0.0);
        assert!(agent["velocity"]["y"].is_f64());
    }
    Ok(())
}

#[test]
fn attractor_updates_reach_the_flock() -> Result<()> {
    let plan = SimulationPlan::resolve(&settings(json!({
        "agents": 10,
        "seed": 3,
        "attraction_enabled": true
    })))?;
    let mut flock = plan.build()?;
    assert!(!status(&flock).attractor_active);

    let update = AttractorUpdate {
        position: Some(Position::new(400.0, 300.0, 12.0)),
    };
    apply_attractor_update(&mut flock, &update);
    assert!(status(&flock).attractor_active);
    // planar flock drops z
    let attractor = flock.environment().attractor().unwrap();
    assert_eq!((attractor.x, attractor.y, attractor.z), (400.0, 300.0, 0.0));

    let cleared: AttractorUpdate = serde_json::from_value(json!({ "position": null }))?;
    apply_attractor_update(&mut flock, &cleared);
    assert!(!status(&flock).attractor_active);
    Ok(())
}

#[test]
fn replayed_attractor_trace_steers_the_flock() -> Result<()> {
    let plan = SimulationPlan::resolve(&settings(json!({
        "agents": 1,
        "seed": 8,
        "attraction_enabled": true,
        "attraction_radius": 2000.0
    })))?;
    let mut flock = plan.build()?;
    let start = flock.agents()[0].position();
    let target = (start.x + 30.0, start.y);

    let trace = format!(
        "{}\n{}\n",
        json!({ "position": { "x": target.0, "y": target.1 } }),
        json!({ "position": null })
    );
    let updates = parse_attractor_updates(&trace)?;
    assert_eq!(updates.len(), 2);

    apply_attractor_update(&mut flock, &updates[0]);
    let force = flock.steering_forces()[0];
    assert!(force.x > 0.0);
    assert!(force.magnitude() <= plan.params.max_force + 1e-9);
    flock.step();

    apply_attractor_update(&mut flock, &updates[1]);
    assert!(!status(&flock).attractor_active);
    Ok(())
}

#[test]
fn invalid_settings_fail_to_build() -> Result<()> {
    let empty = SimulationPlan::resolve(&settings(json!({ "agents": 0 })))?;
    let err = empty.build().unwrap_err();
    assert!(format!("{:#}", err).contains("flock size must be at least 1"));

    let negative = SimulationPlan::resolve(&settings(json!({ "alignment_radius": -5.0 })))?;
    let err = negative.build().unwrap_err();
    assert!(format!("{:#}", err).contains("alignment radius"));

    let inverted = SimulationPlan::resolve(&settings(json!({
        "bounds": { "min": { "x": 10.0, "y": 0.0 }, "max": { "x": 0.0, "y": 10.0 } }
    })))?;
    assert!(inverted.build().is_err());

    assert!(SimulationPlan::resolve(&settings(json!({ "dimensions": 1 }))).is_err());
    Ok(())
}
