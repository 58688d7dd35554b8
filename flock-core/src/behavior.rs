//! Steering rules.
//!
//! Every rule is a pure function of one agent (by index), an immutable
//! snapshot of the whole flock and the environment. Nothing here mutates an
//! agent; [`Flock::step`](crate::Flock::step) decides what to do with the
//! returned vectors.

use crate::agent::Agent;
use crate::environment::{Environment, SeparationFalloff, SeparationResponse};
use crate::vector::Vector;

/// The four rule outputs for one agent, before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Steering {
    pub alignment: Vector,
    pub cohesion: Vector,
    pub separation: Vector,
    pub attraction: Vector,
}

impl Steering {
    pub fn compute(index: usize, agents: &[Agent], env: &Environment) -> Self {
        Self {
            alignment: alignment(index, agents, env),
            cohesion: cohesion(index, agents, env),
            separation: separation(index, agents, env),
            attraction: attraction(index, agents, env),
        }
    }

    /// Weighted sum of the four rules.
    pub fn net(&self, env: &Environment) -> Vector {
        let p = &env.params;
        self.alignment * p.alignment_weight
            + self.cohesion * p.cohesion_weight
            + self.separation * p.separation_weight
            + self.attraction * p.attraction_weight
    }
}

/// Every other agent strictly closer than `radius`, with its distance.
///
/// Agents are told apart by index, so two agents sharing a position are
/// still each other's neighbors.
pub fn neighbors<'a>(
    index: usize,
    agents: &'a [Agent],
    radius: f64,
) -> impl Iterator<Item = (&'a Agent, f64)> + 'a {
    let position = agents[index].position();
    agents
        .iter()
        .enumerate()
        .filter(move |(j, _)| *j != index)
        .map(move |(_, other)| (other, position.distance(&other.position())))
        .filter(move |(_, distance)| *distance < radius)
}

/// Steer toward the average heading of nearby agents.
pub fn alignment(index: usize, agents: &[Agent], env: &Environment) -> Vector {
    let boid = &agents[index];
    let mut sum = Vector::zero();
    let mut count = 0;

    for (other, _) in neighbors(index, agents, env.params.alignment_radius) {
        sum += other.velocity();
        count += 1;
    }

    if count == 0 {
        return Vector::zero();
    }
    limit_rule(steer_towards(boid, sum / count as f64), boid, env)
}

/// Steer toward the center of nearby agents.
pub fn cohesion(index: usize, agents: &[Agent], env: &Environment) -> Vector {
    let boid = &agents[index];
    let mut sum = Vector::zero();
    let mut count = 0;

    for (other, _) in neighbors(index, agents, env.params.cohesion_radius) {
        sum += other.position();
        count += 1;
    }

    if count == 0 {
        return Vector::zero();
    }
    let center = sum / count as f64;
    limit_rule(steer_towards(boid, center - boid.position()), boid, env)
}

/// Steer away from agents that are too close.
pub fn separation(index: usize, agents: &[Agent], env: &Environment) -> Vector {
    let boid = &agents[index];
    let mut sum = Vector::zero();
    let mut count = 0;

    for (other, distance) in neighbors(index, agents, env.params.separation_radius) {
        let mut away = (boid.position() - other.position()).normalize();
        if env.params.separation_falloff == SeparationFalloff::InverseDistance && distance > 0.0 {
            away = away / distance;
        }
        sum += away;
        count += 1;
    }

    if count == 0 {
        return Vector::zero();
    }
    let average = sum / count as f64;
    let steering = match env.params.separation_response {
        SeparationResponse::Steer => steer_towards(boid, average),
        SeparationResponse::Direct => average.normalize() * boid.max_force(),
    };
    limit_rule(steering, boid, env)
}

/// Seek the environment's attractor while it is within range.
pub fn attraction(index: usize, agents: &[Agent], env: &Environment) -> Vector {
    let boid = &agents[index];
    let target = match env.attractor() {
        Some(target) if env.params.attraction_enabled => target,
        _ => return Vector::zero(),
    };

    if boid.position().distance(&target) >= env.params.attraction_radius {
        return Vector::zero();
    }
    // always bounded by max force, whatever `limit_steering` says
    steer_towards(boid, target - boid.position()).limit(boid.max_force())
}

/// Desired velocity along `direction` at full speed, minus the current
/// velocity. A zero direction gives no steering at all.
fn steer_towards(boid: &Agent, direction: Vector) -> Vector {
    if direction.magnitude_squared() == 0.0 {
        return Vector::zero();
    }
    direction.normalize() * boid.max_speed() - boid.velocity()
}

fn limit_rule(steering: Vector, boid: &Agent, env: &Environment) -> Vector {
    if env.params.limit_steering {
        steering.limit(boid.max_force())
    } else {
        steering
    }
}
