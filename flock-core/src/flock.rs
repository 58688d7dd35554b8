use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::agent::Agent;
use crate::behavior::Steering;
use crate::environment::{
    validate_limits, BoundaryPolicy, Bounds, Dimensions, Environment, Parameters,
};
use crate::error::{ConfigError, Result};
use crate::vector::Vector;

/// A fixed-size collection of boids and the world they move in.
#[derive(Debug, Clone)]
pub struct Flock {
    agents: Vec<Agent>,
    environment: Environment,
    tick: u64,
}

impl Flock {
    /// Builds `size` randomly placed agents, seeded from the OS.
    pub fn new(size: usize, bounds: Bounds, dims: Dimensions, params: Parameters) -> Result<Self> {
        Self::with_rng(size, bounds, dims, params, &mut StdRng::from_entropy())
    }

    /// Like [`Flock::new`], but two flocks built from the same seed and
    /// parameters are identical and stay identical tick for tick.
    pub fn seeded(
        size: usize,
        bounds: Bounds,
        dims: Dimensions,
        params: Parameters,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(size, bounds, dims, params, &mut StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: Rng + ?Sized>(
        size: usize,
        bounds: Bounds,
        dims: Dimensions,
        params: Parameters,
        rng: &mut R,
    ) -> Result<Self> {
        if size == 0 {
            return Err(ConfigError::EmptyFlock.into());
        }
        let environment = Environment::new(bounds, dims, params);
        environment.validate()?;

        let agents = (0..size)
            .map(|_| Agent::random(rng, &bounds, dims, &params))
            .collect();

        log::debug!(
            "created flock of {} agents in {} dimensions within {:?}",
            size,
            dims.axes(),
            bounds
        );
        Ok(Self {
            agents,
            environment,
            tick: 0,
        })
    }

    /// Builds a flock from explicitly placed agents. Positions and
    /// velocities are projected onto the flock's dimensions. Each agent
    /// keeps its own caps, which must pass the same checks as `params`.
    pub fn from_agents(
        agents: Vec<Agent>,
        bounds: Bounds,
        dims: Dimensions,
        params: Parameters,
    ) -> Result<Self> {
        if agents.is_empty() {
            return Err(ConfigError::EmptyFlock.into());
        }
        let environment = Environment::new(bounds, dims, params);
        environment.validate()?;
        for agent in &agents {
            validate_limits(agent.max_speed(), agent.max_force())?;
        }

        let agents = agents
            .into_iter()
            .map(|a| {
                Agent::new(
                    dims.project(a.position()),
                    dims.project(a.velocity()),
                    a.max_speed(),
                    a.max_force(),
                )
            })
            .collect();

        Ok(Self {
            agents,
            environment,
            tick: 0,
        })
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.set_boundary(boundary);
        self
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn set_attractor(&mut self, point: Option<Vector>) {
        self.environment.set_attractor(point);
    }

    pub fn set_boundary(&mut self, boundary: BoundaryPolicy) {
        self.environment.boundary = boundary;
    }

    /// Replaces the rule parameters between ticks and copies the new speed
    /// and force caps onto every agent. Rejected parameters leave the flock
    /// untouched.
    pub fn set_parameters(&mut self, params: Parameters) -> Result<()> {
        params.validate()?;
        self.environment.params = params;
        for agent in &mut self.agents {
            agent.set_limits(params.max_speed, params.max_force);
        }
        log::debug!(
            "flock parameters replaced at tick {}: max speed {}, max force {}",
            self.tick,
            params.max_speed,
            params.max_force
        );
        Ok(())
    }

    /// Advances every agent by one tick.
    ///
    /// All steering is computed from the agents as they were before the
    /// tick, so the result does not depend on agent order.
    pub fn step(&mut self) {
        let forces = self.steering_forces();

        let env = &self.environment;
        let dt = env.params.time_step;
        let apply = |(agent, force): (&mut Agent, Vector)| {
            agent.apply_force(force);
            agent.integrate(dt);
            agent.apply_boundary(&env.bounds, env.dims, env.boundary);
        };

        #[cfg(feature = "parallel")]
        self.agents.par_iter_mut().zip(forces).for_each(apply);
        #[cfg(not(feature = "parallel"))]
        self.agents.iter_mut().zip(forces).for_each(apply);

        self.tick += 1;
        log::trace!("flock tick {} complete", self.tick);
    }

    pub fn step_n(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Net weighted steering for every agent against the current state.
    pub fn steering_forces(&self) -> Vec<Vector> {
        let snapshot = self.agents.as_slice();
        let env = &self.environment;
        let net = |index: usize| Steering::compute(index, snapshot, env).net(env);

        #[cfg(feature = "parallel")]
        let forces = (0..snapshot.len()).into_par_iter().map(net).collect();
        #[cfg(not(feature = "parallel"))]
        let forces = (0..snapshot.len()).map(net).collect();

        forces
    }

    /// Mean velocity direction, from 0 (disordered) to 1 (all aligned).
    pub fn polarization(&self) -> f64 {
        let heading: Vector = self.agents.iter().map(|a| a.velocity().normalize()).sum();
        heading.magnitude() / self.agents.len() as f64
    }

    pub fn centroid(&self) -> Vector {
        let sum: Vector = self.agents.iter().map(Agent::position).sum();
        sum / self.agents.len() as f64
    }

    pub fn mean_speed(&self) -> f64 {
        self.agents.iter().map(Agent::speed).sum::<f64>() / self.agents.len() as f64
    }
}
