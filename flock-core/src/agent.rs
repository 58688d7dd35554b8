use rand::Rng;

use crate::environment::{BoundaryPolicy, Bounds, Dimensions, Parameters};
use crate::vector::Vector;

/// A single boid.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    position: Vector,
    velocity: Vector,
    acceleration: Vector,
    max_speed: f64,
    max_force: f64,
}

impl Agent {
    /// Builds an agent at rest force-wise. The velocity is limited to
    /// `max_speed` so the speed cap holds from the start.
    pub fn new(position: Vector, velocity: Vector, max_speed: f64, max_force: f64) -> Self {
        Self {
            position,
            velocity: velocity.limit(max_speed),
            acceleration: Vector::zero(),
            max_speed,
            max_force,
        }
    }

    /// Uniformly placed inside `bounds`, heading in a uniformly random
    /// direction at a speed drawn from `params.initial_speed`.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        bounds: &Bounds,
        dims: Dimensions,
        params: &Parameters,
    ) -> Self {
        let mut position = Vector::zero();
        let mut heading = Vector::zero();
        for axis in 0..dims.axes() {
            position[axis] = rng.gen_range(bounds.min[axis]..=bounds.max[axis]);
            heading[axis] = rng.gen_range(-1.0..=1.0);
        }

        let heading = match heading.normalize() {
            h if h == Vector::zero() => Vector::planar(1.0, 0.0),
            h => h,
        };
        let (min_speed, max_speed) = params.initial_speed;
        let speed = rng.gen_range(min_speed..=max_speed);

        Self::new(position, heading * speed, params.max_speed, params.max_force)
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    pub fn acceleration(&self) -> Vector {
        self.acceleration
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn max_force(&self) -> f64 {
        self.max_force
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    pub(crate) fn set_limits(&mut self, max_speed: f64, max_force: f64) {
        self.max_speed = max_speed;
        self.max_force = max_force;
        self.velocity = self.velocity.limit(max_speed);
    }

    pub fn apply_force(&mut self, force: Vector) {
        self.acceleration += force;
    }

    /// Advances one tick: the accumulated acceleration is folded into the
    /// velocity, the velocity is capped at `max_speed`, the position moves
    /// by the velocity and the accumulator is cleared.
    ///
    /// `dt` counts ticks, not seconds. With `dt = 1` a velocity is exactly
    /// the displacement per tick.
    pub fn integrate(&mut self, dt: f64) {
        self.velocity += self.acceleration * dt;
        self.velocity = self.velocity.limit(self.max_speed);
        self.position += self.velocity * dt;
        self.acceleration = Vector::zero();
    }

    pub fn apply_boundary(&mut self, bounds: &Bounds, dims: Dimensions, policy: BoundaryPolicy) {
        match policy {
            BoundaryPolicy::Wrap | BoundaryPolicy::Clamp => self.wrap_edges(bounds, dims),
            BoundaryPolicy::Bounce => self.contain_within_bounds(bounds, dims),
        }
    }

    fn wrap_edges(&mut self, bounds: &Bounds, dims: Dimensions) {
        for axis in 0..dims.axes() {
            let (min, max) = (bounds.min[axis], bounds.max[axis]);
            if self.position[axis] > max {
                self.position[axis] = min;
            } else if self.position[axis] < min {
                self.position[axis] = max;
            }
        }
    }

    fn contain_within_bounds(&mut self, bounds: &Bounds, dims: Dimensions) {
        for axis in 0..dims.axes() {
            let (min, max) = (bounds.min[axis], bounds.max[axis]);
            if self.position[axis] < min {
                self.position[axis] = min;
                self.velocity[axis] = self.velocity[axis].abs();
            } else if self.position[axis] > max {
                self.position[axis] = max;
                self.velocity[axis] = -self.velocity[axis].abs();
            }
        }
    }
}
