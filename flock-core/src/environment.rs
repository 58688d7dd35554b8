use crate::error::ConfigError;
use crate::vector::Vector;

/// Number of spatial axes a simulation runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimensions {
    #[default]
    Two,
    Three,
}

impl Dimensions {
    pub fn axes(self) -> usize {
        match self {
            Dimensions::Two => 2,
            Dimensions::Three => 3,
        }
    }

    /// Drops the `z` component in two dimensions.
    pub fn project(self, v: Vector) -> Vector {
        match self {
            Dimensions::Two => Vector::planar(v.x, v.y),
            Dimensions::Three => v,
        }
    }
}

impl TryFrom<usize> for Dimensions {
    type Error = ConfigError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            2 => Ok(Dimensions::Two),
            3 => Ok(Dimensions::Three),
            other => Err(ConfigError::UnsupportedDimensions(other)),
        }
    }
}

/// Axis-aligned world box, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vector,
    pub max: Vector,
}

impl Bounds {
    pub fn new(min: Vector, max: Vector) -> Self {
        Self { min, max }
    }

    /// A `width` x `height` canvas with its origin in the top-left corner.
    pub fn canvas(width: f64, height: f64) -> Self {
        Self::new(Vector::zero(), Vector::planar(width, height))
    }

    /// A cube centered on the origin.
    pub fn cube(half_extent: f64) -> Self {
        Self::new(
            Vector::new(-half_extent, -half_extent, -half_extent),
            Vector::new(half_extent, half_extent, half_extent),
        )
    }

    pub fn validate(&self, dims: Dimensions) -> Result<(), ConfigError> {
        for axis in 0..dims.axes() {
            let (min, max) = (self.min[axis], self.max[axis]);
            // negated so NaN bounds are rejected too
            if !(min <= max) {
                return Err(ConfigError::InvertedBounds { axis, min, max });
            }
            // a finite pair can still overflow the width
            if !(min.is_finite() && max.is_finite() && (max - min).is_finite()) {
                return Err(ConfigError::UnboundedAxis { axis });
            }
        }
        Ok(())
    }

    pub fn contains(&self, point: &Vector, dims: Dimensions) -> bool {
        (0..dims.axes()).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::canvas(800.0, 600.0)
    }
}

/// What happens to an agent that leaves the world box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Leaving past `max` re-enters at `min`, and the reverse.
    #[default]
    Wrap,
    /// Snaps to the opposite face with velocity untouched. Behaves exactly
    /// like `Wrap`; kept as its own policy for the 3-D scene configuration.
    Clamp,
    /// Stops on the exceeded face and reflects that velocity component.
    Bounce,
}

/// How strongly each close neighbor pushes in the separation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparationFalloff {
    /// Every neighbor contributes a unit vector.
    #[default]
    Uniform,
    /// Unit vectors are divided by distance, so closer neighbors push harder.
    InverseDistance,
}

/// How the averaged separation direction becomes a steering vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparationResponse {
    /// Desired velocity at max speed, minus current velocity.
    #[default]
    Steer,
    /// Unit direction scaled by max force, no velocity subtraction.
    Direct,
}

/// Tunable simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub alignment_radius: f64,
    pub cohesion_radius: f64,
    pub separation_radius: f64,
    pub attraction_radius: f64,
    pub alignment_weight: f64,
    pub cohesion_weight: f64,
    pub separation_weight: f64,
    pub attraction_weight: f64,
    pub max_speed: f64,
    pub max_force: f64,
    /// Limit alignment, cohesion and separation to `max_force` before
    /// weighting. Attraction is limited regardless.
    pub limit_steering: bool,
    pub separation_falloff: SeparationFalloff,
    pub separation_response: SeparationResponse,
    pub attraction_enabled: bool,
    /// Range the initial speed of every agent is drawn from.
    pub initial_speed: (f64, f64),
    /// Logical `dt` handed to every agent's integration step.
    pub time_step: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            alignment_radius: 50.0,
            cohesion_radius: 50.0,
            separation_radius: 24.0,
            attraction_radius: 200.0,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            separation_weight: 1.5,
            attraction_weight: 1.0,
            max_speed: 4.0,
            max_force: 0.1,
            limit_steering: true,
            separation_falloff: SeparationFalloff::Uniform,
            separation_response: SeparationResponse::Steer,
            attraction_enabled: false,
            initial_speed: (0.0, 2.0),
            time_step: 1.0,
        }
    }
}

impl Parameters {
    /// The full-window 2-D canvas flock: equal rule weights and unclamped
    /// steering.
    pub fn canvas() -> Self {
        Self {
            separation_weight: 1.0,
            limit_steering: false,
            ..Self::default()
        }
    }

    /// The 3-D scene flock: every bird sees every other bird for alignment
    /// and cohesion, separation only acts inside a unit radius.
    pub fn scene() -> Self {
        Self {
            alignment_radius: f64::INFINITY,
            cohesion_radius: f64::INFINITY,
            separation_radius: 1.0,
            attraction_radius: 10.0,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            separation_weight: 1.0,
            attraction_weight: 1.0,
            max_speed: 0.2,
            max_force: 0.01,
            limit_steering: true,
            separation_falloff: SeparationFalloff::InverseDistance,
            separation_response: SeparationResponse::Direct,
            attraction_enabled: false,
            initial_speed: (0.0, 0.1),
            time_step: 1.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let radii = [
            ("alignment", self.alignment_radius),
            ("cohesion", self.cohesion_radius),
            ("separation", self.separation_radius),
            ("attraction", self.attraction_radius),
        ];
        for (rule, radius) in radii {
            if !(radius >= 0.0) {
                return Err(ConfigError::InvalidRadius { rule, radius });
            }
        }
        validate_limits(self.max_speed, self.max_force)?;
        let (min, max) = self.initial_speed;
        if !(min >= 0.0 && min <= max && max.is_finite()) {
            return Err(ConfigError::InvalidSpeedRange { min, max });
        }
        if !(self.time_step > 0.0) {
            return Err(ConfigError::NonPositiveTimeStep(self.time_step));
        }
        Ok(())
    }
}

/// Checks a speed and force cap pair, whether shared or carried by a single
/// agent.
pub(crate) fn validate_limits(max_speed: f64, max_force: f64) -> Result<(), ConfigError> {
    if !(max_speed > 0.0) {
        return Err(ConfigError::NonPositiveMaxSpeed(max_speed));
    }
    if !(max_force >= 0.0) {
        return Err(ConfigError::InvalidMaxForce(max_force));
    }
    Ok(())
}

/// Everything outside the agents themselves: the world box, the number of
/// axes, the optional attractor and the rule parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub bounds: Bounds,
    pub dims: Dimensions,
    pub boundary: BoundaryPolicy,
    pub params: Parameters,
    attractor: Option<Vector>,
}

impl Environment {
    pub fn new(bounds: Bounds, dims: Dimensions, params: Parameters) -> Self {
        Self {
            bounds,
            dims,
            boundary: BoundaryPolicy::default(),
            params,
            attractor: None,
        }
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds.validate(self.dims)?;
        self.params.validate()
    }

    pub fn attractor(&self) -> Option<Vector> {
        self.attractor
    }

    /// Sets or clears the point the attraction rule seeks.
    pub fn set_attractor(&mut self, point: Option<Vector>) {
        self.attractor = point.map(|p| self.dims.project(p));
    }
}
