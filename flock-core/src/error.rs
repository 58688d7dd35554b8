/// Errors returned when building a [`Flock`](crate::Flock).
#[derive(Debug, thiserror::Error)]
pub enum FlockError {
    /// The requested flock could not be built from the given configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

/// The specific configuration problem behind [`FlockError::InvalidConfiguration`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("flock size must be at least 1")]
    EmptyFlock,

    #[error("{rule} radius must be a non-negative number, got {radius}")]
    InvalidRadius { rule: &'static str, radius: f64 },

    #[error("max speed must be positive, got {0}")]
    NonPositiveMaxSpeed(f64),

    #[error("max force must be a non-negative number, got {0}")]
    InvalidMaxForce(f64),

    #[error("unsupported dimensionality {0}, expected 2 or 3")]
    UnsupportedDimensions(usize),

    #[error("bounds on axis {axis} are inverted: min {min} > max {max}")]
    InvertedBounds { axis: usize, min: f64, max: f64 },

    #[error("bounds on axis {axis} must be finite")]
    UnboundedAxis { axis: usize },

    #[error("initial speed range {min}..={max} is invalid")]
    InvalidSpeedRange { min: f64, max: f64 },

    #[error("time step must be positive, got {0}")]
    NonPositiveTimeStep(f64),
}

pub type Result<T> = core::result::Result<T, FlockError>;
