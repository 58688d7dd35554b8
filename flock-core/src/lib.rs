//! Boid flocking in two or three dimensions.
//!
//! A [`Flock`] owns a fixed set of [`Agent`]s. Each call to [`Flock::step`]
//! runs the steering rules in [`behavior`] against the flock as it was at
//! the start of the tick, then integrates every agent and applies the
//! [`BoundaryPolicy`].
//!
//! ```
//! use flock_core::{Bounds, Dimensions, Flock, Parameters};
//!
//! let mut flock = Flock::seeded(
//!     100,
//!     Bounds::canvas(800.0, 600.0),
//!     Dimensions::Two,
//!     Parameters::default(),
//!     42,
//! )?;
//! flock.step();
//! assert_eq!(flock.agents().len(), 100);
//! # Ok::<(), flock_core::FlockError>(())
//! ```

pub mod agent;
pub mod behavior;
pub mod environment;
pub mod error;
pub mod flock;
pub mod vector;

pub use agent::Agent;
pub use behavior::Steering;
pub use environment::{
    BoundaryPolicy, Bounds, Dimensions, Environment, Parameters, SeparationFalloff,
    SeparationResponse,
};
pub use error::{ConfigError, FlockError};
pub use flock::Flock;
pub use vector::Vector;
