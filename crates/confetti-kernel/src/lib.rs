//! # Confetti Kernel
//!
//! Allocation-free particle simulation and batch building.
//!
//! This crate provides the per-tick core of the engine:
//! - Easing library (25 closed-form curves)
//! - Multi-step keyframe sequences with per-particle randomized snapshots
//! - Fixed-capacity particle pool with O(1) acquire and retire
//! - Spawn scheduling and the simulation step
//! - Vertex/index batch building for a single draw call
//!
//! ## Tick Order
//!
//! Each [`ParticleSystem::update`] advances the clock, spawns due particles
//! and retires expired ones. [`ParticleSystem::build_batch`] then turns the
//! active particles into quads. Data flows one way; nothing in the update
//! path can fail or allocate once every pool slot has been used once.
//!
//! ## Animation Models
//!
//! Scalar properties either lerp between two keyframes with an easing, or
//! follow a [`SequenceConfig`] resolved per particle at spawn. Alpha and color
//! are packed into the vertex for the shader; everything else is resolved on
//! the CPU.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod batch;
pub mod config;
pub mod easing;
pub mod params;
pub mod pool;
pub mod sequence;
pub mod spawn;
pub mod system;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::batch::*;
    pub use crate::config::*;
    pub use crate::easing::*;
    pub use crate::params::*;
    pub use crate::pool::*;
    pub use crate::sequence::*;
    pub use crate::spawn::*;
    pub use crate::system::*;
}

pub use prelude::*;
