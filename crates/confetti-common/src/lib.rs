//! # Confetti Common
//!
//! Shared types for the Confetti particle engine.
//!
//! This crate provides foundational types used by the kernel and engine:
//! - Handle types (SystemId, ImageId, ShaderId)
//! - Error types for configuration loading
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
