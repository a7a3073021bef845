//! # Confetti Engine
//!
//! Everything around the simulation kernel: effect configs on disk, the
//! shared config cache, live system management and a fixed-step runner.
//!
//! Load effects through a [`ConfigLoader`], register them by name on an
//! [`EffectManager`] and spawn systems from them. Each frame, call
//! [`EffectManager::update`] and hand the output of
//! [`EffectManager::build_batches`] to the renderer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod loader;
pub mod manager;
pub mod perf;
pub mod runner;
pub mod settings;
pub mod storage;
pub mod timing;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::loader::*;
    pub use crate::manager::*;
    pub use crate::perf::*;
    pub use crate::runner::*;
    pub use crate::settings::*;
    pub use crate::storage::*;
    pub use crate::timing::*;
}

pub use prelude::*;
