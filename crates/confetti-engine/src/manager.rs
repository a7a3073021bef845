//! Effect lifecycle.
//!
//! [`EffectManager`] keeps named effect configs, spawns particle systems from
//! them and owns those systems until they finish. Systems are kept in spawn
//! order so batches are drawn oldest first.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use confetti_common::{ConfettiError, ConfettiResult, SystemId, SystemIdAllocator};
use confetti_kernel::{DrawBatch, ImageHandle, ParticleSystem, ParticleSystemConfig, ShaderHandle};
use glam::Vec2;
use tracing::{debug, info};

use crate::loader::ConfigLoader;

/// Spawn-time overrides applied to a copy of a preloaded config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Pool capacity
    pub max_particles: Option<i32>,
    /// Particles per spawn event
    pub particles_per_spawn: Option<i32>,
    /// Ticks between spawn events
    pub spawn_interval: Option<i32>,
    /// Loop instead of expiring
    pub is_loop: Option<bool>,
    /// Lifetime in ticks when not looping
    pub life_time: Option<i32>,
}

impl ConfigOverrides {
    /// Writes every set override into `config`.
    pub fn apply(&self, config: &mut ParticleSystemConfig) {
        let spawn = &mut config.spawn;
        if let Some(v) = self.max_particles {
            spawn.max_particles = v;
        }
        if let Some(v) = self.particles_per_spawn {
            spawn.particles_per_spawn = v;
        }
        if let Some(v) = self.spawn_interval {
            spawn.interval = v;
        }
        if let Some(v) = self.is_loop {
            spawn.is_loop = v;
        }
        if let Some(v) = self.life_time {
            spawn.life_time = v;
        }
    }

    /// Whether no override is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Aggregate cost of the last update/build across all systems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Summed update time (µs)
    pub update_us: u64,
    /// Summed build time (µs)
    pub build_us: u64,
    /// Active particles
    pub particles: usize,
    /// Live systems
    pub systems: usize,
}

/// Owns named effects and the systems spawned from them.
#[derive(Debug)]
pub struct EffectManager {
    loader: Arc<ConfigLoader>,
    effects: AHashMap<String, Arc<ParticleSystemConfig>>,
    systems: BTreeMap<SystemId, ParticleSystem>,
    ids: SystemIdAllocator,
    image: Option<ImageHandle>,
    shader: Option<ShaderHandle>,
    seed: Option<u64>,
}

impl EffectManager {
    /// Creates a manager drawing with `image` and `shader`.
    #[must_use]
    pub fn new(
        loader: Arc<ConfigLoader>,
        image: Option<ImageHandle>,
        shader: Option<ShaderHandle>,
    ) -> Self {
        Self {
            loader,
            effects: AHashMap::new(),
            systems: BTreeMap::new(),
            ids: SystemIdAllocator::new(),
            image,
            shader,
            seed: None,
        }
    }

    /// Mixes a fixed seed into every spawned system's RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Loads the config at `path` and registers it as `name`.
    pub fn preload(&mut self, name: &str, path: impl AsRef<Path>) -> ConfettiResult<()> {
        let config = self.loader.load_config(path)?;
        info!("Preloaded effect '{name}'");
        self.effects.insert(name.to_string(), config);
        Ok(())
    }

    /// Parses `text` and registers it as `name`.
    pub fn preload_from_str(&mut self, name: &str, text: &str) -> ConfettiResult<()> {
        let config = self.loader.load_from_str(text, name)?;
        info!("Preloaded effect '{name}' from memory");
        self.effects.insert(name.to_string(), config);
        Ok(())
    }

    /// Whether `name` has been preloaded.
    #[must_use]
    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    /// Spawns a non-looping system that expires after `lifetime_ticks` updates.
    pub fn spawn_one_shot(
        &mut self,
        name: &str,
        position: Vec2,
        lifetime_ticks: i32,
    ) -> ConfettiResult<SystemId> {
        let overrides = ConfigOverrides {
            is_loop: Some(false),
            life_time: Some(lifetime_ticks),
            ..ConfigOverrides::default()
        };
        self.spawn_with_overrides(name, position, &overrides)
    }

    /// Spawns a looping system; remove it with [`remove`](Self::remove).
    pub fn spawn_loop(&mut self, name: &str, position: Vec2) -> ConfettiResult<SystemId> {
        let overrides = ConfigOverrides {
            is_loop: Some(true),
            life_time: Some(0),
            ..ConfigOverrides::default()
        };
        self.spawn_with_overrides(name, position, &overrides)
    }

    /// Spawns a system from a copy of `name` with `overrides` applied.
    ///
    /// The overridden copy is validated again.
    pub fn spawn_with_overrides(
        &mut self,
        name: &str,
        position: Vec2,
        overrides: &ConfigOverrides,
    ) -> ConfettiResult<SystemId> {
        let base = self
            .effects
            .get(name)
            .ok_or_else(|| ConfettiError::EffectNotFound(name.to_string()))?;

        let mut config = ParticleSystemConfig::clone(base);
        if !overrides.is_empty() {
            overrides.apply(&mut config);
            config.validate()?;
        }

        let id = self.ids.allocate();
        let mut system = ParticleSystem::new(id, &config, position, self.image, self.shader);
        if let Some(seed) = self.seed {
            system = system.with_seed(seed ^ id.raw());
        }
        debug!("Spawned {id} from '{name}'");
        self.systems.insert(id, system);
        Ok(id)
    }

    /// Removes a system. Returns whether it existed.
    pub fn remove(&mut self, id: SystemId) -> bool {
        let removed = self.systems.remove(&id).is_some();
        if removed {
            debug!("Removed {id}");
        }
        removed
    }

    /// Removes every system.
    pub fn clear(&mut self) {
        self.systems.clear();
    }

    /// Updates every system by `delta` seconds and drops finished ones.
    ///
    /// Returns how many systems were removed.
    pub fn update(&mut self, delta: f32) -> usize {
        for system in self.systems.values_mut() {
            system.update(delta);
        }

        let before = self.systems.len();
        self.systems.retain(|id, system| {
            let keep = !system.should_remove();
            if !keep {
                debug!(
                    "{id} '{}' finished after {} ticks, {} particles spawned",
                    system.name(),
                    system.tick(),
                    system.metrics().spawned
                );
            }
            keep
        });
        before - self.systems.len()
    }

    /// Builds batches for every system with something to draw, in spawn order.
    pub fn build_batches(&mut self) -> impl Iterator<Item = (SystemId, DrawBatch<'_>)> + '_ {
        self.systems
            .iter_mut()
            .filter_map(|(id, system)| system.build_batch().map(|batch| (*id, batch)))
    }

    /// Sets the image for future spawns and every live system.
    pub fn set_image(&mut self, image: Option<ImageHandle>) {
        self.image = image;
        for system in self.systems.values_mut() {
            system.set_image(image);
        }
    }

    /// Sets the shader for future spawns and every live system.
    pub fn set_shader(&mut self, shader: Option<ShaderHandle>) {
        self.shader = shader;
        for system in self.systems.values_mut() {
            system.set_shader(shader);
        }
    }

    /// A live system.
    #[must_use]
    pub fn get(&self, id: SystemId) -> Option<&ParticleSystem> {
        self.systems.get(&id)
    }

    /// A live system, mutably.
    pub fn get_mut(&mut self, id: SystemId) -> Option<&mut ParticleSystem> {
        self.systems.get_mut(&id)
    }

    /// Live systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether no system is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Active particles across all systems.
    #[must_use]
    pub fn total_particles(&self) -> usize {
        self.systems.values().map(ParticleSystem::active_count).sum()
    }

    /// Summed cost of the last update and build.
    #[must_use]
    pub fn frame_stats(&self) -> FrameStats {
        self.systems.values().fold(
            FrameStats {
                systems: self.systems.len(),
                ..FrameStats::default()
            },
            |mut stats, system| {
                let m = system.metrics();
                stats.update_us += m.update_time_us;
                stats.build_us += m.build_time_us;
                stats.particles += system.active_count();
                stats
            },
        )
    }

    /// The shared config loader.
    #[must_use]
    pub fn loader(&self) -> &Arc<ConfigLoader> {
        &self.loader
    }
}
