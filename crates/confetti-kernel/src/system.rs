//! A single particle-system instance.
//!
//! Owns its pool, derived parameters, spawn schedule, batch buffers and RNG.
//! The host drives it with [`ParticleSystem::update`] once per tick and then
//! calls [`ParticleSystem::build_batch`] to get geometry for the renderer.

use std::time::Instant;

use confetti_common::SystemId;
use glam::Vec2;
use tracing::{debug, warn};

use crate::batch::{BatchBuilder, DrawBatch, ImageHandle, ShaderHandle};
use crate::config::ParticleSystemConfig;
use crate::params::AnimationParams;
use crate::pool::ParticlePool;
use crate::spawn::{spawn_burst, SpawnSchedule};

/// Counters and timings for one system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemMetrics {
    /// Particles spawned since creation
    pub spawned: u64,
    /// Particles retired since creation
    pub deactivated: u64,
    /// Duration of the last update in microseconds
    pub update_time_us: u64,
    /// Duration of the last batch build in microseconds
    pub build_time_us: u64,
    /// Updates run
    pub frame_count: u64,
    /// Active particles after the last update
    pub active_count: usize,
}

/// One running particle effect.
#[derive(Debug)]
pub struct ParticleSystem {
    id: SystemId,
    name: String,
    params: AnimationParams,
    schedule: SpawnSchedule,
    pool: ParticlePool,
    builder: BatchBuilder,
    emitter: Vec2,
    image: Option<ImageHandle>,
    shader: Option<ShaderHandle>,
    current_time: f32,
    tick: u64,
    is_loop: bool,
    remaining_life: i32,
    rng: fastrand::Rng,
    removals: Vec<usize>,
    metrics: SystemMetrics,
    warned_unrenderable: bool,
}

impl ParticleSystem {
    /// Creates a system spawning at `position` plus the configured emitter offset.
    ///
    /// The RNG is seeded from `id`; use [`with_seed`](Self::with_seed) to pick
    /// another seed.
    #[must_use]
    pub fn new(
        id: SystemId,
        config: &ParticleSystemConfig,
        position: Vec2,
        image: Option<ImageHandle>,
        shader: Option<ShaderHandle>,
    ) -> Self {
        let capacity = usize::try_from(config.spawn.max_particles).unwrap_or(0);

        let params = AnimationParams::from_config(config);
        let emitter = position + Vec2::new(config.emitter.x, config.emitter.y);

        debug!(
            "Created particle system {} '{}' at ({:.1}, {:.1}), capacity {}, sequences: {}",
            id,
            config.name,
            emitter.x,
            emitter.y,
            capacity,
            params.has_sequences()
        );

        Self {
            id,
            name: config.name.clone(),
            params,
            schedule: SpawnSchedule::new(config.spawn.interval, config.spawn.particles_per_spawn),
            pool: ParticlePool::new(capacity),
            builder: BatchBuilder::with_capacity(capacity),
            emitter,
            image,
            shader,
            current_time: 0.0,
            tick: 0,
            is_loop: config.spawn.is_loop,
            remaining_life: config.spawn.life_time,
            rng: fastrand::Rng::with_seed(id.raw()),
            removals: Vec::with_capacity(capacity),
            metrics: SystemMetrics::default(),
            warned_unrenderable: false,
        }
    }

    /// Reseeds the system's RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Advances the simulation by `delta` seconds: spawn, then retire expired
    /// particles, then count down the lifetime of non-looping systems.
    pub fn update(&mut self, delta: f32) {
        let start = Instant::now();

        self.tick += 1;
        self.current_time += delta;

        let spawned = spawn_burst(
            &mut self.pool,
            &self.schedule,
            &self.params,
            self.emitter,
            self.current_time,
            self.tick,
            &mut self.rng,
        );
        self.metrics.spawned += spawned as u64;

        self.step();

        self.metrics.update_time_us = start.elapsed().as_micros() as u64;
        self.metrics.frame_count += 1;
        self.metrics.active_count = self.pool.active_count();

        if !self.is_loop {
            self.remaining_life = self.remaining_life.saturating_sub(1);
        }
    }

    /// Retires every particle whose elapsed time reached its duration.
    fn step(&mut self) {
        self.removals.clear();
        let now = self.current_time;
        for (position, &index) in self.pool.active_indices().iter().enumerate() {
            if self.pool[index].is_expired(now) {
                self.removals.push(position);
            }
        }

        // Highest position first so earlier positions stay valid.
        for &position in self.removals.iter().rev() {
            self.pool.retire(position);
        }
        self.metrics.deactivated += self.removals.len() as u64;
    }

    /// Builds this tick's draw batch.
    ///
    /// Returns `None` when nothing should be drawn.
    pub fn build_batch(&mut self) -> Option<DrawBatch<'_>> {
        let start = Instant::now();

        if (self.image.is_none() || self.shader.is_none()) && !self.warned_unrenderable {
            warn!(
                "{} '{}' has no {}, skipping draw",
                self.id,
                self.name,
                if self.image.is_none() { "image" } else { "shader" }
            );
            self.warned_unrenderable = true;
        }

        let batch = self.builder.build(
            &self.pool,
            &self.params,
            self.image,
            self.shader,
            self.current_time,
        );
        self.metrics.build_time_us = start.elapsed().as_micros() as u64;
        batch
    }

    /// Whether a non-looping system has run out its lifetime.
    #[must_use]
    pub fn should_remove(&self) -> bool {
        !self.is_loop && self.remaining_life <= 0
    }

    /// Retires every particle and restarts the clock.
    pub fn reset(&mut self) {
        self.pool.clear();
        self.current_time = 0.0;
        self.tick = 0;
        self.metrics.active_count = 0;
    }

    /// Sets the image to draw with.
    pub fn set_image(&mut self, image: Option<ImageHandle>) {
        self.image = image;
        self.warned_unrenderable = false;
    }

    /// Sets the shader to draw with.
    pub fn set_shader(&mut self, shader: Option<ShaderHandle>) {
        self.shader = shader;
        self.warned_unrenderable = false;
    }

    /// Moves the emitter. Particles already alive keep their paths.
    pub fn set_emitter(&mut self, emitter: Vec2) {
        self.emitter = emitter;
    }

    /// System handle.
    #[must_use]
    pub fn id(&self) -> SystemId {
        self.id
    }

    /// Config name this system was built from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Emitter position.
    #[must_use]
    pub fn emitter(&self) -> Vec2 {
        self.emitter
    }

    /// Simulation time in seconds.
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Updates run so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Whether the system loops.
    #[must_use]
    pub fn is_loop(&self) -> bool {
        self.is_loop
    }

    /// Remaining updates for a non-looping system.
    #[must_use]
    pub fn remaining_life(&self) -> i32 {
        self.remaining_life
    }

    /// Active particles.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    /// The particle pool.
    #[must_use]
    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Derived parameters.
    #[must_use]
    pub fn params(&self) -> &AnimationParams {
        &self.params
    }

    /// Counters and timings.
    #[must_use]
    pub fn metrics(&self) -> &SystemMetrics {
        &self.metrics
    }
}
