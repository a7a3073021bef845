//! Fixed-capacity particle pool.
//!
//! Slots live in one flat array sized at construction. A stack of free indices
//! and a compact, unordered list of active indices always partition the index
//! range, so acquiring and retiring are both O(1) and never allocate.

use std::ops::{Index, IndexMut};

use glam::Vec2;

use crate::easing::Easing;
use crate::sequence::SequenceSnapshot;

/// Per-particle snapshots for sequenced properties.
///
/// Empty for properties that animate in simple mode. Kept on the slot across
/// respawns so the backing storage is reused.
#[derive(Debug, Clone, Default)]
pub struct ParticleSnapshots {
    /// X axis (sequence position mode).
    pub x: SequenceSnapshot,
    /// Y axis (sequence position mode).
    pub y: SequenceSnapshot,
    /// Alpha.
    pub alpha: SequenceSnapshot,
    /// Scale.
    pub scale: SequenceSnapshot,
    /// Rotation in radians.
    pub rotation: SequenceSnapshot,
}

impl ParticleSnapshots {
    /// Clears every snapshot, keeping allocations.
    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.alpha.clear();
        self.scale.clear();
        self.rotation.clear();
    }
}

/// One pool slot.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Simulation time at spawn (seconds).
    pub spawn_time: f32,
    /// Lifetime in seconds.
    pub duration: f32,
    /// Position at spawn.
    pub start_position: Vec2,
    /// Position at end of life.
    pub end_position: Vec2,
    /// Position easing.
    pub position_easing: Easing,
    /// Alpha at spawn.
    pub start_alpha: f32,
    /// Alpha at end of life.
    pub end_alpha: f32,
    /// Alpha easing.
    pub alpha_easing: Easing,
    /// Scale at spawn.
    pub start_scale: f32,
    /// Scale at end of life.
    pub end_scale: f32,
    /// Scale easing.
    pub scale_easing: Easing,
    /// Rotation at spawn (radians).
    pub start_rotation: f32,
    /// Rotation at end of life (radians).
    pub end_rotation: f32,
    /// Rotation easing.
    pub rotation_easing: Easing,
    /// RGB at spawn (0.0-1.0).
    pub start_color: [f32; 3],
    /// RGB at end of life (0.0-1.0).
    pub end_color: [f32; 3],
    /// Color easing.
    pub color_easing: Easing,
    /// Sequence-mode snapshots.
    pub snapshots: ParticleSnapshots,
    /// Whether the slot is in use.
    pub active: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            spawn_time: 0.0,
            duration: 1.0,
            start_position: Vec2::ZERO,
            end_position: Vec2::ZERO,
            position_easing: Easing::Linear,
            start_alpha: 1.0,
            end_alpha: 1.0,
            alpha_easing: Easing::Linear,
            start_scale: 1.0,
            end_scale: 1.0,
            scale_easing: Easing::Linear,
            start_rotation: 0.0,
            end_rotation: 0.0,
            rotation_easing: Easing::Linear,
            start_color: [1.0, 1.0, 1.0],
            end_color: [1.0, 1.0, 1.0],
            color_easing: Easing::Linear,
            snapshots: ParticleSnapshots::default(),
            active: false,
        }
    }
}

impl Particle {
    /// Seconds since spawn at simulation time `now`.
    #[must_use]
    pub fn elapsed(&self, now: f32) -> f32 {
        now - self.spawn_time
    }

    /// Whether the particle has lived its full duration at `now`.
    #[must_use]
    pub fn is_expired(&self, now: f32) -> bool {
        self.elapsed(now) >= self.duration
    }

    /// Normalized life progress at `now`, clamped to 0.0-1.0.
    #[must_use]
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed(now) / self.duration).clamp(0.0, 1.0)
    }
}

/// Particle pool with O(1) acquire and retire.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    free_indices: Vec<usize>,
    active_indices: Vec<usize>,
}

impl ParticlePool {
    /// Creates a pool with `capacity` inactive slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: vec![Particle::default(); capacity],
            // Reversed so slot 0 is handed out first.
            free_indices: (0..capacity).rev().collect(),
            active_indices: Vec::with_capacity(capacity),
        }
    }

    /// Takes a free slot, marks it active and appends it to the active list.
    ///
    /// Returns `None` when the pool is exhausted; callers stop spawning.
    pub fn acquire(&mut self) -> Option<usize> {
        let index = self.free_indices.pop()?;
        self.particles[index].active = true;
        self.active_indices.push(index);
        Some(index)
    }

    /// Marks a slot inactive and returns it to the free stack.
    ///
    /// The index must already have been removed from the active list with
    /// [`retire_active`](Self::retire_active).
    pub fn release(&mut self, index: usize) {
        debug_assert!(index < self.particles.len());
        self.particles[index].active = false;
        self.free_indices.push(index);
    }

    /// Swap-removes entry `position` of the active list and returns the slot
    /// index it held. Reorders the active list.
    pub fn retire_active(&mut self, position: usize) -> usize {
        self.active_indices.swap_remove(position)
    }

    /// Retires and releases the active entry at `position` in one call.
    pub fn retire(&mut self, position: usize) -> usize {
        let index = self.retire_active(position);
        self.release(index);
        index
    }

    /// Active slot indices in unspecified order.
    #[must_use]
    pub fn active_indices(&self) -> &[usize] {
        &self.active_indices
    }

    /// Free slot indices; the last entry is handed out next.
    #[must_use]
    pub fn free_indices(&self) -> &[usize] {
        &self.free_indices
    }

    /// Iterates active particles with their slot index.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Particle)> + '_ {
        self.active_indices
            .iter()
            .map(move |&index| (index, &self.particles[index]))
    }

    /// Number of active particles.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_indices.len()
    }

    /// Number of free slots.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_indices.len()
    }

    /// Total slot count.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Whether no slot is free.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.free_indices.is_empty()
    }

    /// Gets a slot.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Gets a mutable slot.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    /// Deactivates every particle and rebuilds the free stack.
    pub fn clear(&mut self) {
        for p in &mut self.particles {
            p.active = false;
        }
        self.active_indices.clear();
        self.free_indices.clear();
        self.free_indices.extend((0..self.particles.len()).rev());
    }
}

impl Index<usize> for ParticlePool {
    type Output = Particle;

    fn index(&self, index: usize) -> &Particle {
        &self.particles[index]
    }
}

impl IndexMut<usize> for ParticlePool {
    fn index_mut(&mut self, index: usize) -> &mut Particle {
        &mut self.particles[index]
    }
}
