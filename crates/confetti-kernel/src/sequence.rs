//! Multi-step keyframe sequences.
//!
//! A [`SequenceConfig`] is shared by every particle of a system. At spawn time
//! each particle resolves its own [`SequenceSnapshot`]: one `(from, to)` pair
//! per step, randomized once within the step's ranges. Steps are chained: a
//! step's offsets apply to where the previous step actually landed, so there
//! is never a jump between steps.

use crate::easing::Easing;

/// One keyframe step of a sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceStep {
    /// Offset of the step's start from the running base.
    pub from_base: f32,
    /// ± spread applied to `from_base` at spawn (0 = none).
    pub from_range: f32,
    /// Offset of the step's end from the running base.
    pub to_base: f32,
    /// ± spread applied to `to_base` at spawn (0 = none).
    pub to_range: f32,
    /// Step length in seconds.
    pub duration: f32,
    /// Easing within the step.
    pub easing: Easing,
}

impl SequenceStep {
    /// Creates a step without randomization.
    #[must_use]
    pub const fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from_base: from,
            from_range: 0.0,
            to_base: to,
            to_range: 0.0,
            duration,
            easing,
        }
    }

    /// Sets the ± spread for the start value.
    #[must_use]
    pub const fn with_from_range(mut self, range: f32) -> Self {
        self.from_range = range;
        self
    }

    /// Sets the ± spread for the end value.
    #[must_use]
    pub const fn with_to_range(mut self, range: f32) -> Self {
        self.to_range = range;
        self
    }
}

/// Ordered steps plus their precomputed total duration.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceConfig {
    steps: Vec<SequenceStep>,
    total_duration: f32,
}

impl SequenceConfig {
    /// Creates a sequence, summing the step durations once.
    #[must_use]
    pub fn new(steps: Vec<SequenceStep>) -> Self {
        let total_duration = steps.iter().map(|s| s.duration).sum();
        Self {
            steps,
            total_duration,
        }
    }

    /// The steps in order.
    #[must_use]
    pub fn steps(&self) -> &[SequenceStep] {
        &self.steps
    }

    /// Sum of all step durations.
    #[must_use]
    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the sequence has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Per-particle resolved values, laid out `[from0, to0, from1, to1, ...]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceSnapshot {
    values: Vec<f32>,
}

impl SequenceSnapshot {
    /// Wraps already-resolved values.
    #[must_use]
    pub fn from_values(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// The flat `(from, to)` pairs.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// `(from, to)` for step `i`.
    #[must_use]
    pub fn pair(&self, i: usize) -> (f32, f32) {
        (self.values[i * 2], self.values[i * 2 + 1])
    }

    /// Drops the values but keeps the allocation for the next spawn.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Uniform sample in `[min, max)`; returns `min` when the range is empty.
pub(crate) fn random_range(rng: &mut fastrand::Rng, min: f32, max: f32) -> f32 {
    if min == max {
        return min;
    }
    min + rng.f32() * (max - min)
}

/// Uniform sample in `(-spread, spread)`; zero when `spread <= 0`.
pub(crate) fn random_spread(rng: &mut fastrand::Rng, spread: f32) -> f32 {
    if spread > 0.0 {
        (rng.f32() * 2.0 - 1.0) * spread
    } else {
        0.0
    }
}

/// Resolves a fresh snapshot for one particle.
#[must_use]
pub fn generate_snapshot(
    config: &SequenceConfig,
    base_value: f32,
    rng: &mut fastrand::Rng,
) -> SequenceSnapshot {
    let mut snapshot = SequenceSnapshot {
        values: Vec::with_capacity(config.len() * 2),
    };
    fill_snapshot(config, base_value, rng, &mut snapshot);
    snapshot
}

/// Resolves a snapshot into storage the caller already owns.
///
/// Reuses `out`'s allocation, so a pool slot only allocates on its first spawn.
pub fn fill_snapshot(
    config: &SequenceConfig,
    base_value: f32,
    rng: &mut fastrand::Rng,
    out: &mut SequenceSnapshot,
) {
    out.values.clear();
    let mut running = base_value;

    for step in &config.steps {
        let from = running + step.from_base + random_spread(rng, step.from_range);
        let to = running + step.to_base + random_spread(rng, step.to_range);
        out.values.push(from);
        out.values.push(to);
        running = to;
    }
}

/// Evaluates a sequence at `elapsed` seconds since spawn.
///
/// Clamps to the first `from` before the start and the last `to` after the
/// end. Linear scan over the steps; sequences are short.
#[must_use]
pub fn evaluate_sequence(config: &SequenceConfig, snapshot: &SequenceSnapshot, elapsed: f32) -> f32 {
    let steps = &config.steps;
    if steps.is_empty() || snapshot.values.len() < steps.len() * 2 {
        return 0.0;
    }

    let last = steps.len() - 1;
    if elapsed >= config.total_duration {
        return snapshot.values[last * 2 + 1];
    }
    if elapsed <= 0.0 {
        return snapshot.values[0];
    }

    let mut accumulated = 0.0;
    for (i, step) in steps.iter().enumerate() {
        if elapsed < accumulated + step.duration {
            let local_t = (elapsed - accumulated) / step.duration;
            let eased = step.easing.apply(local_t);
            let (from, to) = snapshot.pair(i);
            return from + (to - from) * eased;
        }
        accumulated += step.duration;
    }

    // Float drift between the running sum and total_duration.
    snapshot.values[last * 2 + 1]
}
