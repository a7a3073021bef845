//! Spawn scheduling and particle initialization.

use glam::Vec2;

use crate::params::{AnimationParams, CartesianRanges, PositionMode, PropertyAnimation};
use crate::pool::{Particle, ParticlePool};
use crate::sequence::{fill_snapshot, random_range, random_spread};

/// Base value for sequenced alpha.
const ALPHA_BASE: f32 = 0.0;
/// Base value for sequenced scale.
const SCALE_BASE: f32 = 1.0;
/// Base value for sequenced rotation.
const ROTATION_BASE: f32 = 0.0;

/// Tick-driven spawn cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnSchedule {
    interval: u32,
    per_spawn: usize,
}

impl SpawnSchedule {
    /// Creates a schedule; a non-positive interval disables spawning.
    #[must_use]
    pub fn new(interval: i32, per_spawn: i32) -> Self {
        Self {
            interval: u32::try_from(interval).unwrap_or(0),
            per_spawn: usize::try_from(per_spawn).unwrap_or(0),
        }
    }

    /// Ticks between spawn events (0 = never).
    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval
    }

    /// Particles per spawn event.
    #[must_use]
    pub const fn per_spawn(&self) -> usize {
        self.per_spawn
    }

    /// Whether tick `tick` is a spawn tick.
    #[must_use]
    pub fn should_spawn(&self, tick: u64) -> bool {
        self.interval > 0 && tick % u64::from(self.interval) == 0
    }
}

/// Spawns one burst if `tick` is due. Returns how many particles were spawned.
///
/// Stops early once the pool has no free slot.
pub fn spawn_burst(
    pool: &mut ParticlePool,
    schedule: &SpawnSchedule,
    params: &AnimationParams,
    emitter: Vec2,
    now: f32,
    tick: u64,
    rng: &mut fastrand::Rng,
) -> usize {
    if !schedule.should_spawn(tick) {
        return 0;
    }

    let mut spawned = 0;
    while spawned < schedule.per_spawn {
        let Some(index) = pool.acquire() else {
            break;
        };
        init_particle(&mut pool[index], params, emitter, now, rng);
        spawned += 1;
    }
    spawned
}

/// Resets a freshly acquired slot with sampled values.
pub fn init_particle(
    particle: &mut Particle,
    params: &AnimationParams,
    emitter: Vec2,
    now: f32,
    rng: &mut fastrand::Rng,
) {
    particle.spawn_time = now;
    particle.duration = params.duration_base + random_spread(rng, params.duration_range);

    particle.snapshots.clear();
    match &params.position {
        PositionMode::Cartesian(ranges) => {
            sample_cartesian(particle, ranges, emitter, rng);
        }
        PositionMode::Polar { angle, distance } => {
            let angle = random_range(rng, angle.min, angle.max);
            let distance = random_range(rng, distance.min, distance.max);
            particle.start_position = emitter;
            particle.end_position = emitter + distance * Vec2::from_angle(angle);
        }
        PositionMode::Sequence { ranges, x, y } => {
            sample_cartesian(particle, ranges, emitter, rng);
            if let Some(seq) = x {
                fill_snapshot(seq, emitter.x, rng, &mut particle.snapshots.x);
            }
            if let Some(seq) = y {
                fill_snapshot(seq, emitter.y, rng, &mut particle.snapshots.y);
            }
        }
    }
    particle.position_easing = params.position_easing;

    match &params.alpha {
        PropertyAnimation::Simple { start, end, easing } => {
            particle.start_alpha = *start;
            particle.end_alpha = *end;
            particle.alpha_easing = *easing;
        }
        PropertyAnimation::Sequence(seq) => {
            fill_snapshot(seq, ALPHA_BASE, rng, &mut particle.snapshots.alpha);
        }
    }

    match &params.scale {
        PropertyAnimation::Simple { start, end, easing } => {
            particle.start_scale = *start;
            particle.end_scale = *end;
            particle.scale_easing = *easing;
        }
        PropertyAnimation::Sequence(seq) => {
            fill_snapshot(seq, SCALE_BASE, rng, &mut particle.snapshots.scale);
        }
    }

    match &params.rotation {
        PropertyAnimation::Simple { start, end, easing } => {
            particle.start_rotation = *start;
            particle.end_rotation = *end;
            particle.rotation_easing = *easing;
        }
        PropertyAnimation::Sequence(seq) => {
            fill_snapshot(seq, ROTATION_BASE, rng, &mut particle.snapshots.rotation);
        }
    }

    particle.start_color = params.start_color;
    particle.end_color = params.end_color;
    particle.color_easing = params.color_easing;
}

fn sample_cartesian(
    particle: &mut Particle,
    ranges: &CartesianRanges,
    emitter: Vec2,
    rng: &mut fastrand::Rng,
) {
    particle.start_position = emitter
        + Vec2::new(
            random_range(rng, ranges.start_x.min, ranges.start_x.max),
            random_range(rng, ranges.start_y.min, ranges.start_y.max),
        );
    particle.end_position = emitter
        + Vec2::new(
            random_range(rng, ranges.end_x.min, ranges.end_x.max),
            random_range(rng, ranges.end_y.min, ranges.end_y.max),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ParticleSystemConfig, PositionConfig, PositionType, PropertyConfig, RangeFloat, StepConfig,
    };
    use crate::easing::Easing;

    fn params_with(f: impl FnOnce(&mut ParticleSystemConfig)) -> AnimationParams {
        let mut cfg = ParticleSystemConfig {
            name: "t".into(),
            ..ParticleSystemConfig::default()
        };
        f(&mut cfg);
        AnimationParams::from_config(&cfg)
    }

    #[test]
    fn test_schedule_interval() {
        let s = SpawnSchedule::new(3, 2);
        assert!(!s.should_spawn(1));
        assert!(!s.should_spawn(2));
        assert!(s.should_spawn(3));
        assert!(s.should_spawn(6));
    }

    #[test]
    fn test_schedule_disabled() {
        assert!(!SpawnSchedule::new(0, 5).should_spawn(0));
        assert!(!SpawnSchedule::new(-4, 5).should_spawn(4));
    }

    #[test]
    fn test_burst_bounded_by_pool() {
        let params = params_with(|_| {});
        let mut pool = ParticlePool::new(3);
        let mut rng = fastrand::Rng::with_seed(1);
        let schedule = SpawnSchedule::new(1, 5);

        let n = spawn_burst(&mut pool, &schedule, &params, Vec2::ZERO, 0.0, 1, &mut rng);
        assert_eq!(n, 3);
        assert_eq!(pool.active_count(), 3);
        let n = spawn_burst(&mut pool, &schedule, &params, Vec2::ZERO, 0.0, 2, &mut rng);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_burst_skips_off_ticks() {
        let params = params_with(|_| {});
        let mut pool = ParticlePool::new(8);
        let mut rng = fastrand::Rng::with_seed(1);
        let schedule = SpawnSchedule::new(2, 1);
        assert_eq!(spawn_burst(&mut pool, &schedule, &params, Vec2::ZERO, 0.0, 1, &mut rng), 0);
        assert_eq!(spawn_burst(&mut pool, &schedule, &params, Vec2::ZERO, 0.0, 2, &mut rng), 1);
    }

    #[test]
    fn test_polar_fixed_angle_and_distance() {
        let params = params_with(|c| {
            c.animation.position = PositionConfig {
                kind: PositionType::Polar,
                angle: Some(RangeFloat::new(0.0, 0.0)),
                distance: Some(RangeFloat::new(100.0, 100.0)),
                ..PositionConfig::default()
            };
        });
        let mut p = Particle::default();
        let mut rng = fastrand::Rng::with_seed(5);
        let emitter = Vec2::new(10.0, 20.0);
        init_particle(&mut p, &params, emitter, 0.0, &mut rng);
        assert_eq!(p.start_position, emitter);
        assert!((p.end_position - Vec2::new(110.0, 20.0)).length() < 1e-4);
    }

    #[test]
    fn test_cartesian_offsets_within_ranges() {
        let params = params_with(|c| {
            c.animation.position.start_x = Some(RangeFloat::new(-5.0, 5.0));
            c.animation.position.end_y = Some(RangeFloat::new(10.0, 20.0));
        });
        let mut rng = fastrand::Rng::with_seed(11);
        let emitter = Vec2::new(100.0, 100.0);
        for _ in 0..100 {
            let mut p = Particle::default();
            init_particle(&mut p, &params, emitter, 0.0, &mut rng);
            assert!((95.0..=105.0).contains(&p.start_position.x));
            assert_eq!(p.start_position.y, 100.0);
            assert_eq!(p.end_position.x, 100.0);
            assert!((110.0..=120.0).contains(&p.end_position.y));
        }
    }

    #[test]
    fn test_duration_spread() {
        let params = params_with(|c| {
            c.animation.duration.range = Some(RangeFloat::new(1.0, 2.0));
        });
        let mut rng = fastrand::Rng::with_seed(2);
        for _ in 0..100 {
            let mut p = Particle::default();
            init_particle(&mut p, &params, Vec2::ZERO, 3.0, &mut rng);
            assert_eq!(p.spawn_time, 3.0);
            assert!((1.0..=2.0).contains(&p.duration));
        }
    }

    #[test]
    fn test_sequence_snapshots_use_bases() {
        let step = StepConfig {
            from: 0.0,
            to: 1.0,
            duration: 1.0,
            ..StepConfig::default()
        };
        let params = params_with(|c| {
            c.animation.alpha = PropertyConfig::sequence(vec![step]);
            c.animation.scale = PropertyConfig::sequence(vec![step]);
            c.animation.position.x = Some(PropertyConfig::sequence(vec![step]));
        });
        let mut p = Particle::default();
        let mut rng = fastrand::Rng::with_seed(4);
        init_particle(&mut p, &params, Vec2::new(50.0, 60.0), 0.0, &mut rng);
        assert_eq!(p.snapshots.alpha.values(), &[0.0, 1.0]);
        assert_eq!(p.snapshots.scale.values(), &[1.0, 2.0]);
        assert_eq!(p.snapshots.x.values(), &[50.0, 51.0]);
        assert!(p.snapshots.y.values().is_empty());
        assert!(p.snapshots.rotation.values().is_empty());
    }

    #[test]
    fn test_simple_values_copied() {
        let params = params_with(|c| {
            c.animation.alpha = PropertyConfig::simple(1.0, 0.0, Easing::OutQuad);
            c.animation.rotation = PropertyConfig::simple(0.0, 3.0, Easing::InSine);
        });
        let mut p = Particle::default();
        let mut rng = fastrand::Rng::with_seed(4);
        init_particle(&mut p, &params, Vec2::ZERO, 0.0, &mut rng);
        assert_eq!((p.start_alpha, p.end_alpha, p.alpha_easing), (1.0, 0.0, Easing::OutQuad));
        assert_eq!(p.end_rotation, 3.0);
        assert_eq!(p.rotation_easing, Easing::InSine);
        assert_eq!(p.start_scale, 1.0);
        assert_eq!(p.start_color, [1.0; 3]);
    }
}
