//! Declarative particle-system configuration.
//!
//! These types are deserialized from TOML by the engine's loader and are
//! immutable once loaded. Every field is optional in the document; missing
//! values fall back to the [`Default`] impls here.

use confetti_common::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// Complete configuration for one particle effect.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSystemConfig {
    /// Effect name, used as the cache key
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Source image descriptor
    pub image: ImageConfig,
    /// Emitter offset from the spawn position
    pub emitter: EmitterConfig,
    /// Per-property animation
    pub animation: AnimationConfig,
    /// Spawn cadence and limits
    pub spawn: SpawnConfig,
}

/// Where the particle image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Image source (asset group or file)
    pub image_from: String,
    /// Image index within the source
    pub image_id: u32,
}

/// Emitter offset, added to the position the effect is spawned at.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// X offset
    pub x: f32,
    /// Y offset
    pub y: f32,
}

/// A `min..max` range sampled uniformly at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeFloat {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl RangeFloat {
    /// Creates a range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Midpoint of the range.
    #[must_use]
    pub fn center(self) -> f32 {
        (self.min + self.max) / 2.0
    }

    /// Half the width of the range.
    #[must_use]
    pub fn half_width(self) -> f32 {
        (self.max - self.min) / 2.0
    }
}

/// All animated properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Particle lifetime
    pub duration: DurationConfig,
    /// Position animation
    pub position: PositionConfig,
    /// Alpha animation
    pub alpha: PropertyConfig,
    /// Scale animation
    pub scale: PropertyConfig,
    /// Rotation animation (radians)
    pub rotation: PropertyConfig,
    /// Optional color animation; white when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorConfig>,
}

/// Particle lifetime in seconds, optionally randomized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    /// Lifetime when no range is given
    pub value: f32,
    /// Overrides `value` with a uniform sample in `min..max`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeFloat>,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            value: 1.0,
            range: None,
        }
    }
}

/// How positions are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionType {
    /// Independent start/end offsets per axis
    #[default]
    Cartesian,
    /// Angle and distance from the emitter
    Polar,
}

/// Position animation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionConfig {
    /// Cartesian (default) or polar
    #[serde(rename = "type")]
    pub kind: PositionType,

    /// Start X offset range (cartesian)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_x: Option<RangeFloat>,
    /// End X offset range (cartesian)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_x: Option<RangeFloat>,
    /// Start Y offset range (cartesian)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_y: Option<RangeFloat>,
    /// End Y offset range (cartesian)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_y: Option<RangeFloat>,

    /// X axis as a sequence (cartesian only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<PropertyConfig>,
    /// Y axis as a sequence (cartesian only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<PropertyConfig>,

    /// Angle range in radians (polar)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<RangeFloat>,
    /// Distance range from the emitter (polar)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<RangeFloat>,

    /// Position easing
    pub easing: Easing,
}

impl PositionConfig {
    /// Whether either axis animates as a sequence.
    #[must_use]
    pub fn has_sequence_axis(&self) -> bool {
        self.kind == PositionType::Cartesian
            && (self.x.as_ref().is_some_and(PropertyConfig::is_sequence)
                || self.y.as_ref().is_some_and(PropertyConfig::is_sequence))
    }
}

/// Animation mode of a scalar property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Two keyframes
    #[default]
    Simple,
    /// Multi-step chain
    Sequence,
}

/// A scalar property: either `start -> end` or a list of steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyConfig {
    /// Simple (default) or sequence
    #[serde(rename = "type")]
    pub kind: PropertyType,
    /// Start value (simple)
    pub start: f32,
    /// End value (simple)
    pub end: f32,
    /// Easing (simple)
    pub easing: Easing,
    /// Steps (sequence)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepConfig>,
}

impl PropertyConfig {
    /// Simple two-keyframe property.
    #[must_use]
    pub fn simple(start: f32, end: f32, easing: Easing) -> Self {
        Self {
            start,
            end,
            easing,
            ..Self::default()
        }
    }

    /// Sequence property.
    #[must_use]
    pub fn sequence(steps: Vec<StepConfig>) -> Self {
        Self {
            kind: PropertyType::Sequence,
            steps,
            ..Self::default()
        }
    }

    /// Whether this property animates as a sequence. A sequence without steps
    /// is treated as simple.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.kind == PropertyType::Sequence && !self.steps.is_empty()
    }
}

/// One step of a sequence property.
///
/// A `from_range`/`to_range` replaces the fixed value with a uniform sample
/// around the range's center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Start offset from the running base
    pub from: f32,
    /// Randomized start offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_range: Option<RangeFloat>,
    /// End offset from the running base
    pub to: f32,
    /// Randomized end offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_range: Option<RangeFloat>,
    /// Step length in seconds
    pub duration: f32,
    /// Step easing
    pub easing: Easing,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            from: 0.0,
            from_range: None,
            to: 0.0,
            to_range: None,
            duration: 1.0,
            easing: Easing::Linear,
        }
    }
}

/// RGB color animation, channels in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Start red
    pub start_r: f32,
    /// Start green
    pub start_g: f32,
    /// Start blue
    pub start_b: f32,
    /// End red
    pub end_r: f32,
    /// End green
    pub end_g: f32,
    /// End blue
    pub end_b: f32,
    /// Color easing
    pub easing: Easing,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            start_r: 1.0,
            start_g: 1.0,
            start_b: 1.0,
            end_r: 1.0,
            end_g: 1.0,
            end_b: 1.0,
            easing: Easing::Linear,
        }
    }
}

/// Spawn cadence and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Spawn every N ticks; 0 disables spawning
    pub interval: i32,
    /// Particles per spawn event
    pub particles_per_spawn: i32,
    /// Pool capacity
    pub max_particles: i32,
    /// Keep running until removed
    pub is_loop: bool,
    /// Lifetime in ticks when not looping
    pub life_time: i32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval: 1,
            particles_per_spawn: 1,
            max_particles: 100,
            is_loop: true,
            life_time: 0,
        }
    }
}

impl ParticleSystemConfig {
    /// Checks the fields the simulation relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        let fail = |field: &str, message: &str| ConfigError::validation(&self.name, field, message);

        if self.name.trim().is_empty() {
            return Err(fail("name", "is required"));
        }
        if self.spawn.max_particles <= 0 {
            return Err(fail("spawn.max_particles", "must be greater than 0"));
        }
        if self.spawn.particles_per_spawn <= 0 {
            return Err(fail("spawn.particles_per_spawn", "must be greater than 0"));
        }
        if self.spawn.interval < 0 {
            return Err(fail("spawn.interval", "must be non-negative"));
        }

        let duration = &self.animation.duration;
        if duration.value <= 0.0 {
            return Err(fail("animation.duration.value", "must be greater than 0"));
        }
        if let Some(range) = duration.range {
            check_range(&self.name, "animation.duration.range", range)?;
            if range.min <= 0.0 {
                return Err(fail("animation.duration.range.min", "must be greater than 0"));
            }
        }

        let position = &self.animation.position;
        for (field, range) in [
            ("animation.position.start_x", position.start_x),
            ("animation.position.end_x", position.end_x),
            ("animation.position.start_y", position.start_y),
            ("animation.position.end_y", position.end_y),
            ("animation.position.angle", position.angle),
            ("animation.position.distance", position.distance),
        ] {
            if let Some(range) = range {
                check_range(&self.name, field, range)?;
            }
        }
        if let Some(x) = &position.x {
            check_property(&self.name, "animation.position.x", x)?;
        }
        if let Some(y) = &position.y {
            check_property(&self.name, "animation.position.y", y)?;
        }

        check_property(&self.name, "animation.alpha", &self.animation.alpha)?;
        check_property(&self.name, "animation.scale", &self.animation.scale)?;
        check_property(&self.name, "animation.rotation", &self.animation.rotation)?;

        Ok(())
    }
}

fn check_range(name: &str, field: &str, range: RangeFloat) -> ConfigResult<()> {
    if range.min > range.max {
        return Err(ConfigError::validation(
            name,
            field,
            format!("min ({}) must not exceed max ({})", range.min, range.max),
        ));
    }
    Ok(())
}

fn check_property(name: &str, field: &str, property: &PropertyConfig) -> ConfigResult<()> {
    if property.kind != PropertyType::Sequence {
        return Ok(());
    }
    if property.steps.is_empty() {
        return Err(ConfigError::validation(name, field, "sequence needs at least one step"));
    }
    for (i, step) in property.steps.iter().enumerate() {
        if step.duration <= 0.0 {
            return Err(ConfigError::validation(
                name,
                format!("{field}.steps[{i}].duration"),
                "must be greater than 0",
            ));
        }
        if let Some(range) = step.from_range {
            check_range(name, &format!("{field}.steps[{i}].from_range"), range)?;
        }
        if let Some(range) = step.to_range {
            check_range(name, &format!("{field}.steps[{i}].to_range"), range)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ParticleSystemConfig {
        ParticleSystemConfig {
            name: "sparks".into(),
            ..ParticleSystemConfig::default()
        }
    }

    #[test]
    fn test_default_config_is_valid_once_named() {
        assert!(ParticleSystemConfig::default().validate().is_err());
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_spawn() {
        let mut cfg = valid();
        cfg.spawn.max_particles = 0;
        let err = cfg.validate().expect_err("should fail").to_string();
        assert!(err.contains("spawn.max_particles"));

        let mut cfg = valid();
        cfg.spawn.particles_per_spawn = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.spawn.interval = -1;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.spawn.interval = 0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_duration() {
        let mut cfg = valid();
        cfg.animation.duration.value = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.animation.duration.range = Some(RangeFloat::new(2.0, 1.0));
        assert!(cfg.validate().is_err());

        for (min, max) in [(0.0, 0.0), (-1.0, 0.5), (0.0, 2.0)] {
            let mut cfg = valid();
            cfg.animation.duration.range = Some(RangeFloat::new(min, max));
            let err = cfg.validate().expect_err("should fail").to_string();
            assert!(err.contains("animation.duration.range.min"));
        }

        let mut cfg = valid();
        cfg.animation.duration.range = Some(RangeFloat::new(0.1, 0.3));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_steps() {
        let mut cfg = valid();
        cfg.animation.alpha = PropertyConfig::sequence(vec![StepConfig {
            duration: 0.0,
            ..StepConfig::default()
        }]);
        let err = cfg.validate().expect_err("should fail").to_string();
        assert!(err.contains("animation.alpha.steps[0].duration"));

        let mut cfg = valid();
        cfg.animation.scale = PropertyConfig::sequence(vec![StepConfig {
            to_range: Some(RangeFloat::new(1.0, 0.0)),
            ..StepConfig::default()
        }]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let cfg: ParticleSystemConfig = toml::from_str(
            r#"
            name = "smoke"

            [animation.duration]
            value = 2.0

            [spawn]
            interval = 3
            max_particles = 50
            "#,
        )
        .expect("valid toml");
        assert_eq!(cfg.name, "smoke");
        assert_eq!(cfg.spawn.interval, 3);
        assert_eq!(cfg.spawn.particles_per_spawn, 1);
        assert_eq!(cfg.animation.position.kind, PositionType::Cartesian);
        assert!(cfg.animation.color.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_parse_polar_and_sequence() {
        let cfg: ParticleSystemConfig = toml::from_str(
            r#"
            name = "burst"

            [animation.position]
            type = "polar"
            angle = { min = 0.0, max = 6.28 }
            distance = { min = 50.0, max = 100.0 }
            easing = "OutCubic"

            [animation.alpha]
            type = "sequence"

            [[animation.alpha.steps]]
            from = 0.0
            to = 1.0
            duration = 0.2
            easing = "outquad"

            [[animation.alpha.steps]]
            from = 0.0
            to = -1.0
            to_range = { min = -1.0, max = -0.5 }
            duration = 0.8
            "#,
        )
        .expect("valid toml");
        let pos = &cfg.animation.position;
        assert_eq!(pos.kind, PositionType::Polar);
        assert_eq!(pos.easing, Easing::OutCubic);
        assert_eq!(pos.distance, Some(RangeFloat::new(50.0, 100.0)));
        assert!(cfg.animation.alpha.is_sequence());
        assert_eq!(cfg.animation.alpha.steps.len(), 2);
        assert_eq!(cfg.animation.alpha.steps[0].easing, Easing::OutQuad);
        assert!(!cfg.animation.scale.is_sequence());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut cfg = valid();
        cfg.animation.color = Some(ColorConfig {
            start_r: 1.0,
            start_g: 0.5,
            start_b: 0.0,
            end_r: 0.2,
            end_g: 0.2,
            end_b: 0.2,
            easing: Easing::InOutSine,
        });
        cfg.animation.rotation = PropertyConfig::sequence(vec![StepConfig {
            to: 3.0,
            duration: 0.5,
            ..StepConfig::default()
        }]);
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: ParticleSystemConfig = toml::from_str(&text).expect("parse");
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_range_helpers() {
        let r = RangeFloat::new(1.0, 3.0);
        assert_eq!(r.center(), 2.0);
        assert_eq!(r.half_width(), 1.0);
    }

    #[test]
    fn test_sequence_axis_detection() {
        let mut pos = PositionConfig::default();
        assert!(!pos.has_sequence_axis());
        pos.x = Some(PropertyConfig::sequence(vec![StepConfig::default()]));
        assert!(pos.has_sequence_axis());
        pos.kind = PositionType::Polar;
        assert!(!pos.has_sequence_axis());
    }
}
