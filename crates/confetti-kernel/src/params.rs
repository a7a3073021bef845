//! Runtime animation parameters.
//!
//! [`AnimationParams`] is derived once from a [`ParticleSystemConfig`] when a
//! system is created and never changes afterwards. Spawning reads it for every
//! new particle, so everything that can be precomputed is.

use std::sync::Arc;

use crate::config::{ParticleSystemConfig, PositionType, PropertyConfig, RangeFloat, StepConfig};
use crate::easing::Easing;
use crate::sequence::{SequenceConfig, SequenceStep};

/// How a scalar property animates over a particle's life.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyAnimation {
    /// Eased lerp between two keyframes.
    Simple {
        /// Value at spawn
        start: f32,
        /// Value at end of life
        end: f32,
        /// Easing over normalized life
        easing: Easing,
    },
    /// Multi-step chain, resolved per particle into a snapshot.
    Sequence(Arc<SequenceConfig>),
}

impl PropertyAnimation {
    /// Builds from a property config.
    #[must_use]
    pub fn from_config(property: &PropertyConfig) -> Self {
        if property.is_sequence() {
            Self::Sequence(Arc::new(sequence_from_steps(&property.steps)))
        } else {
            Self::Simple {
                start: property.start,
                end: property.end,
                easing: property.easing,
            }
        }
    }

    /// The shared sequence, if any.
    #[must_use]
    pub fn sequence(&self) -> Option<&Arc<SequenceConfig>> {
        match self {
            Self::Sequence(seq) => Some(seq),
            Self::Simple { .. } => None,
        }
    }

    /// Whether this property is sequenced.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }
}

/// Converts config steps into evaluator steps.
///
/// A `{min, max}` range replaces the fixed value: the base becomes the range
/// center and the spread half its width.
#[must_use]
pub fn sequence_from_steps(steps: &[StepConfig]) -> SequenceConfig {
    SequenceConfig::new(
        steps
            .iter()
            .map(|s| {
                let mut step = SequenceStep::new(s.from, s.to, s.duration, s.easing);
                if let Some(r) = s.from_range {
                    step.from_base = r.center();
                    step.from_range = r.half_width();
                }
                if let Some(r) = s.to_range {
                    step.to_base = r.center();
                    step.to_range = r.half_width();
                }
                step
            })
            .collect(),
    )
}

/// Start/end offset ranges for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CartesianRanges {
    /// Start X offset
    pub start_x: RangeFloat,
    /// End X offset
    pub end_x: RangeFloat,
    /// Start Y offset
    pub start_y: RangeFloat,
    /// End Y offset
    pub end_y: RangeFloat,
}

/// How particle positions are sampled at spawn.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionMode {
    /// Offsets sampled per axis and added to the emitter.
    Cartesian(CartesianRanges),
    /// Start at the emitter, end at `distance` along `angle`.
    Polar {
        /// Angle range in radians
        angle: RangeFloat,
        /// Distance range
        distance: RangeFloat,
    },
    /// At least one axis follows a sequence based at the emitter coordinate.
    ///
    /// An axis without a sequence uses its cartesian ranges.
    Sequence {
        /// Fallback ranges for non-sequenced axes
        ranges: CartesianRanges,
        /// X axis sequence
        x: Option<Arc<SequenceConfig>>,
        /// Y axis sequence
        y: Option<Arc<SequenceConfig>>,
    },
}

/// Everything spawning needs, derived once per system.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationParams {
    /// Mean lifetime in seconds
    pub duration_base: f32,
    /// ± spread on the lifetime
    pub duration_range: f32,
    /// Position sampling
    pub position: PositionMode,
    /// Position easing
    pub position_easing: Easing,
    /// Alpha animation
    pub alpha: PropertyAnimation,
    /// Scale animation
    pub scale: PropertyAnimation,
    /// Rotation animation
    pub rotation: PropertyAnimation,
    /// Whether a color block was configured
    pub use_color: bool,
    /// Start RGB
    pub start_color: [f32; 3],
    /// End RGB
    pub end_color: [f32; 3],
    /// Color easing
    pub color_easing: Easing,
}

impl AnimationParams {
    /// Derives parameters from a config.
    #[must_use]
    pub fn from_config(config: &ParticleSystemConfig) -> Self {
        let anim = &config.animation;

        let (duration_base, duration_range) = match anim.duration.range {
            Some(r) => (r.center(), r.half_width()),
            None => (anim.duration.value, 0.0),
        };

        let pos = &anim.position;
        let position = match pos.kind {
            PositionType::Polar => PositionMode::Polar {
                angle: pos.angle.unwrap_or_default(),
                distance: pos.distance.unwrap_or_default(),
            },
            PositionType::Cartesian => {
                let ranges = CartesianRanges {
                    start_x: pos.start_x.unwrap_or_default(),
                    end_x: pos.end_x.unwrap_or_default(),
                    start_y: pos.start_y.unwrap_or_default(),
                    end_y: pos.end_y.unwrap_or_default(),
                };
                if pos.has_sequence_axis() {
                    let axis = |p: &Option<PropertyConfig>| {
                        p.as_ref()
                            .filter(|p| p.is_sequence())
                            .map(|p| Arc::new(sequence_from_steps(&p.steps)))
                    };
                    PositionMode::Sequence {
                        ranges,
                        x: axis(&pos.x),
                        y: axis(&pos.y),
                    }
                } else {
                    PositionMode::Cartesian(ranges)
                }
            }
        };

        let scale = match PropertyAnimation::from_config(&anim.scale) {
            PropertyAnimation::Simple { start, end, easing } if start == 0.0 && end == 0.0 => {
                PropertyAnimation::Simple {
                    start: 1.0,
                    end: 1.0,
                    easing,
                }
            }
            other => other,
        };

        let (use_color, start_color, end_color, color_easing) = match &anim.color {
            Some(c) => (
                true,
                [c.start_r, c.start_g, c.start_b],
                [c.end_r, c.end_g, c.end_b],
                c.easing,
            ),
            None => (false, [1.0; 3], [1.0; 3], Easing::Linear),
        };

        Self {
            duration_base,
            duration_range,
            position,
            position_easing: pos.easing,
            alpha: PropertyAnimation::from_config(&anim.alpha),
            scale,
            rotation: PropertyAnimation::from_config(&anim.rotation),
            use_color,
            start_color,
            end_color,
            color_easing,
        }
    }

    /// Whether any property needs per-particle snapshots.
    #[must_use]
    pub fn has_sequences(&self) -> bool {
        matches!(self.position, PositionMode::Sequence { .. })
            || self.alpha.is_sequence()
            || self.scale.is_sequence()
            || self.rotation.is_sequence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorConfig, PositionConfig};

    fn base() -> ParticleSystemConfig {
        ParticleSystemConfig {
            name: "test".into(),
            ..ParticleSystemConfig::default()
        }
    }

    #[test]
    fn test_duration_without_range() {
        let mut cfg = base();
        cfg.animation.duration.value = 1.5;
        let params = AnimationParams::from_config(&cfg);
        assert_eq!(params.duration_base, 1.5);
        assert_eq!(params.duration_range, 0.0);
    }

    #[test]
    fn test_duration_range_overrides_value() {
        let mut cfg = base();
        cfg.animation.duration.value = 9.0;
        cfg.animation.duration.range = Some(RangeFloat::new(1.0, 3.0));
        let params = AnimationParams::from_config(&cfg);
        assert_eq!(params.duration_base, 2.0);
        assert_eq!(params.duration_range, 1.0);
    }

    #[test]
    fn test_zero_scale_becomes_one() {
        let params = AnimationParams::from_config(&base());
        assert_eq!(
            params.scale,
            PropertyAnimation::Simple {
                start: 1.0,
                end: 1.0,
                easing: Easing::Linear
            }
        );

        let mut cfg = base();
        cfg.animation.scale = PropertyConfig::simple(0.0, 2.0, Easing::OutQuad);
        let params = AnimationParams::from_config(&cfg);
        assert_eq!(
            params.scale,
            PropertyAnimation::Simple {
                start: 0.0,
                end: 2.0,
                easing: Easing::OutQuad
            }
        );
    }

    #[test]
    fn test_missing_color_is_white() {
        let params = AnimationParams::from_config(&base());
        assert!(!params.use_color);
        assert_eq!(params.start_color, [1.0; 3]);
        assert_eq!(params.end_color, [1.0; 3]);

        let mut cfg = base();
        cfg.animation.color = Some(ColorConfig {
            start_r: 1.0,
            start_g: 0.0,
            start_b: 0.0,
            end_r: 0.0,
            end_g: 0.0,
            end_b: 1.0,
            easing: Easing::InQuad,
        });
        let params = AnimationParams::from_config(&cfg);
        assert!(params.use_color);
        assert_eq!(params.start_color, [1.0, 0.0, 0.0]);
        assert_eq!(params.color_easing, Easing::InQuad);
    }

    #[test]
    fn test_position_modes() {
        let params = AnimationParams::from_config(&base());
        assert_eq!(params.position, PositionMode::Cartesian(CartesianRanges::default()));

        let mut cfg = base();
        cfg.animation.position = PositionConfig {
            kind: PositionType::Polar,
            distance: Some(RangeFloat::new(100.0, 100.0)),
            ..PositionConfig::default()
        };
        let params = AnimationParams::from_config(&cfg);
        assert_eq!(
            params.position,
            PositionMode::Polar {
                angle: RangeFloat::default(),
                distance: RangeFloat::new(100.0, 100.0)
            }
        );

        let mut cfg = base();
        cfg.animation.position.y = Some(PropertyConfig::sequence(vec![StepConfig::default()]));
        let params = AnimationParams::from_config(&cfg);
        match &params.position {
            PositionMode::Sequence { x, y, .. } => {
                assert!(x.is_none());
                assert_eq!(y.as_ref().map(|s| s.len()), Some(1));
            }
            other => panic!("expected sequence mode, got {other:?}"),
        }
        assert!(params.has_sequences());
    }

    #[test]
    fn test_step_ranges_become_center_and_spread() {
        let seq = sequence_from_steps(&[StepConfig {
            from: 5.0,
            from_range: Some(RangeFloat::new(-2.0, 4.0)),
            to: 1.0,
            to_range: None,
            duration: 0.5,
            easing: Easing::OutBack,
        }]);
        let step = seq.steps()[0];
        assert_eq!(step.from_base, 1.0);
        assert_eq!(step.from_range, 3.0);
        assert_eq!(step.to_base, 1.0);
        assert_eq!(step.to_range, 0.0);
        assert_eq!(step.easing, Easing::OutBack);
        assert_eq!(seq.total_duration(), 0.5);
    }

    #[test]
    fn test_sequence_property() {
        let prop = PropertyConfig::sequence(vec![StepConfig::default(), StepConfig::default()]);
        let anim = PropertyAnimation::from_config(&prop);
        assert!(anim.is_sequence());
        assert_eq!(anim.sequence().map(|s| s.len()), Some(2));
    }
}
