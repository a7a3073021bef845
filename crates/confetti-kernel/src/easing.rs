//! Easing functions for particle animation.
//!
//! Maps normalized time (0.0-1.0) to normalized progress. The set is closed:
//! Linear plus In/Out/InOut variants of Quad, Cubic, Quart, Quint, Sine, Expo,
//! Circ and Back (Penner equations).
//!
//! Names parse case-insensitively and unknown names fall back to
//! [`Easing::Linear`], so config files written for a newer build still load.

use std::convert::Infallible;
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Overshoot constant for the Back family.
const BACK_C1: f32 = 1.701_58;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;

/// Number of easing kinds; used to normalize the shader selector.
pub const EASING_COUNT: u32 = 25;

/// Easing curve selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[repr(u32)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear = 0,
    /// t².
    InQuad = 1,
    /// t·(2 − t).
    OutQuad = 2,
    /// Quadratic, piecewise at 0.5.
    InOutQuad = 3,
    /// t³.
    InCubic = 4,
    /// (t − 1)³ + 1.
    OutCubic = 5,
    /// Cubic, piecewise at 0.5.
    InOutCubic = 6,
    /// t⁴.
    InQuart = 7,
    /// 1 − (t − 1)⁴.
    OutQuart = 8,
    /// Quartic, piecewise at 0.5.
    InOutQuart = 9,
    /// t⁵.
    InQuint = 10,
    /// 1 + (t − 1)⁵.
    OutQuint = 11,
    /// Quintic, piecewise at 0.5.
    InOutQuint = 12,
    /// 1 − cos(t·π/2).
    InSine = 13,
    /// sin(t·π/2).
    OutSine = 14,
    /// −(cos(t·π) − 1)/2.
    InOutSine = 15,
    /// 2^(10(t − 1)), exact at 0.
    InExpo = 16,
    /// 1 − 2^(−10t), exact at 1.
    OutExpo = 17,
    /// Exponential, piecewise at 0.5, exact at both ends.
    InOutExpo = 18,
    /// 1 − √(1 − t²).
    InCirc = 19,
    /// √(1 − (t − 1)²).
    OutCirc = 20,
    /// Circular, piecewise at 0.5.
    InOutCirc = 21,
    /// Pulls back before moving forward.
    InBack = 22,
    /// Overshoots the target then settles.
    OutBack = 23,
    /// Back on both ends.
    InOutBack = 24,
}

impl Easing {
    /// All easing kinds in shader-selector order.
    pub const ALL: [Self; EASING_COUNT as usize] = [
        Self::Linear,
        Self::InQuad,
        Self::OutQuad,
        Self::InOutQuad,
        Self::InCubic,
        Self::OutCubic,
        Self::InOutCubic,
        Self::InQuart,
        Self::OutQuart,
        Self::InOutQuart,
        Self::InQuint,
        Self::OutQuint,
        Self::InOutQuint,
        Self::InSine,
        Self::OutSine,
        Self::InOutSine,
        Self::InExpo,
        Self::OutExpo,
        Self::InOutExpo,
        Self::InCirc,
        Self::OutCirc,
        Self::InOutCirc,
        Self::InBack,
        Self::OutBack,
        Self::InOutBack,
    ];

    /// Parses an easing name. Matching ignores ASCII case; unknown names
    /// resolve to [`Easing::Linear`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(Self::Linear)
    }

    /// Canonical name, as written in config files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::InQuad => "InQuad",
            Self::OutQuad => "OutQuad",
            Self::InOutQuad => "InOutQuad",
            Self::InCubic => "InCubic",
            Self::OutCubic => "OutCubic",
            Self::InOutCubic => "InOutCubic",
            Self::InQuart => "InQuart",
            Self::OutQuart => "OutQuart",
            Self::InOutQuart => "InOutQuart",
            Self::InQuint => "InQuint",
            Self::OutQuint => "OutQuint",
            Self::InOutQuint => "InOutQuint",
            Self::InSine => "InSine",
            Self::OutSine => "OutSine",
            Self::InOutSine => "InOutSine",
            Self::InExpo => "InExpo",
            Self::OutExpo => "OutExpo",
            Self::InOutExpo => "InOutExpo",
            Self::InCirc => "InCirc",
            Self::OutCirc => "OutCirc",
            Self::InOutCirc => "InOutCirc",
            Self::InBack => "InBack",
            Self::OutBack => "OutBack",
            Self::InOutBack => "InOutBack",
        }
    }

    /// Converts to GPU shader enum value.
    #[must_use]
    pub const fn to_shader_value(self) -> u32 {
        self as u32
    }

    /// Shader selector scaled into 0.0-1.0 for packing into a color channel.
    #[must_use]
    pub fn normalized(self) -> f32 {
        self.to_shader_value() as f32 / EASING_COUNT as f32
    }

    /// Applies the easing function to a normalized time value.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,

            Self::InQuad => t * t,
            Self::OutQuad => t * (2.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }

            Self::InCubic => t * t * t,
            Self::OutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    (t - 1.0) * u * u + 1.0
                }
            }

            Self::InQuart => t * t * t * t,
            Self::OutQuart => {
                let u = t - 1.0;
                1.0 - u * u * u * u
            }
            Self::InOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    let u = t - 1.0;
                    1.0 - 8.0 * u * u * u * u
                }
            }

            Self::InQuint => t * t * t * t * t,
            Self::OutQuint => {
                let u = t - 1.0;
                1.0 + u * u * u * u * u
            }
            Self::InOutQuint => {
                if t < 0.5 {
                    16.0 * t * t * t * t * t
                } else {
                    let u = t - 1.0;
                    1.0 + 16.0 * u * u * u * u * u
                }
            }

            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((t * PI).cos() - 1.0) / 2.0,

            Self::InExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * (t - 1.0))
                }
            }
            Self::OutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Self::InOutExpo => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }

            Self::InCirc => 1.0 - (1.0 - t * t).sqrt(),
            Self::OutCirc => {
                let u = t - 1.0;
                (1.0 - u * u).sqrt()
            }
            Self::InOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - 4.0 * t * t).sqrt()) / 2.0
                } else {
                    let u = 2.0 * t - 2.0;
                    ((1.0 - u * u).sqrt() + 1.0) / 2.0
                }
            }

            Self::InBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            Self::OutBack => {
                let u = t - 1.0;
                1.0 + BACK_C3 * u * u * u + BACK_C1 * u * u
            }
            Self::InOutBack => {
                if t < 0.5 {
                    (4.0 * t * t * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0
                } else {
                    let u = 2.0 * t - 2.0;
                    (u * u * ((BACK_C2 + 1.0) * u + BACK_C2) + 2.0) / 2.0
                }
            }
        }
    }
}

/// Applies `kind` to `t`. Free-function form of [`Easing::apply`].
#[must_use]
pub fn apply(t: f32, kind: Easing) -> f32 {
    kind.apply(t)
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Easing {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name().to_owned()
    }
}
