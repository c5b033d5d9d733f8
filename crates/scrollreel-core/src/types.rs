use serde::{Deserialize, Serialize};

/// Easing function applied to a timeline segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
}

impl Easing {
    /// Map a segment position `t` (clamped to [0, 1]) through the curve.
    ///
    /// Every curve is a power ramp: `In` accelerates from rest, `Out` is its
    /// mirror image, `InOut` runs `In` over the first half and `Out` over the
    /// second.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => ramp_in(t, 2),
            Easing::EaseOut => ramp_out(t, 2),
            Easing::EaseInOut => ramp_in_out(t, 2),
            Easing::CubicIn => ramp_in(t, 3),
            Easing::CubicOut => ramp_out(t, 3),
            Easing::CubicInOut => ramp_in_out(t, 3),
        }
    }
}

fn ramp_in(t: f64, power: i32) -> f64 {
    t.powi(power)
}

fn ramp_out(t: f64, power: i32) -> f64 {
    1.0 - ramp_in(1.0 - t, power)
}

fn ramp_in_out(t: f64, power: i32) -> f64 {
    if t < 0.5 {
        ramp_in(2.0 * t, power) / 2.0
    } else {
        0.5 + ramp_out(2.0 * t - 1.0, power) / 2.0
    }
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
