//! Shared easing curves.
//!
//! Used both for scale-in growth and for directional blending along entry
//! paths, so both stay in lockstep when driven by the same progress value.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum EasingKind {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

/// Evaluate an easing curve at `t`. Input is clamped to [0, 1].
pub fn ease(kind: EasingKind, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match kind {
        EasingKind::Linear => t,
        EasingKind::EaseIn => t * t,
        EasingKind::EaseOut => t * (2.0 - t),
        EasingKind::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                (4.0 - 2.0 * t) * t - 1.0
            }
        }
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
