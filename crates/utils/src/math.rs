//! Small polar-coordinate helpers for formation and path math.

use bevy::prelude::*;
use std::f32::consts::TAU;

/// Point at `radius`/`angle` (radians, counter-clockwise from +X).
pub fn polar(radius: f32, angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Angle of a vector in radians. Zero vector maps to 0.
pub fn angle_of(v: Vec2) -> f32 {
    if v == Vec2::ZERO {
        0.0
    } else {
        v.y.atan2(v.x)
    }
}

/// Signed angular sweep from `from` to `to` following `direction`
/// (positive = counter-clockwise, negative = clockwise). The result is the
/// minimal sweep in that direction: [0, TAU) for CCW, (-TAU, 0] for CW.
pub fn directed_sweep(from: f32, to: f32, direction: f32) -> f32 {
    let diff = (to - from).rem_euclid(TAU);
    if direction >= 0.0 {
        diff
    } else if diff == 0.0 {
        0.0
    } else {
        diff - TAU
    }
}

/// Move `current` toward `target` by at most `max_delta`, without overshoot.
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_quadrants() {
        assert!((polar(1.0, 0.0) - Vec2::X).length() < 1e-6);
        assert!((polar(2.0, TAU / 4.0) - Vec2::new(0.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn test_directed_sweep_signs() {
        let quarter = TAU / 4.0;
        assert!((directed_sweep(0.0, quarter, 1.0) - quarter).abs() < 1e-6);
        assert!((directed_sweep(0.0, quarter, -1.0) - (quarter - TAU)).abs() < 1e-6);
        assert_eq!(directed_sweep(1.0, 1.0, -1.0), 0.0);
    }

    #[test]
    fn test_approach_clamps() {
        assert_eq!(approach(0.0, 10.0, 3.0), 3.0);
        assert_eq!(approach(0.0, 2.0, 3.0), 2.0);
        assert_eq!(approach(10.0, 0.0, 4.0), 6.0);
    }
}
