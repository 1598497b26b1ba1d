//! Entry-path calculators.
//!
//! Each calculator is a pure function of (progress, start, end, params); the
//! path system owns all timing. Keeping them pure makes the motion curves
//! directly testable without a world.

use bevy::prelude::*;
use std::f32::consts::TAU;

use utils::easing::{ease, lerp, EasingKind};
use utils::math::{angle_of, directed_sweep, polar};

use crate::stage::config::EntryPathKind;

/// Base amplitude of the loop path's perpendicular offset, scaled by the
/// group's curve intensity.
const LOOP_AMPLITUDE: f32 = 70.0;

/// Parameters shared by all calculators. Built once by the spawner.
#[derive(Debug, Clone, Reflect)]
pub struct PathParams {
    /// Formation center the spiral/arc wind around.
    pub center: Vec2,
    /// Extra full revolutions a spiral makes beyond aligning with its slot.
    pub spiral_turns: f32,
    /// Radians swept by an arc entry.
    pub arc_angle: f32,
    /// +1 counter-clockwise, -1 clockwise.
    pub rotation: f32,
    pub curve_intensity: f32,
    pub easing: EasingKind,
}

pub fn position_at(
    kind: EntryPathKind,
    progress: f32,
    start: Vec2,
    end: Vec2,
    params: &PathParams,
) -> Vec2 {
    match kind {
        EntryPathKind::Spiral => spiral(progress, start, end, params),
        EntryPathKind::Arc => arc(progress, start, end, params),
        EntryPathKind::Straight => straight(progress, start, end, params),
        EntryPathKind::Loop => loop_path(progress, start, end, params),
    }
}

/// Radius and angle both interpolate from start to end; the angle additionally
/// winds `spiral_turns` full revolutions in the configured direction.
fn spiral(progress: f32, start: Vec2, end: Vec2, params: &PathParams) -> Vec2 {
    let from_center = start - params.center;
    let to_center = end - params.center;
    let radius = lerp(from_center.length(), to_center.length(), progress);
    let start_angle = angle_of(from_center);
    let sweep = directed_sweep(start_angle, angle_of(to_center), params.rotation)
        + params.rotation * params.spiral_turns * TAU;
    params.center + polar(radius, start_angle + sweep * progress)
}

/// Sweeps around the center by `arc_angle`, blending into the exact end
/// position as progress approaches 1 so the handoff to the formation slot has
/// no positional discontinuity.
fn arc(progress: f32, start: Vec2, end: Vec2, params: &PathParams) -> Vec2 {
    let from_center = start - params.center;
    let angle = angle_of(from_center) + params.arc_angle * params.rotation * progress;
    let radius = lerp(from_center.length(), (end - params.center).length(), progress);
    let on_arc = params.center + polar(radius, angle);
    on_arc.lerp(end, progress * progress)
}

fn straight(progress: f32, start: Vec2, end: Vec2, params: &PathParams) -> Vec2 {
    start.lerp(end, ease(params.easing, progress))
}

/// Linear path plus a perpendicular sinusoidal offset: one full loop over the
/// journey, returning to the line at both endpoints.
fn loop_path(progress: f32, start: Vec2, end: Vec2, params: &PathParams) -> Vec2 {
    let base = start.lerp(end, progress);
    let along = (end - start).normalize_or_zero();
    let perpendicular = Vec2::new(-along.y, along.x) * params.rotation;
    base + perpendicular * ((TAU * progress).sin() * LOOP_AMPLITUDE * params.curve_intensity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PathParams {
        PathParams {
            center: Vec2::ZERO,
            spiral_turns: 2.0,
            arc_angle: std::f32::consts::PI,
            rotation: -1.0,
            curve_intensity: 1.0,
            easing: EasingKind::EaseInOut,
        }
    }

    const START: Vec2 = Vec2::new(400.0, 0.0);
    const END: Vec2 = Vec2::new(0.0, 180.0);

    #[test]
    fn test_all_kinds_hit_both_endpoints() {
        for kind in [
            EntryPathKind::Spiral,
            EntryPathKind::Arc,
            EntryPathKind::Straight,
            EntryPathKind::Loop,
        ] {
            let p = params();
            let at_start = position_at(kind, 0.0, START, END, &p);
            let at_end = position_at(kind, 1.0, START, END, &p);
            assert!(
                (at_start - START).length() < 1e-3,
                "{:?} start: {:?}",
                kind,
                at_start
            );
            assert!((at_end - END).length() < 1e-3, "{:?} end: {:?}", kind, at_end);
        }
    }

    #[test]
    fn test_spiral_radius_interpolates() {
        let p = params();
        let mid = position_at(EntryPathKind::Spiral, 0.5, START, END, &p);
        let expected_radius = (400.0 + 180.0) / 2.0;
        assert!((mid.length() - expected_radius).abs() < 1e-2);
    }

    #[test]
    fn test_spiral_direction_follows_rotation() {
        // A clockwise spiral's angle must decrease over early progress.
        let p = params();
        let a0 = angle_of(position_at(EntryPathKind::Spiral, 0.0, START, END, &p));
        let a1 = angle_of(position_at(EntryPathKind::Spiral, 0.05, START, END, &p));
        let swept = directed_sweep(a0, a1, -1.0);
        assert!(swept < 0.0 && swept > -1.0);
    }

    #[test]
    fn test_loop_offsets_are_perpendicular() {
        let p = params();
        let along = (END - START).normalize();
        for progress in [0.1, 0.3, 0.7, 0.9] {
            let base = START.lerp(END, progress);
            let offset = position_at(EntryPathKind::Loop, progress, START, END, &p) - base;
            assert!(offset.dot(along).abs() < 1e-3);
        }
        // Offset vanishes at both ends: one closed loop, no seam.
        let at_end = position_at(EntryPathKind::Loop, 1.0, START, END, &p);
        assert!((at_end - END).length() < 1e-3);
    }

    #[test]
    fn test_straight_is_monotonic_along_the_segment() {
        let p = params();
        let mut last = 0.0;
        for i in 0..=20 {
            let progress = i as f32 / 20.0;
            let pos = position_at(EntryPathKind::Straight, progress, START, END, &p);
            let travelled = (pos - START).length();
            assert!(travelled >= last - 1e-4);
            last = travelled;
        }
    }
}
