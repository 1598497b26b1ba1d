//! Parametric entry motion and the synchronized warp-in scale animation.

pub mod calculators;

use bevy::prelude::*;

use utils::easing::{ease, lerp, EasingKind};

use crate::stage::config::{EntryPathConfig, EntryPathKind};
use crate::system_set::ChoreoSystemSet;

pub use calculators::PathParams;

/// Scripted motion from spawn ring to formation slot.
///
/// `progress` is monotonic and clamped to [0, 1]; once `complete` this system
/// never touches the entity's position again.
#[derive(Component, Debug, Clone, Reflect)]
pub struct EntryPath {
    pub kind: EntryPathKind,
    pub progress: f32,
    pub duration: f32,
    pub elapsed: f32,
    pub start: Vec2,
    pub end: Vec2,
    pub params: PathParams,
    pub complete: bool,
}

impl EntryPath {
    pub fn new(config: &EntryPathConfig, start: Vec2, end: Vec2, center: Vec2) -> Self {
        Self {
            kind: config.kind,
            progress: 0.0,
            duration: config.duration,
            elapsed: 0.0,
            start,
            end,
            params: PathParams {
                center,
                spiral_turns: config.spiral_turns,
                arc_angle: config.arc_angle,
                rotation: config.rotation.signum(),
                curve_intensity: config.curve_intensity,
                easing: config.easing,
            },
            complete: false,
        }
    }

    /// Advance the clock and return the new progress value.
    fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt;
        let progress = if self.duration <= f32::EPSILON {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        };
        // Never move backwards, whatever the clocks did.
        self.progress = progress.max(self.progress);
        self.progress
    }
}

/// Warp-in scale state, kept in lockstep with entry progress.
#[derive(Component, Debug, Clone, Reflect)]
pub struct ScaleAnimation {
    pub start_scale: f32,
    pub target_scale: f32,
    pub progress: f32,
    pub duration: f32,
    pub elapsed: f32,
    pub easing: EasingKind,
    pub complete: bool,
}

impl ScaleAnimation {
    pub fn warp_in(duration: f32, easing: EasingKind) -> Self {
        Self {
            start_scale: 0.1,
            target_scale: 1.0,
            progress: 0.0,
            duration,
            elapsed: 0.0,
            easing,
            complete: false,
        }
    }
}

/// Advances every incomplete entry path and mirrors its progress into the
/// scale animation, so the warp-in visual grows exactly as far as the enemy
/// has travelled.
pub fn entry_path_system(
    time: Res<Time>,
    mut query: Query<(&mut EntryPath, &mut ScaleAnimation, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (mut path, mut scale, mut transform) in query.iter_mut() {
        if path.complete {
            continue;
        }
        let progress = path.advance(dt);
        let position = calculators::position_at(path.kind, progress, path.start, path.end, &path.params);
        transform.translation.x = position.x;
        transform.translation.y = position.y;

        scale.progress = progress;
        scale.elapsed = scale.duration * progress;
        let factor = lerp(scale.start_scale, scale.target_scale, ease(scale.easing, progress));
        transform.scale = Vec3::splat(factor);

        if progress >= 1.0 {
            path.complete = true;
            scale.complete = true;
        }
    }
}

pub struct PathPlugin;

impl Plugin for PathPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<EntryPath>();
        app.register_type::<ScaleAnimation>();
        app.add_systems(
            Update,
            entry_path_system.in_set(ChoreoSystemSet::EntryMotion),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> EntryPath {
        EntryPath::new(
            &EntryPathConfig {
                duration: 2.0,
                ..Default::default()
            },
            Vec2::new(400.0, 0.0),
            Vec2::new(0.0, 180.0),
            Vec2::ZERO,
        )
    }

    #[test]
    fn test_progress_is_monotonic_and_clamped() {
        let mut p = path();
        let mut last = 0.0;
        for _ in 0..300 {
            let progress = p.advance(0.016);
            assert!(progress >= last);
            assert!(progress <= 1.0);
            last = progress;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut p = path();
        p.duration = 0.0;
        assert_eq!(p.advance(0.016), 1.0);
    }
}
