//! Procedural attack motion.

pub mod executors;

use bevy::prelude::*;

use crate::core::ArenaLayout;
use crate::enemy::Enemy;
use crate::player::Player;
use crate::stage::config::{AttackConfig, AttackKind};
use crate::system_set::ChoreoSystemSet;

/// Per-enemy attack pattern record. Configured at spawn, armed by the
/// behavior FSM on entering Attacking, disarmed on leaving it.
#[derive(Component, Debug, Clone, Reflect)]
pub struct AttackPattern {
    pub kind: AttackKind,
    pub rush_speed: f32,
    pub return_speed: f32,
    /// Seconds before an unfinished attack times out into a retreat.
    pub duration: f32,
    pub timer: f32,
    pub target: Vec2,
    pub return_position: Vec2,
    pub active: bool,
    pub complete: bool,
    /// Partner entity for paired rushes; validated on use, never trusted.
    pub partner: Option<Entity>,
    /// Loopback scratch: the approach unit-vector, frozen when the dive
    /// crosses the approach threshold. Direction-from-position is ill-defined
    /// near the center, so the outward leg reuses this remembered vector.
    pub outward_dir: Option<Vec2>,
    pub passed_center: bool,
}

impl AttackPattern {
    pub fn from_config(config: &AttackConfig, speed_scale: f32) -> Self {
        Self {
            kind: config.kind,
            rush_speed: config.rush_speed * speed_scale,
            return_speed: config.return_speed * speed_scale,
            duration: config.duration,
            timer: 0.0,
            target: Vec2::ZERO,
            return_position: Vec2::ZERO,
            active: false,
            complete: false,
            partner: None,
            outward_dir: None,
            passed_center: false,
        }
    }

    /// Arm the pattern against a target, clearing all per-run scratch.
    pub fn activate(&mut self, target: Vec2, return_position: Vec2) {
        self.active = true;
        self.complete = false;
        self.timer = 0.0;
        self.target = target;
        self.return_position = return_position;
        self.outward_dir = None;
        self.passed_center = false;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.complete = false;
        self.timer = 0.0;
        self.outward_dir = None;
        self.passed_center = false;
    }

    pub fn timed_out(&self) -> bool {
        self.active && self.timer >= self.duration
    }
}

/// Advances every armed attack pattern. Only entities with an active pattern
/// are processed; the behavior FSM observes `complete` on its next pass.
pub fn attack_system(
    time: Res<Time>,
    arena: Res<ArenaLayout>,
    mut query: Query<(&mut AttackPattern, &mut Transform), With<Enemy>>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
) {
    let dt = time.delta_secs();
    let player = player_query
        .iter()
        .next()
        .map(|t| t.translation.truncate());

    for (mut pattern, mut transform) in query.iter_mut() {
        if !pattern.active || pattern.complete {
            continue;
        }
        pattern.timer += dt;
        let mut position = transform.translation.truncate();
        let done = executors::execute(&mut *pattern, &mut position, dt, &arena, player);
        transform.translation.x = position.x;
        transform.translation.y = position.y;
        if done {
            pattern.complete = true;
        }
    }
}

pub struct AttackPlugin;

impl Plugin for AttackPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AttackPattern>();
        app.add_systems(Update, attack_system.in_set(ChoreoSystemSet::AttackMotion));
    }
}
