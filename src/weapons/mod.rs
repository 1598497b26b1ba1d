//! Enemy fire patterns.
//!
//! This core only decides *that* a shot happens and in which direction; the
//! host's projectile/collision collaborator consumes [`EnemyFireEvent`] and
//! owns the projectile entities.

use bevy::prelude::*;

use utils::math::{angle_of, polar};

use crate::behavior::{BehaviorPhase, BehaviorState};
use crate::enemy::Enemy;
use crate::player::Player;
use crate::stage::config::FireConfig;
use crate::system_set::ChoreoSystemSet;

/// Fire cadence record for one enemy.
#[derive(Component, Debug, Clone, Reflect)]
pub struct FirePattern {
    /// Seconds between bursts.
    pub interval: f32,
    pub clock: f32,
    pub burst: u32,
    /// Radians the burst fans across.
    pub spread_angle: f32,
    pub projectile_speed: f32,
}

impl FirePattern {
    pub fn from_config(config: &FireConfig) -> Self {
        Self {
            interval: config.interval,
            clock: 0.0,
            burst: config.burst,
            spread_angle: config.spread_angle,
            projectile_speed: config.projectile_speed,
        }
    }
}

/// One requested shot. Fire-and-forget, consumed by the host.
#[derive(Event, Debug, Clone)]
pub struct EnemyFireEvent {
    pub shooter: Entity,
    pub origin: Vec2,
    pub direction: Vec2,
    pub speed: f32,
}

/// Ticks fire clocks and emits bursts aimed at the player. Enemies hold fire
/// while warping in or leaving the arena.
pub fn fire_pattern_system(
    time: Res<Time>,
    mut query: Query<(Entity, &Transform, &mut FirePattern, &BehaviorState), With<Enemy>>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut fire_events: EventWriter<EnemyFireEvent>,
) {
    let Some(player) = player_query
        .iter()
        .next()
        .map(|t| t.translation.truncate())
    else {
        // No target on the field; hold fire.
        return;
    };
    let dt = time.delta_secs();

    for (shooter, transform, mut fire, behavior) in query.iter_mut() {
        if matches!(
            behavior.phase,
            BehaviorPhase::Entering | BehaviorPhase::Retreating
        ) {
            continue;
        }
        fire.clock += dt;
        if fire.clock < fire.interval {
            continue;
        }
        fire.clock = 0.0;

        let origin = transform.translation.truncate();
        let aim = angle_of(player - origin);
        let shots = fire.burst.max(1);
        for i in 0..shots {
            let offset = if shots == 1 {
                0.0
            } else {
                (i as f32 / (shots - 1) as f32 - 0.5) * fire.spread_angle
            };
            fire_events.write(EnemyFireEvent {
                shooter,
                origin,
                direction: polar(1.0, aim + offset),
                speed: fire.projectile_speed,
            });
        }
    }
}

pub struct FirePlugin;

impl Plugin for FirePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemyFireEvent>();
        app.register_type::<FirePattern>();
        app.add_systems(
            Update,
            fire_pattern_system.in_set(ChoreoSystemSet::Firing),
        );
    }
}
