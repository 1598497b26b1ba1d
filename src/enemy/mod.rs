//! Enemy entity markers and the collaborator-facing destroy operation.

pub mod destroy;
pub mod spawner;

use bevy::prelude::*;

use crate::system_set::ChoreoSystemSet;

pub use destroy::EnemyDestroyer;

/// Every hostile this engine spawns, boss included.
#[derive(Component, Reflect, Default, Debug)]
#[reflect(Component)]
pub struct Enemy {
    /// Type name, resolved by the host's sprite/config collaborator.
    pub enemy_type: String,
}

/// The stage boss. Not counted by wave-completion checks.
#[derive(Component, Reflect, Default, Debug)]
#[reflect(Component)]
pub struct Boss;

/// Points awarded when the entity is destroyed. Pre-scaled by difficulty.
#[derive(Component, Debug, Clone, Copy, Reflect)]
pub struct ScoreValue(pub u32);

/// Hit points, pre-scaled by difficulty. The collision collaborator drains it
/// and calls destroy; this core only seeds it at spawn.
#[derive(Component, Debug, Clone, Reflect)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }
}

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Enemy>();
        app.register_type::<Boss>();
        app.register_type::<ScoreValue>();
        app.register_type::<Health>();
        app.add_systems(
            Update,
            spawner::wave_spawning_system.in_set(ChoreoSystemSet::Spawning),
        );
    }
}
