//! The destroy operation the collision/damage collaborator calls.

use bevy::{ecs::system::SystemParam, prelude::*};

use crate::stage::events::BossDefeated;
use crate::waves::WaveManager;

use super::{Boss, Enemy, ScoreValue};

/// Bundled destroy access for host systems.
#[derive(SystemParam)]
pub struct EnemyDestroyer<'w, 's> {
    commands: Commands<'w, 's>,
    enemies: Query<'w, 's, (&'static ScoreValue, Has<Boss>), With<Enemy>>,
    boss_events: EventWriter<'w, BossDefeated>,
    waves: ResMut<'w, WaveManager>,
}

impl EnemyDestroyer<'_, '_> {
    /// Despawn an enemy and return the points it was worth.
    ///
    /// A stale id (entity already gone) is a silent no-op worth 0 points;
    /// expected when two hits land on the same frame. Destroying the boss
    /// also raises [`BossDefeated`], which the stage machine subscribes to —
    /// the event handoff keeps boss completion off the per-tick polling path.
    pub fn destroy_enemy(&mut self, entity: Entity) -> u32 {
        let Ok((score, is_boss)) = self.enemies.get(entity) else {
            return 0;
        };
        if is_boss {
            self.boss_events.write(BossDefeated { boss: entity });
        } else {
            self.waves.record_kill();
        }
        self.commands.entity(entity).despawn();
        score.0
    }
}
