//! Collaborator-facing stage operations.

use bevy::{ecs::system::SystemParam, prelude::*};

use crate::enemy::Enemy;
use crate::waves::{WaveEnemy, WaveManager};

use super::provider::{StageLoadError, StageProvider};
use super::state::{StageMachine, StagePhase};

/// Bundled access to stage operations, for host systems.
///
/// Loading is atomic: the provider fetch and validation both succeed before
/// any manager state is touched, so a failed load leaves everything exactly
/// as it was.
#[derive(SystemParam)]
pub struct StageControl<'w, 's> {
    machine: ResMut<'w, StageMachine>,
    waves: ResMut<'w, WaveManager>,
    provider: Option<Res<'w, StageProvider>>,
    commands: Commands<'w, 's>,
    enemies: Query<'w, 's, Entity, With<Enemy>>,
    live: Query<'w, 's, (), (With<Enemy>, With<WaveEnemy>)>,
}

impl StageControl<'_, '_> {
    pub fn load_stage(&mut self, number: u32) -> Result<(), StageLoadError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(StageLoadError::ProviderMissing)?;
        let config = provider.0.load_stage(number)?;
        config.validate()?;

        self.despawn_all();
        self.waves.load_stage(&config);
        self.machine.load(number);
        info!(
            "stage {} loaded: {} waves, boss: {}",
            number,
            config.waves.len(),
            config.boss.is_some()
        );
        Ok(())
    }

    pub fn load_next_stage(&mut self) -> Result<(), StageLoadError> {
        self.load_stage(self.machine.stage_number() + 1)
    }

    /// Hard reset: rewind the loaded stage and clear the arena.
    pub fn reset(&mut self) {
        self.despawn_all();
        self.waves.reset();
        self.machine.reset();
    }

    pub fn state(&self) -> StagePhase {
        self.machine.phase()
    }

    pub fn is_stage_completed(&self) -> bool {
        self.machine.is_stage_completed()
    }

    pub fn current_wave_index(&self) -> u32 {
        self.waves.current_wave_index()
    }

    pub fn stage_number(&self) -> u32 {
        self.machine.stage_number()
    }

    /// Live wave enemies on the field. The boss is not a wave member and is
    /// never counted here.
    pub fn active_enemy_count(&self) -> u32 {
        self.live.iter().count() as u32
    }

    fn despawn_all(&mut self) {
        for entity in self.enemies.iter() {
            self.commands.entity(entity).despawn();
        }
    }
}
