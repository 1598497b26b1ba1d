//! Stage lifecycle state.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Top-level stage progression phase.
///
/// Transitions are forward-only, except PreWave recurs between waves during
/// an inter-wave delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Reflect)]
pub enum StagePhase {
    /// Counting down to the next wave start.
    #[default]
    PreWave,
    /// A wave is spawning and/or being fought.
    WaveInProgress,
    /// Wave cleared; deciding what comes next.
    WaveCompleted,
    /// Boss triggered, buildup timer running.
    BossSpawning,
    /// Boss alive; waiting on the externally-fired defeat notification.
    BossActive,
    /// Defeat notification processed (passed through within one tick).
    BossDefeated,
    /// Terminal. The host loads the next stage or leaves the scene.
    StageCompleted,
}

/// Stage state machine resource, driven once per tick by the stage flow
/// system. All mutation beyond `load`/`reset` happens there.
#[derive(Resource, Debug, Clone, Default)]
pub struct StageMachine {
    pub phase: StagePhase,
    pub stage_number: u32,
    /// Wave index `start_wave` will receive on the next PreWave expiry.
    pub next_wave: usize,
    pub pre_wave_clock: f32,
    pub pre_wave_delay: f32,
    pub boss_clock: f32,
    /// False until the first successful `load_stage`; the flow system idles
    /// while unset.
    pub loaded: bool,
}

impl StageMachine {
    /// Adopt a freshly loaded stage. Only called after the provider and
    /// validation both succeeded, so a failed load never lands here.
    pub fn load(&mut self, stage_number: u32) {
        *self = Self {
            stage_number,
            loaded: true,
            ..Self::default()
        };
    }

    /// Rewind the current stage to its beginning.
    pub fn reset(&mut self) {
        let stage_number = self.stage_number;
        let loaded = self.loaded;
        *self = Self {
            stage_number,
            loaded,
            ..Self::default()
        };
    }

    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    pub fn stage_number(&self) -> u32 {
        self.stage_number
    }

    pub fn is_stage_completed(&self) -> bool {
        self.phase == StagePhase::StageCompleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_resets_progress() {
        let mut machine = StageMachine::default();
        machine.phase = StagePhase::BossActive;
        machine.boss_clock = 4.0;
        machine.load(3);
        assert_eq!(machine.phase, StagePhase::PreWave);
        assert_eq!(machine.stage_number(), 3);
        assert!(machine.loaded);
        assert_eq!(machine.boss_clock, 0.0);
    }

    #[test]
    fn test_reset_keeps_stage_number() {
        let mut machine = StageMachine::default();
        machine.load(2);
        machine.phase = StagePhase::StageCompleted;
        machine.reset();
        assert_eq!(machine.stage_number(), 2);
        assert_eq!(machine.phase, StagePhase::PreWave);
        assert!(machine.loaded);
    }
}
