//! Wave scheduling state.
//!
//! `WaveManager` is pure bookkeeping: the stage flow system ticks it, the
//! spawner drains it. It never touches the ECS itself, which keeps the
//! timing-gate logic directly unit-testable.

use bevy::prelude::*;

use crate::stage::config::{
    BossConfig, DifficultyScaling, SpawnGroupConfig, StageConfig, WaveClearDirective, WaveConfig,
};

/// Spawn-group scheduler for the currently loaded stage.
#[derive(Resource, Debug, Clone, Default)]
pub struct WaveManager {
    waves: Vec<WaveConfig>,
    boss: Option<BossConfig>,
    difficulty: DifficultyScaling,
    start_delay: f32,

    wave_index: usize,
    group_index: usize,
    spawn_index: u32,

    /// Time since the last spawn in the current group (or since the group
    /// became current, for its first spawn).
    group_clock: f32,
    /// Time since the current wave started; drives the optional timeout.
    wave_clock: f32,
    start_clock: f32,

    wave_started: bool,
    spawning: bool,
    waiting_for_level_start: bool,
    boss_triggered: bool,

    total_spawned: u32,
    total_kills: u32,
}

impl WaveManager {
    /// Adopt a validated stage configuration and rewind all progress.
    pub fn load_stage(&mut self, config: &StageConfig) {
        self.waves = config.waves.clone();
        self.boss = config.boss.clone();
        self.difficulty = config.difficulty;
        self.start_delay = config.start_delay;
        self.reset();
    }

    /// Rewind to the start of the loaded stage. Configuration is kept.
    pub fn reset(&mut self) {
        self.wave_index = 0;
        self.group_index = 0;
        self.spawn_index = 0;
        self.group_clock = 0.0;
        self.wave_clock = 0.0;
        self.start_clock = 0.0;
        self.wave_started = false;
        self.spawning = false;
        self.waiting_for_level_start = true;
        self.boss_triggered = false;
        self.total_spawned = 0;
        self.total_kills = 0;
    }

    /// Advance the scheduler clocks by one tick.
    pub fn update(&mut self, dt: f32) {
        if self.waiting_for_level_start {
            self.start_clock += dt;
            if self.start_clock >= self.start_delay {
                self.waiting_for_level_start = false;
            }
            return;
        }
        if self.wave_started {
            self.wave_clock += dt;
            if self.spawning {
                self.group_clock += dt;
            }
        }
    }

    /// Begin the given wave. Returns false (and changes nothing) when the
    /// index is out of range.
    pub fn start_wave(&mut self, index: usize) -> bool {
        if index >= self.waves.len() {
            return false;
        }
        self.wave_index = index;
        self.group_index = 0;
        self.spawn_index = 0;
        self.group_clock = 0.0;
        self.wave_clock = 0.0;
        self.wave_started = true;
        self.spawning = !self.waves[index].groups.is_empty();
        true
    }

    fn current_group(&self) -> Option<&SpawnGroupConfig> {
        self.waves.get(self.wave_index)?.groups.get(self.group_index)
    }

    /// The spawn directive for this tick, if any. `spawn_delay` gates a
    /// group's first spawn, `spawn_interval` every one after it.
    pub fn should_spawn(&self) -> Option<&SpawnGroupConfig> {
        if self.waiting_for_level_start || !self.spawning {
            return None;
        }
        let group = self.current_group()?;
        let gate = if self.spawn_index == 0 {
            group.spawn_delay
        } else {
            group.spawn_interval
        };
        (self.group_clock >= gate).then_some(group)
    }

    /// Record that the spawner materialized one enemy. Exhausting the group
    /// advances to the next one and resets the group timer; exhausting the
    /// last group ends the wave's spawning phase.
    pub fn mark_enemy_spawned(&mut self) {
        if !self.spawning {
            return;
        }
        let Some(count) = self.current_group().map(|g| g.count) else {
            return;
        };
        self.spawn_index = (self.spawn_index + 1).min(count);
        self.total_spawned += 1;
        self.group_clock = 0.0;
        if self.spawn_index >= count {
            self.group_index += 1;
            self.spawn_index = 0;
            if self.group_index >= self.waves[self.wave_index].groups.len() {
                self.spawning = false;
            }
        }
    }

    pub fn has_more_waves(&self) -> bool {
        self.wave_index + 1 < self.waves.len()
    }

    pub fn all_spawned_for_current_wave(&self) -> bool {
        self.wave_started && !self.spawning
    }

    /// Wave completion: every group exhausted and nothing left alive, or the
    /// optional timeout elapsed (safety valve against bookkeeping desync).
    pub fn wave_complete(&self, live_count: u32) -> bool {
        if !self.wave_started {
            return false;
        }
        if self.all_spawned_for_current_wave() && live_count == 0 {
            return true;
        }
        self.waves
            .get(self.wave_index)
            .and_then(|w| w.timeout)
            .is_some_and(|t| self.wave_clock >= t)
    }

    pub fn on_clear_directive(&self) -> WaveClearDirective {
        self.waves
            .get(self.wave_index)
            .map(|w| w.on_clear.clone())
            .unwrap_or_default()
    }

    pub fn trigger_boss(&mut self) {
        self.boss_triggered = true;
    }

    pub fn is_boss_triggered(&self) -> bool {
        self.boss_triggered
    }

    pub fn boss_config(&self) -> Option<&BossConfig> {
        self.boss.as_ref()
    }

    pub fn has_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn current_wave_index(&self) -> u32 {
        self.wave_index as u32
    }

    pub fn current_group_index(&self) -> u32 {
        self.group_index as u32
    }

    pub fn spawn_index(&self) -> u32 {
        self.spawn_index
    }

    pub fn is_waiting_for_level_start(&self) -> bool {
        self.waiting_for_level_start
    }

    pub fn difficulty(&self) -> DifficultyScaling {
        self.difficulty
    }

    pub fn record_kill(&mut self) {
        self.total_kills += 1;
    }

    pub fn total_spawned(&self) -> u32 {
        self.total_spawned
    }

    pub fn total_kills(&self) -> u32 {
        self.total_kills
    }
}
