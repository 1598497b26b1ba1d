//! Stage flow system: the one place stage phase transitions happen.

use bevy::prelude::*;

use crate::core::ArenaLayout;
use crate::enemy::{spawner, Enemy};
use crate::waves::{WaveEnemy, WaveManager};

use super::events::{BossDefeated, StageEvent, StageEventKind};
use super::state::{StageMachine, StagePhase};
use crate::stage::config::WaveClearDirective;

/// Advances the stage state machine one tick.
///
/// Runs first in the tick so a wave started here is visible to the spawner in
/// the same frame. The boss-defeat notification is consumed here rather than
/// polled from entity state, so a same-tick spawn/destroy cannot race the
/// completion check.
pub fn stage_flow_system(
    time: Res<Time>,
    arena: Res<ArenaLayout>,
    mut machine: ResMut<StageMachine>,
    mut waves: ResMut<WaveManager>,
    mut commands: Commands,
    mut stage_events: EventWriter<StageEvent>,
    mut boss_defeated: EventReader<BossDefeated>,
    live_query: Query<(), (With<Enemy>, With<WaveEnemy>)>,
) {
    if !machine.loaded {
        boss_defeated.clear();
        return;
    }

    let dt = time.delta_secs();
    let stage = machine.stage_number;

    match machine.phase {
        StagePhase::PreWave => {
            machine.pre_wave_clock += dt;
            if machine.pre_wave_clock >= machine.pre_wave_delay {
                let wave = machine.next_wave;
                if waves.start_wave(wave) {
                    info!("stage {} wave {} started", stage, wave);
                    stage_events.write(StageEvent {
                        kind: StageEventKind::WaveStarted,
                        stage,
                        wave: wave as u32,
                    });
                    machine.phase = StagePhase::WaveInProgress;
                }
            }
        }

        StagePhase::WaveInProgress => {
            waves.update(dt);
            let live = live_query.iter().count() as u32;
            if waves.wave_complete(live) {
                let wave = waves.current_wave_index();
                info!("stage {} wave {} completed", stage, wave);
                stage_events.write(StageEvent {
                    kind: StageEventKind::WaveCompleted,
                    stage,
                    wave,
                });
                machine.phase = StagePhase::WaveCompleted;
            }
        }

        StagePhase::WaveCompleted => {
            let wave = waves.current_wave_index();
            let directive = waves.on_clear_directive();
            let boss_now = matches!(directive, WaveClearDirective::TriggerBoss) && waves.has_boss();

            if boss_now || (!waves.has_more_waves() && waves.has_boss()) {
                waves.trigger_boss();
                machine.boss_clock = 0.0;
                info!("stage {} boss spawn requested", stage);
                stage_events.write(StageEvent {
                    kind: StageEventKind::BossSpawnRequested,
                    stage,
                    wave,
                });
                machine.phase = StagePhase::BossSpawning;
            } else if waves.has_more_waves() {
                let delay = match directive {
                    WaveClearDirective::NextWave { delay } => delay,
                    WaveClearDirective::TriggerBoss => 0.0,
                };
                machine.next_wave = wave as usize + 1;
                machine.pre_wave_delay = delay;
                machine.pre_wave_clock = 0.0;
                if delay <= 0.0 {
                    // No breathing room requested: start the next wave now
                    // instead of burning a tick in PreWave.
                    let next = machine.next_wave;
                    if waves.start_wave(next) {
                        stage_events.write(StageEvent {
                            kind: StageEventKind::WaveStarted,
                            stage,
                            wave: next as u32,
                        });
                        machine.phase = StagePhase::WaveInProgress;
                    }
                } else {
                    machine.phase = StagePhase::PreWave;
                }
            } else {
                info!("stage {} completed", stage);
                stage_events.write(StageEvent {
                    kind: StageEventKind::StageCompleted,
                    stage,
                    wave,
                });
                machine.phase = StagePhase::StageCompleted;
            }
        }

        StagePhase::BossSpawning => {
            machine.boss_clock += dt;
            match waves.boss_config() {
                Some(config) if machine.boss_clock >= config.spawn_delay => {
                    let config = config.clone();
                    let boss = spawner::spawn_boss(
                        &mut commands,
                        &config,
                        waves.difficulty(),
                        &arena,
                    );
                    info!("stage {} boss {:?} spawned ({})", stage, boss, config.enemy_type);
                    stage_events.write(StageEvent {
                        kind: StageEventKind::BossSpawned,
                        stage,
                        wave: waves.current_wave_index(),
                    });
                    machine.phase = StagePhase::BossActive;
                }
                Some(_) => {}
                None => {
                    // Boss flag raised without a config: complete instead of
                    // wedging the stage forever.
                    warn!("stage {} boss triggered without boss config", stage);
                    stage_events.write(StageEvent {
                        kind: StageEventKind::StageCompleted,
                        stage,
                        wave: waves.current_wave_index(),
                    });
                    machine.phase = StagePhase::StageCompleted;
                }
            }
        }

        StagePhase::BossActive => {
            if boss_defeated.read().next().is_some() {
                machine.phase = StagePhase::BossDefeated;
                // BossDefeated passes straight through: the notification has
                // been processed, so the stage is complete this same tick.
                info!("stage {} boss defeated, stage completed", stage);
                stage_events.write(StageEvent {
                    kind: StageEventKind::StageCompleted,
                    stage,
                    wave: waves.current_wave_index(),
                });
                machine.phase = StagePhase::StageCompleted;
            }
        }

        StagePhase::BossDefeated => {
            machine.phase = StagePhase::StageCompleted;
        }

        StagePhase::StageCompleted => {}
    }

    // Notifications outside BossActive are stale (boss already gone or stage
    // restarted); drop them so the queue never accumulates.
    boss_defeated.clear();
}
