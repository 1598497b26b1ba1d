//! Headless stage run: drives a full stage to completion with a scripted
//! auto-gunner standing in for the collision collaborator, printing lifecycle
//! events as they fire.
//!
//! ```sh
//! cargo run --example stage_run -- --stage 1
//! ```

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;

use gyrewave::enemy::{Boss, Enemy, EnemyDestroyer};
use gyrewave::stage::config::{
    AttackConfig, AttackKind, BehaviorConfig, BossConfig, EntryPathConfig, EntryPathKind,
    FireConfig, PostEntryBehavior, RetreatConfig, RotationDirection, SpawnGroupConfig, StageConfig,
    WaveClearDirective, WaveConfig,
};
use gyrewave::stage::{StageEvent, StageMachine, StageProvider, StaticStageProvider};
use gyrewave::weapons::EnemyFireEvent;
use gyrewave::{ChoreographyPlugin, Player};

#[derive(Parser)]
#[command(about = "Headless run of one choreographed stage")]
struct Args {
    /// Stage number to load
    #[arg(long, default_value_t = 1)]
    stage: u32,
    /// Safety cap on simulated ticks
    #[arg(long, default_value_t = 50_000)]
    max_ticks: u32,
}

fn main() {
    let args = Args::parse();
    let _guard = utils::logs::setup_logging(Some("demo".into())).expect("logging setup failed");

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    // 60 Hz fixed tick, decoupled from wall-clock time.
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_micros(
        16_667,
    )));
    app.insert_resource(StageProvider::new(StaticStageProvider::new(vec![
        demo_stage(),
    ])));
    app.add_plugins(ChoreographyPlugin {
        initial_stage: Some(args.stage),
    });
    app.add_systems(Update, (announce_events, auto_gunner));

    app.world_mut()
        .spawn((Player, Transform::from_xyz(0.0, -320.0, 0.0)));

    for tick in 0..args.max_ticks {
        app.update();
        if app.world().resource::<StageMachine>().is_stage_completed() {
            info!("stage completed after {} ticks", tick + 1);
            return;
        }
    }
    warn!("tick cap reached before stage completion");
}

/// Prints lifecycle notifications and keeps a running shot count.
fn announce_events(
    mut stage_events: EventReader<StageEvent>,
    mut fire_events: EventReader<EnemyFireEvent>,
    mut shots: Local<u32>,
) {
    *shots += fire_events.read().count() as u32;
    for event in stage_events.read() {
        info!(
            "[stage {} wave {}] {:?} ({} enemy shots so far)",
            event.stage, event.wave, event.kind, *shots
        );
    }
}

/// Stand-in for the collision collaborator: pops one enemy on a fixed
/// cadence, and the boss once nothing else is left.
fn auto_gunner(
    time: Res<Time>,
    mut cooldown: Local<f32>,
    mut score: Local<u32>,
    mut destroyer: EnemyDestroyer,
    targets: Query<Entity, (With<Enemy>, Without<Boss>)>,
    boss: Query<Entity, With<Boss>>,
) {
    *cooldown += time.delta_secs();
    if *cooldown < 0.4 {
        return;
    }
    *cooldown = 0.0;

    if let Some(target) = targets.iter().next() {
        *score += destroyer.destroy_enemy(target);
        info!("gunner: enemy down, score {}", *score);
    } else if let Some(target) = boss.iter().next() {
        *score += destroyer.destroy_enemy(target);
        info!("gunner: BOSS down, score {}", *score);
    }
}

/// A stage exercising every entry path and attack kind.
fn demo_stage() -> StageConfig {
    StageConfig {
        number: 1,
        start_delay: 3.5,
        waves: vec![
            WaveConfig {
                groups: vec![
                    SpawnGroupConfig {
                        enemy_type: "drone".into(),
                        count: 6,
                        spawn_delay: 0.0,
                        spawn_interval: 0.35,
                        entry: EntryPathConfig {
                            kind: EntryPathKind::Spiral,
                            duration: 2.2,
                            spiral_turns: 1.5,
                            rotation: RotationDirection::Clockwise,
                            ..Default::default()
                        },
                        behavior: BehaviorConfig::default(),
                        attack: AttackConfig {
                            kind: AttackKind::SingleRush,
                            ..Default::default()
                        },
                        fire: Some(FireConfig::default()),
                        retreat: RetreatConfig::default(),
                        health: 10.0,
                        score: 100,
                    },
                    SpawnGroupConfig {
                        enemy_type: "raider".into(),
                        count: 4,
                        spawn_delay: 1.5,
                        spawn_interval: 0.5,
                        entry: EntryPathConfig {
                            kind: EntryPathKind::Arc,
                            duration: 1.8,
                            rotation: RotationDirection::CounterClockwise,
                            ..Default::default()
                        },
                        behavior: BehaviorConfig {
                            post_entry: PostEntryBehavior::Hover,
                            ..Default::default()
                        },
                        attack: AttackConfig {
                            kind: AttackKind::PairedRush,
                            ..Default::default()
                        },
                        fire: Some(FireConfig {
                            burst: 3,
                            spread_angle: 0.35,
                            ..Default::default()
                        }),
                        retreat: RetreatConfig::default(),
                        health: 14.0,
                        score: 150,
                    },
                ],
                on_clear: WaveClearDirective::NextWave { delay: 2.0 },
                timeout: Some(90.0),
            },
            WaveConfig {
                groups: vec![
                    SpawnGroupConfig {
                        enemy_type: "lancer".into(),
                        count: 5,
                        spawn_delay: 0.0,
                        spawn_interval: 0.4,
                        entry: EntryPathConfig {
                            kind: EntryPathKind::Loop,
                            duration: 2.0,
                            curve_intensity: 1.2,
                            ..Default::default()
                        },
                        behavior: BehaviorConfig {
                            max_attacks: 4,
                            ..Default::default()
                        },
                        attack: AttackConfig {
                            kind: AttackKind::LoopbackRush,
                            ..Default::default()
                        },
                        fire: Some(FireConfig::default()),
                        retreat: RetreatConfig::default(),
                        health: 12.0,
                        score: 180,
                    },
                    SpawnGroupConfig {
                        enemy_type: "kamikaze".into(),
                        count: 3,
                        spawn_delay: 2.0,
                        spawn_interval: 0.8,
                        entry: EntryPathConfig {
                            kind: EntryPathKind::Straight,
                            duration: 1.2,
                            ..Default::default()
                        },
                        behavior: BehaviorConfig {
                            post_entry: PostEntryBehavior::Attack,
                            orbit_duration: 1.0,
                            max_attacks: 1,
                            ..Default::default()
                        },
                        attack: AttackConfig {
                            kind: AttackKind::SuicideDive,
                            rush_speed: 340.0,
                            ..Default::default()
                        },
                        fire: None,
                        retreat: RetreatConfig::default(),
                        health: 6.0,
                        score: 250,
                    },
                ],
                on_clear: WaveClearDirective::TriggerBoss,
                timeout: Some(90.0),
            },
        ],
        boss: Some(BossConfig {
            enemy_type: "dreadnought".into(),
            spawn_delay: 2.5,
            health: 400.0,
            score: 5000,
            entry: EntryPathConfig {
                kind: EntryPathKind::Spiral,
                duration: 3.0,
                spiral_turns: 1.0,
                ..Default::default()
            },
            behavior: BehaviorConfig {
                post_entry: PostEntryBehavior::Hover,
                orbit_speed: 0.3,
                attack_cooldown: 4.0,
                max_attacks: 99,
                ..Default::default()
            },
            attack: AttackConfig {
                kind: AttackKind::SingleRush,
                rush_speed: 200.0,
                ..Default::default()
            },
            fire: Some(FireConfig {
                interval: 1.6,
                burst: 5,
                spread_angle: 0.8,
                projectile_speed: 260.0,
            }),
            retreat: RetreatConfig::default(),
        }),
        difficulty: Default::default(),
    }
}
