//! Scenario tests driving the full choreography stack through a headless App
//! with a deterministic manual clock.

use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use gyrewave::behavior::{BehaviorPhase, BehaviorState};
use gyrewave::enemy::{Boss, Enemy, EnemyDestroyer};
use gyrewave::stage::config::{
    AttackConfig, BehaviorConfig, BossConfig, EntryPathConfig, RetreatConfig, SpawnGroupConfig,
    StageConfig, WaveClearDirective, WaveConfig,
};
use gyrewave::stage::{
    StageControl, StageEvent, StageEventKind, StageMachine, StagePhase, StageProvider,
    StaticStageProvider,
};
use gyrewave::{ChoreoEnabled, ChoreographyPlugin, Player};

/// 100 ms per tick keeps the arithmetic in the assertions simple.
const DT: f32 = 0.1;

fn group(count: u32) -> SpawnGroupConfig {
    SpawnGroupConfig {
        enemy_type: "drone".into(),
        count,
        spawn_delay: 0.0,
        spawn_interval: 0.0,
        entry: EntryPathConfig {
            duration: 1.0,
            ..Default::default()
        },
        behavior: BehaviorConfig::default(),
        attack: AttackConfig::default(),
        fire: None,
        retreat: RetreatConfig::default(),
        health: 10.0,
        score: 100,
    }
}

fn wave(groups: Vec<SpawnGroupConfig>, on_clear: WaveClearDirective) -> WaveConfig {
    WaveConfig {
        groups,
        on_clear,
        timeout: None,
    }
}

fn boss(spawn_delay: f32) -> BossConfig {
    BossConfig {
        enemy_type: "dreadnought".into(),
        spawn_delay,
        health: 400.0,
        score: 5000,
        entry: EntryPathConfig {
            duration: 1.0,
            ..Default::default()
        },
        behavior: BehaviorConfig::default(),
        attack: AttackConfig::default(),
        fire: None,
        retreat: RetreatConfig::default(),
    }
}

fn stage(number: u32, waves: Vec<WaveConfig>, boss_config: Option<BossConfig>) -> StageConfig {
    StageConfig {
        number,
        start_delay: 0.5,
        waves,
        boss: boss_config,
        difficulty: Default::default(),
    }
}

fn test_app(stages: Vec<StageConfig>) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
        DT,
    )));
    app.insert_resource(StageProvider::new(StaticStageProvider::new(stages)));
    app.add_plugins(ChoreographyPlugin::default());
    app.world_mut()
        .spawn((Player, Transform::from_xyz(0.0, -320.0, 0.0)));
    // Flush startup and establish the time baseline before assertions.
    app.update();
    app
}

fn load_stage(app: &mut App, number: u32) -> Result<(), gyrewave::stage::StageLoadError> {
    app.world_mut()
        .run_system_once(move |mut control: StageControl| control.load_stage(number))
        .unwrap()
}

fn phase(app: &App) -> StagePhase {
    app.world().resource::<StageMachine>().phase()
}

fn live_enemies(app: &mut App) -> Vec<Entity> {
    let world = app.world_mut();
    let mut query = world.query_filtered::<Entity, (With<Enemy>, Without<Boss>)>();
    query.iter(world).collect()
}

fn boss_entities(app: &mut App) -> Vec<Entity> {
    let world = app.world_mut();
    let mut query = world.query_filtered::<Entity, With<Boss>>();
    query.iter(world).collect()
}

fn destroy(app: &mut App, entity: Entity) -> u32 {
    app.world_mut()
        .run_system_once(move |mut destroyer: EnemyDestroyer| destroyer.destroy_enemy(entity))
        .unwrap()
}

/// Tick until `predicate` holds, failing the test after `max_ticks`.
fn run_until(app: &mut App, max_ticks: u32, predicate: impl Fn(&mut App) -> bool) -> u32 {
    for tick in 0..max_ticks {
        if predicate(app) {
            return tick;
        }
        app.update();
    }
    panic!("condition not reached within {} ticks", max_ticks);
}

fn drain_stage_events(app: &mut App) -> Vec<StageEventKind> {
    app.world_mut()
        .resource_mut::<Events<StageEvent>>()
        .drain()
        .map(|e| e.kind)
        .collect()
}

#[test]
fn test_scenario_a_three_enemies_then_completion() {
    let mut app = test_app(vec![stage(
        1,
        vec![wave(vec![group(3)], WaveClearDirective::default())],
        None,
    )]);
    load_stage(&mut app, 1).unwrap();

    // All three spawn once the level-start delay elapses...
    run_until(&mut app, 30, |app| live_enemies(app).len() == 3);
    // ...and never a fourth, however long we wait.
    for _ in 0..20 {
        app.update();
    }
    let enemies = live_enemies(&mut app);
    assert_eq!(enemies.len(), 3);
    assert!(!app.world().resource::<StageMachine>().is_stage_completed());

    let mut points = 0;
    for enemy in enemies {
        points += destroy(&mut app, enemy);
    }
    assert_eq!(points, 300);

    // Completion lands on the ticks right after the arena empties.
    run_until(&mut app, 5, |app| {
        app.world().resource::<StageMachine>().is_stage_completed()
    });
    assert_eq!(phase(&app), StagePhase::StageCompleted);
}

#[test]
fn test_scenario_b_boss_spawn_delay_then_single_spawn() {
    let mut app = test_app(vec![stage(
        1,
        vec![wave(vec![group(1)], WaveClearDirective::TriggerBoss)],
        Some(boss(2.0)),
    )]);
    load_stage(&mut app, 1).unwrap();

    run_until(&mut app, 30, |app| live_enemies(app).len() == 1);
    let enemy = live_enemies(&mut app)[0];
    destroy(&mut app, enemy);

    run_until(&mut app, 10, |app| phase(app) == StagePhase::BossSpawning);

    // The buildup holds for at least the configured two seconds of ticks.
    let mut spawning_ticks = 0;
    while phase(&app) == StagePhase::BossSpawning {
        assert!(boss_entities(&mut app).is_empty());
        app.update();
        spawning_ticks += 1;
        assert!(spawning_ticks < 100, "boss never spawned");
    }
    assert!(spawning_ticks as f32 * DT >= 2.0 - DT / 2.0);
    assert_eq!(phase(&app), StagePhase::BossActive);

    // The spawn action fired exactly once.
    assert_eq!(boss_entities(&mut app).len(), 1);
    for _ in 0..10 {
        app.update();
    }
    assert_eq!(boss_entities(&mut app).len(), 1);

    // Destroying the boss raises the defeat notification and completes the
    // stage; the wave-clear polling path is never involved.
    let boss_entity = boss_entities(&mut app)[0];
    let points = destroy(&mut app, boss_entity);
    assert_eq!(points, 5000);
    run_until(&mut app, 5, |app| {
        app.world().resource::<StageMachine>().is_stage_completed()
    });
}

#[test]
fn test_scenario_c_unknown_stage_leaves_state_untouched() {
    let mut app = test_app(vec![stage(
        1,
        vec![wave(vec![group(2)], WaveClearDirective::default())],
        None,
    )]);
    load_stage(&mut app, 1).unwrap();
    run_until(&mut app, 30, |app| live_enemies(app).len() == 2);

    let phase_before = phase(&app);
    let enemies_before = live_enemies(&mut app).len();

    assert!(load_stage(&mut app, 42).is_err());

    assert_eq!(phase(&app), phase_before);
    assert_eq!(
        app.world().resource::<StageMachine>().stage_number(),
        1,
        "failed load must not adopt the new stage number"
    );
    assert_eq!(live_enemies(&mut app).len(), enemies_before);
}

#[test]
fn test_lifecycle_event_order_across_two_waves_and_boss() {
    let mut app = test_app(vec![stage(
        1,
        vec![
            wave(
                vec![group(1)],
                WaveClearDirective::NextWave { delay: 0.5 },
            ),
            wave(vec![group(1)], WaveClearDirective::TriggerBoss),
        ],
        Some(boss(0.5)),
    )]);
    load_stage(&mut app, 1).unwrap();

    let mut seen = Vec::new();
    for _ in 0..400 {
        app.update();
        seen.extend(drain_stage_events(&mut app));
        if let Some(enemy) = live_enemies(&mut app).first().copied() {
            destroy(&mut app, enemy);
        }
        if let Some(boss_entity) = boss_entities(&mut app).first().copied() {
            destroy(&mut app, boss_entity);
        }
        if app.world().resource::<StageMachine>().is_stage_completed() {
            seen.extend(drain_stage_events(&mut app));
            break;
        }
    }

    use StageEventKind::*;
    assert_eq!(
        seen,
        vec![
            WaveStarted,
            WaveCompleted,
            WaveStarted,
            WaveCompleted,
            BossSpawnRequested,
            BossSpawned,
            StageCompleted,
        ]
    );
}

#[test]
fn test_inter_wave_delay_recurs_through_pre_wave() {
    let mut app = test_app(vec![stage(
        1,
        vec![
            wave(
                vec![group(1)],
                WaveClearDirective::NextWave { delay: 1.0 },
            ),
            wave(vec![group(1)], WaveClearDirective::default()),
        ],
        None,
    )]);
    load_stage(&mut app, 1).unwrap();

    run_until(&mut app, 30, |app| live_enemies(app).len() == 1);
    let enemy = live_enemies(&mut app)[0];
    destroy(&mut app, enemy);

    run_until(&mut app, 5, |app| phase(app) == StagePhase::PreWave);

    // The inter-wave delay keeps us in PreWave for about a second of ticks.
    let mut pre_wave_ticks = 0;
    while phase(&app) == StagePhase::PreWave {
        app.update();
        pre_wave_ticks += 1;
        assert!(pre_wave_ticks < 50, "second wave never started");
    }
    assert!(pre_wave_ticks as f32 * DT >= 1.0 - DT / 2.0);
    assert_eq!(phase(&app), StagePhase::WaveInProgress);
}

#[test]
fn test_entry_path_hands_off_to_orbiting() {
    let mut app = test_app(vec![stage(
        1,
        vec![wave(vec![group(1)], WaveClearDirective::default())],
        None,
    )]);
    load_stage(&mut app, 1).unwrap();

    run_until(&mut app, 30, |app| live_enemies(app).len() == 1);
    let enemy = live_enemies(&mut app)[0];

    let entering = app.world().entity(enemy).get::<BehaviorState>().unwrap();
    assert_eq!(entering.phase, BehaviorPhase::Entering);

    // Entry duration is 1.0s; the FSM must leave Entering right after.
    run_until(&mut app, 20, |app| {
        app.world()
            .entity(enemy)
            .get::<BehaviorState>()
            .is_some_and(|b| b.phase == BehaviorPhase::Orbiting)
    });
}

#[test]
fn test_cancellation_halts_the_tick_pipeline() {
    let mut app = test_app(vec![stage(
        1,
        vec![wave(vec![group(1)], WaveClearDirective::default())],
        None,
    )]);
    load_stage(&mut app, 1).unwrap();

    app.world_mut().resource_mut::<ChoreoEnabled>().0 = false;
    for _ in 0..30 {
        app.update();
    }
    // Nothing progressed: no spawns, stage still counting down.
    assert!(live_enemies(&mut app).is_empty());
    assert_eq!(phase(&app), StagePhase::PreWave);

    // Re-enabling resumes cleanly from consistent state.
    app.world_mut().resource_mut::<ChoreoEnabled>().0 = true;
    run_until(&mut app, 30, |app| live_enemies(app).len() == 1);
}
