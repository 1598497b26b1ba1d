//! Enemy materialization: spawn directives become fully-configured entities.

use bevy::prelude::*;
use std::f32::consts::TAU;

use utils::math::polar;

use crate::attack::AttackPattern;
use crate::behavior::{BehaviorState, RetreatTimer};
use crate::core::ArenaLayout;
use crate::path::{EntryPath, ScaleAnimation};
use crate::stage::config::{AttackKind, BossConfig, DifficultyScaling, SpawnGroupConfig};
use crate::stage::state::{StageMachine, StagePhase};
use crate::waves::{WaveEnemy, WaveManager};
use crate::weapons::FirePattern;

use super::{Boss, Enemy, Health, ScoreValue};

/// Scale enemies warp in from.
const SPAWN_SCALE: f32 = 0.1;
/// Slot angle the boss enters toward (top of the ring).
const BOSS_SLOT_ANGLE: f32 = std::f32::consts::FRAC_PI_2;

/// Spawn angle for index `i` of `count`: even partition of the ring, purely a
/// function of position-in-group so layouts reproduce exactly.
pub fn spawn_slot_angle(index: u32, count: u32) -> f32 {
    index as f32 * TAU / count.max(1) as f32
}

/// Cross-tick bookkeeping for PairedRush partner links.
#[derive(Default)]
pub struct PairScratch {
    /// Last unpaired spawn: (wave, group, spawn index, entity).
    pending: Option<(u32, u32, u32, Entity)>,
    /// Links to apply once both entities actually exist in the world.
    links: Vec<(Entity, Entity)>,
}

/// Drains this tick's spawn directives from the wave scheduler and
/// materializes one enemy per directive.
pub fn wave_spawning_system(
    mut commands: Commands,
    machine: Res<StageMachine>,
    mut waves: ResMut<WaveManager>,
    arena: Res<ArenaLayout>,
    mut patterns: Query<&mut AttackPattern>,
    mut pairs: Local<PairScratch>,
) {
    // Links deferred from the previous tick; both entities are in the world
    // now. A dead partner just drops the link.
    for (entity, partner) in pairs.links.drain(..) {
        if let Ok(mut pattern) = patterns.get_mut(entity) {
            pattern.partner = Some(partner);
        }
    }

    if machine.phase() != StagePhase::WaveInProgress {
        return;
    }

    while let Some(group) = waves.should_spawn().cloned() {
        let wave = waves.current_wave_index();
        let group_index = waves.current_group_index();
        let index = waves.spawn_index();
        let entity =
            spawn_group_enemy(&mut commands, &group, index, wave, waves.difficulty(), &arena);
        debug!(
            "spawned {} {}/{} (wave {} group {})",
            group.enemy_type,
            index + 1,
            group.count,
            wave,
            group_index
        );

        if group.attack.kind == AttackKind::PairedRush {
            match pairs.pending.take() {
                Some((w, g, i, prev)) if w == wave && g == group_index && i + 1 == index => {
                    pairs.links.push((prev, entity));
                    pairs.links.push((entity, prev));
                }
                _ => pairs.pending = Some((wave, group_index, index, entity)),
            }
        }

        waves.mark_enemy_spawned();
    }
}

fn spawn_group_enemy(
    commands: &mut Commands,
    group: &SpawnGroupConfig,
    index: u32,
    wave: u32,
    difficulty: DifficultyScaling,
    arena: &ArenaLayout,
) -> Entity {
    let slot_angle = spawn_slot_angle(index, group.count);
    let spawn_radius = group.entry.start_radius.unwrap_or(arena.spawn_radius);
    let start = arena.center + polar(spawn_radius, slot_angle);
    let end = arena.center + polar(arena.orbit_radius, slot_angle);

    let entity = commands
        .spawn((
            Enemy {
                enemy_type: group.enemy_type.clone(),
            },
            WaveEnemy { wave },
            Transform::from_translation(start.extend(0.0)).with_scale(Vec3::splat(SPAWN_SCALE)),
            EntryPath::new(&group.entry, start, end, arena.center),
            ScaleAnimation::warp_in(group.entry.duration, group.entry.easing),
            BehaviorState::from_config(&group.behavior, slot_angle, difficulty.speed),
            AttackPattern::from_config(&group.attack, difficulty.speed),
            RetreatTimer::from_config(&group.retreat, difficulty.speed),
            Health::new(group.health * difficulty.health),
            ScoreValue((group.score as f32 * difficulty.score).round() as u32),
        ))
        .id();

    if let Some(fire) = &group.fire {
        commands
            .entity(entity)
            .insert(FirePattern::from_config(fire));
    }

    entity
}

/// Boss materialization: the same record set, plus the `Boss` marker and no
/// wave tag (the boss never counts toward wave completion).
pub fn spawn_boss(
    commands: &mut Commands,
    config: &BossConfig,
    difficulty: DifficultyScaling,
    arena: &ArenaLayout,
) -> Entity {
    let spawn_radius = config.entry.start_radius.unwrap_or(arena.spawn_radius);
    let start = arena.center + polar(spawn_radius, BOSS_SLOT_ANGLE);
    let end = arena.center + polar(arena.orbit_radius, BOSS_SLOT_ANGLE);

    let entity = commands
        .spawn((
            Enemy {
                enemy_type: config.enemy_type.clone(),
            },
            Boss,
            Transform::from_translation(start.extend(0.0)).with_scale(Vec3::splat(SPAWN_SCALE)),
            EntryPath::new(&config.entry, start, end, arena.center),
            ScaleAnimation::warp_in(config.entry.duration, config.entry.easing),
            BehaviorState::from_config(&config.behavior, BOSS_SLOT_ANGLE, difficulty.speed),
            AttackPattern::from_config(&config.attack, difficulty.speed),
            RetreatTimer::from_config(&config.retreat, difficulty.speed),
            Health::new(config.health * difficulty.health),
            ScoreValue((config.score as f32 * difficulty.score).round() as u32),
        ))
        .id();

    if let Some(fire) = &config.fire {
        commands
            .entity(entity)
            .insert(FirePattern::from_config(fire));
    }

    entity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_angles_partition_the_ring() {
        for count in 2..=8u32 {
            let mut positions: Vec<Vec2> = Vec::new();
            for index in 0..count {
                let angle = spawn_slot_angle(index, count);
                assert!((angle - index as f32 * TAU / count as f32).abs() < 1e-6);
                positions.push(polar(460.0, angle));
            }
            // No two indices share a spawn-ring position.
            for i in 0..positions.len() {
                for j in (i + 1)..positions.len() {
                    assert!(
                        (positions[i] - positions[j]).length() > 1.0,
                        "count {} indices {} and {} collide",
                        count,
                        i,
                        j
                    );
                }
            }
        }
    }

    #[test]
    fn test_single_spawn_sits_at_angle_zero() {
        assert_eq!(spawn_slot_angle(0, 1), 0.0);
    }
}
