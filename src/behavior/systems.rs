//! Behavior FSM tick: update the current phase, decide the next one, run
//! exit/enter hooks on a change.

use bevy::prelude::*;

use utils::math::{angle_of, approach, polar};

use crate::attack::AttackPattern;
use crate::core::ArenaLayout;
use crate::enemy::Enemy;
use crate::path::EntryPath;
use crate::player::Player;
use crate::stage::config::{AttackKind, PostEntryBehavior};

use super::{BehaviorPhase, BehaviorState, RetreatTimer};

/// Hover ring sits at this fraction of the orbit radius.
const HOVER_RADIUS_FACTOR: f32 = 0.4;
const HOVER_SPEED_FACTOR: f32 = 0.5;
/// How fast an enemy eases back onto its ring after an attack, px/s.
const RING_RETURN_SPEED: f32 = 220.0;

pub fn behavior_system(
    time: Res<Time>,
    arena: Res<ArenaLayout>,
    mut query: Query<
        (
            &mut BehaviorState,
            &mut Transform,
            &EntryPath,
            &mut AttackPattern,
            &RetreatTimer,
        ),
        With<Enemy>,
    >,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
) {
    let dt = time.delta_secs();
    let player = player_query
        .iter()
        .next()
        .map(|t| t.translation.truncate());

    // Partners pulled into a paired rush this tick; applied after the main
    // pass to avoid aliasing the query mid-iteration.
    let mut paired: Vec<(Entity, Vec2)> = Vec::new();

    for (mut state, mut transform, entry, mut pattern, retreat) in query.iter_mut() {
        state.time_in_phase += dt;
        update_phase(&mut state, &mut transform, &arena, retreat, dt);

        if let Some(next) = next_phase(&state, entry.complete, &pattern, retreat) {
            transition(
                &mut state,
                &mut pattern,
                &transform,
                next,
                player,
                &arena,
                &mut paired,
            );
        }
    }

    for (partner, target) in paired {
        // The partner may be gone or busy by now; pull it in only if the
        // Orbiting→Attacking edge is actually open for it.
        let Ok((mut state, transform, _, mut pattern, _)) = query.get_mut(partner) else {
            continue;
        };
        if state.phase == BehaviorPhase::Orbiting && state.attack_budget_left() && !pattern.active {
            state.previous = state.phase;
            state.phase = BehaviorPhase::Attacking;
            state.time_in_phase = 0.0;
            let return_position = transform.translation.truncate();
            enter_attacking(&mut state, &mut pattern, target, return_position);
        }
    }
}

/// Per-phase update. Entering and Attacking own no motion here: the path and
/// attack systems move those entities.
fn update_phase(
    state: &mut BehaviorState,
    transform: &mut Transform,
    arena: &ArenaLayout,
    retreat: &RetreatTimer,
    dt: f32,
) {
    match state.phase {
        BehaviorPhase::Entering => {}
        BehaviorPhase::Attacking => {}

        BehaviorPhase::Orbiting => {
            state.cooldown_clock += dt;
            state.orbit_angle += state.orbit_direction * state.orbit_speed * dt;
            let position = transform.translation.truncate();
            let radius = approach(
                (position - arena.center).length(),
                arena.orbit_radius,
                RING_RETURN_SPEED * dt,
            );
            let next = arena.center + polar(radius, state.orbit_angle);
            transform.translation.x = next.x;
            transform.translation.y = next.y;
        }

        BehaviorPhase::Hovering => {
            state.orbit_angle +=
                state.orbit_direction * state.orbit_speed * HOVER_SPEED_FACTOR * dt;
            let position = transform.translation.truncate();
            let radius = approach(
                (position - arena.center).length(),
                arena.orbit_radius * HOVER_RADIUS_FACTOR,
                RING_RETURN_SPEED * dt,
            );
            let next = arena.center + polar(radius, state.orbit_angle);
            transform.translation.x = next.x;
            transform.translation.y = next.y;
        }

        BehaviorPhase::Retreating => {
            let position = transform.translation.truncate();
            let direction = match retreat.angle {
                Some(angle) => polar(1.0, angle),
                None => {
                    let outward = position - arena.center;
                    if outward.length_squared() > 1e-6 {
                        outward.normalize()
                    } else {
                        Vec2::Y
                    }
                }
            };
            let next = position + direction * retreat.speed * dt;
            transform.translation.x = next.x;
            transform.translation.y = next.y;
        }
    }
}

/// Pure next-phase decision. Exhaustive over the closed phase set.
pub(crate) fn next_phase(
    state: &BehaviorState,
    entry_complete: bool,
    pattern: &AttackPattern,
    retreat: &RetreatTimer,
) -> Option<BehaviorPhase> {
    match state.phase {
        BehaviorPhase::Entering => entry_complete.then(|| match state.post_entry {
            PostEntryBehavior::Orbit => BehaviorPhase::Orbiting,
            PostEntryBehavior::Attack => BehaviorPhase::Attacking,
            PostEntryBehavior::Hover => BehaviorPhase::Hovering,
        }),

        BehaviorPhase::Orbiting => (state.time_in_phase >= state.orbit_duration
            && state.cooldown_clock >= state.attack_cooldown
            && state.attack_budget_left())
        .then_some(BehaviorPhase::Attacking),

        BehaviorPhase::Attacking => {
            if pattern.complete {
                Some(BehaviorPhase::Orbiting)
            } else if pattern.timed_out() || state.time_in_phase >= retreat.timeout {
                Some(BehaviorPhase::Retreating)
            } else {
                None
            }
        }

        BehaviorPhase::Hovering => {
            (state.time_in_phase >= state.hover_duration).then_some(BehaviorPhase::Orbiting)
        }

        BehaviorPhase::Retreating => None,
    }
}

fn transition(
    state: &mut BehaviorState,
    pattern: &mut AttackPattern,
    transform: &Transform,
    next: BehaviorPhase,
    player: Option<Vec2>,
    arena: &ArenaLayout,
    paired: &mut Vec<(Entity, Vec2)>,
) {
    // Exit hook.
    if state.phase == BehaviorPhase::Attacking {
        pattern.deactivate();
    }

    state.previous = state.phase;
    state.phase = next;
    state.time_in_phase = 0.0;

    // Enter hook.
    match next {
        BehaviorPhase::Orbiting => {
            // Re-enter the ring at the angle the enemy actually is, so the
            // return from an attack stays continuous.
            state.orbit_angle = angle_of(transform.translation.truncate() - arena.center);
        }
        BehaviorPhase::Attacking => {
            let return_position = transform.translation.truncate();
            let target = player.unwrap_or(arena.center);
            enter_attacking(state, pattern, target, return_position);
            if pattern.kind == AttackKind::PairedRush {
                if let Some(partner) = pattern.partner {
                    paired.push((partner, target));
                }
            }
        }
        _ => {}
    }
}

fn enter_attacking(
    state: &mut BehaviorState,
    pattern: &mut AttackPattern,
    target: Vec2,
    return_position: Vec2,
) {
    state.attacks_made += 1;
    state.cooldown_clock = 0.0;
    pattern.activate(target, return_position);
}
