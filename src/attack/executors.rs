//! Attack executors: one motion step per tick per pattern kind.

use bevy::prelude::*;

use crate::core::ArenaLayout;
use crate::stage::config::AttackKind;

use super::AttackPattern;

/// Rushes complete within this radius of their fixed target.
pub const RUSH_COMPLETE_RADIUS: f32 = 50.0;
/// Suicide dives complete at point-blank range; the collision collaborator is
/// expected to connect before this matters.
pub const DIVE_COMPLETE_RADIUS: f32 = 20.0;
/// Loopback approach threshold. Tuned by observation together with the rush
/// speeds; not derived from the other radii.
pub const LOOPBACK_APPROACH_RADIUS: f32 = 36.0;

/// Advance one pattern by one tick. Returns true when the pattern finished.
pub fn execute(
    pattern: &mut AttackPattern,
    position: &mut Vec2,
    dt: f32,
    arena: &ArenaLayout,
    player: Option<Vec2>,
) -> bool {
    match pattern.kind {
        AttackKind::SingleRush | AttackKind::PairedRush => rush(pattern, position, dt),
        AttackKind::LoopbackRush => loopback(pattern, position, dt, arena),
        AttackKind::SuicideDive => dive(pattern, position, dt, player),
    }
}

/// Move `position` toward `target` by at most `step`, returning the distance
/// still remaining afterwards.
fn step_toward(position: &mut Vec2, target: Vec2, step: f32) -> f32 {
    let to_target = target - *position;
    let distance = to_target.length();
    if distance <= step {
        *position = target;
        0.0
    } else {
        *position += to_target / distance * step;
        distance - step
    }
}

/// Straight-line pursuit of a fixed target.
fn rush(pattern: &mut AttackPattern, position: &mut Vec2, dt: f32) -> bool {
    step_toward(position, pattern.target, pattern.rush_speed * dt) <= RUSH_COMPLETE_RADIUS
}

/// Two-phase dive through the formation center.
///
/// Inbound: head for the center, remembering the travel direction each tick
/// (the step is capped so the dive cannot jump across the center). Once within
/// the approach threshold the direction freezes and the outbound leg continues
/// along it, through the center and out the far side, until the enemy is back
/// outside the orbit ring.
fn loopback(pattern: &mut AttackPattern, position: &mut Vec2, dt: f32, arena: &ArenaLayout) -> bool {
    if !pattern.passed_center {
        let to_center = arena.center - *position;
        let distance = to_center.length();
        if distance > LOOPBACK_APPROACH_RADIUS {
            let direction = to_center / distance;
            pattern.outward_dir = Some(direction);
            *position += direction * (pattern.rush_speed * dt).min(distance);
            return false;
        }
        pattern.passed_center = true;
    }
    let direction = pattern.outward_dir.unwrap_or(Vec2::NEG_Y);
    *position += direction * pattern.rush_speed * dt;
    (*position - arena.center).length_squared() > arena.orbit_radius * arena.orbit_radius
}

/// Homing dive: re-targets the live player position every tick.
fn dive(pattern: &mut AttackPattern, position: &mut Vec2, dt: f32, player: Option<Vec2>) -> bool {
    let Some(player) = player else {
        // Nobody to dive at; end the attack instead of drifting forever.
        return true;
    };
    pattern.target = player;
    step_toward(position, player, pattern.rush_speed * dt) <= DIVE_COMPLETE_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::config::AttackConfig;

    const DT: f32 = 1.0 / 60.0;

    fn arena() -> ArenaLayout {
        ArenaLayout {
            center: Vec2::ZERO,
            orbit_radius: 180.0,
            spawn_radius: 460.0,
        }
    }

    fn pattern(kind: AttackKind) -> AttackPattern {
        let mut p = AttackPattern::from_config(
            &AttackConfig {
                kind,
                rush_speed: 260.0,
                return_speed: 160.0,
                duration: 5.0,
            },
            1.0,
        );
        p.activate(Vec2::new(0.0, -240.0), Vec2::new(180.0, 0.0));
        p
    }

    #[test]
    fn test_rush_reaches_target_radius() {
        let mut p = pattern(AttackKind::SingleRush);
        let mut pos = Vec2::new(180.0, 120.0);
        let mut done = false;
        for _ in 0..2000 {
            if execute(&mut p, &mut pos, DT, &arena(), None) {
                done = true;
                break;
            }
        }
        assert!(done);
        assert!((pos - p.target).length() <= RUSH_COMPLETE_RADIUS + 1e-3);
    }

    #[test]
    fn test_loopback_dives_in_then_straight_out() {
        let mut p = pattern(AttackKind::LoopbackRush);
        let mut pos = Vec2::new(0.0, 300.0);
        let arena = arena();

        let mut last_distance = pos.length();
        let mut crossed = false;
        let mut done = false;
        for _ in 0..4000 {
            done = execute(&mut p, &mut pos, DT, &arena, None);
            let distance = (pos - arena.center).length();
            if !crossed && p.passed_center {
                crossed = true;
                assert!(distance <= LOOPBACK_APPROACH_RADIUS + 1e-3);
            }
            if !crossed {
                // Inbound leg: strictly closing on the center.
                assert!(distance < last_distance);
            }
            last_distance = distance;
            if done {
                break;
            }
        }
        assert!(crossed);
        assert!(done);
        assert!(last_distance > arena.orbit_radius);
    }

    #[test]
    fn test_loopback_never_oscillates_near_center() {
        let mut p = pattern(AttackKind::LoopbackRush);
        let mut pos = Vec2::new(250.0, 40.0);
        let arena = arena();

        let mut distances = Vec::new();
        for _ in 0..4000 {
            let done = execute(&mut p, &mut pos, DT, &arena, None);
            distances.push((pos - arena.center).length());
            if done {
                break;
            }
        }
        // Distance profile must be one descent followed by one ascent: a
        // single sign change in its differences.
        let mut flips = 0;
        let mut falling = true;
        for pair in distances.windows(2) {
            let rising = pair[1] > pair[0];
            if rising == falling {
                falling = !falling;
                flips += 1;
            }
        }
        assert!(flips <= 1, "distance profile changed direction {} times", flips);
    }

    #[test]
    fn test_dive_tracks_moving_player() {
        let mut p = pattern(AttackKind::SuicideDive);
        let mut pos = Vec2::new(0.0, 200.0);
        let mut player = Vec2::new(0.0, -240.0);
        let mut done = false;
        for _ in 0..4000 {
            player.x += 40.0 * DT; // player strafing
            if execute(&mut p, &mut pos, DT, &arena(), Some(player)) {
                done = true;
                break;
            }
        }
        assert!(done);
        assert!((pos - player).length() <= DIVE_COMPLETE_RADIUS + 1e-3);
        assert_eq!(p.target, player);
    }

    #[test]
    fn test_dive_without_player_finishes() {
        let mut p = pattern(AttackKind::SuicideDive);
        let mut pos = Vec2::new(0.0, 200.0);
        assert!(execute(&mut p, &mut pos, DT, &arena(), None));
    }
}
