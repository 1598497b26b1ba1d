//! Per-enemy behavior state machine.
//!
//! The phase set is closed and small, so dispatch is an exhaustive match over
//! an enum rather than any kind of runtime handler registration.

pub mod systems;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::stage::config::{BehaviorConfig, PostEntryBehavior, RetreatConfig};
use crate::system_set::ChoreoSystemSet;

/// Behavior FSM phase.
///
/// Legal edges: Entering→{Orbiting, Attacking, Hovering} (per post-entry
/// behavior); Orbiting↔Attacking (cooldown-gated); Attacking→Orbiting
/// (pattern completion) or →Retreating (timeout); Hovering→Orbiting.
/// Retreating is terminal here; removal is the host's bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum BehaviorPhase {
    #[default]
    Entering,
    Orbiting,
    Attacking,
    Retreating,
    Hovering,
}

/// Behavior FSM record for one enemy.
#[derive(Component, Debug, Clone, Reflect)]
pub struct BehaviorState {
    pub phase: BehaviorPhase,
    pub previous: BehaviorPhase,
    pub time_in_phase: f32,
    pub post_entry: PostEntryBehavior,
    /// Seconds of orbiting before the next attack may launch.
    pub orbit_duration: f32,
    /// Radians per second around the formation center.
    pub orbit_speed: f32,
    /// +1 counter-clockwise, -1 clockwise.
    pub orbit_direction: f32,
    /// Current (and initially, formation-slot) angle on the orbit ring.
    pub orbit_angle: f32,
    pub attack_cooldown: f32,
    pub cooldown_clock: f32,
    pub attacks_made: u32,
    pub max_attacks: u32,
    pub hover_duration: f32,
}

impl BehaviorState {
    pub fn from_config(config: &BehaviorConfig, slot_angle: f32, speed_scale: f32) -> Self {
        Self {
            phase: BehaviorPhase::Entering,
            previous: BehaviorPhase::Entering,
            time_in_phase: 0.0,
            post_entry: config.post_entry,
            orbit_duration: config.orbit_duration,
            orbit_speed: config.orbit_speed * speed_scale,
            orbit_direction: config.orbit_direction.signum(),
            orbit_angle: slot_angle,
            attack_cooldown: config.attack_cooldown,
            cooldown_clock: 0.0,
            attacks_made: 0,
            max_attacks: config.max_attacks,
            hover_duration: config.hover_duration,
        }
    }

    pub fn attack_budget_left(&self) -> bool {
        self.attacks_made < self.max_attacks
    }
}

/// Retreat record: the Attacking-phase timeout plus outward motion tuning.
#[derive(Component, Debug, Clone, Reflect)]
pub struct RetreatTimer {
    /// Seconds in Attacking after which the enemy gives up and retreats.
    pub timeout: f32,
    pub speed: f32,
    /// Fixed heading in radians; radially outward when absent.
    pub angle: Option<f32>,
}

impl RetreatTimer {
    pub fn from_config(config: &RetreatConfig, speed_scale: f32) -> Self {
        Self {
            timeout: config.timeout,
            speed: config.speed * speed_scale,
            angle: config.angle,
        }
    }
}

pub struct BehaviorPlugin;

impl Plugin for BehaviorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BehaviorPhase>();
        app.register_type::<BehaviorState>();
        app.register_type::<RetreatTimer>();
        app.add_systems(
            Update,
            systems::behavior_system.in_set(ChoreoSystemSet::Behavior),
        );
    }
}
