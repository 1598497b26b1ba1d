//! Stage configuration data contracts.
//!
//! These structs are what the stage data provider hands back. They carry
//! everything the spawner needs to materialize an enemy: entry path, behavior,
//! attack, fire and retreat configuration per spawn group.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use utils::easing::EasingKind;

use super::provider::StageLoadError;

/// Which parametric curve an enemy follows from spawn ring to formation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum EntryPathKind {
    #[default]
    Straight,
    Spiral,
    Arc,
    Loop,
}

/// Winding direction for spirals, arcs and orbiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum RotationDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Sign convention: counter-clockwise is positive (math convention).
    pub fn signum(self) -> f32 {
        match self {
            RotationDirection::Clockwise => -1.0,
            RotationDirection::CounterClockwise => 1.0,
        }
    }
}

/// What an enemy does the moment its entry path completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum PostEntryBehavior {
    #[default]
    Orbit,
    Attack,
    Hover,
}

/// Procedural attack motion kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum AttackKind {
    #[default]
    SingleRush,
    PairedRush,
    LoopbackRush,
    SuicideDive,
}

/// Entry path configuration for one spawn group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPathConfig {
    pub kind: EntryPathKind,
    /// Seconds from spawn ring to formation slot.
    pub duration: f32,
    /// Full revolutions a spiral makes on top of aligning with its slot angle.
    #[serde(default = "default_spiral_turns")]
    pub spiral_turns: f32,
    /// Radians swept by an arc entry.
    #[serde(default = "default_arc_angle")]
    pub arc_angle: f32,
    #[serde(default)]
    pub rotation: RotationDirection,
    /// Scales the loop path's perpendicular amplitude.
    #[serde(default = "default_curve_intensity")]
    pub curve_intensity: f32,
    /// Spawn-ring radius override; the arena default applies when absent.
    #[serde(default)]
    pub start_radius: Option<f32>,
    #[serde(default)]
    pub easing: EasingKind,
}

impl Default for EntryPathConfig {
    fn default() -> Self {
        Self {
            kind: EntryPathKind::Straight,
            duration: 2.0,
            spiral_turns: default_spiral_turns(),
            arc_angle: default_arc_angle(),
            rotation: RotationDirection::Clockwise,
            curve_intensity: default_curve_intensity(),
            start_radius: None,
            easing: EasingKind::EaseInOut,
        }
    }
}

/// Behavior FSM tuning for one spawn group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub post_entry: PostEntryBehavior,
    /// Seconds spent orbiting before the next attack may launch.
    pub orbit_duration: f32,
    /// Radians per second around the formation center.
    pub orbit_speed: f32,
    #[serde(default)]
    pub orbit_direction: RotationDirection,
    /// Minimum seconds between two attacks by the same enemy.
    pub attack_cooldown: f32,
    /// Total attacks an enemy may launch over its lifetime.
    pub max_attacks: u32,
    #[serde(default = "default_hover_duration")]
    pub hover_duration: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            post_entry: PostEntryBehavior::Orbit,
            orbit_duration: 3.0,
            orbit_speed: 0.6,
            orbit_direction: RotationDirection::Clockwise,
            attack_cooldown: 2.0,
            max_attacks: 3,
            hover_duration: default_hover_duration(),
        }
    }
}

/// Attack pattern configuration for one spawn group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackConfig {
    pub kind: AttackKind,
    /// Pixels per second while rushing.
    pub rush_speed: f32,
    /// Pixels per second on the way back to formation.
    pub return_speed: f32,
    /// Seconds before an unfinished attack times out into a retreat.
    pub duration: f32,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            kind: AttackKind::SingleRush,
            rush_speed: 260.0,
            return_speed: 160.0,
            duration: 5.0,
        }
    }
}

/// Projectile cadence for one spawn group. Absent = the group never fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireConfig {
    /// Seconds between bursts.
    pub interval: f32,
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// Radians the burst fans across (0 = all shots on the aim line).
    #[serde(default)]
    pub spread_angle: f32,
    pub projectile_speed: f32,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            interval: 2.5,
            burst: default_burst(),
            spread_angle: 0.0,
            projectile_speed: 220.0,
        }
    }
}

/// Retreat tuning: timeout that forces an over-long attack into a retreat,
/// plus the outward motion parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetreatConfig {
    /// Seconds in Attacking after which the enemy gives up and retreats.
    pub timeout: f32,
    /// Pixels per second while leaving the arena.
    pub speed: f32,
    /// Fixed retreat heading in radians; radially outward when absent.
    #[serde(default)]
    pub angle: Option<f32>,
}

impl Default for RetreatConfig {
    fn default() -> Self {
        Self {
            timeout: 6.0,
            speed: 320.0,
            angle: None,
        }
    }
}

/// A batch of same-typed enemies within a wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnGroupConfig {
    /// Enemy type name, resolved by the host's sprite/config collaborator.
    pub enemy_type: String,
    pub count: u32,
    /// Seconds before the group's first spawn.
    #[serde(default)]
    pub spawn_delay: f32,
    /// Seconds between subsequent spawns in the group.
    #[serde(default)]
    pub spawn_interval: f32,
    #[serde(default)]
    pub entry: EntryPathConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub attack: AttackConfig,
    #[serde(default)]
    pub fire: Option<FireConfig>,
    #[serde(default)]
    pub retreat: RetreatConfig,
    #[serde(default = "default_health")]
    pub health: f32,
    #[serde(default = "default_score")]
    pub score: u32,
}

/// What happens once a wave is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WaveClearDirective {
    /// Advance to the next wave after `delay` seconds of breathing room.
    NextWave { delay: f32 },
    /// Raise the boss flag instead of advancing.
    TriggerBoss,
}

impl Default for WaveClearDirective {
    fn default() -> Self {
        WaveClearDirective::NextWave { delay: 2.0 }
    }
}

/// An ordered list of spawn groups plus an on-clear directive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveConfig {
    pub groups: Vec<SpawnGroupConfig>,
    #[serde(default)]
    pub on_clear: WaveClearDirective,
    /// Forced-completion safety valve; never fires when absent.
    #[serde(default)]
    pub timeout: Option<f32>,
}

/// Boss encounter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossConfig {
    pub enemy_type: String,
    /// Seconds of buildup between the trigger and the actual spawn.
    pub spawn_delay: f32,
    pub health: f32,
    pub score: u32,
    #[serde(default)]
    pub entry: EntryPathConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub attack: AttackConfig,
    #[serde(default)]
    pub fire: Option<FireConfig>,
    #[serde(default)]
    pub retreat: RetreatConfig,
}

/// Per-stage difficulty multipliers, applied by the spawner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DifficultyScaling {
    pub health: f32,
    pub speed: f32,
    pub score: f32,
}

impl Default for DifficultyScaling {
    fn default() -> Self {
        Self {
            health: 1.0,
            speed: 1.0,
            score: 1.0,
        }
    }
}

/// The top-level level unit: ordered waves plus an optional boss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub number: u32,
    /// Seconds before the first wave may start spawning.
    #[serde(default = "default_start_delay")]
    pub start_delay: f32,
    pub waves: Vec<WaveConfig>,
    #[serde(default)]
    pub boss: Option<BossConfig>,
    #[serde(default)]
    pub difficulty: DifficultyScaling,
}

impl StageConfig {
    /// Reject configurations the scheduler cannot run. Called before any
    /// manager state is touched so a bad stage never half-loads.
    pub fn validate(&self) -> Result<(), StageLoadError> {
        if self.waves.is_empty() {
            return self.invalid("stage has no waves");
        }
        for (w, wave) in self.waves.iter().enumerate() {
            if wave.groups.is_empty() {
                return self.invalid(&format!("wave {} has no spawn groups", w));
            }
            if let Some(timeout) = wave.timeout {
                if timeout <= 0.0 {
                    return self.invalid(&format!("wave {} timeout must be positive", w));
                }
            }
            for (g, group) in wave.groups.iter().enumerate() {
                if group.count == 0 {
                    return self.invalid(&format!("wave {} group {} has count 0", w, g));
                }
                if group.entry.duration <= 0.0 {
                    return self.invalid(&format!(
                        "wave {} group {} entry duration must be positive",
                        w, g
                    ));
                }
                if group.enemy_type.is_empty() {
                    return self.invalid(&format!("wave {} group {} has no enemy type", w, g));
                }
            }
        }
        if let Some(boss) = &self.boss {
            if boss.enemy_type.is_empty() {
                return self.invalid("boss has no enemy type");
            }
            if boss.spawn_delay < 0.0 {
                return self.invalid("boss spawn delay must not be negative");
            }
            if boss.entry.duration <= 0.0 {
                return self.invalid("boss entry duration must be positive");
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> Result<(), StageLoadError> {
        Err(StageLoadError::InvalidConfig {
            number: self.number,
            reason: reason.to_string(),
        })
    }
}

fn default_start_delay() -> f32 {
    3.5
}

fn default_spiral_turns() -> f32 {
    1.5
}

fn default_arc_angle() -> f32 {
    std::f32::consts::PI
}

fn default_curve_intensity() -> f32 {
    1.0
}

fn default_hover_duration() -> f32 {
    2.0
}

fn default_burst() -> u32 {
    1
}

fn default_health() -> f32 {
    10.0
}

fn default_score() -> u32 {
    100
}
