use bevy::prelude::SystemSet;

/// Fixed per-tick ordering. Stage/wave progression first so a wave started
/// this tick is visible to the spawner this tick; behavior before attack
/// motion so an Entering->Attacking transition begins moving the same tick.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum ChoreoSystemSet {
    StageFlow,
    Spawning,
    EntryMotion,
    Behavior,
    AttackMotion,
    Firing,
}
