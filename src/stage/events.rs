//! Lifecycle notifications.
//!
//! Outgoing events are fire-and-forget: UI/audio collaborators react (banner,
//! music switch) and nothing reads a response. The one incoming event,
//! [`BossDefeated`], is raised by the collision collaborator (via
//! `EnemyDestroyer`) and drained by the stage flow system exactly once per
//! tick, which keeps observable stage transitions to one per tick.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEventKind {
    WaveStarted,
    WaveCompleted,
    BossSpawnRequested,
    BossSpawned,
    StageCompleted,
}

#[derive(Event, Debug, Clone)]
pub struct StageEvent {
    pub kind: StageEventKind,
    pub stage: u32,
    pub wave: u32,
}

/// Fired when the boss entity is destroyed. Completes the stage.
#[derive(Event, Debug, Clone, Copy)]
pub struct BossDefeated {
    pub boss: Entity,
}
