use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker for enemies spawned by the wave scheduler.
///
/// Lets the stage flow count live wave members for completion detection while
/// ignoring the boss and anything the host spawns on its own.
#[derive(Component, Debug, Clone, Serialize, Deserialize, Default, Reflect)]
pub struct WaveEnemy {
    /// Wave index this enemy belongs to.
    pub wave: u32,
}
