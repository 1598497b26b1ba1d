//! Stage lifecycle: configuration contracts, data providers, the stage state
//! machine and its collaborator-facing control surface.

pub mod config;
pub mod control;
pub mod events;
pub mod provider;
pub mod state;
pub mod systems;

use bevy::prelude::*;

use crate::system_set::ChoreoSystemSet;

pub use config::StageConfig;
pub use control::StageControl;
pub use events::{BossDefeated, StageEvent, StageEventKind};
pub use provider::{
    JsonStageProvider, StageDataProvider, StageLoadError, StageProvider, StaticStageProvider,
};
pub use state::{StageMachine, StagePhase};

pub struct StagePlugin;

impl Plugin for StagePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StageMachine>();
        app.init_resource::<crate::waves::WaveManager>();

        app.add_event::<StageEvent>();
        app.add_event::<BossDefeated>();

        app.register_type::<StagePhase>();

        app.add_systems(
            Update,
            systems::stage_flow_system.in_set(ChoreoSystemSet::StageFlow),
        );
    }
}
