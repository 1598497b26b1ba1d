//! Plugin assembly and shared choreography resources.

use bevy::prelude::*;

use crate::attack::AttackPlugin;
use crate::behavior::BehaviorPlugin;
use crate::enemy::EnemyPlugin;
use crate::path::PathPlugin;
use crate::stage::{StageControl, StagePlugin};
use crate::system_set::ChoreoSystemSet;
use crate::weapons::FirePlugin;

/// Master switch, doubling as the cooperative cancellation signal: each
/// system set checks it, so clearing it mid-tick aborts the remainder of that
/// tick without corrupting state. Used for deterministic test teardown.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ChoreoEnabled(pub bool);

impl Default for ChoreoEnabled {
    fn default() -> Self {
        Self(true)
    }
}

/// Arena geometry: the formation center, the orbit ring enemies circle on,
/// and the outer ring they warp in from.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ArenaLayout {
    pub center: Vec2,
    pub orbit_radius: f32,
    pub spawn_radius: f32,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            orbit_radius: 180.0,
            spawn_radius: 460.0,
        }
    }
}

#[derive(Resource, Debug, Clone, Copy)]
struct InitialStage(u32);

/// Everything the choreography core needs in one plugin. The host supplies a
/// `StageProvider` resource and (optionally) a `Player`-tagged entity.
pub struct ChoreographyPlugin {
    /// Stage to load on startup; `None` leaves loading to the host.
    pub initial_stage: Option<u32>,
}

impl Default for ChoreographyPlugin {
    fn default() -> Self {
        Self {
            initial_stage: None,
        }
    }
}

impl Plugin for ChoreographyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChoreoEnabled>();
        app.init_resource::<ArenaLayout>();

        app.configure_sets(
            Update,
            (
                ChoreoSystemSet::StageFlow,
                ChoreoSystemSet::Spawning,
                ChoreoSystemSet::EntryMotion,
                ChoreoSystemSet::Behavior,
                ChoreoSystemSet::AttackMotion,
                ChoreoSystemSet::Firing,
            )
                .chain(),
        );
        // The cancellation check runs once per set, so flipping ChoreoEnabled
        // inside a tick stops the sets that have not run yet.
        app.configure_sets(Update, ChoreoSystemSet::StageFlow.run_if(choreo_enabled));
        app.configure_sets(Update, ChoreoSystemSet::Spawning.run_if(choreo_enabled));
        app.configure_sets(Update, ChoreoSystemSet::EntryMotion.run_if(choreo_enabled));
        app.configure_sets(Update, ChoreoSystemSet::Behavior.run_if(choreo_enabled));
        app.configure_sets(Update, ChoreoSystemSet::AttackMotion.run_if(choreo_enabled));
        app.configure_sets(Update, ChoreoSystemSet::Firing.run_if(choreo_enabled));

        app.add_plugins((
            StagePlugin,
            EnemyPlugin,
            PathPlugin,
            BehaviorPlugin,
            AttackPlugin,
            FirePlugin,
        ));

        if let Some(number) = self.initial_stage {
            app.insert_resource(InitialStage(number));
            app.add_systems(Startup, load_initial_stage);
        }
    }
}

fn choreo_enabled(enabled: Res<ChoreoEnabled>) -> bool {
    enabled.0
}

fn load_initial_stage(initial: Res<InitialStage>, mut control: StageControl) {
    if let Err(err) = control.load_stage(initial.0) {
        error!("failed to load initial stage {}: {}", initial.0, err);
    }
}
