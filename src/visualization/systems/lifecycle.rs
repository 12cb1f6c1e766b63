//! Scene teardown on exit.

use bevy::prelude::*;
use bevy::window::WindowCloseRequested;

use crate::visualization::resources::{
    DetailFetch, EngineRes, LineMeshes, SceneMaterials, SceneRegistry,
};

/// Stop the engine and release every registered entity exactly once.
///
/// Runs when the app is exiting or the window is being closed. Pending
/// history fetches are cancelled and the shared mesh and material handles
/// are dropped.
pub fn teardown_system(
    mut commands: Commands,
    mut exit: EventReader<AppExit>,
    mut close: EventReader<WindowCloseRequested>,
    mut engine: ResMut<EngineRes>,
    mut registry: ResMut<SceneRegistry>,
    mut fetch: ResMut<DetailFetch>,
) {
    let exiting = exit.read().count() > 0;
    let closing = close.read().count() > 0;
    if !(exiting || closing) || !engine.0.is_alive() {
        return;
    }

    engine.0.teardown();
    fetch.pending = None;

    let entities = registry.0.drain_all();
    tracing::debug!("Releasing {} scene entities", entities.len());
    for entity in entities {
        if let Some(entity_commands) = commands.get_entity(entity) {
            entity_commands.despawn_recursive();
        }
    }
    commands.remove_resource::<SceneMaterials>();
    commands.remove_resource::<LineMeshes>();
}
