//! Visualization plugin for Bevy.

use bevy::prelude::*;
use std::path::PathBuf;
use std::sync::Mutex;

use super::engine::SceneEngine;
use super::resources::{
    DetailFetch, EngineRes, FrameEvents, FrameInput, HistorySource, SceneRegistry,
};
use super::setup::setup_scene;
use super::systems;

/// Plugin that adds the interactive repository scene.
///
/// The engine is wrapped in `Mutex<Option<...>>` so `build()` (which takes
/// `&self`) can move it into a resource.
pub struct VisualizationPlugin {
    engine: Mutex<Option<SceneEngine>>,
    history: HistorySource,
}

impl VisualizationPlugin {
    /// Create a new visualization plugin.
    ///
    /// `history_root` enables commit history in the detail panel.
    pub fn new(engine: SceneEngine, history_root: Option<PathBuf>, history_limit: usize) -> Self {
        Self {
            engine: Mutex::new(Some(engine)),
            history: HistorySource {
                root: history_root,
                limit: history_limit,
            },
        }
    }
}

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        let engine = match self.engine.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(engine) = engine else {
            tracing::warn!("Visualization plugin built twice; ignoring");
            return;
        };

        app.insert_resource(EngineRes(engine))
            .insert_resource(self.history.clone())
            .init_resource::<FrameInput>()
            .init_resource::<FrameEvents>()
            .init_resource::<SceneRegistry>()
            .init_resource::<DetailFetch>()
            .add_systems(Startup, setup_scene)
            .add_systems(
                Update,
                (
                    systems::gather_input_system,
                    systems::engine_step_system,
                    systems::start_detail_fetch_system,
                    systems::poll_detail_fetch_system,
                    systems::sync_transforms_system,
                    systems::apply_camera_pose_system,
                    systems::overlay_lifecycle_system,
                    systems::plane_visibility_system,
                    systems::update_highlight_materials_system,
                    systems::update_labels_system,
                    systems::update_overlay_captions_system,
                    systems::update_info_panel_system,
                    systems::update_detail_panel_system,
                )
                    .chain(),
            )
            .add_systems(Last, systems::teardown_system);
    }
}
