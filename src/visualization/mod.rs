//! 3D Repository Graph Visualization
//!
//! Lays out files of a repository as a force-directed graph, colored by edit
//! activity, with a ranked-by-size projection and scripted camera flights.
//!
//! ## Module Structure
//!
//! - `graph` - Force-directed layout algorithm
//! - `color` - Heat-map colors for edit activity
//! - `ranking` - Ranked projection, overlay, and reference grids
//! - `director` - Camera flights and returns
//! - `picking` - Pointer to node ray casting
//! - `highlight` - Hover emphasis tiers
//! - `registry` - Owned registry of spawned scene primitives
//! - `engine` - Per-frame orchestration of all of the above
//! - `components` - ECS components for nodes, edges, labels
//! - `resources` - ECS resources for engine state, materials, fetches
//! - `systems` - ECS systems (input, engine step, camera, UI, teardown)
//! - `setup` - Scene initialization
//! - `plugin` - Bevy plugin definition
//! - `constants` - Colors, sizes, and other constants

pub mod color;
mod components;
mod constants;
pub mod director;
pub mod engine;
pub mod graph;
pub mod highlight;
mod plugin;
pub mod picking;
pub mod ranking;
pub mod registry;
mod resources;
mod setup;
mod systems;

pub use engine::{DetailState, EngineEvent, InputSnapshot, SceneEngine};
pub use graph::{GraphLayout, LayoutEdge, LayoutNode};
pub use plugin::VisualizationPlugin;

use std::path::PathBuf;

use bevy::prelude::*;

use crate::config::Config;
use crate::models::RepoGraph;
use constants::COLOR_BACKGROUND;

/// Run the visualizer for a repository graph.
///
/// This spawns a Bevy window with the 3D scene. `history_root` enables the
/// commit list in the detail panel. The function blocks until the window is
/// closed.
pub fn run_visualizer(graph: &RepoGraph, history_root: Option<PathBuf>, config: &Config) {
    let engine = SceneEngine::new(graph, config);

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: config.window.title.clone(),
                        resolution: (config.window.width, config.window.height).into(),
                        ..default()
                    }),
                    ..default()
                })
                // The binary installs its own tracing subscriber
                .disable::<bevy::log::LogPlugin>(),
        )
        .insert_resource(ClearColor(COLOR_BACKGROUND))
        .add_plugins(VisualizationPlugin::new(
            engine,
            history_root,
            config.history.limit,
        ))
        .run();
}
