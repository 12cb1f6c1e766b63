//! ECS resources for scene state.
//!
//! Resources are global singleton data - there's only one instance
//! of each resource in the entire app.

use bevy::prelude::*;
use bevy::tasks::Task;
use std::path::PathBuf;

use super::engine::{EngineEvent, InputSnapshot, SceneEngine};
use super::highlight::Tier;
use super::registry::ResourceRegistry;
use crate::models::CommitInfo;

// =============================================================================
// Engine
// =============================================================================

/// The scene engine driving layout, camera, picking, and highlighting.
#[derive(Resource)]
pub struct EngineRes(pub SceneEngine);

/// Input gathered this frame, consumed by the engine step.
#[derive(Resource, Default)]
pub struct FrameInput(pub InputSnapshot);

/// Events produced by the latest engine step.
#[derive(Resource, Default)]
pub struct FrameEvents(pub Vec<EngineEvent>);

impl FrameEvents {
    pub fn contains(&self, event: &EngineEvent) -> bool {
        self.0.contains(event)
    }
}

// =============================================================================
// Scene Resources
// =============================================================================

/// Every spawned scene entity, keyed for release.
#[derive(Resource, Default)]
pub struct SceneRegistry(pub ResourceRegistry<Entity>);

/// Pre-created materials.
///
/// Each node owns its material so its color can follow its heat and tier.
/// Edges and lines share one material per tier or role.
#[derive(Resource)]
pub struct SceneMaterials {
    /// Per-node material, indexed like the layout.
    pub nodes: Vec<Handle<StandardMaterial>>,
    /// Edge materials for neutral, emphasis, and dimmed tiers.
    pub edge_neutral: Handle<StandardMaterial>,
    pub edge_emphasis: Handle<StandardMaterial>,
    pub edge_dimmed: Handle<StandardMaterial>,
    /// Overlay axis and tick materials.
    pub overlay_axis: Handle<StandardMaterial>,
    pub overlay_grid: Handle<StandardMaterial>,
}

impl SceneMaterials {
    pub fn edge(&self, tier: Tier) -> Handle<StandardMaterial> {
        match tier {
            Tier::Neutral => self.edge_neutral.clone(),
            Tier::Emphasis => self.edge_emphasis.clone(),
            Tier::Dimmed => self.edge_dimmed.clone(),
        }
    }
}

/// Shared unit-length cylinder for edges and lines.
#[derive(Resource)]
pub struct LineMeshes {
    pub edge: Handle<Mesh>,
    pub line: Handle<Mesh>,
}

// =============================================================================
// Commit History
// =============================================================================

/// Where commit history for the detail panel comes from.
#[derive(Resource, Clone, Default)]
pub struct HistorySource {
    /// Repository root, if history is available.
    pub root: Option<PathBuf>,
    /// Commits fetched per file.
    pub limit: usize,
}

/// In-flight history fetch for the selected node.
#[derive(Resource, Default)]
pub struct DetailFetch {
    pub pending: Option<PendingFetch>,
}

/// A history fetch running on the async compute pool.
pub struct PendingFetch {
    pub node_id: String,
    pub task: Task<Result<Vec<CommitInfo>, String>>,
}
