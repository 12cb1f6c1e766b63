//! ECS components for the scene.
//!
//! Components are data attached to entities. Each entity can have
//! any combination of components.

use bevy::prelude::*;

use super::ranking::ReferencePlane;

/// Sphere mesh for one file node.
#[derive(Component)]
pub struct GraphNode {
    /// Index in the layout's node array.
    pub node_idx: usize,
}

/// Cylinder mesh for one edge.
#[derive(Component)]
pub struct GraphEdge {
    /// Index in the layout's edge array.
    pub edge_idx: usize,
}

/// UI text that follows a node in screen space.
#[derive(Component)]
pub struct NodeLabel {
    /// Index of the node this label follows.
    pub node_idx: usize,
}

/// One line of a reference grid.
#[derive(Component)]
pub struct PlaneLine {
    pub plane: ReferencePlane,
}

/// Axis or grid line of the ranked overlay.
#[derive(Component)]
pub struct OverlayLine;

/// Axis caption of the ranked overlay, anchored in world space.
#[derive(Component)]
pub struct OverlayCaption {
    pub anchor: Vec3,
}

/// Marker component for the info panel text content.
#[derive(Component)]
pub struct InfoPanelText;

/// Marker component for the commit detail panel container.
#[derive(Component)]
pub struct DetailPanel;

/// Marker component for the commit detail panel text content.
#[derive(Component)]
pub struct DetailPanelText;
