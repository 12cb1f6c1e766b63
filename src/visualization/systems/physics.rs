//! Engine step and transform sync.

use bevy::prelude::*;

use crate::visualization::components::{GraphEdge, GraphNode};
use crate::visualization::resources::{EngineRes, FrameEvents, FrameInput};
use crate::visualization::setup::segment_transform;

/// Run one engine step on this frame's input.
pub fn engine_step_system(
    mut engine: ResMut<EngineRes>,
    mut input: ResMut<FrameInput>,
    mut events: ResMut<FrameEvents>,
    time: Res<Time>,
) {
    let snapshot = std::mem::take(&mut input.0);
    events.0 = engine.0.step(time.delta_secs(), &snapshot);
}

/// Move node and edge meshes to the engine's current positions.
pub fn sync_transforms_system(
    engine: Res<EngineRes>,
    mut node_query: Query<(&mut Transform, &GraphNode), Without<GraphEdge>>,
    mut edge_query: Query<(&mut Transform, &mut Visibility, &GraphEdge), Without<GraphNode>>,
) {
    let engine = &engine.0;
    let positions = engine.visual_positions();

    for (mut transform, node) in node_query.iter_mut() {
        if let Some(position) = positions.get(node.node_idx) {
            transform.translation = *position;
        }
    }

    let show_edges = engine.edges_visible();
    for (mut transform, mut visibility, edge) in edge_query.iter_mut() {
        let Some(layout_edge) = engine.layout().edges.get(edge.edge_idx) else {
            continue;
        };
        let segment = show_edges
            .then(|| {
                segment_transform(positions[layout_edge.from_idx], positions[layout_edge.to_idx])
            })
            .flatten();
        match segment {
            Some(t) => {
                *transform = t;
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}
