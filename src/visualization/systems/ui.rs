//! UI systems for labels, panels, and highlight materials.

use bevy::prelude::*;
use bevy::ui::Node as UiNode;

use crate::visualization::components::{
    DetailPanel, DetailPanelText, GraphEdge, GraphNode, InfoPanelText, NodeLabel, OverlayCaption,
};
use crate::visualization::constants::LABEL_OFFSET;
use crate::visualization::engine::{DetailState, EngineEvent, SceneEngine};
use crate::visualization::resources::{EngineRes, FrameEvents, SceneMaterials};

/// Screen position of `world_pos`, or `None` when it is behind the camera.
fn project(camera: &Camera, camera_transform: &GlobalTransform, world_pos: Vec3) -> Option<Vec2> {
    let to_point = world_pos - camera_transform.translation();
    if to_point.dot(*camera_transform.forward()) <= 0.0 {
        return None;
    }
    camera.world_to_viewport(camera_transform, world_pos).ok()
}

/// Update label positions by projecting 3D node positions to screen space.
pub fn update_labels_system(
    engine: Res<EngineRes>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut label_query: Query<(&mut UiNode, &mut Visibility, &NodeLabel)>,
) {
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let positions = engine.0.visual_positions();

    for (mut node_ui, mut visibility, label) in label_query.iter_mut() {
        let Some(position) = positions.get(label.node_idx) else {
            continue;
        };
        match project(camera, camera_transform, *position + Vec3::Y * LABEL_OFFSET) {
            Some(screen) => {
                *visibility = Visibility::Visible;
                node_ui.left = Val::Px(screen.x - 40.0); // Center text roughly
                node_ui.top = Val::Px(screen.y - 10.0);
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

/// Keep ranked-view axis captions pinned to their world anchors.
pub fn update_overlay_captions_system(
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut caption_query: Query<(&mut UiNode, &mut Visibility, &OverlayCaption)>,
) {
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    for (mut node_ui, mut visibility, caption) in caption_query.iter_mut() {
        match project(camera, camera_transform, caption.anchor) {
            Some(screen) => {
                *visibility = Visibility::Visible;
                node_ui.left = Val::Px(screen.x - 35.0);
                node_ui.top = Val::Px(screen.y - 8.0);
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

/// Recolor nodes and swap edge materials when the highlight tiers change.
pub fn update_highlight_materials_system(
    engine: Res<EngineRes>,
    events: Res<FrameEvents>,
    scene_materials: Option<Res<SceneMaterials>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut edge_query: Query<(&GraphEdge, &mut MeshMaterial3d<StandardMaterial>), Without<GraphNode>>,
) {
    if !events.contains(&EngineEvent::TiersChanged) {
        return;
    }
    let Some(scene_materials) = scene_materials else {
        return;
    };
    let engine = &engine.0;

    for (idx, handle) in scene_materials.nodes.iter().enumerate() {
        if let Some(material) = materials.get_mut(handle) {
            material.base_color = engine.node_color(idx).to_color();
        }
    }

    for (edge, mut material) in edge_query.iter_mut() {
        *material = MeshMaterial3d(scene_materials.edge(engine.edge_tier(edge.edge_idx)));
    }
}

fn info_text(engine: &SceneEngine) -> String {
    let node = engine
        .hovered()
        .or(engine.selected())
        .and_then(|id| engine.layout().node(id));
    match node {
        Some(node) => format!(
            "\nFile: {}\nPath: {}\nEdits: {}\nLines: {}",
            node.name, node.id, node.edit_count, node.file_length
        ),
        None => "Hover a file to see its activity".to_string(),
    }
}

/// Update the info panel when hover or selection changes.
pub fn update_info_panel_system(
    engine: Res<EngineRes>,
    events: Res<FrameEvents>,
    mut text_query: Query<&mut Text, With<InfoPanelText>>,
) {
    let changed = events.0.iter().any(|e| {
        matches!(
            e,
            EngineEvent::HoverChanged(_) | EngineEvent::SelectionChanged { .. }
        )
    });
    if !changed {
        return;
    }
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };
    **text = info_text(&engine.0);
}

/// Render the detail state as panel text.
pub fn detail_text(engine: &SceneEngine) -> String {
    let name = |id: &str| {
        engine
            .layout()
            .node(id)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| id.to_string())
    };
    match engine.detail() {
        DetailState::Idle => String::new(),
        DetailState::Loading { node_id } => format!("\n{}\n\nLoading history...", name(node_id)),
        DetailState::Failed { node_id, message } => {
            format!("\n{}\n\nCould not load history:\n{}", name(node_id), message)
        }
        DetailState::Ready { node_id, commits } if commits.is_empty() => {
            format!("\n{}\n\nNo commits found", name(node_id))
        }
        DetailState::Ready { node_id, commits } => {
            let mut out = format!("\n{}\n", name(node_id));
            for commit in commits {
                out.push_str(&format!(
                    "\n{}  {}  {}\n  {}\n",
                    commit.short_sha(),
                    commit.time.format("%Y-%m-%d"),
                    commit.author,
                    commit.summary
                ));
            }
            out
        }
    }
}

/// Show the detail panel while a node is selected and keep its text current.
pub fn update_detail_panel_system(
    engine: Res<EngineRes>,
    mut rendered: Local<String>,
    mut panel_query: Query<&mut Visibility, With<DetailPanel>>,
    mut text_query: Query<&mut Text, With<DetailPanelText>>,
) {
    let engine = &engine.0;
    if let Ok(mut visibility) = panel_query.get_single_mut() {
        let wanted = if engine.selected().is_some() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        if *visibility != wanted {
            *visibility = wanted;
        }
    }

    let text = detail_text(engine);
    if *rendered == text {
        return;
    }
    if let Ok(mut panel_text) = text_query.get_single_mut() {
        **panel_text = text.clone();
        *rendered = text;
    }
}
