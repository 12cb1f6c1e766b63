//! Ranked overlay spawning and reference grid visibility.

use bevy::prelude::*;
use bevy::ui::PositionType;

use crate::visualization::components::{OverlayCaption, OverlayLine, PlaneLine};
use crate::visualization::constants::{CAPTION_FONT_SIZE, COLOR_LABEL};
use crate::visualization::engine::EngineEvent;
use crate::visualization::ranking::OverlayLineKind;
use crate::visualization::registry::{ResourceGroup, ResourceKey};
use crate::visualization::resources::{
    EngineRes, FrameEvents, LineMeshes, SceneMaterials, SceneRegistry,
};
use crate::visualization::setup::segment_transform;

fn release_overlay(commands: &mut Commands, registry: &mut SceneRegistry) -> usize {
    let entities = registry.0.release_group(ResourceGroup::Overlay);
    let count = entities.len();
    for entity in entities {
        if let Some(entity_commands) = commands.get_entity(entity) {
            entity_commands.despawn_recursive();
        }
    }
    count
}

/// Spawn the overlay when the ranked view is entered and release it on exit.
pub fn overlay_lifecycle_system(
    mut commands: Commands,
    engine: Res<EngineRes>,
    events: Res<FrameEvents>,
    mut registry: ResMut<SceneRegistry>,
    materials: Option<Res<SceneMaterials>>,
    meshes: Option<Res<LineMeshes>>,
) {
    if events.contains(&EngineEvent::OverlayTornDown) {
        let released = release_overlay(&mut commands, &mut registry);
        tracing::debug!("Released {} overlay entities", released);
    }

    if !events.contains(&EngineEvent::OverlayBuilt) {
        return;
    }
    let (Some(materials), Some(meshes)) = (materials, meshes) else {
        return;
    };
    // Replace rather than accumulate
    release_overlay(&mut commands, &mut registry);
    let Some(overlay) = engine.0.overlay() else {
        return;
    };

    for (i, line) in overlay.lines.iter().enumerate() {
        let Some(transform) = segment_transform(line.start, line.end) else {
            continue;
        };
        let material = match line.kind {
            OverlayLineKind::Axis => materials.overlay_axis.clone(),
            OverlayLineKind::Grid => materials.overlay_grid.clone(),
        };
        let entity = commands
            .spawn((
                Mesh3d(meshes.line.clone()),
                MeshMaterial3d(material),
                transform,
                OverlayLine,
            ))
            .id();
        registry.0.insert(ResourceKey::OverlayLine(i), entity);
    }

    for (i, caption) in overlay.captions.iter().enumerate() {
        let entity = commands
            .spawn((
                Text::new(&caption.text),
                TextFont {
                    font_size: CAPTION_FONT_SIZE,
                    ..default()
                },
                TextColor(COLOR_LABEL),
                bevy::ui::Node {
                    position_type: PositionType::Absolute,
                    ..default()
                },
                Visibility::Hidden,
                OverlayCaption {
                    anchor: caption.position,
                },
            ))
            .id();
        registry.0.insert(ResourceKey::OverlayCaption(i), entity);
    }

    tracing::debug!(
        "Spawned overlay: {} lines, {} captions",
        overlay.lines.len(),
        overlay.captions.len()
    );
}

/// Show each reference grid only when enabled and in the free layout.
pub fn plane_visibility_system(
    engine: Res<EngineRes>,
    events: Res<FrameEvents>,
    mut line_query: Query<(&mut Visibility, &PlaneLine)>,
) {
    let changed = events.0.iter().any(|e| {
        matches!(
            e,
            EngineEvent::ViewModeChanged(_) | EngineEvent::PlanesChanged
        )
    });
    if !changed {
        return;
    }
    let planes = engine.0.planes();
    let mode = engine.0.mode();
    for (mut visibility, line) in line_query.iter_mut() {
        *visibility = if planes.visible(line.plane, mode) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}
