//! Scene setup and material creation.

use bevy::prelude::*;
use bevy::render::camera::{PerspectiveProjection, Projection};
use bevy::ui::PositionType;

use crate::visualization::color::heat_map_color;
use crate::visualization::components::{
    DetailPanel, DetailPanelText, GraphEdge, GraphNode, InfoPanelText, NodeLabel, PlaneLine,
};
use crate::visualization::constants::{
    COLOR_LABEL, COLOR_OVERLAY_AXIS, COLOR_OVERLAY_GRID, COLOR_PANEL, COLOR_PLANE_AXIS,
    COLOR_PLANE_GRID, EDGE_RADIUS, LABEL_FONT_SIZE, LINE_RADIUS, PANEL_BODY_FONT_SIZE,
    PANEL_TITLE_FONT_SIZE, PLANE_DIVISIONS, PLANE_HALF_EXTENT,
};
use crate::visualization::highlight::{edge_color, Tier};
use crate::visualization::ranking::{OverlayLineKind, ReferencePlane};
use crate::visualization::registry::ResourceKey;
use crate::visualization::resources::{EngineRes, LineMeshes, SceneMaterials, SceneRegistry};

/// Transform that stretches a unit Y-aligned cylinder from `start` to `end`.
///
/// Returns `None` for segments too short to orient.
pub fn segment_transform(start: Vec3, end: Vec3) -> Option<Transform> {
    let direction = end - start;
    let length = direction.length();
    if length <= 0.01 {
        return None;
    }
    Some(
        Transform::from_translation((start + end) / 2.0)
            .with_rotation(Quat::from_rotation_arc(Vec3::Y, direction / length))
            .with_scale(Vec3::new(1.0, length, 1.0)),
    )
}

fn unlit(materials: &mut Assets<StandardMaterial>, color: Color) -> Handle<StandardMaterial> {
    materials.add(StandardMaterial {
        base_color: color,
        unlit: true,
        alpha_mode: if color.alpha() < 1.0 {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        ..default()
    })
}

/// Setup the scene with camera, lighting, graph primitives, and panels.
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut registry: ResMut<SceneRegistry>,
    engine: Res<EngineRes>,
) {
    let engine = &engine.0;
    let layout = engine.layout();
    let pose = engine.pose();

    // Camera
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: engine.fov_radians(),
            ..default()
        }),
        Transform::from_translation(pose.position).looking_at(pose.look_at, Vec3::Y),
    ));

    // Main directional light (sun-like)
    commands.spawn((
        DirectionalLight {
            illuminance: 15000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Secondary fill light from opposite side
    commands.spawn((
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-8.0, 10.0, -8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
    });

    // Materials
    let max_edits = layout.max_edit_count() as f32;
    let node_materials: Vec<Handle<StandardMaterial>> = layout
        .nodes
        .iter()
        .map(|n| {
            let color = heat_map_color(n.edit_count as f32, max_edits).to_color();
            materials.add(StandardMaterial {
                base_color: color,
                metallic: 0.2,
                perceptual_roughness: 0.5,
                reflectance: 0.3,
                ..default()
            })
        })
        .collect();

    let scene_materials = SceneMaterials {
        nodes: node_materials.clone(),
        edge_neutral: unlit(&mut materials, edge_color(Tier::Neutral)),
        edge_emphasis: unlit(&mut materials, edge_color(Tier::Emphasis)),
        edge_dimmed: unlit(&mut materials, edge_color(Tier::Dimmed)),
        overlay_axis: unlit(&mut materials, COLOR_OVERLAY_AXIS),
        overlay_grid: unlit(&mut materials, COLOR_OVERLAY_GRID),
    };
    let plane_axis = unlit(&mut materials, COLOR_PLANE_AXIS);
    let plane_grid = unlit(&mut materials, COLOR_PLANE_GRID);

    let line_meshes = LineMeshes {
        edge: meshes.add(Cylinder::new(EDGE_RADIUS, 1.0)),
        line: meshes.add(Cylinder::new(LINE_RADIUS, 1.0)),
    };

    // Nodes with labels
    let node_mesh = meshes.add(Sphere::new(engine.node_radius()).mesh().uv(32, 18));
    let text_font = TextFont {
        font_size: LABEL_FONT_SIZE,
        ..default()
    };

    for (idx, node) in layout.nodes.iter().enumerate() {
        let entity = commands
            .spawn((
                Mesh3d(node_mesh.clone()),
                MeshMaterial3d(node_materials[idx].clone()),
                Transform::from_translation(node.position),
                GraphNode { node_idx: idx },
            ))
            .id();
        registry
            .0
            .insert(ResourceKey::NodeMesh(node.id.clone()), entity);

        let label = commands
            .spawn((
                Text::new(&node.name),
                text_font.clone(),
                TextColor(COLOR_LABEL),
                bevy::ui::Node {
                    position_type: PositionType::Absolute,
                    ..default()
                },
                NodeLabel { node_idx: idx },
            ))
            .id();
        registry
            .0
            .insert(ResourceKey::NodeLabel(node.id.clone()), label);
    }

    // Edges as thin cylinders; transforms are synced every frame
    for (idx, edge) in layout.edges.iter().enumerate() {
        let from = layout.nodes[edge.from_idx].position;
        let to = layout.nodes[edge.to_idx].position;
        let (transform, visibility) = match segment_transform(from, to) {
            Some(t) => (t, Visibility::Inherited),
            None => (Transform::default(), Visibility::Hidden),
        };
        let entity = commands
            .spawn((
                Mesh3d(line_meshes.edge.clone()),
                MeshMaterial3d(scene_materials.edge_neutral.clone()),
                transform,
                visibility,
                GraphEdge { edge_idx: idx },
            ))
            .id();
        registry.0.insert(ResourceKey::Edge(idx), entity);
    }

    // Reference grids
    for plane in ReferencePlane::ALL {
        for (i, line) in plane
            .grid_lines(PLANE_HALF_EXTENT, PLANE_DIVISIONS)
            .into_iter()
            .enumerate()
        {
            let Some(transform) = segment_transform(line.start, line.end) else {
                continue;
            };
            let material = match line.kind {
                OverlayLineKind::Axis => plane_axis.clone(),
                OverlayLineKind::Grid => plane_grid.clone(),
            };
            let entity = commands
                .spawn((
                    Mesh3d(line_meshes.line.clone()),
                    MeshMaterial3d(material),
                    transform,
                    PlaneLine { plane },
                ))
                .id();
            registry.0.insert(ResourceKey::PlaneLine(plane, i), entity);
        }
    }

    commands.insert_resource(scene_materials);
    commands.insert_resource(line_meshes);

    spawn_panels(&mut commands, engine.layout().nodes.len());
}

const KEY_HELP: &str = "Click: select  Esc: deselect  Tab: ranked view\n\
    Right-drag: orbit  Scroll: zoom  WASD/QE: pan\n\
    1/2/3: toggle XZ/XY/YZ grids";

/// Spawn the info panel on the left and the detail panel on the right.
fn spawn_panels(commands: &mut Commands, node_count: usize) {
    let low = heat_map_color(0.0, 1.0).to_color();
    let high = heat_map_color(1.0, 1.0).to_color();

    commands
        .spawn((
            bevy::ui::Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                width: Val::Px(280.0),
                padding: UiRect::all(Val::Px(12.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
            BackgroundColor(COLOR_PANEL),
            BorderRadius::all(Val::Px(8.0)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(format!("Repository ({} files)", node_count)),
                TextFont {
                    font_size: PANEL_TITLE_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
            ));

            // Heat legend: fewest edits to most edits
            parent
                .spawn(bevy::ui::Node {
                    flex_direction: FlexDirection::Row,
                    align_items: AlignItems::Center,
                    column_gap: Val::Px(6.0),
                    ..default()
                })
                .with_children(|item| {
                    for (color, caption) in [(low, "few edits"), (high, "many edits")] {
                        item.spawn((
                            bevy::ui::Node {
                                width: Val::Px(12.0),
                                height: Val::Px(12.0),
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                            BackgroundColor(color),
                            BorderColor(Color::srgba(1.0, 1.0, 1.0, 0.3)),
                            BorderRadius::all(Val::Px(6.0)),
                        ));
                        item.spawn((
                            Text::new(caption),
                            TextFont {
                                font_size: 12.0,
                                ..default()
                            },
                            TextColor(Color::srgb(0.8, 0.8, 0.8)),
                        ));
                    }
                });

            parent.spawn((
                Text::new("Hover a file to see its activity"),
                TextFont {
                    font_size: PANEL_BODY_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.7)),
                InfoPanelText,
            ));

            parent.spawn((
                Text::new(KEY_HELP),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgb(0.5, 0.5, 0.55)),
            ));
        });

    commands
        .spawn((
            bevy::ui::Node {
                position_type: PositionType::Absolute,
                right: Val::Px(10.0),
                top: Val::Px(10.0),
                width: Val::Px(340.0),
                max_height: Val::Percent(90.0),
                padding: UiRect::all(Val::Px(12.0)),
                flex_direction: FlexDirection::Column,
                overflow: Overflow::clip(),
                ..default()
            },
            BackgroundColor(COLOR_PANEL),
            BorderRadius::all(Val::Px(8.0)),
            Visibility::Hidden,
            DetailPanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Commit History"),
                TextFont {
                    font_size: PANEL_TITLE_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: PANEL_BODY_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::srgb(0.75, 0.75, 0.75)),
                DetailPanelText,
            ));
        });
}
