//! Per-frame orchestration of layout, picking, camera, and highlighting.
//!
//! [`SceneEngine`] owns the single mutable [`GraphLayout`]; every stage
//! borrows it for the duration of one [`SceneEngine::step`]. Input arrives as
//! one [`InputSnapshot`] per frame and is consumed at a fixed point, in this
//! order:
//!
//! 1. view-mode request and deselect
//! 2. physics (free layout) or easing toward targets (ranked layout)
//! 3. manual orbit, only while the camera is idle
//! 4. picking against the positions as they now stand
//! 5. camera flights
//! 6. highlight tiers
//!
//! After [`SceneEngine::teardown`] every entry point is a no-op.

use bevy::math::{Vec2, Vec3};

use crate::config::{CameraConfig, Config, PhysicsConfig, PickingConfig};
use crate::models::{CommitInfo, RepoGraph};
use crate::visualization::color::{heat_map_color, Rgb};
use crate::visualization::director::{CameraDirector, CameraOrbit, CameraPose, FlightKind};
use crate::visualization::graph::GraphLayout;
use crate::visualization::highlight::{self, HighlightEngine, HighlightTiers, Tier};
use crate::visualization::picking::{pointer_push, Picker, Viewport};
use crate::visualization::ranking::{
    ModeTransition, Overlay, PlaneToggles, ReferencePlane, ViewMode, ViewProjector,
};

/// Pointer location for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Client coordinates in pixels.
    pub client: Vec2,
    /// Rectangle the scene is drawn into.
    pub viewport: Viewport,
}

/// Manual camera input accumulated over one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitDelta {
    /// Horizontal drag in pixels.
    pub yaw: f32,
    /// Vertical drag in pixels.
    pub pitch: f32,
    /// Scroll lines; positive zooms in.
    pub zoom: f32,
    /// Pan steps: x right, y up, z forward.
    pub pan: Vec3,
}

impl OrbitDelta {
    pub fn is_zero(&self) -> bool {
        self.yaw == 0.0 && self.pitch == 0.0 && self.zoom == 0.0 && self.pan == Vec3::ZERO
    }
}

/// Everything the engine reads from the outside world in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Latest pointer position, `None` when it is outside the view.
    pub pointer: Option<PointerSample>,
    /// A click happened at `pointer` this frame.
    pub click: bool,
    /// Explicit view-mode request.
    pub view_mode: Option<ViewMode>,
    /// Flip the view mode.
    pub toggle_view: bool,
    /// Clear the selection.
    pub deselect: bool,
    pub orbit: OrbitDelta,
    /// Reference planes to flip.
    pub plane_toggles: Vec<ReferencePlane>,
}

/// Notifications produced by a step.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SelectionChanged {
        previous: Option<String>,
        current: Option<String>,
    },
    HoverChanged(Option<String>),
    ViewModeChanged(ViewMode),
    OverlayBuilt,
    OverlayTornDown,
    TiersChanged,
    PlanesChanged,
}

/// Commit detail for the selected node.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailState {
    #[default]
    Idle,
    Loading {
        node_id: String,
    },
    Ready {
        node_id: String,
        commits: Vec<CommitInfo>,
    },
    Failed {
        node_id: String,
        message: String,
    },
}

/// The interactive scene.
pub struct SceneEngine {
    layout: GraphLayout,
    projector: ViewProjector,
    director: CameraDirector,
    picker: Picker,
    highlight: HighlightEngine,
    physics: PhysicsConfig,
    picking: PickingConfig,
    camera: CameraConfig,
    pose: CameraPose,
    visual: Vec<Vec3>,
    heat: Vec<Rgb>,
    hovered: Option<String>,
    selected: Option<String>,
    detail: DetailState,
    planes: PlaneToggles,
    clock: f32,
    alive: bool,
}

impl SceneEngine {
    /// Build the scene, run the warm-up, and frame the settled layout.
    pub fn new(graph: &RepoGraph, config: &Config) -> Self {
        let mut layout = GraphLayout::from_repo_graph(graph);
        layout.stabilize(config.physics.warmup_steps, &config.physics);

        let (center, radius) = layout.bounding_sphere();
        let orbit = CameraOrbit {
            target: center,
            distance: (radius * 2.5)
                .max(10.0)
                .clamp(config.camera.min_distance, config.camera.max_distance),
            ..CameraOrbit::default()
        };

        let max_edits = layout.max_edit_count() as f32;
        let heat = layout
            .nodes
            .iter()
            .map(|n| heat_map_color(n.edit_count as f32, max_edits))
            .collect();

        tracing::info!(
            "Scene ready: {} nodes, {} edges, radius {:.1}",
            layout.nodes.len(),
            layout.edges.len(),
            radius
        );

        Self {
            visual: layout.positions(),
            highlight: HighlightEngine::new(&layout),
            projector: ViewProjector::new(config.ranking),
            director: CameraDirector::new(config.camera),
            picker: Picker::new(&config.picking, &config.camera),
            physics: config.physics,
            picking: config.picking,
            camera: config.camera,
            pose: orbit.to_pose(),
            heat,
            hovered: None,
            selected: None,
            detail: DetailState::Idle,
            planes: PlaneToggles::default(),
            clock: 0.0,
            alive: true,
            layout,
        }
    }

    pub fn layout(&self) -> &GraphLayout {
        &self.layout
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn director(&self) -> &CameraDirector {
        &self.director
    }

    pub fn mode(&self) -> ViewMode {
        self.projector.mode()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.projector.overlay()
    }

    pub fn tiers(&self) -> &HighlightTiers {
        self.highlight.tiers()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    pub fn planes(&self) -> &PlaneToggles {
        &self.planes
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Seconds of engine time elapsed.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Where each node is drawn this frame, in node order.
    ///
    /// Equal to the layout positions except for the pointer push in the
    /// free layout.
    pub fn visual_positions(&self) -> &[Vec3] {
        &self.visual
    }

    /// Vertical field of view the picker assumes.
    pub fn fov_radians(&self) -> f32 {
        self.camera.fov_degrees.to_radians()
    }

    /// Radius of every node's pick sphere, which the meshes match.
    pub fn node_radius(&self) -> f32 {
        self.picking.node_radius
    }

    /// Edges are drawn only in the free layout.
    pub fn edges_visible(&self) -> bool {
        self.mode() == ViewMode::Layout3D
    }

    /// Display color of the node at `idx` for the current tiers.
    pub fn node_color(&self, idx: usize) -> Rgb {
        let heat = self.heat.get(idx).copied().unwrap_or(Rgb::new(255.0, 255.0, 255.0));
        highlight::node_color(heat, self.tiers().node(idx))
    }

    pub fn edge_tier(&self, idx: usize) -> Tier {
        self.tiers().edge(idx)
    }

    /// Advance one frame.
    pub fn step(&mut self, dt: f32, input: &InputSnapshot) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if !self.alive {
            return events;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock += dt;

        self.apply_plane_toggles(input, &mut events);

        let requested = input
            .view_mode
            .or_else(|| input.toggle_view.then(|| self.mode().toggled()));
        if let Some(mode) = requested {
            self.set_mode(mode, &mut events);
        }

        if input.deselect {
            self.deselect(&mut events);
        }

        match self.mode() {
            ViewMode::Layout3D => self.layout.step(dt, &self.physics),
            ViewMode::Ranked2D => {
                self.projector.step(&mut self.layout);
            }
        }

        if self.director.is_idle() && !input.orbit.is_zero() {
            self.apply_orbit(&input.orbit);
        }

        self.update_visual_positions(input.pointer.as_ref());
        self.update_hover(input.pointer.as_ref(), &mut events);
        if input.click {
            if let Some(pointer) = &input.pointer {
                self.click(pointer, &mut events);
            }
        }

        self.director.step(&mut self.pose, self.clock);

        if self.highlight.update(&self.layout, self.hovered.as_deref()) {
            events.push(EngineEvent::TiersChanged);
        }

        events
    }

    fn apply_plane_toggles(&mut self, input: &InputSnapshot, events: &mut Vec<EngineEvent>) {
        if input.plane_toggles.is_empty() {
            return;
        }
        for plane in &input.plane_toggles {
            self.planes.toggle(*plane);
        }
        events.push(EngineEvent::PlanesChanged);
    }

    fn set_mode(&mut self, mode: ViewMode, events: &mut Vec<EngineEvent>) {
        let Some(transition) = self.projector.set_mode(mode, &mut self.layout) else {
            return;
        };
        tracing::info!("View mode changed to {:?}", mode);
        events.push(EngineEvent::ViewModeChanged(mode));

        match transition {
            ModeTransition::EnteredRanked { center } => {
                events.push(EngineEvent::OverlayBuilt);
                let target = self.director.ranked_pose(center);
                self.director
                    .fly_to(&self.pose, target, FlightKind::ViewMode, self.clock);
            }
            ModeTransition::LeftRanked => {
                events.push(EngineEvent::OverlayTornDown);
                // A selected node still owns the saved pose for its return
                self.director.leave_view_mode(self.selected.is_some());
                self.planes.enable_all();
                events.push(EngineEvent::PlanesChanged);
            }
        }
    }

    fn deselect(&mut self, events: &mut Vec<EngineEvent>) {
        let Some(previous) = self.selected.take() else {
            return;
        };
        tracing::debug!("Deselected {}", previous);
        self.detail = DetailState::Idle;
        self.director.return_home();
        events.push(EngineEvent::SelectionChanged {
            previous: Some(previous),
            current: None,
        });
    }

    fn apply_orbit(&mut self, delta: &OrbitDelta) {
        let mut orbit = CameraOrbit::from_pose(&self.pose);
        orbit.yaw -= delta.yaw * self.camera.orbit_sensitivity;
        orbit.pitch = (orbit.pitch + delta.pitch * self.camera.orbit_sensitivity)
            .clamp(-self.camera.max_pitch, self.camera.max_pitch);
        orbit.distance = (orbit.distance - delta.zoom * self.camera.zoom_step)
            .clamp(self.camera.min_distance, self.camera.max_distance);
        orbit.target += orbit.right() * delta.pan.x * self.camera.pan_speed
            + Vec3::Y * delta.pan.y * self.camera.pan_speed
            + orbit.forward() * delta.pan.z * self.camera.pan_speed;
        self.pose = orbit.to_pose();
    }

    fn update_visual_positions(&mut self, pointer: Option<&PointerSample>) {
        self.visual.clear();
        self.visual.extend(self.layout.nodes.iter().map(|n| n.position));

        if self.mode() != ViewMode::Layout3D {
            return;
        }
        let anchor = pointer
            .and_then(|p| self.picker.ray(p.client, &p.viewport, &self.pose))
            .and_then(|ray| ray.hit_ground_xy());
        if let Some(anchor) = anchor {
            for position in &mut self.visual {
                *position += pointer_push(*position, anchor, &self.picking);
            }
        }
    }

    fn pick(&self, pointer: &PointerSample) -> Option<String> {
        self.picker
            .pick_index(pointer.client, &pointer.viewport, &self.pose, &self.visual)
            .map(|idx| self.layout.nodes[idx].id.clone())
    }

    fn update_hover(&mut self, pointer: Option<&PointerSample>, events: &mut Vec<EngineEvent>) {
        let hovered = pointer.and_then(|p| self.pick(p));
        if hovered != self.hovered {
            self.hovered = hovered.clone();
            events.push(EngineEvent::HoverChanged(hovered));
        }
    }

    fn click(&mut self, pointer: &PointerSample, events: &mut Vec<EngineEvent>) {
        // Clicking empty space keeps the current selection
        if let Some(id) = self.pick(pointer) {
            self.select_node(&id, events);
        }
    }

    fn select_node(&mut self, id: &str, events: &mut Vec<EngineEvent>) {
        if self.selected.as_deref() == Some(id) {
            return;
        }
        let Some(idx) = self.layout.index_of(id) else {
            return;
        };

        let target = self.director.focus_pose(self.layout.nodes[idx].position);
        self.director
            .fly_to(&self.pose, target, FlightKind::NodeFocus, self.clock);

        tracing::info!("Selected {}", id);
        self.detail = DetailState::Loading {
            node_id: id.to_string(),
        };
        let previous = self.selected.replace(id.to_string());
        events.push(EngineEvent::SelectionChanged {
            previous,
            current: Some(id.to_string()),
        });
    }

    /// Select a node by ID as if it had been clicked.
    pub fn select(&mut self, id: &str) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.alive {
            self.select_node(id, &mut events);
        }
        events
    }

    /// Apply a finished detail fetch for `node_id`.
    ///
    /// The result is applied only while the engine is alive and `node_id` is
    /// still the loading selection. Returns whether it was applied.
    pub fn apply_detail(&mut self, node_id: &str, result: Result<Vec<CommitInfo>, String>) -> bool {
        if !self.alive {
            return false;
        }
        let loading = matches!(
            &self.detail,
            DetailState::Loading { node_id: loading } if loading == node_id
        );
        let current = loading && self.selected.as_deref() == Some(node_id);
        if !current {
            tracing::debug!("Dropping stale detail for {}", node_id);
            return false;
        }

        self.detail = match result {
            Ok(commits) => {
                tracing::debug!("Loaded {} commits for {}", commits.len(), node_id);
                DetailState::Ready {
                    node_id: node_id.to_string(),
                    commits,
                }
            }
            Err(message) => {
                tracing::warn!("History for {} failed: {}", node_id, message);
                DetailState::Failed {
                    node_id: node_id.to_string(),
                    message,
                }
            }
        };
        true
    }

    /// Stop the engine. Later calls to [`step`](Self::step),
    /// [`select`](Self::select) and [`apply_detail`](Self::apply_detail) do
    /// nothing.
    pub fn teardown(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.projector.teardown();
        self.hovered = None;
        self.selected = None;
        self.detail = DetailState::Idle;
        tracing::info!("Scene torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileEdge, FileNode};

    fn graph() -> RepoGraph {
        RepoGraph {
            nodes: vec![
                FileNode {
                    id: "src/a.rs".into(),
                    name: "a.rs".into(),
                    edit_count: 10,
                    file_length: 200,
                },
                FileNode {
                    id: "src/b.rs".into(),
                    name: "b.rs".into(),
                    edit_count: 1,
                    file_length: 20,
                },
            ],
            edges: vec![FileEdge {
                id: "e".into(),
                source: "src/a.rs".into(),
                target: "src/b.rs".into(),
            }],
        }
    }

    fn engine() -> SceneEngine {
        SceneEngine::new(&graph(), &Config::default())
    }

    #[test]
    fn test_new_engine_frames_layout() {
        let engine = engine();
        let (center, _) = engine.layout().bounding_sphere();
        assert_eq!(engine.pose().look_at, center);
        assert!(engine.pose().position.distance(center) > 9.9);
        assert!(engine.director().is_idle());
        assert_eq!(engine.mode(), ViewMode::Layout3D);
    }

    #[test]
    fn test_toggle_view_flies_camera_and_builds_overlay() {
        let mut engine = engine();
        let events = engine.step(
            0.016,
            &InputSnapshot {
                toggle_view: true,
                ..Default::default()
            },
        );
        assert!(events.contains(&EngineEvent::ViewModeChanged(ViewMode::Ranked2D)));
        assert!(events.contains(&EngineEvent::OverlayBuilt));
        assert!(engine.overlay().is_some());
        assert!(!engine.edges_visible());
        assert!(engine.director().saved_pose().is_some());
    }

    #[test]
    fn test_select_sets_loading_and_detail_applies() {
        let mut engine = engine();
        let events = engine.select("src/a.rs");
        assert_eq!(
            events,
            vec![EngineEvent::SelectionChanged {
                previous: None,
                current: Some("src/a.rs".into()),
            }]
        );
        assert_eq!(
            engine.detail(),
            &DetailState::Loading {
                node_id: "src/a.rs".into()
            }
        );

        assert!(engine.apply_detail("src/a.rs", Ok(vec![])));
        assert!(matches!(
            engine.detail(),
            DetailState::Ready { commits, .. } if commits.is_empty()
        ));
    }

    #[test]
    fn test_failed_detail_is_recorded() {
        let mut engine = engine();
        engine.select("src/b.rs");
        assert!(engine.apply_detail("src/b.rs", Err("no repo".into())));
        assert_eq!(
            engine.detail(),
            &DetailState::Failed {
                node_id: "src/b.rs".into(),
                message: "no repo".into()
            }
        );
    }

    #[test]
    fn test_manual_orbit_ignored_during_flight() {
        let mut engine = engine();
        engine.select("src/a.rs");
        let before = *engine.pose();
        let orbit = InputSnapshot {
            orbit: OrbitDelta {
                yaw: 500.0,
                ..Default::default()
            },
            ..Default::default()
        };
        engine.step(0.0, &orbit);
        // Only the flight moved the camera: same result as a plain step
        let mut reference = SceneEngine::new(&graph(), &Config::default());
        reference.select("src/a.rs");
        reference.step(0.0, &InputSnapshot::default());
        assert_eq!(engine.pose(), reference.pose());
        assert_ne!(engine.pose(), &before);
    }

    #[test]
    fn test_manual_orbit_when_idle() {
        let mut engine = engine();
        let before = *engine.pose();
        engine.step(
            0.0,
            &InputSnapshot {
                orbit: OrbitDelta {
                    zoom: 3.0,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let after = *engine.pose();
        assert_eq!(after.look_at, before.look_at);
        assert!(after.position.distance(after.look_at) < before.position.distance(before.look_at));
    }

    #[test]
    fn test_orbit_pitch_is_clamped() {
        let mut config = Config::default();
        config.camera.max_pitch = 0.5;
        let mut engine = SceneEngine::new(&graph(), &config);
        engine.step(
            0.0,
            &InputSnapshot {
                orbit: OrbitDelta {
                    pitch: 10_000.0,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let pitch = CameraOrbit::from_pose(engine.pose()).pitch;
        assert!((pitch - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_leaving_ranked_drops_saved_pose() {
        let mut engine = engine();
        engine.step(
            0.0,
            &InputSnapshot {
                view_mode: Some(ViewMode::Ranked2D),
                ..Default::default()
            },
        );
        assert!(engine.director().saved_pose().is_some());

        engine.step(
            0.0,
            &InputSnapshot {
                view_mode: Some(ViewMode::Layout3D),
                ..Default::default()
            },
        );
        assert!(engine.director().saved_pose().is_none());
        assert!(engine.director().is_idle());
    }

    #[test]
    fn test_leaving_ranked_keeps_pose_of_selection() {
        let mut engine = engine();
        let home = *engine.pose();
        engine.step(
            0.0,
            &InputSnapshot {
                view_mode: Some(ViewMode::Ranked2D),
                ..Default::default()
            },
        );
        engine.select("src/a.rs");
        engine.step(
            0.0,
            &InputSnapshot {
                view_mode: Some(ViewMode::Layout3D),
                ..Default::default()
            },
        );
        assert_eq!(engine.director().saved_pose(), Some(&home));
    }

    #[test]
    fn test_leaving_ranked_reenables_planes() {
        let mut engine = engine();
        engine.step(
            0.0,
            &InputSnapshot {
                plane_toggles: vec![ReferencePlane::Xy],
                ..Default::default()
            },
        );
        assert!(!engine.planes().enabled(ReferencePlane::Xy));

        engine.step(
            0.0,
            &InputSnapshot {
                view_mode: Some(ViewMode::Ranked2D),
                ..Default::default()
            },
        );
        engine.step(
            0.0,
            &InputSnapshot {
                view_mode: Some(ViewMode::Layout3D),
                ..Default::default()
            },
        );
        assert!(engine.planes().enabled(ReferencePlane::Xy));
    }

    #[test]
    fn test_non_finite_dt_is_ignored() {
        let mut engine = engine();
        engine.step(f32::NAN, &InputSnapshot::default());
        engine.step(-1.0, &InputSnapshot::default());
        assert_eq!(engine.clock(), 0.0);
        assert!(engine.layout().nodes.iter().all(|n| n.position.is_finite()));
    }
}
