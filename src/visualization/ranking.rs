//! Ranked 2D projection: files ordered by size along X, height by length.
//!
//! Entering the ranked mode snapshots every node position, assigns targets,
//! and builds the axis/grid overlay. Nodes then ease toward their targets one
//! frame at a time. Leaving writes the snapshot back verbatim and discards the
//! targets and the overlay.

use bevy::math::Vec3;

use crate::config::RankingConfig;
use crate::visualization::graph::GraphLayout;

/// The two ways the graph can be laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    /// Free physical simulation.
    #[default]
    Layout3D,
    /// Deterministic rank-by-size projection.
    Ranked2D,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Layout3D => ViewMode::Ranked2D,
            ViewMode::Ranked2D => ViewMode::Layout3D,
        }
    }
}

/// Role of an overlay line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayLineKind {
    Axis,
    Grid,
}

/// A straight overlay segment.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub start: Vec3,
    pub end: Vec3,
    pub kind: OverlayLineKind,
}

/// A text caption anchored in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayCaption {
    pub text: String,
    pub position: Vec3,
}

/// Axis and grid primitives for the ranked view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub lines: Vec<OverlayLine>,
    pub captions: Vec<OverlayCaption>,
}

/// What a mode switch did, for the caller to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeTransition {
    /// Targets assigned and overlay built.
    EnteredRanked { center: Vec3 },
    /// Positions restored and overlay torn down.
    LeftRanked,
}

/// Ranked-layout target for every node, in node order.
///
/// Nodes are sorted by `file_length` ascending (ties broken by ID), then
/// `x = (rank - n/2) * spacing`, `y = normalized length * height`, `z = 0`.
pub fn ranked_targets(layout: &GraphLayout, config: &RankingConfig) -> Vec<Vec3> {
    let n = layout.nodes.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        let (na, nb) = (&layout.nodes[a], &layout.nodes[b]);
        na.file_length
            .cmp(&nb.file_length)
            .then_with(|| na.id.cmp(&nb.id))
    });

    let min = layout.nodes.iter().map(|n| n.file_length).min().unwrap_or(0);
    let max = layout.nodes.iter().map(|n| n.file_length).max().unwrap_or(0);
    let range = if max == min { 1.0 } else { (max - min) as f32 };
    let half = n as f32 / 2.0;

    let mut targets = vec![Vec3::ZERO; n];
    for (rank, &idx) in order.iter().enumerate() {
        let normalized = (layout.nodes[idx].file_length - min) as f32 / range;
        targets[idx] = Vec3::new(
            (rank as f32 - half) * config.spacing,
            normalized * config.height,
            0.0,
        );
    }
    targets
}

/// Axis lines, rank ticks, height ticks, and captions for `node_count` ranks.
pub fn build_overlay(node_count: usize, config: &RankingConfig) -> Overlay {
    let half = node_count as f32 / 2.0;
    let first_x = -half * config.spacing;
    let last_x = (node_count.saturating_sub(1) as f32 - half) * config.spacing;
    let left = first_x - config.axis_padding;
    let right = last_x + config.axis_padding;
    let bottom = -1.0;
    let top = config.height + 1.0;

    let mut lines = Vec::new();

    // One vertical tick per rank slot
    for i in 0..=node_count {
        let x = left + i as f32 * config.spacing;
        lines.push(OverlayLine {
            start: Vec3::new(x, bottom, 0.0),
            end: Vec3::new(x, top, 0.0),
            kind: OverlayLineKind::Grid,
        });
    }

    // Horizontal ticks across the normalized height range
    let ticks = config.height_ticks.max(1);
    for i in 0..=ticks {
        let y = config.height * i as f32 / ticks as f32;
        lines.push(OverlayLine {
            start: Vec3::new(left, y, 0.0),
            end: Vec3::new(right, y, 0.0),
            kind: OverlayLineKind::Grid,
        });
    }

    lines.push(OverlayLine {
        start: Vec3::new(left, bottom, 0.0),
        end: Vec3::new(right, bottom, 0.0),
        kind: OverlayLineKind::Axis,
    });
    lines.push(OverlayLine {
        start: Vec3::new(left, bottom, 0.0),
        end: Vec3::new(left, top, 0.0),
        kind: OverlayLineKind::Axis,
    });

    let captions = vec![
        OverlayCaption {
            text: "File Name".to_string(),
            position: Vec3::new((first_x + last_x) / 2.0, bottom - 1.5, 0.0),
        },
        OverlayCaption {
            text: "File Length".to_string(),
            position: Vec3::new(left - 2.0, config.height / 2.0, 0.0),
        },
    ];

    Overlay { lines, captions }
}

/// The three axis-aligned reference grids shown in the free layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferencePlane {
    Xz,
    Xy,
    Yz,
}

impl ReferencePlane {
    pub const ALL: [ReferencePlane; 3] = [
        ReferencePlane::Xz,
        ReferencePlane::Xy,
        ReferencePlane::Yz,
    ];

    /// Grid lines spanning `[-half_extent, half_extent]` on this plane.
    pub fn grid_lines(self, half_extent: f32, divisions: u32) -> Vec<OverlayLine> {
        let divisions = divisions.max(1);
        let (u, v) = match self {
            ReferencePlane::Xz => (Vec3::X, Vec3::Z),
            ReferencePlane::Xy => (Vec3::X, Vec3::Y),
            ReferencePlane::Yz => (Vec3::Y, Vec3::Z),
        };
        let step = 2.0 * half_extent / divisions as f32;
        let mut lines = Vec::with_capacity(2 * (divisions as usize + 1));
        for i in 0..=divisions {
            let offset = -half_extent + i as f32 * step;
            let kind = if i * 2 == divisions {
                OverlayLineKind::Axis
            } else {
                OverlayLineKind::Grid
            };
            lines.push(OverlayLine {
                start: u * offset - v * half_extent,
                end: u * offset + v * half_extent,
                kind,
            });
            lines.push(OverlayLine {
                start: v * offset - u * half_extent,
                end: v * offset + u * half_extent,
                kind,
            });
        }
        lines
    }
}

/// Per-plane visibility switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneToggles {
    pub xz: bool,
    pub xy: bool,
    pub yz: bool,
}

impl Default for PlaneToggles {
    fn default() -> Self {
        Self {
            xz: true,
            xy: true,
            yz: true,
        }
    }
}

impl PlaneToggles {
    pub fn enabled(&self, plane: ReferencePlane) -> bool {
        match plane {
            ReferencePlane::Xz => self.xz,
            ReferencePlane::Xy => self.xy,
            ReferencePlane::Yz => self.yz,
        }
    }

    pub fn enable_all(&mut self) {
        *self = Self::default();
    }

    pub fn toggle(&mut self, plane: ReferencePlane) {
        let flag = match plane {
            ReferencePlane::Xz => &mut self.xz,
            ReferencePlane::Xy => &mut self.xy,
            ReferencePlane::Yz => &mut self.yz,
        };
        *flag = !*flag;
    }

    /// Whether `plane` is drawn in `mode`. Planes never show while ranked.
    pub fn visible(&self, plane: ReferencePlane, mode: ViewMode) -> bool {
        mode == ViewMode::Layout3D && self.enabled(plane)
    }
}

/// Manages the transition between free and ranked layouts.
#[derive(Debug, Clone, Default)]
pub struct ViewProjector {
    mode: ViewMode,
    snapshot: Option<Vec<Vec3>>,
    overlay: Option<Overlay>,
    config: RankingConfig,
}

impl ViewProjector {
    pub fn new(config: RankingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// The ranked overlay, present only while ranked.
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Switch modes. Returns `None` when `mode` is already active.
    pub fn set_mode(&mut self, mode: ViewMode, layout: &mut GraphLayout) -> Option<ModeTransition> {
        if mode == self.mode {
            return None;
        }
        self.mode = mode;
        match mode {
            ViewMode::Ranked2D => Some(self.enter_ranked(layout)),
            ViewMode::Layout3D => {
                self.leave_ranked(layout);
                Some(ModeTransition::LeftRanked)
            }
        }
    }

    fn enter_ranked(&mut self, layout: &mut GraphLayout) -> ModeTransition {
        if self.snapshot.is_none() {
            self.snapshot = Some(layout.positions());
        }

        let targets = ranked_targets(layout, &self.config);
        for (node, target) in layout.nodes.iter_mut().zip(targets) {
            node.target = Some(target);
        }

        // Replace rather than accumulate
        self.overlay = Some(build_overlay(layout.nodes.len(), &self.config));

        tracing::debug!("Ranked layout targets assigned for {} nodes", layout.nodes.len());
        ModeTransition::EnteredRanked {
            center: Vec3::new(0.0, self.config.height / 2.0, 0.0),
        }
    }

    fn leave_ranked(&mut self, layout: &mut GraphLayout) {
        if let Some(snapshot) = self.snapshot.take() {
            for (node, position) in layout.nodes.iter_mut().zip(snapshot) {
                node.position = position;
            }
        }
        for node in &mut layout.nodes {
            node.target = None;
        }
        self.overlay = None;
    }

    /// Ease every node toward its target. Returns true once all have arrived.
    pub fn step(&self, layout: &mut GraphLayout) -> bool {
        let mut arrived = true;
        for node in &mut layout.nodes {
            let Some(target) = node.target else {
                continue;
            };
            let remaining = target - node.position;
            if remaining.length() > self.config.arrive_epsilon {
                node.position += remaining * self.config.easing;
                arrived = false;
            } else {
                node.position = target;
            }
        }
        arrived
    }

    /// Drop the overlay and snapshot without touching positions.
    pub fn teardown(&mut self) {
        self.overlay = None;
        self.snapshot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileNode, RepoGraph};

    fn layout(lengths: &[(&str, u32)]) -> GraphLayout {
        let graph = RepoGraph {
            nodes: lengths
                .iter()
                .map(|(id, len)| FileNode {
                    id: id.to_string(),
                    name: id.to_string(),
                    edit_count: 0,
                    file_length: *len,
                })
                .collect(),
            edges: vec![],
        };
        GraphLayout::from_repo_graph(&graph)
    }

    #[test]
    fn test_targets_rank_by_length() {
        let layout = layout(&[("big", 300), ("small", 10), ("mid", 100)]);
        let config = RankingConfig::default();
        let targets = ranked_targets(&layout, &config);

        // small, mid, big -> ranks 0, 1, 2 with n/2 = 1.5
        assert_eq!(targets[1].x, -1.5 * config.spacing);
        assert_eq!(targets[2].x, -0.5 * config.spacing);
        assert_eq!(targets[0].x, 0.5 * config.spacing);
        assert_eq!(targets[1].y, 0.0);
        assert_eq!(targets[0].y, config.height);
        assert!(targets.iter().all(|t| t.z == 0.0));
    }

    #[test]
    fn test_uniform_lengths_use_unit_range() {
        let layout = layout(&[("a", 42), ("b", 42)]);
        let targets = ranked_targets(&layout, &RankingConfig::default());
        assert!(targets.iter().all(|t| t.y == 0.0 && t.y.is_finite()));

        let single = self::layout(&[("only", 7)]);
        let targets = ranked_targets(&single, &RankingConfig::default());
        assert_eq!(targets[0], Vec3::ZERO);
    }

    #[test]
    fn test_round_trip_restores_positions_exactly() {
        let mut layout = layout(&[("a", 1), ("b", 2), ("c", 3)]);
        let before = layout.positions();
        let mut projector = ViewProjector::new(RankingConfig::default());

        projector.set_mode(ViewMode::Ranked2D, &mut layout);
        for _ in 0..50 {
            projector.step(&mut layout);
        }
        assert_ne!(layout.positions(), before);

        let transition = projector.set_mode(ViewMode::Layout3D, &mut layout);
        assert_eq!(transition, Some(ModeTransition::LeftRanked));
        assert_eq!(layout.positions(), before);
        assert!(layout.nodes.iter().all(|n| n.target.is_none()));
        assert!(projector.overlay().is_none());
    }

    #[test]
    fn test_easing_converges_to_targets() {
        let mut layout = layout(&[("a", 5), ("b", 50)]);
        let mut projector = ViewProjector::new(RankingConfig::default());
        projector.set_mode(ViewMode::Ranked2D, &mut layout);

        let mut arrived = false;
        for _ in 0..2000 {
            if projector.step(&mut layout) {
                arrived = true;
                break;
            }
        }
        assert!(arrived);
        for node in &layout.nodes {
            assert_eq!(Some(node.position), node.target);
        }
    }

    #[test]
    fn test_overlay_is_rebuilt_not_accumulated() {
        let mut layout = layout(&[("a", 5), ("b", 50), ("c", 70)]);
        let config = RankingConfig::default();
        let mut projector = ViewProjector::new(config);

        projector.set_mode(ViewMode::Ranked2D, &mut layout);
        let first = projector.overlay().cloned().unwrap();
        // 4 rank ticks + 11 height ticks + 2 axes
        assert_eq!(first.lines.len(), 4 + 11 + 2);
        assert_eq!(first.captions.len(), 2);

        projector.set_mode(ViewMode::Layout3D, &mut layout);
        projector.set_mode(ViewMode::Ranked2D, &mut layout);
        assert_eq!(projector.overlay(), Some(&first));
    }

    #[test]
    fn test_planes_hidden_while_ranked() {
        let mut toggles = PlaneToggles::default();
        assert!(toggles.visible(ReferencePlane::Xz, ViewMode::Layout3D));
        assert!(!toggles.visible(ReferencePlane::Xz, ViewMode::Ranked2D));

        toggles.toggle(ReferencePlane::Yz);
        assert!(!toggles.visible(ReferencePlane::Yz, ViewMode::Layout3D));
        assert!(toggles.visible(ReferencePlane::Xy, ViewMode::Layout3D));
        toggles.enable_all();
        assert!(toggles.visible(ReferencePlane::Yz, ViewMode::Layout3D));
    }

    #[test]
    fn test_plane_grid_stays_on_its_plane() {
        let lines = ReferencePlane::Xy.grid_lines(10.0, 4);
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.start.z == 0.0 && l.end.z == 0.0));
        assert_eq!(lines.iter().filter(|l| l.kind == OverlayLineKind::Axis).count(), 2);
    }

    #[test]
    fn test_same_mode_is_noop() {
        let mut layout = layout(&[("a", 5)]);
        let mut projector = ViewProjector::new(RankingConfig::default());
        assert_eq!(projector.set_mode(ViewMode::Layout3D, &mut layout), None);
        assert!(projector.set_mode(ViewMode::Ranked2D, &mut layout).is_some());
        assert_eq!(projector.set_mode(ViewMode::Ranked2D, &mut layout), None);
    }
}
