//! End-to-end flows through the scene engine without a window.

use bevy::math::{Vec2, Vec3};
use repograph::config::Config;
use repograph::models::{FileEdge, FileNode, RepoGraph};
use repograph::visualization::director::CameraState;
use repograph::visualization::engine::{OrbitDelta, PointerSample};
use repograph::visualization::highlight::{compute_tiers, Tier};
use repograph::visualization::picking::Viewport;
use repograph::visualization::ranking::ViewMode;
use repograph::visualization::{DetailState, EngineEvent, InputSnapshot, SceneEngine};

const FRAME: f32 = 1.0 / 60.0;

fn node(id: &str, edit_count: u32, file_length: u32) -> FileNode {
    FileNode {
        id: id.to_string(),
        name: id.to_string(),
        edit_count,
        file_length,
    }
}

fn edge(id: &str, source: &str, target: &str) -> FileEdge {
    FileEdge {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
    }
}

/// A-B, B-C, A-D plus one edge pointing at a missing file.
fn fixture() -> RepoGraph {
    RepoGraph {
        nodes: vec![
            node("A", 12, 300),
            node("B", 4, 80),
            node("C", 1, 15),
            node("D", 7, 120),
        ],
        edges: vec![
            edge("ab", "A", "B"),
            edge("bc", "B", "C"),
            edge("ad", "A", "D"),
            edge("ghost", "A", "missing.rs"),
        ],
    }
}

fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

fn run(engine: &mut SceneEngine, frames: usize, dt: f32) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    for _ in 0..frames {
        events.extend(engine.step(dt, &idle()));
    }
    events
}

/// Run zero-length frames until the camera stops. Physics stays frozen.
fn settle(engine: &mut SceneEngine) {
    for _ in 0..1000 {
        if engine.director().is_idle() {
            return;
        }
        engine.step(0.0, &idle());
    }
}

#[test]
fn test_dangling_edge_is_not_laid_out() {
    let engine = SceneEngine::new(&fixture(), &Config::default());
    assert_eq!(engine.layout().nodes.len(), 4);
    assert_eq!(engine.layout().edges.len(), 3);
    assert_eq!(engine.tiers().edges.len(), 3);
}

#[test]
fn test_focus_flight_settles_within_budget() {
    let config = Config::default();
    let mut engine = SceneEngine::new(&fixture(), &config);
    let home = *engine.pose();

    engine.select("C");
    assert!(matches!(engine.director().state(), CameraState::FlyTo { .. }));

    let frames = (config.camera.focus_budget_secs / FRAME).ceil() as usize + 2;
    run(&mut engine, frames, FRAME);

    assert!(engine.director().is_idle());
    assert_ne!(*engine.pose(), home);
    assert_eq!(engine.director().saved_pose(), Some(&home));
}

#[test]
fn test_deselect_returns_camera_home() {
    let mut engine = SceneEngine::new(&fixture(), &Config::default());
    let home = *engine.pose();

    engine.select("B");
    run(&mut engine, 10, FRAME);
    assert_ne!(*engine.pose(), home);

    let events = engine.step(
        FRAME,
        &InputSnapshot {
            deselect: true,
            ..idle()
        },
    );
    assert!(events.contains(&EngineEvent::SelectionChanged {
        previous: Some("B".to_string()),
        current: None,
    }));
    assert!(matches!(
        engine.director().state(),
        CameraState::Returning { .. }
    ));

    settle(&mut engine);
    assert_eq!(*engine.pose(), home);
    assert!(engine.director().is_idle());
    assert!(engine.director().saved_pose().is_none());
    assert_eq!(engine.detail(), &DetailState::Idle);
}

#[test]
fn test_ranked_round_trip_restores_positions() {
    let mut engine = SceneEngine::new(&fixture(), &Config::default());
    let before = engine.layout().positions();

    let events = engine.step(
        0.0,
        &InputSnapshot {
            view_mode: Some(ViewMode::Ranked2D),
            ..idle()
        },
    );
    assert!(events.contains(&EngineEvent::OverlayBuilt));
    assert!(!engine.edges_visible());
    run(&mut engine, 120, FRAME);
    assert_ne!(engine.layout().positions(), before);

    // A zero-length frame keeps physics from moving the restored nodes
    let events = engine.step(
        0.0,
        &InputSnapshot {
            view_mode: Some(ViewMode::Layout3D),
            ..idle()
        },
    );
    assert!(events.contains(&EngineEvent::OverlayTornDown));
    assert_eq!(engine.layout().positions(), before);
    assert!(engine.overlay().is_none());
    assert!(engine.edges_visible());
}

#[test]
fn test_repeated_ranked_requests_build_one_overlay() {
    let mut engine = SceneEngine::new(&fixture(), &Config::default());
    let ranked = InputSnapshot {
        view_mode: Some(ViewMode::Ranked2D),
        ..idle()
    };

    let first = engine.step(FRAME, &ranked);
    let second = engine.step(FRAME, &ranked);

    assert!(first.contains(&EngineEvent::OverlayBuilt));
    assert!(!second.contains(&EngineEvent::OverlayBuilt));
    assert!(engine.overlay().is_some());
}

#[test]
fn test_stale_detail_is_dropped() {
    let mut engine = SceneEngine::new(&fixture(), &Config::default());

    engine.select("A");
    engine.select("B");

    assert!(!engine.apply_detail("A", Ok(Vec::new())));
    assert_eq!(
        engine.detail(),
        &DetailState::Loading {
            node_id: "B".to_string()
        }
    );

    assert!(engine.apply_detail("B", Ok(Vec::new())));
    assert_eq!(
        engine.detail(),
        &DetailState::Ready {
            node_id: "B".to_string(),
            commits: Vec::new(),
        }
    );
}

#[test]
fn test_teardown_stops_everything() {
    let mut engine = SceneEngine::new(&fixture(), &Config::default());
    engine.select("A");
    engine.teardown();

    let clock = engine.clock();
    let events = engine.step(
        FRAME,
        &InputSnapshot {
            toggle_view: true,
            orbit: OrbitDelta {
                yaw: 40.0,
                ..OrbitDelta::default()
            },
            ..idle()
        },
    );

    assert!(events.is_empty());
    assert!(!engine.is_alive());
    assert_eq!(engine.clock(), clock);
    assert_eq!(engine.mode(), ViewMode::Layout3D);
    assert!(engine.select("B").is_empty());
    assert!(engine.selected().is_none());
    assert!(!engine.apply_detail("A", Ok(Vec::new())));
}

#[test]
fn test_hover_emphasizes_one_hop_neighborhood() {
    let mut config = Config::default();
    config.picking.influence_strength = 0.0;
    let mut engine = SceneEngine::new(&fixture(), &config);

    engine.select("B");
    settle(&mut engine);
    assert!(engine.director().is_idle());

    let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
    let events = engine.step(
        0.0,
        &InputSnapshot {
            pointer: Some(PointerSample {
                client: Vec2::new(400.0, 300.0),
                viewport,
            }),
            ..idle()
        },
    );

    let hovered = engine.hovered().map(str::to_string);
    assert!(hovered.is_some());
    assert!(events.contains(&EngineEvent::HoverChanged(hovered.clone())));
    assert!(events.contains(&EngineEvent::TiersChanged));
    assert_eq!(
        engine.tiers(),
        &compute_tiers(engine.layout(), hovered.as_deref())
    );

    let emphasized = engine
        .tiers()
        .nodes
        .iter()
        .filter(|t| **t == Tier::Emphasis)
        .count();
    let expected = match hovered.as_deref() {
        Some("A") | Some("B") => 3,
        _ => 2,
    };
    assert_eq!(emphasized, expected);

    let events = engine.step(0.0, &idle());
    assert!(events.contains(&EngineEvent::HoverChanged(None)));
    assert!(engine.tiers().nodes.iter().all(|t| *t == Tier::Neutral));
}

#[test]
fn test_click_selects_hovered_node() {
    let mut config = Config::default();
    config.picking.influence_strength = 0.0;
    let mut engine = SceneEngine::new(&fixture(), &config);

    engine.select("D");
    settle(&mut engine);

    let events = engine.step(
        0.0,
        &InputSnapshot {
            pointer: Some(PointerSample {
                client: Vec2::new(400.0, 300.0),
                viewport: Viewport::new(0.0, 0.0, 800.0, 600.0),
            }),
            click: true,
            ..idle()
        },
    );

    let hovered = engine.hovered().map(str::to_string);
    assert!(hovered.is_some());
    assert_eq!(engine.selected(), hovered.as_deref());
    if hovered.as_deref() != Some("D") {
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::SelectionChanged { .. })));
    }
}

#[test]
fn test_focused_node_sits_in_front_of_camera() {
    let config = Config::default();
    let mut engine = SceneEngine::new(&fixture(), &config);
    let idx = engine.layout().index_of("A").expect("A is laid out");
    let target = engine.layout().nodes[idx].position;

    engine.select("A");
    settle(&mut engine);

    let offset = Vec3::from_array(config.camera.focus_offset);
    assert!(engine.pose().look_at.distance(target) < 0.05);
    assert!(engine.pose().position.distance(target + offset) < 0.05);
}

#[test]
fn test_return_after_ranked_visit_restores_pre_click_pose() {
    let mut engine = SceneEngine::new(&fixture(), &Config::default());

    engine.step(
        0.0,
        &InputSnapshot {
            view_mode: Some(ViewMode::Ranked2D),
            ..idle()
        },
    );
    settle(&mut engine);
    engine.step(
        0.0,
        &InputSnapshot {
            view_mode: Some(ViewMode::Layout3D),
            ..idle()
        },
    );
    assert!(engine.director().saved_pose().is_none());

    engine.step(
        0.0,
        &InputSnapshot {
            orbit: OrbitDelta {
                yaw: 200.0,
                ..OrbitDelta::default()
            },
            ..idle()
        },
    );
    let pre_click = *engine.pose();

    engine.select("B");
    settle(&mut engine);
    assert_ne!(*engine.pose(), pre_click);

    engine.step(
        0.0,
        &InputSnapshot {
            deselect: true,
            ..idle()
        },
    );
    settle(&mut engine);

    assert_eq!(*engine.pose(), pre_click);
    assert!(engine.director().saved_pose().is_none());
}
