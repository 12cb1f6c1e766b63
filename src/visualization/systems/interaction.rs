//! Input gathering.
//!
//! All pointer and keyboard input is folded into one [`InputSnapshot`] per
//! frame. Nothing here touches scene state directly.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

use crate::visualization::engine::{InputSnapshot, OrbitDelta, PointerSample};
use crate::visualization::picking::Viewport;
use crate::visualization::ranking::ReferencePlane;
use crate::visualization::resources::FrameInput;

/// Collect this frame's input.
///
/// Controls:
/// - Left-click: select the node under the pointer
/// - Escape: deselect
/// - Tab: toggle the ranked view
/// - Right-click drag: orbit
/// - Scroll wheel: zoom
/// - WASD: pan horizontally
/// - Q/E: pan vertically
/// - 1/2/3: toggle the XZ/XY/YZ reference grids
pub fn gather_input_system(
    mut input: ResMut<FrameInput>,
    windows: Query<&Window>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll: EventReader<MouseWheel>,
) {
    let mut snapshot = InputSnapshot::default();

    if let Ok(window) = windows.get_single() {
        snapshot.pointer = window.cursor_position().map(|client| PointerSample {
            client,
            viewport: Viewport::new(0.0, 0.0, window.width(), window.height()),
        });
    }
    snapshot.click = mouse_button.just_pressed(MouseButton::Left);
    snapshot.deselect = keyboard.just_pressed(KeyCode::Escape);
    snapshot.toggle_view = keyboard.just_pressed(KeyCode::Tab);

    let mut orbit = OrbitDelta::default();
    if mouse_button.pressed(MouseButton::Right) {
        for ev in mouse_motion.read() {
            orbit.yaw += ev.delta.x;
            orbit.pitch += ev.delta.y;
        }
    } else {
        mouse_motion.clear();
    }
    for ev in scroll.read() {
        orbit.zoom += ev.y;
    }

    let pan_keys = [
        (KeyCode::KeyD, Vec3::X),
        (KeyCode::KeyA, Vec3::NEG_X),
        (KeyCode::KeyE, Vec3::Y),
        (KeyCode::KeyQ, Vec3::NEG_Y),
        (KeyCode::KeyW, Vec3::Z),
        (KeyCode::KeyS, Vec3::NEG_Z),
    ];
    for (key, direction) in pan_keys {
        if keyboard.pressed(key) {
            orbit.pan += direction;
        }
    }
    snapshot.orbit = orbit;

    let plane_keys = [
        (KeyCode::Digit1, ReferencePlane::Xz),
        (KeyCode::Digit2, ReferencePlane::Xy),
        (KeyCode::Digit3, ReferencePlane::Yz),
    ];
    snapshot.plane_toggles = plane_keys
        .into_iter()
        .filter(|(key, _)| keyboard.just_pressed(*key))
        .map(|(_, plane)| plane)
        .collect();

    input.0 = snapshot;
}
