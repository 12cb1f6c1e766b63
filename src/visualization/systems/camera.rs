//! Camera transform from the engine pose.

use bevy::prelude::*;

use crate::visualization::resources::EngineRes;

/// Point the 3D camera along the engine's current pose.
///
/// Flights, returns, and manual orbit all happen inside the engine; this
/// system only copies the result.
pub fn apply_camera_pose_system(
    engine: Res<EngineRes>,
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
) {
    let pose = engine.0.pose();
    if let Ok(mut transform) = camera_query.get_single_mut() {
        *transform = Transform::from_translation(pose.position).looking_at(pose.look_at, Vec3::Y);
    }
}
