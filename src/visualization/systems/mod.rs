//! ECS systems for the scene.
//!
//! Systems are functions that operate on components and resources each frame.

pub mod camera;
pub mod detail;
pub mod interaction;
pub mod lifecycle;
pub mod overlay;
pub mod physics;
pub mod ui;

pub use camera::apply_camera_pose_system;
pub use detail::{poll_detail_fetch_system, start_detail_fetch_system};
pub use interaction::gather_input_system;
pub use lifecycle::teardown_system;
pub use overlay::{overlay_lifecycle_system, plane_visibility_system};
pub use physics::{engine_step_system, sync_transforms_system};
pub use ui::{
    update_detail_panel_system, update_highlight_materials_system, update_info_panel_system,
    update_labels_system, update_overlay_captions_system,
};
