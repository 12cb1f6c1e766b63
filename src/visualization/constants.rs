//! Visual constants for the scene.

use bevy::prelude::*;

// =============================================================================
// Colors
// =============================================================================

/// Window background.
pub const COLOR_BACKGROUND: Color = Color::srgb(0.05, 0.05, 0.08);
/// Reference grid line color.
pub const COLOR_PLANE_GRID: Color = Color::srgba(0.4, 0.4, 0.5, 0.25);
/// Reference grid center line color.
pub const COLOR_PLANE_AXIS: Color = Color::srgba(0.6, 0.6, 0.7, 0.5);
/// Ranked overlay axis color.
pub const COLOR_OVERLAY_AXIS: Color = Color::srgb(0.9, 0.9, 0.9);
/// Ranked overlay tick color.
pub const COLOR_OVERLAY_GRID: Color = Color::srgba(0.5, 0.5, 0.6, 0.35);
/// Panel background.
pub const COLOR_PANEL: Color = Color::srgba(0.1, 0.1, 0.15, 0.9);
/// Label text color.
pub const COLOR_LABEL: Color = Color::srgba(0.85, 0.85, 0.85, 0.8);

// =============================================================================
// Geometry
// =============================================================================

/// Edge cylinder radius.
pub const EDGE_RADIUS: f32 = 0.04;
/// Grid and overlay line radius.
pub const LINE_RADIUS: f32 = 0.02;
/// Half-size of each reference grid.
pub const PLANE_HALF_EXTENT: f32 = 30.0;
/// Cells along each side of a reference grid.
pub const PLANE_DIVISIONS: u32 = 12;
/// Label height above its node, in world units.
pub const LABEL_OFFSET: f32 = 1.5;

// =============================================================================
// Text
// =============================================================================

pub const LABEL_FONT_SIZE: f32 = 10.0;
pub const CAPTION_FONT_SIZE: f32 = 14.0;
pub const PANEL_TITLE_FONT_SIZE: f32 = 16.0;
pub const PANEL_BODY_FONT_SIZE: f32 = 13.0;
