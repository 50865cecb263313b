//! Tunable constants of the editing engine.

use serde::{Deserialize, Serialize};

use crate::history::HISTORY_LIMIT;

/// Thresholds and step sizes used by the session and interaction controller.
///
/// Distances are page-space units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
    /// Pointer travel before a press becomes a drag.
    pub drag_threshold: f32,
    /// Distance from the page center at which a dragged element snaps to it.
    pub center_snap_threshold: f32,
    /// Minimum width and height while resizing.
    pub min_size: f32,
    /// Rotation snap increment in degrees.
    pub rotation_snap_step: f32,
    /// Rotation snaps when within this many degrees of an increment.
    pub rotation_snap_tolerance: f32,
    /// Background zoom change per wheel delta unit.
    pub wheel_sensitivity: f32,
    /// Background zoom change per page unit of handle travel.
    pub background_resize_sensitivity: f32,
    /// Offset applied to both axes of a duplicate.
    pub duplicate_offset: f32,
    /// Hit radius of resize/rotate/lock handles.
    pub handle_radius: f32,
    /// Distance of the rotate handle above the element's top edge.
    pub rotate_handle_offset: f32,
    /// Arrow-key nudge distance.
    pub nudge_step: f32,
    /// Arrow-key nudge distance with shift held.
    pub nudge_step_large: f32,
    /// Undoable edits retained by the history.
    pub history_limit: usize,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 2.0,
            center_snap_threshold: 10.0,
            min_size: 20.0,
            rotation_snap_step: 45.0,
            rotation_snap_tolerance: 5.0,
            wheel_sensitivity: 0.001,
            background_resize_sensitivity: 0.002,
            duplicate_offset: 20.0,
            handle_radius: 16.0,
            rotate_handle_offset: 40.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            history_limit: HISTORY_LIMIT,
        }
    }
}
