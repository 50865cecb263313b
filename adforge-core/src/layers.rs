//! Z-order and alignment over the element set.
//!
//! These are raw scene mutations; the session wraps them with lock filtering
//! and history recording.

use serde::{Deserialize, Serialize};

use crate::geometry::{visual_bounds, Bounds};
use crate::{CoreError, CoreResult, ElementId, Scene};

/// Spacing of normalized z-indices.
pub const Z_STEP: i32 = 10;

/// A paint-order move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderMove {
    /// Above every other element.
    Front,
    /// Below every other element.
    Back,
    /// One step up.
    Forward,
    /// One step down.
    Backward,
}

/// An alignment edge or axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlignEdge {
    /// Left edges meet.
    Left,
    /// Horizontal centers meet.
    CenterHorizontal,
    /// Right edges meet.
    Right,
    /// Top edges meet.
    Top,
    /// Vertical middles meet.
    Middle,
    /// Bottom edges meet.
    Bottom,
}

/// What the targets align against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignTarget {
    /// The page rectangle.
    #[default]
    Page,
    /// The union bounds of the targets themselves.
    Selection,
}

/// Rewrite every z-index to a dense multiple of [`Z_STEP`] in current paint order.
pub fn normalize_z(scene: &mut Scene) {
    let order: Vec<ElementId> = scene.paint_order().iter().map(|e| e.id).collect();
    for (rank, id) in (1_i32..).zip(order) {
        if let Some(el) = scene.get_element_mut(id) {
            el.style.z_index = rank * Z_STEP;
        }
    }
}

/// Move one element in paint order. Returns whether paint order changed.
///
/// Indices are normalized first so repeated moves never collide or drift.
///
/// # Errors
///
/// Returns an error if the element is not in the scene.
pub fn reorder(scene: &mut Scene, id: ElementId, mv: ReorderMove) -> CoreResult<bool> {
    let order: Vec<ElementId> = scene.paint_order().iter().map(|e| e.id).collect();
    let pos = order
        .iter()
        .position(|&e| e == id)
        .ok_or_else(|| CoreError::ElementNotFound(id.to_string()))?;
    let last = order.len() - 1;

    let neighbour = match mv {
        ReorderMove::Front | ReorderMove::Forward if pos == last => return Ok(false),
        ReorderMove::Back | ReorderMove::Backward if pos == 0 => return Ok(false),
        ReorderMove::Forward => Some(order[pos + 1]),
        ReorderMove::Backward => Some(order[pos - 1]),
        ReorderMove::Front | ReorderMove::Back => None,
    };

    normalize_z(scene);
    let max = scene.max_z_index().unwrap_or(0);
    let min = scene.min_z_index().unwrap_or(0);
    let own = scene.get_element(id).map_or(0, |e| e.z_index());

    match (mv, neighbour) {
        (ReorderMove::Front, _) => set_z(scene, id, max + Z_STEP),
        (ReorderMove::Back, _) => set_z(scene, id, min - Z_STEP),
        (_, Some(other)) => {
            let theirs = scene.get_element(other).map_or(0, |e| e.z_index());
            set_z(scene, id, theirs);
            set_z(scene, other, own);
        }
        (_, None) => return Ok(false),
    }
    tracing::debug!(%id, ?mv, "element reordered");
    Ok(true)
}

fn set_z(scene: &mut Scene, id: ElementId, z: i32) {
    if let Some(el) = scene.get_element_mut(id) {
        el.style.z_index = z;
    }
}

/// Align `ids` to an edge of the page or of their common bounds.
/// Returns whether any element moved.
pub fn align(scene: &mut Scene, ids: &[ElementId], edge: AlignEdge, target: AlignTarget) -> bool {
    let boxes: Vec<(ElementId, Bounds)> = ids
        .iter()
        .filter_map(|&id| scene.get_element(id).map(|e| (id, visual_bounds(&e.transform))))
        .collect();
    let Some(frame) = (match target {
        AlignTarget::Page => Some(Bounds::from_xywh(0.0, 0.0, scene.width(), scene.height())),
        AlignTarget::Selection => boxes.iter().map(|(_, b)| *b).reduce(Bounds::union),
    }) else {
        return false;
    };

    let mut moved = false;
    for (id, b) in boxes {
        let (dx, dy) = match edge {
            AlignEdge::Left => (frame.min_x - b.min_x, 0.0),
            AlignEdge::CenterHorizontal => (frame.center().x - b.center().x, 0.0),
            AlignEdge::Right => (frame.max_x - b.max_x, 0.0),
            AlignEdge::Top => (0.0, frame.min_y - b.min_y),
            AlignEdge::Middle => (0.0, frame.center().y - b.center().y),
            AlignEdge::Bottom => (0.0, frame.max_y - b.max_y),
        };
        if dx.abs() < f32::EPSILON && dy.abs() < f32::EPSILON {
            continue;
        }
        if let Some(el) = scene.get_element_mut(id) {
            el.transform.x += dx;
            el.transform.y += dy;
            moved = true;
        }
    }
    moved
}
