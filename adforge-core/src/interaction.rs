//! Pointer and keyboard driven editing.
//!
//! [`InteractionController`] is a single-gesture state machine over a
//! [`Session`]. Pointer positions arrive in view space and are divided by the
//! view zoom before touching page geometry. Gestures mutate the scene live and
//! record one history entry when the pointer is released.

use serde::{Deserialize, Serialize};

use crate::geometry::{
    corners, local_to_page, rotation_from_pointer, snap_rotation, snap_to_center,
    Point,
};
use crate::{
    background::clamp_scale, ElementId, ElementPatch, InteractionConfig, Scene, Selection, Session,
    Transform,
};

/// A control drawn around the single selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    /// Above the top edge; rotates about the center.
    Rotate,
    /// Bottom-right corner; grows the box.
    Resize,
    /// Top-right corner; toggles the lock.
    Lock,
}

/// What lies under a page-space point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "camelCase")]
pub enum HitTarget {
    /// A handle of the selected element.
    Handle {
        /// Owner of the handle.
        id: ElementId,
        /// Which handle.
        handle: Handle,
    },
    /// An element body.
    Element {
        /// The topmost element under the point.
        id: ElementId,
    },
    /// The background zoom handle in the bottom-right page corner.
    BackgroundResize,
    /// Empty canvas.
    Canvas,
}

/// Resolve the topmost target under `point`.
///
/// Handles of a single selected element win over element bodies, bodies are
/// tested in descending paint order, and the background handle is only live
/// when nothing is selected and the background is an image.
#[must_use]
pub fn hit_test(
    scene: &Scene,
    selection: &Selection,
    point: Point,
    config: &InteractionConfig,
) -> HitTarget {
    let near = |p: Point| point.delta_from(p).length() <= config.handle_radius;

    if let Some(el) = selection.single().and_then(|id| scene.get_element(id)) {
        let [_, top_right, bottom_right, _] = corners(&el.transform);
        let handles = [
            (Handle::Rotate, rotate_handle(&el.transform, config.rotate_handle_offset)),
            (Handle::Resize, bottom_right),
            (Handle::Lock, top_right),
        ];
        if let Some((handle, _)) = handles.into_iter().find(|(_, p)| near(*p)) {
            return HitTarget::Handle { id: el.id, handle };
        }
    }

    if let Some(id) = scene.element_at(point) {
        return HitTarget::Element { id };
    }

    if selection.is_empty()
        && scene.background.is_image()
        && near(Point::new(scene.width(), scene.height()))
    {
        return HitTarget::BackgroundResize;
    }
    HitTarget::Canvas
}

fn rotate_handle(t: &Transform, offset: f32) -> Point {
    let top = local_to_page(t, t.center(), 0.0, -t.height / 2.0);
    let (sin, cos) = t.rotation.to_radians().sin_cos();
    Point::new(top.x + sin * offset, top.y - cos * offset)
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Shift.
    pub shift: bool,
    /// The platform command key (Ctrl, or Cmd on macOS).
    pub command: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        command: false,
    };
    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        command: false,
    };
    /// Command only.
    pub const COMMAND: Self = Self {
        shift: false,
        command: true,
    };
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// Forward delete.
    Delete,
    /// Backspace.
    Backspace,
    /// Escape.
    Escape,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// A printable character.
    Char(char),
}

/// Observable gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureState {
    /// No gesture.
    Idle,
    /// Pressed on an element, not yet past the drag threshold.
    PendingDrag,
    /// Moving the selection.
    Dragging,
    /// Resizing the single selection.
    Resizing,
    /// Rotating the single selection.
    Rotating,
    /// Panning the background image.
    BackgroundDragging,
    /// Zooming the background image.
    BackgroundResizing,
    /// Editing the content of a text or cta element.
    EditingText,
}

#[derive(Debug, Clone)]
enum Gesture {
    Idle,
    PendingDrag {
        origin: Point,
        starts: Vec<(ElementId, Transform)>,
        target: ElementId,
        select_on_release: bool,
    },
    Dragging {
        origin: Point,
        starts: Vec<(ElementId, Transform)>,
    },
    Resizing {
        origin: Point,
        id: ElementId,
        start: Transform,
        start_font_size: Option<f32>,
    },
    Rotating {
        id: ElementId,
    },
    BackgroundDragging {
        origin: Point,
        start: Point,
    },
    BackgroundResizing {
        origin: Point,
        start_scale: f32,
    },
    EditingText {
        id: ElementId,
        draft: String,
    },
}

impl Gesture {
    fn state(&self) -> GestureState {
        match self {
            Self::Idle => GestureState::Idle,
            Self::PendingDrag { .. } => GestureState::PendingDrag,
            Self::Dragging { .. } => GestureState::Dragging,
            Self::Resizing { .. } => GestureState::Resizing,
            Self::Rotating { .. } => GestureState::Rotating,
            Self::BackgroundDragging { .. } => GestureState::BackgroundDragging,
            Self::BackgroundResizing { .. } => GestureState::BackgroundResizing,
            Self::EditingText { .. } => GestureState::EditingText,
        }
    }
}

/// Translates raw pointer and key events into session mutations.
#[derive(Debug, Clone)]
pub struct InteractionController {
    session: Session,
    zoom: f32,
    gesture: Gesture,
}

impl InteractionController {
    /// Wrap a session at 100% view zoom.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            zoom: 1.0,
            gesture: Gesture::Idle,
        }
    }

    /// The session being edited.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access for panel-driven operations. Only use while idle.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// View zoom factor (view units per page unit).
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Change the view zoom. Non-positive values are ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom > f32::EPSILON {
            self.zoom = zoom;
        }
    }

    /// The active gesture.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.gesture.state()
    }

    /// The element being edited in place and its uncommitted text.
    #[must_use]
    pub fn text_draft(&self) -> Option<(ElementId, &str)> {
        match &self.gesture {
            Gesture::EditingText { id, draft } => Some((*id, draft.as_str())),
            _ => None,
        }
    }

    fn config(&self) -> InteractionConfig {
        *self.session.config()
    }

    // ------------------------------------------------------------------
    // Pointer
    // ------------------------------------------------------------------

    /// Pointer pressed at a view-space position.
    ///
    /// Pressing while a text edit is open commits it first. Any other active
    /// gesture makes the press a no-op.
    pub fn pointer_down(&mut self, view: Point, modifiers: Modifiers) {
        if matches!(self.gesture, Gesture::EditingText { .. }) {
            self.commit_text();
        }
        if !matches!(self.gesture, Gesture::Idle) {
            return;
        }

        let origin = view.to_page(self.zoom);
        let config = self.config();
        let target = hit_test(
            self.session.scene(),
            self.session.selection(),
            origin,
            &config,
        );
        tracing::trace!(?target, "pointer down");

        self.gesture = match target {
            HitTarget::Handle {
                id,
                handle: Handle::Lock,
            } => {
                let locked = self
                    .session
                    .scene()
                    .get_element(id)
                    .is_some_and(|e| e.locked);
                if let Err(err) = self.session.set_locked(&[id], !locked) {
                    tracing::warn!(%id, error = %err, "lock toggle failed");
                }
                Gesture::Idle
            }
            HitTarget::Handle { id, handle } => self.start_handle_gesture(id, handle, origin),
            HitTarget::Element { id } => self.press_element(id, origin, modifiers),
            HitTarget::BackgroundResize => Gesture::BackgroundResizing {
                origin,
                start_scale: self.session.scene().background.scale,
            },
            HitTarget::Canvas => {
                if !modifiers.shift {
                    self.session.clear_selection();
                }
                let bg = &self.session.scene().background;
                if self.session.selection().is_empty() && bg.is_image() {
                    Gesture::BackgroundDragging {
                        origin,
                        start: Point::new(bg.x, bg.y),
                    }
                } else {
                    Gesture::Idle
                }
            }
        };
    }

    fn start_handle_gesture(&self, id: ElementId, handle: Handle, origin: Point) -> Gesture {
        let Some(el) = self.session.scene().get_element(id) else {
            return Gesture::Idle;
        };
        if el.locked {
            tracing::debug!(%id, "locked element ignored");
            return Gesture::Idle;
        }
        match handle {
            Handle::Resize => Gesture::Resizing {
                origin,
                id,
                start: el.transform,
                start_font_size: el
                    .kind
                    .is_textual()
                    .then_some(el.style.font_size)
                    .flatten(),
            },
            Handle::Rotate => Gesture::Rotating { id },
            Handle::Lock => Gesture::Idle,
        }
    }

    fn press_element(&mut self, id: ElementId, origin: Point, modifiers: Modifiers) -> Gesture {
        if modifiers.shift {
            if let Err(err) = self.session.toggle_selection(id) {
                tracing::warn!(%id, error = %err, "selection toggle failed");
            }
            return Gesture::Idle;
        }

        // keep a multi-selection so it can be dragged as a whole
        let select_on_release = self.session.selection().contains(id);
        if !select_on_release && self.session.select(id).is_err() {
            return Gesture::Idle;
        }

        let scene = self.session.scene();
        if !scene.get_element(id).is_some_and(|e| !e.locked) {
            return Gesture::Idle;
        }
        let starts = self
            .session
            .selection()
            .ids()
            .iter()
            .filter_map(|&sid| scene.get_element(sid))
            .filter(|e| !e.locked)
            .map(|e| (e.id, e.transform))
            .collect();
        Gesture::PendingDrag {
            origin,
            starts,
            target: id,
            select_on_release,
        }
    }

    /// Pointer moved to a view-space position.
    pub fn pointer_move(&mut self, view: Point) {
        let point = view.to_page(self.zoom);
        let config = self.config();

        if let Gesture::PendingDrag { origin, starts, .. } = &self.gesture {
            if point.delta_from(*origin).length() <= config.drag_threshold {
                return;
            }
            let dragging = Gesture::Dragging {
                origin: *origin,
                starts: starts.clone(),
            };
            self.gesture = dragging;
        }

        // center snap applies to single selections only, even if a larger
        // selection has just one unlocked member
        let single = self.session.selection().len() == 1;
        let scene = self.session.scene_mut();
        match &self.gesture {
            Gesture::Dragging { origin, starts } => {
                let delta = point.delta_from(*origin);
                let page_center = scene.center();
                for (id, start) in starts {
                    let Some(el) = scene.get_element_mut(*id) else {
                        continue;
                    };
                    let mut x = start.x + delta.x;
                    let mut y = start.y + delta.y;
                    if single {
                        let half_w = start.width / 2.0;
                        let half_h = start.height / 2.0;
                        if let Some(cx) =
                            snap_to_center(x + half_w, page_center.x, config.center_snap_threshold)
                        {
                            x = cx - half_w;
                        }
                        if let Some(cy) =
                            snap_to_center(y + half_h, page_center.y, config.center_snap_threshold)
                        {
                            y = cy - half_h;
                        }
                    }
                    el.transform.x = x;
                    el.transform.y = y;
                }
            }
            Gesture::Resizing {
                origin,
                id,
                start,
                start_font_size,
            } => {
                let delta = point.delta_from(*origin);
                if let Some(el) = scene.get_element_mut(*id) {
                    let width = (start.width + delta.x).max(config.min_size);
                    let height = (start.height + delta.y).max(config.min_size);
                    el.transform.width = width;
                    el.transform.height = height;
                    if let Some(font) = start_font_size {
                        if start.width > f32::EPSILON {
                            el.style.font_size = Some((font * width / start.width).round());
                        }
                    }
                }
            }
            Gesture::Rotating { id } => {
                if let Some(el) = scene.get_element_mut(*id) {
                    let angle = rotation_from_pointer(el.transform.center(), point);
                    el.transform.rotation = snap_rotation(
                        angle,
                        config.rotation_snap_step,
                        config.rotation_snap_tolerance,
                    );
                }
            }
            Gesture::BackgroundDragging { origin, start } => {
                let delta = point.delta_from(*origin);
                scene.background.x = start.x + delta.x;
                scene.background.y = start.y + delta.y;
            }
            Gesture::BackgroundResizing {
                origin,
                start_scale,
            } => {
                let delta = point.delta_from(*origin);
                scene.background.scale = clamp_scale(
                    start_scale + (delta.x + delta.y) * config.background_resize_sensitivity,
                );
            }
            Gesture::Idle | Gesture::PendingDrag { .. } | Gesture::EditingText { .. } => {}
        }
    }

    /// Pointer released. Completed gestures record one history entry.
    pub fn pointer_up(&mut self, _view: Point) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::PendingDrag {
                target,
                select_on_release,
                ..
            } => {
                if select_on_release {
                    self.session.selection_mut().replace(target);
                }
                let editable = self
                    .session
                    .scene()
                    .get_element(target)
                    .filter(|e| e.kind.is_textual() && !e.locked)
                    .map(|e| e.kind.content().to_string());
                if let Some(draft) = editable {
                    self.gesture = Gesture::EditingText { id: target, draft };
                }
            }
            Gesture::Dragging { .. } => {
                self.session.commit("drag");
            }
            Gesture::Resizing { .. } => {
                self.session.commit("resize");
            }
            Gesture::Rotating { .. } => {
                self.session.commit("rotate");
            }
            Gesture::BackgroundDragging { .. } => {
                self.session.commit("pan background");
            }
            Gesture::BackgroundResizing { .. } => {
                self.session.commit("zoom background");
            }
            gesture @ Gesture::EditingText { .. } => self.gesture = gesture,
            Gesture::Idle => {}
        }
    }

    /// Wheel over the canvas. Zooms the background image when nothing is
    /// selected; each event is one history entry.
    pub fn wheel(&mut self, delta_y: f32) -> bool {
        if !matches!(self.gesture, Gesture::Idle) || !self.session.selection().is_empty() {
            return false;
        }
        if !self.session.scene().background.is_image() {
            return false;
        }
        let sensitivity = self.config().wheel_sensitivity;
        let scale = self.session.scene().background.scale - delta_y * sensitivity;
        self.session.set_background_scale(scale)
    }

    // ------------------------------------------------------------------
    // Text editing
    // ------------------------------------------------------------------

    /// Replace the uncommitted text of the open edit.
    pub fn update_text_draft(&mut self, text: impl Into<String>) {
        if let Gesture::EditingText { draft, .. } = &mut self.gesture {
            *draft = text.into();
        }
    }

    /// Close the open text edit, writing its draft. Returns whether the
    /// content changed.
    pub fn commit_text(&mut self) -> bool {
        let Gesture::EditingText { id, draft } = std::mem::replace(&mut self.gesture, Gesture::Idle)
        else {
            return false;
        };
        let changed = self
            .session
            .scene()
            .get_element(id)
            .is_some_and(|e| e.kind.content() != draft);
        let patch = ElementPatch::new().set("content", draft);
        match self.session.update_elements(&[id], &patch) {
            Ok(n) => changed && n > 0,
            Err(err) => {
                tracing::warn!(%id, error = %err, "text edit dropped");
                false
            }
        }
    }

    /// Close the open text edit without writing.
    pub fn cancel_text_edit(&mut self) {
        if matches!(self.gesture, Gesture::EditingText { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    /// Handle a key press. Returns whether the key was consumed.
    ///
    /// While a text edit is open only Escape is handled; everything else
    /// belongs to the text field.
    pub fn key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        if matches!(self.gesture, Gesture::EditingText { .. }) {
            if key == Key::Escape {
                self.cancel_text_edit();
                return true;
            }
            return false;
        }
        if !matches!(self.gesture, Gesture::Idle) {
            return false;
        }

        let config = self.config();
        let selected = self.session.selection().ids().to_vec();
        let step = if modifiers.shift {
            config.nudge_step_large
        } else {
            config.nudge_step
        };

        let result = match (key, modifiers.command) {
            (Key::Delete | Key::Backspace, false) => {
                self.session.delete_elements(&selected).map(|n| n > 0)
            }
            (Key::Char('d' | 'D'), true) => self
                .session
                .duplicate_elements(&selected)
                .map(|ids| !ids.is_empty()),
            (Key::Char('z' | 'Z'), true) if modifiers.shift => Ok(self.session.redo()),
            (Key::Char('z' | 'Z'), true) => Ok(self.session.undo()),
            (Key::Char('y' | 'Y'), true) => Ok(self.session.redo()),
            (Key::Escape, _) => {
                self.session.clear_selection();
                Ok(true)
            }
            (Key::ArrowUp, false) => self.session.nudge(&selected, 0.0, -step).map(|n| n > 0),
            (Key::ArrowDown, false) => self.session.nudge(&selected, 0.0, step).map(|n| n > 0),
            (Key::ArrowLeft, false) => self.session.nudge(&selected, -step, 0.0).map(|n| n > 0),
            (Key::ArrowRight, false) => self.session.nudge(&selected, step, 0.0).map(|n| n > 0),
            _ => return false,
        };
        result.unwrap_or_else(|err| {
            tracing::warn!(?key, error = %err, "shortcut failed");
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ElementTemplate;
    use crate::{AspectRatio, Background};

    fn controller_with(template: &ElementTemplate) -> (InteractionController, ElementId) {
        let mut session = Session::new(AspectRatio::Square);
        let id = session.add_element(template);
        session.clear_selection();
        (InteractionController::new(session), id)
    }

    fn transform(c: &InteractionController, id: ElementId) -> Transform {
        c.session()
            .scene()
            .get_element(id)
            .map(|e| e.transform)
            .expect("element")
    }

    #[test]
    fn test_drag_commits_once_on_release() {
        let (mut c, id) = controller_with(&ElementTemplate::Rectangle);
        let start = transform(&c, id);
        let entries = c.session().history().len();

        c.pointer_down(Point::new(400.0, 500.0), Modifiers::NONE);
        assert_eq!(c.state(), GestureState::PendingDrag);
        c.pointer_move(Point::new(401.0, 500.0));
        assert_eq!(c.state(), GestureState::PendingDrag);
        for step in 1..=10_u8 {
            let d = f32::from(step) * 10.0;
            c.pointer_move(Point::new(400.0 + d, 500.0 + d));
        }
        assert_eq!(c.state(), GestureState::Dragging);
        assert_eq!(c.session().history().len(), entries);

        c.pointer_up(Point::new(500.0, 600.0));
        assert_eq!(c.state(), GestureState::Idle);
        assert_eq!(c.session().history().len(), entries + 1);
        let moved = transform(&c, id);
        assert_eq!((moved.x, moved.y), (start.x + 100.0, start.y + 100.0));
    }

    #[test]
    fn test_drag_delta_is_divided_by_zoom() {
        let (mut c, id) = controller_with(&ElementTemplate::Rectangle);
        let start = transform(&c, id);
        c.set_zoom(2.0);
        c.pointer_down(Point::new(800.0, 1000.0), Modifiers::NONE);
        c.pointer_move(Point::new(900.0, 1100.0));
        c.pointer_up(Point::new(900.0, 1100.0));
        let moved = transform(&c, id);
        assert_eq!((moved.x, moved.y), (start.x + 50.0, start.y + 50.0));
    }

    #[test]
    fn test_single_drag_snaps_to_page_center() {
        let (mut c, id) = controller_with(&ElementTemplate::Rectangle);
        // rectangle starts centered at (540, 540); move it 30 right then 6 back
        c.pointer_down(Point::new(540.0, 540.0), Modifiers::NONE);
        c.pointer_move(Point::new(570.0, 540.0));
        assert!((transform(&c, id).x - 420.0).abs() < 1e-3);
        c.pointer_move(Point::new(546.0, 543.0));
        let t = transform(&c, id);
        assert!((t.center().x - 540.0).abs() < 1e-3);
        assert!((t.center().y - 540.0).abs() < 1e-3);
    }

    #[test]
    fn test_drag_with_locked_member_moves_only_unlocked() {
        let mut session = Session::new(AspectRatio::Square);
        let logo = session.add_element(&ElementTemplate::Logo {
            src: "logo.png".to_string(),
        });
        let rect = session.add_element(&ElementTemplate::Rectangle);
        session.set_locked(&[logo], true).expect("lock");
        session.select(logo).expect("select");
        session.toggle_selection(rect).expect("toggle");
        let mut c = InteractionController::new(session);
        let logo_start = transform(&c, logo);
        let rect_start = transform(&c, rect);
        let entries = c.session().history().len();

        // rect center lands 5 below the page center: a single drag would snap
        c.pointer_down(Point::new(540.0, 540.0), Modifiers::NONE);
        c.pointer_move(Point::new(574.0, 545.0));
        assert_eq!(c.state(), GestureState::Dragging);
        c.pointer_up(Point::new(574.0, 545.0));

        let moved = transform(&c, rect);
        assert_eq!((moved.x, moved.y), (rect_start.x + 34.0, rect_start.y + 5.0));
        assert_eq!(transform(&c, logo), logo_start);
        assert_eq!(c.session().history().len(), entries + 1);
        assert_eq!(c.session().selection().ids(), &[logo, rect]);
    }

    #[test]
    fn test_click_on_text_opens_editor() {
        let (mut c, id) = controller_with(&ElementTemplate::Heading);
        let center = transform(&c, id).center();
        c.pointer_down(center, Modifiers::NONE);
        c.pointer_up(center);
        assert_eq!(c.state(), GestureState::EditingText);
        assert_eq!(c.text_draft(), Some((id, "Add a heading")));

        assert!(!c.key(Key::Delete, Modifiers::NONE));
        c.update_text_draft("Summer Sale");
        assert!(c.commit_text());
        let el = c.session().scene().get_element(id).expect("element");
        assert_eq!(el.kind.content(), "Summer Sale");
    }

    #[test]
    fn test_escape_cancels_text_edit() {
        let (mut c, id) = controller_with(&ElementTemplate::Body);
        let center = transform(&c, id).center();
        c.pointer_down(center, Modifiers::NONE);
        c.pointer_up(center);
        c.update_text_draft("discarded");
        assert!(c.key(Key::Escape, Modifiers::NONE));
        assert_eq!(c.state(), GestureState::Idle);
        let el = c.session().scene().get_element(id).expect("element");
        assert_eq!(el.kind.content(), "Add a little bit of body text");
    }

    #[test]
    fn test_resize_scales_font_with_width() {
        let (mut c, id) = controller_with(&ElementTemplate::Heading);
        c.session_mut().select(id).expect("select");
        let t = transform(&c, id);
        let corner = Point::new(t.x + t.width, t.y + t.height);

        c.pointer_down(corner, Modifiers::NONE);
        assert_eq!(c.state(), GestureState::Resizing);
        c.pointer_move(Point::new(corner.x - 400.0, corner.y - 500.0));
        c.pointer_up(Point::new(corner.x - 400.0, corner.y - 500.0));

        let el = c.session().scene().get_element(id).expect("element");
        assert_eq!(el.transform.width, 400.0);
        assert_eq!(el.transform.height, 20.0);
        assert_eq!(el.style.font_size, Some(32.0));
    }

    #[test]
    fn test_rotate_snaps_near_multiples_of_45() {
        let (mut c, id) = controller_with(&ElementTemplate::Rectangle);
        c.session_mut().select(id).expect("select");
        let t = transform(&c, id);
        let handle = rotate_handle(&t, c.session().config().rotate_handle_offset);
        let center = t.center();

        c.pointer_down(handle, Modifiers::NONE);
        assert_eq!(c.state(), GestureState::Rotating);
        // 93° from straight up
        let (sin, cos) = 93.0_f32.to_radians().sin_cos();
        c.pointer_move(Point::new(center.x + sin * 200.0, center.y - cos * 200.0));
        assert!((transform(&c, id).rotation - 90.0).abs() < 1e-3);
        let (sin, cos) = 70.0_f32.to_radians().sin_cos();
        c.pointer_move(Point::new(center.x + sin * 200.0, center.y - cos * 200.0));
        assert!((transform(&c, id).rotation - 70.0).abs() < 1e-2);
        c.pointer_up(handle);
        assert_eq!(c.state(), GestureState::Idle);
    }

    #[test]
    fn test_locked_element_cannot_be_dragged() {
        let (mut c, id) = controller_with(&ElementTemplate::Rectangle);
        c.session_mut().set_locked(&[id], true).expect("lock");
        let start = transform(&c, id);
        let entries = c.session().history().len();

        c.pointer_down(Point::new(540.0, 540.0), Modifiers::NONE);
        assert_eq!(c.state(), GestureState::Idle);
        assert!(c.session().selection().contains(id));
        c.pointer_move(Point::new(700.0, 700.0));
        c.pointer_up(Point::new(700.0, 700.0));
        assert_eq!(transform(&c, id), start);
        assert_eq!(c.session().history().len(), entries);
    }

    #[test]
    fn test_lock_handle_toggles_lock() {
        let (mut c, id) = controller_with(&ElementTemplate::Rectangle);
        c.session_mut().select(id).expect("select");
        let t = transform(&c, id);
        c.pointer_down(Point::new(t.x + t.width, t.y), Modifiers::NONE);
        assert!(c.session().scene().get_element(id).is_some_and(|e| e.locked));
        c.pointer_up(Point::new(t.x + t.width, t.y));
        c.pointer_down(Point::new(t.x + t.width, t.y), Modifiers::NONE);
        assert!(c.session().scene().get_element(id).is_some_and(|e| !e.locked));
    }

    #[test]
    fn test_shift_click_toggles_and_canvas_click_clears() {
        let mut session = Session::new(AspectRatio::Landscape);
        let a = session.add_element(&ElementTemplate::Logo {
            src: "logo.png".to_string(),
        });
        let b = session.add_element(&ElementTemplate::Circle);
        session.clear_selection();
        let mut c = InteractionController::new(session);

        c.pointer_down(Point::new(100.0, 100.0), Modifiers::SHIFT);
        c.pointer_down(Point::new(960.0, 540.0), Modifiers::SHIFT);
        assert_eq!(c.session().selection().ids(), &[a, b]);
        c.pointer_down(Point::new(100.0, 100.0), Modifiers::SHIFT);
        assert_eq!(c.session().selection().ids(), &[b]);

        c.pointer_down(Point::new(1800.0, 50.0), Modifiers::NONE);
        c.pointer_up(Point::new(1800.0, 50.0));
        assert!(c.session().selection().is_empty());
    }

    #[test]
    fn test_background_pan_and_wheel_zoom() {
        let mut session = Session::new(AspectRatio::Square);
        session.set_background(Background::image("bg.png"));
        let mut c = InteractionController::new(session);
        let entries = c.session().history().len();

        c.pointer_down(Point::new(300.0, 300.0), Modifiers::NONE);
        assert_eq!(c.state(), GestureState::BackgroundDragging);
        c.pointer_move(Point::new(350.0, 270.0));
        c.pointer_up(Point::new(350.0, 270.0));
        let bg = &c.session().scene().background;
        assert_eq!((bg.x, bg.y), (50.0, -30.0));
        assert_eq!(c.session().history().len(), entries + 1);

        assert!(c.wheel(-500.0));
        assert!((c.session().scene().background.scale - 1.5).abs() < 1e-4);
        assert!(c.wheel(-100_000.0));
        assert_eq!(c.session().scene().background.scale, 5.0);
        assert_eq!(c.session().history().len(), entries + 3);
    }

    #[test]
    fn test_background_resize_handle() {
        let mut session = Session::new(AspectRatio::Square);
        session.set_background(Background::image("bg.png"));
        let mut c = InteractionController::new(session);

        c.pointer_down(Point::new(1075.0, 1075.0), Modifiers::NONE);
        assert_eq!(c.state(), GestureState::BackgroundResizing);
        c.pointer_move(Point::new(1125.0, 1125.0));
        c.pointer_up(Point::new(1125.0, 1125.0));
        assert!((c.session().scene().background.scale - 1.2).abs() < 1e-4);
    }

    #[test]
    fn test_shortcuts() {
        let (mut c, id) = controller_with(&ElementTemplate::Rectangle);
        c.session_mut().select(id).expect("select");
        let start = transform(&c, id);

        assert!(c.key(Key::ArrowRight, Modifiers::SHIFT));
        assert_eq!(transform(&c, id).x, start.x + 10.0);
        assert!(c.key(Key::Char('z'), Modifiers::COMMAND));
        assert_eq!(transform(&c, id).x, start.x);
        assert!(c.key(Key::Char('y'), Modifiers::COMMAND));
        assert_eq!(transform(&c, id).x, start.x + 10.0);

        assert!(c.key(Key::Char('d'), Modifiers::COMMAND));
        assert_eq!(c.session().scene().element_count(), 2);
        assert!(c.key(Key::Backspace, Modifiers::NONE));
        assert_eq!(c.session().scene().element_count(), 1);
        assert!(!c.key(Key::Char('q'), Modifiers::NONE));
    }
}
