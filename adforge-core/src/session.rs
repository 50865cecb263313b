//! One editing session: the scene, the selection and the undo history.
//!
//! Every operation here that changes persisted state records exactly one
//! history entry. Locked targets are skipped; an operation whose targets are
//! all locked changes nothing and records nothing.

use serde::{Deserialize, Serialize};

use crate::history::{History, Snapshot};
use crate::layers::{self, AlignEdge, AlignTarget, ReorderMove};
use crate::template::{BannerCopy, ElementTemplate};
use crate::{
    background::clamp_scale, AspectRatio, Background, BackgroundKind, CoreError, CoreResult, ElementId,
    ElementPatch, InteractionConfig, Scene, Selection, Slot,
};

/// Mirror axis for [`Session::flip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAxis {
    /// Mirror left-right (negates `scaleX`).
    Horizontal,
    /// Mirror top-bottom (negates `scaleY`).
    Vertical,
}

/// The editable state of one design.
#[derive(Debug, Clone)]
pub struct Session {
    scene: Scene,
    selection: Selection,
    history: History,
    config: InteractionConfig,
}

impl Session {
    /// Start an empty session for the given page format.
    #[must_use]
    pub fn new(aspect_ratio: AspectRatio) -> Self {
        Self::from_scene(Scene::new(aspect_ratio), InteractionConfig::default())
    }

    /// Start a session from an existing scene; the scene becomes the undo baseline.
    #[must_use]
    pub fn from_scene(scene: Scene, config: InteractionConfig) -> Self {
        let history = History::with_limit(Snapshot::capture(&scene), config.history_limit);
        Self {
            scene,
            selection: Selection::new(),
            history,
            config,
        }
    }

    /// The scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for in-progress gestures; callers commit afterwards.
    pub(crate) fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The undo history.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    pub(crate) fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select exactly `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn select(&mut self, id: ElementId) -> CoreResult<()> {
        self.require(id)?;
        self.selection.replace(id);
        Ok(())
    }

    /// Toggle membership of `id`. Returns whether it is now selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn toggle_selection(&mut self, id: ElementId) -> CoreResult<bool> {
        self.require(id)?;
        Ok(self.selection.toggle(id))
    }

    /// Deselect everything, making the background the edit target.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ------------------------------------------------------------------
    // Element operations
    // ------------------------------------------------------------------

    /// Add an element built from a template on top of everything, and select it.
    pub fn add_element(&mut self, template: &ElementTemplate) -> ElementId {
        let z = self.next_z();
        let element = template.build(self.scene.width(), self.scene.height(), z);
        let id = element.id;
        // ids are fresh UUIDs, so insertion cannot collide
        if self.scene.add_element(element).is_ok() {
            self.selection.replace(id);
            self.commit("add element");
        }
        id
    }

    /// Patch every unlocked target. Returns how many elements were patched.
    ///
    /// Either all targets take the patch or none does.
    ///
    /// # Errors
    ///
    /// Returns an error if a target is missing or the patch is invalid.
    pub fn update_elements(&mut self, ids: &[ElementId], patch: &ElementPatch) -> CoreResult<usize> {
        patch.validate()?;
        let targets = self.targets(ids)?;
        if targets.is_empty() || patch.is_empty() {
            return Ok(0);
        }

        let mut staged = Vec::with_capacity(targets.len());
        for &id in &targets {
            let mut element = self.require(id)?.clone();
            patch.apply(&mut element)?;
            staged.push(element);
        }
        for element in staged {
            if let Some(slot) = self.scene.get_element_mut(element.id) {
                *slot = element;
            }
        }
        self.commit("update elements");
        Ok(targets.len())
    }

    /// Patch the current selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch is invalid.
    pub fn update_selected(&mut self, patch: &ElementPatch) -> CoreResult<usize> {
        let ids = self.selection.ids().to_vec();
        self.update_elements(&ids, patch)
    }

    /// Delete every unlocked target. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if a target is missing.
    pub fn delete_elements(&mut self, ids: &[ElementId]) -> CoreResult<usize> {
        let targets = self.targets(ids)?;
        for &id in &targets {
            self.scene.remove_element(id)?;
        }
        self.selection.retain(|id| !targets.contains(id));
        if !targets.is_empty() {
            self.commit("delete elements");
        }
        Ok(targets.len())
    }

    /// Clone every unlocked target with a fresh ID, offset by the configured
    /// duplicate offset on both axes. The clones become the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if a target is missing.
    pub fn duplicate_elements(&mut self, ids: &[ElementId]) -> CoreResult<Vec<ElementId>> {
        let targets = self.targets(ids)?;
        let offset = self.config.duplicate_offset;
        let mut created = Vec::with_capacity(targets.len());
        for &id in &targets {
            let mut copy = self.require(id)?.clone();
            copy.id = ElementId::new();
            copy.transform.x += offset;
            copy.transform.y += offset;
            created.push(self.scene.add_element(copy)?);
        }
        if !created.is_empty() {
            self.selection.set(created.iter().copied());
            self.commit("duplicate elements");
        }
        Ok(created)
    }

    /// Lock or unlock every target, locked or not. Returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns an error if a target is missing.
    pub fn set_locked(&mut self, ids: &[ElementId], locked: bool) -> CoreResult<usize> {
        for &id in ids {
            self.require(id)?;
        }
        let mut changed = 0;
        for &id in ids {
            if let Some(el) = self.scene.get_element_mut(id) {
                if el.locked != locked {
                    el.locked = locked;
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            self.commit(if locked { "lock" } else { "unlock" });
        }
        Ok(changed)
    }

    /// Move an element in paint order. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is missing.
    pub fn reorder(&mut self, id: ElementId, mv: ReorderMove) -> CoreResult<bool> {
        if self.targets(&[id])?.is_empty() {
            return Ok(false);
        }
        let moved = layers::reorder(&mut self.scene, id, mv)?;
        Ok(moved && self.commit("reorder"))
    }

    /// Align the unlocked targets to an edge of the page or of their union.
    ///
    /// # Errors
    ///
    /// Returns an error if a target is missing.
    pub fn align(
        &mut self,
        ids: &[ElementId],
        edge: AlignEdge,
        target: AlignTarget,
    ) -> CoreResult<bool> {
        let targets = self.targets(ids)?;
        let moved = layers::align(&mut self.scene, &targets, edge, target);
        Ok(moved && self.commit("align"))
    }

    /// Align the unlocked targets to an edge of the page.
    ///
    /// # Errors
    ///
    /// Returns an error if a target is missing.
    pub fn align_to_page(&mut self, ids: &[ElementId], edge: AlignEdge) -> CoreResult<bool> {
        self.align(ids, edge, AlignTarget::Page)
    }

    /// Mirror the unlocked targets along an axis.
    ///
    /// # Errors
    ///
    /// Returns an error if a target is missing.
    pub fn flip(&mut self, ids: &[ElementId], axis: FlipAxis) -> CoreResult<usize> {
        let targets = self.targets(ids)?;
        for &id in &targets {
            if let Some(el) = self.scene.get_element_mut(id) {
                match axis {
                    FlipAxis::Horizontal => el.transform.scale_x = -el.transform.scale_x,
                    FlipAxis::Vertical => el.transform.scale_y = -el.transform.scale_y,
                }
            }
        }
        if !targets.is_empty() {
            self.commit("flip");
        }
        Ok(targets.len())
    }

    /// Move the unlocked targets by a fixed page-space offset.
    ///
    /// # Errors
    ///
    /// Returns an error if a target is missing.
    pub fn nudge(&mut self, ids: &[ElementId], dx: f32, dy: f32) -> CoreResult<usize> {
        let targets = self.targets(ids)?;
        for &id in &targets {
            if let Some(el) = self.scene.get_element_mut(id) {
                el.transform.x += dx;
                el.transform.y += dy;
            }
        }
        if !targets.is_empty() {
            self.commit("nudge");
        }
        Ok(targets.len())
    }

    /// Turn an image or logo element into the page background and remove it.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is missing or is not a raster kind.
    pub fn promote_to_background(&mut self, id: ElementId) -> CoreResult<bool> {
        let element = self.require(id)?;
        if !element.kind.is_raster() {
            return Err(CoreError::InvalidOperation(format!(
                "cannot promote a {} element to the background",
                element.kind.name()
            )));
        }
        if element.locked {
            tracing::debug!(%id, "locked element ignored");
            return Ok(false);
        }
        let src = element.kind.content().to_string();
        self.scene.remove_element(id)?;
        self.scene.background = Background::image(src);
        self.selection.retain(|&s| s != id);
        Ok(self.commit("promote to background"))
    }

    // ------------------------------------------------------------------
    // Background operations
    // ------------------------------------------------------------------

    /// Replace the background wholesale. Returns whether anything changed.
    pub fn set_background(&mut self, mut background: Background) -> bool {
        background.scale = clamp_scale(background.scale);
        background.opacity = background.opacity.clamp(0.0, 1.0);
        self.scene.background = background;
        self.commit("set background")
    }

    /// Edit the background in place. Scale and opacity are clamped afterwards.
    pub fn update_background(&mut self, edit: impl FnOnce(&mut Background)) -> bool {
        let mut background = self.scene.background.clone();
        edit(&mut background);
        self.set_background(background)
    }

    /// Switch the background to a solid color or gradient, keeping its opacity.
    ///
    /// # Errors
    ///
    /// Returns an invalid-operation error for [`BackgroundKind::Image`]; use
    /// [`Session::set_background`] for images.
    pub fn set_background_fill(
        &mut self,
        kind: BackgroundKind,
        value: impl Into<String>,
    ) -> CoreResult<bool> {
        let value = value.into();
        let fill = match kind {
            BackgroundKind::Color => Background::color(value),
            BackgroundKind::Gradient => Background::gradient(value),
            BackgroundKind::Image => {
                return Err(CoreError::InvalidOperation(
                    "an image is not a background fill".to_string(),
                ))
            }
        };
        let opacity = self.scene.background.opacity;
        Ok(self.set_background(Background { opacity, ..fill }))
    }

    /// Set the background opacity, clamped to `0..=1`.
    pub fn set_background_opacity(&mut self, opacity: f32) -> bool {
        self.update_background(|bg| bg.opacity = opacity)
    }

    /// Set the background image zoom, clamped to the supported range.
    /// Only image backgrounds have a zoom; other kinds are left unchanged.
    pub fn set_background_scale(&mut self, scale: f32) -> bool {
        if !self.scene.background.is_image() {
            return false;
        }
        self.update_background(|bg| bg.scale = scale)
    }

    /// Set the background image pan in page pixels. Only image backgrounds
    /// pan; other kinds are left unchanged.
    pub fn set_background_pan(&mut self, x: f32, y: f32) -> bool {
        if !self.scene.background.is_image() {
            return false;
        }
        self.update_background(|bg| {
            bg.x = x;
            bg.y = y;
        })
    }

    // ------------------------------------------------------------------
    // Generated content
    // ------------------------------------------------------------------

    /// Add heading, subheading and call-to-action elements for a banner's copy.
    /// Returns the new element IDs; one history entry covers them all.
    pub fn apply_banner_copy(&mut self, copy: &BannerCopy) -> Vec<ElementId> {
        let elements = copy.elements(self.scene.width(), self.scene.height(), self.next_z());
        let mut created = Vec::with_capacity(elements.len());
        for element in elements {
            if let Ok(id) = self.scene.add_element(element) {
                created.push(id);
            }
        }
        if !created.is_empty() {
            self.commit("apply banner copy");
            tracing::info!(count = created.len(), "banner copy applied");
        }
        created
    }

    /// Write a generated image into its slot.
    ///
    /// Returns `Ok(false)` when the slot's element is locked.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ElementNotFound`] if the slot's element was deleted
    /// while the request was in flight, or an invalid-operation error if the
    /// element does not hold an image.
    pub fn apply_generated_image(&mut self, slot: Slot, src: impl Into<String>) -> CoreResult<bool> {
        let src = src.into();
        match slot {
            Slot::Background => {
                self.scene.background = Background::image(src);
                Ok(self.commit("apply generated background"))
            }
            Slot::Element(id) => {
                let element = self
                    .scene
                    .get_element_mut(id)
                    .ok_or_else(|| CoreError::ElementNotFound(id.to_string()))?;
                if !element.kind.is_raster() {
                    return Err(CoreError::InvalidOperation(format!(
                        "slot {slot} is a {} element",
                        element.kind.name()
                    )));
                }
                if element.locked {
                    tracing::debug!(%id, "locked element ignored");
                    return Ok(false);
                }
                element.kind.set_content(src);
                Ok(self.commit("apply generated image"))
            }
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Restore the previous snapshot. Returns false at the beginning of history.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        snapshot.restore_into(&mut self.scene);
        self.prune_selection();
        true
    }

    /// Restore the next snapshot. Returns false at the end of history.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        snapshot.restore_into(&mut self.scene);
        self.prune_selection();
        true
    }

    /// Discard everything and start a new, empty design.
    pub fn reset(&mut self, aspect_ratio: AspectRatio) {
        self.scene = Scene::new(aspect_ratio);
        self.selection.clear();
        self.history.reset(Snapshot::capture(&self.scene));
    }

    /// Record the scene if it differs from the entry at the history cursor.
    /// Returns whether an entry was recorded.
    pub(crate) fn commit(&mut self, action: &str) -> bool {
        let snapshot = Snapshot::capture(&self.scene);
        if &snapshot == self.history.current() {
            return false;
        }
        self.history.record(snapshot);
        tracing::debug!(action, "edit committed");
        true
    }

    fn require(&self, id: ElementId) -> CoreResult<&crate::Element> {
        self.scene
            .get_element(id)
            .ok_or_else(|| CoreError::ElementNotFound(id.to_string()))
    }

    /// Existing, unlocked, de-duplicated targets.
    fn targets(&self, ids: &[ElementId]) -> CoreResult<Vec<ElementId>> {
        let mut out = Vec::with_capacity(ids.len());
        for &id in ids {
            if self.require(id)?.locked {
                tracing::debug!(%id, "locked element ignored");
                continue;
            }
            if !out.contains(&id) {
                out.push(id);
            }
        }
        Ok(out)
    }

    fn next_z(&self) -> i32 {
        self.scene.max_z_index().map_or(1, |z| z + 1)
    }

    fn prune_selection(&mut self) {
        let scene = &self.scene;
        self.selection.retain(|&id| scene.contains(id));
    }
}
