//! The set of currently selected elements.

use serde::{Deserialize, Serialize};

use crate::ElementId;

/// Selected element IDs in the order they were selected.
///
/// An empty selection makes the background the implicit edit target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with exactly `id`.
    pub fn replace(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Replace the selection with `ids`, dropping duplicates.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: ElementId) -> bool {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Keep only IDs matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&ElementId) -> bool) {
        self.ids.retain(keep);
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// The selected IDs.
    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    /// The selected element when exactly one is selected.
    #[must_use]
    pub fn single(&self) -> Option<ElementId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Number of selected elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_replace() {
        let (a, b) = (ElementId::new(), ElementId::new());
        let mut sel = Selection::new();
        assert!(sel.toggle(a));
        assert!(sel.toggle(b));
        assert_eq!(sel.len(), 2);
        assert!(sel.single().is_none());
        assert!(!sel.toggle(a));
        assert_eq!(sel.single(), Some(b));
        sel.replace(a);
        assert_eq!(sel.ids(), &[a]);
    }
}
