//! Generation targets.

use serde::{Deserialize, Serialize};

use crate::ElementId;

/// An identified target of an image generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "slot", content = "id", rename_all = "lowercase")]
pub enum Slot {
    /// The page background.
    Background,
    /// A specific image or logo element.
    Element(ElementId),
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Background => f.write_str("background"),
            Self::Element(id) => write!(f, "element:{id}"),
        }
    }
}
