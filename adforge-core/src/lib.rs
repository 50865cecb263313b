//! # Adforge Core
//!
//! The editable object model behind banner composition.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                adforge-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Scene Model     │  Interaction Controller  │
//! │  - Elements      │  - Hit testing           │
//! │  - Background    │  - Drag/resize/rotate    │
//! │  - Selection     │  - Background pan/zoom   │
//! ├─────────────────────────────────────────────┤
//! │  Session         │  History                 │
//! │  - Mutation API  │  - Snapshot log          │
//! │  - Z-order/align │  - Undo/redo cursor      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Pointer events flow into [`InteractionController`], which mutates the
//! [`Scene`] owned by a [`Session`]; each completed edit becomes one
//! [`Snapshot`] in the [`History`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod background;
pub mod color;
pub mod config;
pub mod element;
pub mod error;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod layers;
pub mod patch;
pub mod scene;
pub mod selection;
pub mod session;
pub mod slot;
pub mod template;

pub use background::{Background, BackgroundKind, MAX_BACKGROUND_SCALE, MIN_BACKGROUND_SCALE};
pub use color::Rgba;
pub use config::InteractionConfig;
pub use element::{Element, ElementId, ElementKind, Fill, Style, TextAlign, Transform};
pub use error::{CoreError, CoreResult};
pub use geometry::{Bounds, Point};
pub use history::{History, Snapshot, HISTORY_LIMIT};
pub use interaction::{
    hit_test, GestureState, Handle, HitTarget, InteractionController, Key, Modifiers,
};
pub use layers::{AlignEdge, AlignTarget, ReorderMove};
pub use patch::{ElementPatch, KeyClass};
pub use scene::{AspectRatio, Scene, BASE_HEIGHT};
pub use selection::Selection;
pub use session::{FlipAxis, Session};
pub use slot::Slot;
pub use template::{BannerCopy, ElementTemplate};

/// Adforge core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
