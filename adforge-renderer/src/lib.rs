//! # Adforge Renderer
//!
//! Deterministic CPU compositor for Adforge scenes.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 Renderer                    │
//! ├──────────────┬──────────────┬───────────────┤
//! │ Background   │ Elements     │ Export        │
//! │ color/grad/  │ by z-index:  │ PNG / JPEG /  │
//! │ image cover  │ image, shape,│ data URI      │
//! │ + pan/zoom   │ text (resvg) │               │
//! └──────────────┴──────────────┴───────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod image;
mod paint;
pub mod rasterizer;
pub mod text;

pub use cache::{CacheStats, SourceCache};
pub use config::RendererConfig;
pub use error::{RenderError, RenderResult};
pub use export::ExportFormat;
pub use rasterizer::{Layer, LayerFailure, Rasterizer, RenderReport};

use adforge_core::Scene;

/// Encoded output of [`Renderer::export`].
#[derive(Debug, Clone)]
pub struct Export {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Encoding used.
    pub format: ExportFormat,
    /// Layers left blank in the composite.
    pub failures: Vec<LayerFailure>,
}

impl Export {
    /// The bytes as a base64 `data:` URI.
    #[must_use]
    pub fn data_uri(&self) -> String {
        export::to_data_uri(&self.bytes, self.format)
    }
}

/// The main renderer interface.
#[derive(Debug)]
pub struct Renderer {
    config: RendererConfig,
    rasterizer: Rasterizer,
    frame_count: u64,
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        let rasterizer = Rasterizer::new(&config);
        tracing::info!(
            fonts = config.load_system_fonts,
            cache = config.cache_capacity,
            "renderer initialized"
        );
        Self {
            config,
            rasterizer,
            frame_count: 0,
        }
    }

    /// Render a scene to a surface.
    ///
    /// # Errors
    ///
    /// Returns an error only if the surface cannot be allocated.
    pub fn render(&mut self, scene: &Scene) -> RenderResult<RenderReport> {
        self.frame_count += 1;
        self.rasterizer.render(scene)
    }

    /// Render and encode a scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be allocated or encoding fails.
    pub fn export(&mut self, scene: &Scene, format: ExportFormat) -> RenderResult<Export> {
        let report = self.render(scene)?;
        let bytes = export::encode(&report.surface, format, self.config.jpeg_quality)?;
        Ok(Export {
            bytes,
            format,
            failures: report.failures,
        })
    }

    /// Cache pre-fetched image bytes under a source key used by the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not decode.
    pub fn insert_source(&mut self, key: impl Into<String>, bytes: &[u8]) -> RenderResult<()> {
        self.rasterizer.cache_mut().insert_bytes(key, bytes)
    }

    /// Get the current configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Get the number of frames rendered.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
