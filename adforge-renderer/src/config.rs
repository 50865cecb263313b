//! Renderer configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings for [`crate::Rasterizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Load fonts installed on the host.
    pub load_system_fonts: bool,
    /// Extra directories scanned for font files.
    pub font_dirs: Vec<PathBuf>,
    /// Family used when an element names none.
    pub default_font_family: String,
    /// JPEG quality 1-100.
    pub jpeg_quality: u8,
    /// Decoded sources kept in memory.
    pub cache_capacity: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            font_dirs: Vec::new(),
            default_font_family: "Inter".to_string(),
            jpeg_quality: 90,
            cache_capacity: 64,
        }
    }
}

impl RendererConfig {
    /// A configuration that touches no host fonts, for reproducible output.
    #[must_use]
    pub fn isolated() -> Self {
        Self {
            load_system_fonts: false,
            ..Self::default()
        }
    }
}
