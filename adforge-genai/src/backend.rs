//! The narrow contract to the external generative service.

use adforge_core::AspectRatio;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Raw image bytes with their MIME type.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Encoded image bytes.
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl InlineImage {
    /// Wrap bytes of a known MIME type.
    #[must_use]
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Parse a base64 `data:` URI.
    #[must_use]
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (meta, payload) = rest.split_once(',')?;
        let mime = meta.strip_suffix(";base64")?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .ok()?;
        Some(Self::new(mime, bytes))
    }

    /// The bytes as a base64 `data:` URI, the form element sources take.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64())
    }

    /// The bytes as standard base64.
    #[must_use]
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

/// One image call: a prompt, an optional page format and reference images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Full prompt text, framing included.
    pub prompt: String,
    /// Output format, already mapped to one the service supports.
    pub aspect_ratio: Option<AspectRatio>,
    /// Images the output should be based on or edit.
    pub references: Vec<InlineImage>,
}

/// What an image call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageResponse {
    /// The service returned image data.
    Image(InlineImage),
    /// The service answered with text only, typically a refusal.
    Refused(String),
}

/// The two calls the adapter makes.
///
/// Implementations are stateless request/response transports; retry policy
/// lives in [`crate::GenAiClient`].
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Complete a text prompt.
    async fn generate_text(&self, prompt: &str) -> Result<String, BackendError>;

    /// Produce or edit an image.
    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageResponse, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_roundtrip() {
        let image = InlineImage::new("image/png", vec![0x89, b'P', b'N', b'G']);
        let uri = image.to_data_uri();
        assert_eq!(uri, "data:image/png;base64,iVBORw==");
        assert_eq!(InlineImage::from_data_uri(&uri), Some(image));
        assert!(InlineImage::from_data_uri("https://example.com/a.png").is_none());
    }

    #[test]
    fn test_serializes_bytes_as_base64() {
        let image = InlineImage::new("image/jpeg", vec![1, 2, 3]);
        let json = serde_json::to_value(&image).expect("json");
        assert_eq!(json["bytes"], "AQID");
    }
}
