//! Service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GenAiError, GenAiResult};

/// Environment variable holding the service base URL.
pub const ENV_BASE_URL: &str = "ADFORGE_GENAI_BASE_URL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "ADFORGE_GENAI_API_KEY";
/// Environment variable overriding the text model.
pub const ENV_TEXT_MODEL: &str = "ADFORGE_TEXT_MODEL";
/// Environment variable overriding the image model.
pub const ENV_IMAGE_MODEL: &str = "ADFORGE_IMAGE_MODEL";

/// Settings for [`crate::HttpBackend`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenAiConfig {
    /// Service root, e.g. `https://generativelanguage.googleapis.com`.
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Model used for campaign plans.
    pub text_model: String,
    /// Model used for image generation and edits.
    pub image_model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            text_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            timeout_secs: 120,
        }
    }
}

impl GenAiConfig {
    /// Read the configuration from the environment, keeping defaults for
    /// unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Config`] if no API key is set.
    pub fn from_env() -> GenAiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> GenAiResult<Self> {
        let defaults = Self::default();
        let api_key = lookup(ENV_API_KEY)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GenAiError::Config(format!("{ENV_API_KEY} is not set")))?;
        Ok(Self {
            base_url: lookup(ENV_BASE_URL).unwrap_or(defaults.base_url),
            api_key,
            text_model: lookup(ENV_TEXT_MODEL).unwrap_or(defaults.text_model),
            image_model: lookup(ENV_IMAGE_MODEL).unwrap_or(defaults.image_model),
            timeout_secs: defaults.timeout_secs,
        })
    }

    /// The request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_requires_key() {
        let err = GenAiConfig::from_lookup(|_| None).expect_err("missing key");
        assert!(matches!(err, GenAiError::Config(_)));
    }

    #[test]
    fn test_lookup_overrides_defaults() {
        let config = GenAiConfig::from_lookup(|key| match key {
            ENV_API_KEY => Some("secret".to_string()),
            ENV_IMAGE_MODEL => Some("painter-1".to_string()),
            _ => None,
        })
        .expect("config");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.image_model, "painter-1");
        assert_eq!(config.text_model, GenAiConfig::default().text_model);
    }
}
