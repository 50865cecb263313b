//! HTTP transport speaking the `generateContent` JSON API.

use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::backend::{GenerativeBackend, ImageRequest, ImageResponse, InlineImage};
use crate::config::GenAiConfig;
use crate::error::{BackendError, GenAiError, GenAiResult};

const API_KEY_HEADER: &str = "x-goog-api-key";
/// Characters of the response body kept in a [`BackendError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// [`GenerativeBackend`] over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base: Url,
    config: GenAiConfig,
}

impl HttpBackend {
    /// Build a backend for the configured service.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Config`] if the base URL is malformed or the
    /// HTTP client cannot be built.
    pub fn new(config: GenAiConfig) -> GenAiResult<Self> {
        let mut raw = config.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(|e| GenAiError::Config(format!("invalid base URL: {e}")))?;
        let http = Client::builder()
            .user_agent(concat!("adforge/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .map_err(|e| GenAiError::Config(format!("HTTP client: {e}")))?;
        Ok(Self { http, base, config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &GenAiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> Result<Url, BackendError> {
        self.base
            .join(&format!("v1beta/models/{model}:generateContent"))
            .map_err(|e| BackendError::UnexpectedResponse(format!("bad endpoint for {model}: {e}")))
    }

    async fn generate_content(&self, model: &str, body: &Value) -> Result<GenerateResponse, BackendError> {
        let url = self.endpoint(model)?;
        tracing::debug!(%url, "generateContent request");
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for HttpBackend {
    async fn generate_text(&self, prompt: &str) -> Result<String, BackendError> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });
        let response = self.generate_content(&self.config.text_model, &body).await?;
        let text = response.text();
        if text.is_empty() {
            return Err(BackendError::UnexpectedResponse(
                response
                    .block_reason()
                    .map_or_else(|| "response contained no text".to_string(), |r| format!("blocked: {r}")),
            ));
        }
        Ok(text)
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageResponse, BackendError> {
        let mut parts = vec![json!({ "text": request.prompt })];
        parts.extend(request.references.iter().map(|image| {
            json!({ "inlineData": { "mimeType": image.mime_type, "data": image.base64() } })
        }));
        let mut generation = json!({ "responseModalities": ["IMAGE", "TEXT"] });
        if let Some(aspect) = request.aspect_ratio {
            generation["imageConfig"] = json!({ "aspectRatio": aspect.as_str() });
        }
        let body = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": generation
        });

        let response = self.generate_content(&self.config.image_model, &body).await?;
        if let Some(image) = response.first_image()? {
            return Ok(ImageResponse::Image(image));
        }
        let text = response.text();
        let explanation = match response.block_reason() {
            Some(reason) if text.is_empty() => format!("blocked: {reason}"),
            _ if text.is_empty() => "response contained no image".to_string(),
            _ => text,
        };
        tracing::warn!(%explanation, "image request refused");
        Ok(ImageResponse::Refused(explanation))
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    fn text(&self) -> String {
        self.parts()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string()
    }

    fn first_image(&self) -> Result<Option<InlineImage>, BackendError> {
        let Some(data) = self.parts().find_map(|p| p.inline_data.as_ref()) else {
            return Ok(None);
        };
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data.data.trim())
            .map_err(|e| BackendError::UnexpectedResponse(format!("image payload is not base64: {e}")))?;
        Ok(Some(InlineImage::new(data.mime_type.clone(), bytes)))
    }

    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}
