//! Request policy on top of a [`GenerativeBackend`].
//!
//! Plans are a single call with strict parsing. Image generation makes at
//! most two calls: a photographic primary framing, then one simplified
//! illustration framing if the primary fails or is refused. Edits are a
//! single call.

use std::sync::Arc;

use adforge_core::AspectRatio;

use crate::backend::{GenerativeBackend, ImageRequest, ImageResponse, InlineImage};
use crate::error::{GenAiError, GenAiResult};
use crate::plan::{parse_plan, plan_prompt, CampaignPlan, PlanRequest};

/// Prompt fragments that ask for the user's own background instead of a
/// generated one. Matched case-insensitively.
pub const USER_BACKGROUND_SIGNALS: [&str; 2] =
    ["user-provided background", "user provided background"];

const PRIMARY_FRAMING: &str =
    "Professional photography, high quality, sharp focus, studio lighting, advertising composition. No text or lettering. Subject: ";
const FALLBACK_FRAMING: &str =
    "Artistic illustration, simple clean style, soft colors. No text or lettering. Subject: ";

/// Whether the prompt asks to reuse the user's background.
#[must_use]
pub fn wants_user_background(prompt: &str) -> bool {
    let lower = prompt.to_lowercase();
    USER_BACKGROUND_SIGNALS.iter().any(|s| lower.contains(s))
}

/// The page format sent with image requests. 4:5 is not offered by the
/// service and goes out as the nearest supported 3:4.
#[must_use]
pub const fn service_aspect(aspect: AspectRatio) -> AspectRatio {
    match aspect {
        AspectRatio::Feed => AspectRatio::Portrait,
        other => other,
    }
}

/// High-level client for the generative service.
#[derive(Debug)]
pub struct GenAiClient<B> {
    backend: Arc<B>,
}

impl<B> Clone for GenAiClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: GenerativeBackend> GenAiClient<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Produce a structured campaign plan.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Backend`] if the call fails and
    /// [`GenAiError::InvalidResponse`] if the reply is not a complete plan.
    pub async fn plan_campaign(&self, request: &PlanRequest) -> GenAiResult<CampaignPlan> {
        let reply = self.backend.generate_text(&plan_prompt(request)).await?;
        let plan = parse_plan(&reply).inspect_err(|e| tracing::warn!(error = %e, "plan rejected"))?;
        tracing::info!(
            banners = plan.banner_count(),
            aspect = %request.aspect_ratio,
            "campaign plan received"
        );
        Ok(plan)
    }

    /// Generate an image for a prompt.
    ///
    /// When the prompt asks for the user-provided background and a reference
    /// is given, the first reference is returned without any call.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::GenerationFailed`] if both attempts fail.
    pub async fn generate_image(
        &self,
        prompt: &str,
        aspect: AspectRatio,
        references: &[InlineImage],
    ) -> GenAiResult<InlineImage> {
        if wants_user_background(prompt) {
            if let Some(first) = references.first() {
                tracing::debug!("using the user-provided background");
                return Ok(first.clone());
            }
        }

        let aspect = service_aspect(aspect);
        let primary = ImageRequest {
            prompt: format!("{PRIMARY_FRAMING}{}", prompt.trim()),
            aspect_ratio: Some(aspect),
            references: references.to_vec(),
        };
        let primary_failure = match self.attempt(&primary).await {
            Ok(image) => return Ok(image),
            Err(reason) => reason,
        };
        tracing::warn!(reason = %primary_failure, "primary image attempt failed, retrying with fallback framing");

        let fallback = ImageRequest {
            prompt: format!("{FALLBACK_FRAMING}{}", prompt.trim()),
            ..primary
        };
        self.attempt(&fallback).await.map_err(|reason| {
            tracing::warn!(%reason, "fallback image attempt failed");
            GenAiError::GenerationFailed(format!(
                "primary: {primary_failure}; fallback: {reason}"
            ))
        })
    }

    /// Edit an existing image per the prompt. Single attempt.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::EditFailed`] if the call fails or returns no image.
    pub async fn edit_image(&self, source: &InlineImage, prompt: &str) -> GenAiResult<InlineImage> {
        let request = ImageRequest {
            prompt: prompt.trim().to_string(),
            aspect_ratio: None,
            references: vec![source.clone()],
        };
        self.attempt(&request).await.map_err(GenAiError::EditFailed)
    }

    async fn attempt(&self, request: &ImageRequest) -> Result<InlineImage, String> {
        match self.backend.generate_image(request).await {
            Ok(ImageResponse::Image(image)) => Ok(image),
            Ok(ImageResponse::Refused(text)) => Err(format!("no image in response: {text}")),
            Err(e) => Err(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_background_signal_is_case_insensitive() {
        assert!(wants_user_background("Use the User-Provided Background"));
        assert!(wants_user_background("keep the user provided background please"));
        assert!(!wants_user_background("a sunny beach"));
    }

    #[test]
    fn test_feed_maps_to_portrait() {
        assert_eq!(service_aspect(AspectRatio::Feed), AspectRatio::Portrait);
        for other in [
            AspectRatio::Square,
            AspectRatio::Landscape,
            AspectRatio::Story,
            AspectRatio::Portrait,
        ] {
            assert_eq!(service_aspect(other), other);
        }
    }
}
