//! Structured campaign plans.
//!
//! The service is asked for a JSON document of a fixed shape. Replies are
//! often wrapped in Markdown code fences; those are removed before the text
//! is parsed, and every field of the shape is required.

use std::fmt::Write;

use adforge_core::{AspectRatio, BannerCopy};
use serde::{Deserialize, Serialize};

use crate::error::{GenAiError, GenAiResult};

/// Inputs of a plan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Free-text campaign brief.
    pub prompt: String,
    /// Target page format.
    pub aspect_ratio: AspectRatio,
    /// The user supplied their own background image.
    pub has_user_background: bool,
    /// The user supplied a product or brand asset.
    pub has_user_asset: bool,
}

/// The primary banner of a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainBanner {
    /// Main line.
    pub headline: String,
    /// Supporting line.
    pub subheadline: String,
    /// Prompt for the banner's background image.
    pub image_prompt: String,
    /// Rationale of the banner.
    pub description: String,
    /// Button label.
    pub cta: String,
}

/// A follow-up banner ("slide") of a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalBanner {
    /// Main line.
    pub title: String,
    /// Supporting line.
    pub subtitle: String,
    /// Prompt for the banner's background image.
    pub image_prompt: String,
    /// Rationale of the banner.
    pub description: String,
    /// Button label.
    pub cta: String,
}

/// Post metadata for the campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    /// Post caption.
    pub caption: String,
    /// Hashtags, with or without the leading `#`.
    pub hashtags: Vec<String>,
    /// Search keywords.
    pub keywords: Vec<String>,
}

/// A complete campaign plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignPlan {
    /// The primary banner.
    pub main_banner: MainBanner,
    /// Further banners; may be empty.
    pub additional_banners: Vec<AdditionalBanner>,
    /// Post metadata.
    pub seo: Seo,
}

impl CampaignPlan {
    /// Copy for the primary banner.
    #[must_use]
    pub fn main_copy(&self) -> BannerCopy {
        BannerCopy {
            headline: self.main_banner.headline.clone(),
            subheadline: self.main_banner.subheadline.clone(),
            cta: self.main_banner.cta.clone(),
        }
    }

    /// Copy for every additional banner, in order.
    #[must_use]
    pub fn slide_copies(&self) -> Vec<BannerCopy> {
        self.additional_banners
            .iter()
            .map(|b| BannerCopy {
                headline: b.title.clone(),
                subheadline: b.subtitle.clone(),
                cta: b.cta.clone(),
            })
            .collect()
    }

    /// Number of banners including the primary one.
    #[must_use]
    pub fn banner_count(&self) -> usize {
        1 + self.additional_banners.len()
    }
}

/// Remove Markdown code-fence lines (```` ``` ```` with or without a language tag).
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Parse a service reply into a plan.
///
/// # Errors
///
/// Returns [`GenAiError::InvalidResponse`] if the unfenced text is not a JSON
/// document of the plan shape.
pub fn parse_plan(text: &str) -> GenAiResult<CampaignPlan> {
    let body = strip_code_fences(text);
    if body.is_empty() {
        return Err(GenAiError::InvalidResponse("empty reply".to_string()));
    }
    serde_json::from_str(&body).map_err(|e| GenAiError::InvalidResponse(e.to_string()))
}

/// The instruction text sent for a plan request.
#[must_use]
pub fn plan_prompt(request: &PlanRequest) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(
        "You are a senior advertising creative. Plan a social media banner campaign for the brief below.\n",
    );
    let _ = writeln!(prompt, "Brief: {}", request.prompt.trim());
    let _ = writeln!(prompt, "Aspect ratio: {}", request.aspect_ratio);
    if request.has_user_background {
        prompt.push_str(
            "The user provided their own background image: set main_banner.image_prompt to \"use the user-provided background\".\n",
        );
    }
    if request.has_user_asset {
        prompt.push_str(
            "The user provided a product asset: image prompts must leave room for it and must not depict a competing product.\n",
        );
    }
    prompt.push_str(
        "Reply with JSON only, exactly this shape:\n\
         {\"main_banner\":{\"headline\":\"\",\"subheadline\":\"\",\"image_prompt\":\"\",\"description\":\"\",\"cta\":\"\"},\
         \"additional_banners\":[{\"title\":\"\",\"subtitle\":\"\",\"image_prompt\":\"\",\"description\":\"\",\"cta\":\"\"}],\
         \"seo\":{\"caption\":\"\",\"hashtags\":[],\"keywords\":[]}}\n\
         additional_banners may be an empty array for a single-banner campaign.",
    );
    prompt
}
