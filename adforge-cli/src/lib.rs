//! # Adforge CLI
//!
//! Thin command-line host for the Adforge crates.
//!
//! ## Usage
//!
//! ```bash
//! adforge render scene.json -o banner.png
//! adforge render scene.json -o banner.jpg --jpeg
//! adforge plan "summer sale for a surf shop" --aspect 4:5 --scene-out scene.json
//! ```
//!
//! Remote (`http`/`https`) image sources in a scene are fetched before
//! rendering; a source that cannot be fetched leaves its layer blank and is
//! reported as a warning.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::PathBuf;

use adforge_core::{AspectRatio, BackgroundKind, Scene, Session};
use adforge_genai::{CampaignPlan, GenAiClient, GenAiConfig, HttpBackend, PlanRequest};
use adforge_renderer::{ExportFormat, LayerFailure, Renderer, RendererConfig};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};

/// Command-line arguments for adforge.
#[derive(Debug, Parser)]
#[command(name = "adforge")]
#[command(about = "Compose, render and plan social media banners")]
#[command(version)]
pub struct CliArgs {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a scene JSON file to an image.
    Render(RenderArgs),
    /// Ask the generative service for a campaign plan.
    Plan(PlanArgs),
}

/// Arguments of `adforge render`.
#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Scene JSON file
    pub scene: PathBuf,

    /// Output image path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Encode as JPEG instead of PNG
    #[arg(long)]
    pub jpeg: bool,

    /// Extra font directory (repeatable)
    #[arg(long = "font-dir")]
    pub font_dirs: Vec<PathBuf>,

    /// Do not load fonts installed on the host
    #[arg(long)]
    pub no_system_fonts: bool,
}

/// Arguments of `adforge plan`.
#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    /// Campaign brief
    pub prompt: String,

    /// Page format: 1:1, 16:9, 9:16, 3:4 or 4:5
    #[arg(long, default_value = "1:1")]
    pub aspect: AspectRatio,

    /// The user supplies their own background image
    #[arg(long)]
    pub has_background: bool,

    /// The user supplies a product asset
    #[arg(long)]
    pub has_asset: bool,

    /// Write a scene with the main banner's copy applied
    #[arg(long)]
    pub scene_out: Option<PathBuf>,

    /// Generative service base URL
    #[arg(long, env = "ADFORGE_GENAI_BASE_URL")]
    pub base_url: Option<String>,

    /// Generative service API key
    #[arg(long, env = "ADFORGE_GENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Text model
    #[arg(long, env = "ADFORGE_TEXT_MODEL")]
    pub text_model: Option<String>,
}

impl PlanArgs {
    /// Service configuration from the arguments over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key was given.
    pub fn genai_config(&self) -> anyhow::Result<GenAiConfig> {
        let defaults = GenAiConfig::default();
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .context("an API key is required (--api-key or ADFORGE_GENAI_API_KEY)")?;
        Ok(GenAiConfig {
            base_url: self.base_url.clone().unwrap_or(defaults.base_url),
            api_key,
            text_model: self.text_model.clone().unwrap_or(defaults.text_model),
            ..defaults
        })
    }
}

/// Outcome of a render command.
#[derive(Debug)]
pub struct RenderSummary {
    /// Surface size.
    pub size: (u32, u32),
    /// Bytes written.
    pub bytes: usize,
    /// Layers left blank.
    pub failures: Vec<LayerFailure>,
}

/// Every distinct remote image source a scene references.
#[must_use]
pub fn remote_sources(scene: &Scene) -> Vec<String> {
    let background = (scene.background.kind == BackgroundKind::Image)
        .then_some(scene.background.value.as_str());
    let elements = scene
        .elements()
        .filter(|e| e.kind.is_raster())
        .map(|e| e.kind.content());

    let mut sources: Vec<String> = Vec::new();
    for src in background.into_iter().chain(elements) {
        let remote = src.starts_with("http://") || src.starts_with("https://");
        if remote && !sources.iter().any(|s| s == src) {
            sources.push(src.to_string());
        }
    }
    sources
}

/// Download remote sources into the renderer's cache. Returns how many were
/// stored; failures are logged and left for the render to report.
pub async fn prefetch_sources(renderer: &mut Renderer, sources: &[String]) -> usize {
    if sources.is_empty() {
        return 0;
    }
    let http = reqwest::Client::new();
    let fetches = sources.iter().map(|src| {
        let http = http.clone();
        async move {
            let result: Result<_, reqwest::Error> = async {
                let response = http.get(src).send().await?.error_for_status()?;
                response.bytes().await
            }
            .await;
            (src, result)
        }
    });

    let mut stored = 0;
    for (src, result) in futures::future::join_all(fetches).await {
        match result {
            Ok(bytes) => match renderer.insert_source(src.clone(), &bytes) {
                Ok(()) => stored += 1,
                Err(e) => tracing::warn!(%src, error = %e, "fetched source did not decode"),
            },
            Err(e) => tracing::warn!(%src, error = %e, "failed to fetch source"),
        }
    }
    tracing::debug!(stored, requested = sources.len(), "remote sources fetched");
    stored
}

/// Render a scene file to an image file.
///
/// # Errors
///
/// Returns an error if the scene cannot be read or parsed, or the output
/// cannot be encoded or written. Layer failures are not errors.
pub async fn run_render(args: &RenderArgs) -> anyhow::Result<RenderSummary> {
    let json = std::fs::read_to_string(&args.scene)
        .with_context(|| format!("reading {}", args.scene.display()))?;
    let scene = Scene::from_json(&json).with_context(|| format!("parsing {}", args.scene.display()))?;

    let config = RendererConfig {
        load_system_fonts: !args.no_system_fonts,
        font_dirs: args.font_dirs.clone(),
        ..RendererConfig::default()
    };
    let mut renderer = Renderer::new(config);
    prefetch_sources(&mut renderer, &remote_sources(&scene)).await;

    let format = if args.jpeg {
        ExportFormat::Jpeg
    } else {
        ExportFormat::Png
    };
    let export = renderer.export(&scene, format).context("rendering scene")?;
    std::fs::write(&args.output, &export.bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;

    Ok(RenderSummary {
        size: scene.aspect_ratio.dimensions(),
        bytes: export.bytes.len(),
        failures: export.failures,
    })
}

/// Request a plan and optionally write a scene carrying its main copy.
///
/// # Errors
///
/// Returns an error if the service is misconfigured, the request fails, or
/// the scene file cannot be written.
pub async fn run_plan(args: &PlanArgs) -> anyhow::Result<CampaignPlan> {
    let client = GenAiClient::new(HttpBackend::new(args.genai_config()?)?);
    let request = PlanRequest {
        prompt: args.prompt.clone(),
        aspect_ratio: args.aspect,
        has_user_background: args.has_background,
        has_user_asset: args.has_asset,
    };
    let plan = client.plan_campaign(&request).await?;

    if let Some(path) = &args.scene_out {
        let json = scene_for_plan(&plan, args.aspect).to_json()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "scene written");
    }
    Ok(plan)
}

/// A fresh scene with the plan's main banner copy applied.
#[must_use]
pub fn scene_for_plan(plan: &CampaignPlan, aspect: AspectRatio) -> Scene {
    let mut session = Session::new(aspect);
    session.apply_banner_copy(&plan.main_copy());
    session.scene().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_core::{Background, Element, ElementKind};

    #[test]
    fn test_parse_render_args() {
        let args = CliArgs::try_parse_from(["adforge", "render", "scene.json", "-o", "out.jpg", "--jpeg"])
            .expect("args");
        match args.command {
            Command::Render(r) => {
                assert_eq!(r.scene, PathBuf::from("scene.json"));
                assert!(r.jpeg);
                assert!(!r.no_system_fonts);
            }
            Command::Plan(_) => panic!("expected render"),
        }
    }

    #[test]
    fn test_parse_plan_aspect() {
        let args = CliArgs::try_parse_from(["adforge", "plan", "coffee", "--aspect", "4:5", "--has-asset"])
            .expect("args");
        match args.command {
            Command::Plan(p) => {
                assert_eq!(p.aspect, AspectRatio::Feed);
                assert!(p.has_asset && !p.has_background);
            }
            Command::Render(_) => panic!("expected plan"),
        }
        assert!(CliArgs::try_parse_from(["adforge", "plan", "x", "--aspect", "2:1"]).is_err());
    }

    #[test]
    fn test_plan_requires_api_key() {
        let args = PlanArgs {
            prompt: "x".to_string(),
            aspect: AspectRatio::Square,
            has_background: false,
            has_asset: false,
            scene_out: None,
            base_url: None,
            api_key: Some("  ".to_string()),
            text_model: None,
        };
        assert!(args.genai_config().is_err());
    }

    #[test]
    fn test_remote_sources_are_deduplicated() {
        let mut scene = Scene::new(AspectRatio::Square);
        scene.background = Background::image("https://cdn.example.com/a.png");
        for src in [
            "https://cdn.example.com/a.png",
            "data:image/png;base64,AAAA",
            "http://cdn.example.com/b.png",
        ] {
            scene
                .add_element(Element::new(ElementKind::Image { src: src.to_string() }))
                .expect("add");
        }
        assert_eq!(
            remote_sources(&scene),
            ["https://cdn.example.com/a.png", "http://cdn.example.com/b.png"]
        );
    }
}
