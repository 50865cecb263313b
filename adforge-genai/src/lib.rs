//! # Adforge GenAI
//!
//! Adapter to the external generative service that writes campaign copy and
//! banner imagery.
//!
//! The adapter never touches a scene. Callers apply its results through
//! [`adforge_core::Session::apply_banner_copy`] and
//! [`adforge_core::Session::apply_generated_image`].
//!
//! ```text
//! GenAiClient ──► GenerativeBackend ──► HttpBackend (generateContent)
//!      │
//!      └── plan_campaign / generate_image (two framings) / edit_image
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adapter;
pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod plan;
pub mod slots;

pub use adapter::{service_aspect, wants_user_background, GenAiClient};
pub use backend::{GenerativeBackend, ImageRequest, ImageResponse, InlineImage};
pub use config::GenAiConfig;
pub use error::{BackendError, GenAiError, GenAiResult};
pub use http::HttpBackend;
pub use plan::{parse_plan, strip_code_fences, CampaignPlan, PlanRequest};
pub use slots::{run_slot, SlotRegistry, SlotRequest, SlotState, Ticket};
