//! taskmind - AI assistance layer for an ADHD-friendly task manager
//!
//! This crate provides the four AI operations the task manager's backend
//! exposes: task breakdown, daily-focus suggestions, emoji prediction,
//! and natural-language task parsing. Two interchangeable providers
//! (Gemini, OpenAI) sit behind the [`AiProvider`] trait; a
//! [`TaskAiService`] owns the active provider and its configuration.
//!
//! # Configuration-Driven Design
//!
//! Provider selection is driven by configuration, not code:
//!
//! ```bash
//! export TASKMIND_AI_PROVIDER=openai
//! export OPENAI_API_KEY=sk-...
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use taskmind::{create_task_ai_service, EnergyLevel};
//!
//! let service = create_task_ai_service()?;
//! let breakdown = service.breakdown_task("Clean the kitchen", EnergyLevel::Low).await;
//! ```
//!
//! # Failure policy
//!
//! The four AI operations never fail: network errors, non-2xx statuses,
//! and unparseable replies all resolve to deterministic local fallbacks.
//! The only synchronous error in the crate is a configuration mistake
//! (unknown provider tag, unreadable config file).

pub mod api;
pub mod config;
pub mod core;
pub mod spi;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// ── Public re-exports ──

pub use api::error::{AiError, AiResult};
pub use api::types::{
    Category, DailyFocus, EnergyLevel, FocusSuggestion, NlpTaskAnalysis, Priority, Task,
    TaskBreakdown, TaskStep, DEFAULT_EMOJIS,
};
pub use config::{
    AiConfigPatch, AiProviderConfig, AppAiConfig, ProviderKind, ProviderSetup, SafetySetting,
};
pub use self::core::{ProviderFactory, TaskAiService};
pub use spi::{AiProvider, GeminiProvider, OpenAiProvider};

// ── Factory Functions ──

/// Construct a concrete provider for `kind`.
///
/// `setup` is either a bare API key string (complete defaults applied) or
/// a full [`AiProviderConfig`]:
///
/// ```rust,ignore
/// use taskmind::{create_provider, ProviderKind};
///
/// let provider = create_provider(ProviderKind::Gemini, "api-key");
/// ```
pub fn create_provider(
    kind: ProviderKind,
    setup: impl Into<ProviderSetup>,
) -> Box<dyn AiProvider> {
    let config = setup.into().into_config(kind);
    match kind {
        ProviderKind::Gemini => Box::new(GeminiProvider::new(config)),
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new(config)),
    }
}

/// Construct a provider from a raw tag.
///
/// Fails with [`AiError::Configuration`] for any tag outside the known
/// set. Use this at config boundaries where the tag is untrusted text.
pub fn create_provider_from_name(
    name: &str,
    setup: impl Into<ProviderSetup>,
) -> AiResult<Box<dyn AiProvider>> {
    let kind: ProviderKind = name.parse()?;
    Ok(create_provider(kind, setup))
}

/// Create the task AI service from environment configuration.
///
/// Reads provider selection and API keys once, here; see
/// [`AppAiConfig::from_env`] for the variable list. Absent keys leave the
/// service in degraded mode where every operation falls back locally.
pub fn create_task_ai_service() -> AiResult<TaskAiService> {
    let app = AppAiConfig::from_env()?;
    Ok(TaskAiService::from_app_config(app, None))
}
