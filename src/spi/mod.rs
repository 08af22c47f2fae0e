//! Provider contract and implementations.
//!
//! The SPI layer defines the [`AiProvider`] capability set that every
//! backing LLM service must satisfy, plus the two shipped
//! implementations. A third provider can be added without touching any
//! caller: implement the trait and extend the factory dispatch.

mod gemini;
mod openai;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;

use crate::api::{DailyFocus, EnergyLevel, NlpTaskAnalysis, Task, TaskBreakdown};
use crate::config::{AiConfigPatch, AiProviderConfig, ProviderKind};

/// Capability set of one AI provider.
///
/// # Failure policy
///
/// The four AI operations return plain values, never `Result`: any
/// external failure (network, non-2xx status, unparseable reply) is
/// recovered inside the implementation and replaced by the matching
/// deterministic fallback from [`crate::core::fallback`]. Callers never
/// see a provider-specific error.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; the service shares them across
/// request tasks behind an `Arc`.
#[async_trait]
pub trait AiProvider: Send + Sync + std::fmt::Debug {
    /// Which provider this is.
    fn kind(&self) -> ProviderKind;

    /// Stable provider identifier (matches `kind().as_str()`).
    fn name(&self) -> &str;

    /// A copy of the current configuration. Never the live value: callers
    /// cannot mutate provider state through the returned config.
    fn config(&self) -> AiProviderConfig;

    /// Shallow-merge a partial configuration update. An API-key change
    /// rebuilds the underlying HTTP client before the next call.
    fn update_config(&mut self, patch: AiConfigPatch);

    /// Whether an API key is present. A provider without a key still
    /// works: every operation falls back.
    fn is_configured(&self) -> bool {
        !self.config().api_key.is_empty()
    }

    /// Break a task into 3-5 actionable steps with durations.
    async fn breakdown_task(&self, title: &str, energy: EnergyLevel) -> TaskBreakdown;

    /// Pick up to 3 tasks to focus on today. Empty or fully-completed
    /// input returns the empty-focus response without an external call.
    async fn daily_focus(&self, tasks: &[Task], current_energy: EnergyLevel) -> DailyFocus;

    /// Predict exactly 5 emoji tags for a task.
    async fn predict_emoji(&self, title: &str, description: Option<&str>) -> Vec<String>;

    /// Parse free text into structured task fields.
    async fn analyze_task(&self, input: &str) -> NlpTaskAnalysis;
}

/// Sampling temperature for NLP analysis: low for determinism.
pub(crate) const NLP_TEMPERATURE: f32 = 0.1;

/// Token cap for the short emoji and NLP replies.
pub(crate) const SHORT_REPLY_MAX_TOKENS: u32 = 1024;
