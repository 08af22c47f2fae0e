//! Mock AI provider for testing
//!
//! Never contacts an LLM. Scripted response per operation, shared call
//! counters for test assertions, and recorded config patches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{
    DailyFocus, EnergyLevel, NlpTaskAnalysis, Task, TaskBreakdown,
};
use crate::config::{AiConfigPatch, AiProviderConfig, ProviderKind};
use crate::core::fallback;
use crate::spi::AiProvider;

/// Per-operation call counters, shareable across reconstructed mocks.
#[derive(Debug, Default)]
pub struct MockCalls {
    pub breakdown: AtomicU64,
    pub focus: AtomicU64,
    pub emoji: AtomicU64,
    pub analyze: AtomicU64,
}

/// Mock implementation of [`AiProvider`].
///
/// Defaults to the deterministic fallback responses; override per
/// operation with the `with_*` builders.
///
/// # Example
///
/// ```rust,ignore
/// use taskmind::testing::MockProvider;
///
/// let mock = MockProvider::new(ProviderKind::Gemini)
///     .with_emojis(vec!["🎯".into(); 5]);
/// ```
#[derive(Debug)]
pub struct MockProvider {
    kind: ProviderKind,
    config: AiProviderConfig,
    breakdown: TaskBreakdown,
    focus: DailyFocus,
    emojis: Vec<String>,
    analysis: NlpTaskAnalysis,
    calls: Arc<MockCalls>,
    patches: parking_lot::Mutex<Vec<AiConfigPatch>>,
}

impl MockProvider {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            config: AiProviderConfig::for_kind(kind, "mock-key"),
            breakdown: fallback::breakdown_fallback(),
            focus: DailyFocus {
                top_tasks: Vec::new(),
                motivational_message: "Mock says: one thing at a time.".to_string(),
            },
            emojis: fallback::default_emojis(),
            analysis: fallback::nlp_fallback("mock task"),
            calls: Arc::new(MockCalls::default()),
            patches: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn with_config(mut self, config: AiProviderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_calls(mut self, calls: Arc<MockCalls>) -> Self {
        self.calls = calls;
        self
    }

    pub fn with_breakdown(mut self, breakdown: TaskBreakdown) -> Self {
        self.breakdown = breakdown;
        self
    }

    pub fn with_focus(mut self, focus: DailyFocus) -> Self {
        self.focus = focus;
        self
    }

    pub fn with_emojis(mut self, emojis: Vec<String>) -> Self {
        self.emojis = emojis;
        self
    }

    pub fn with_analysis(mut self, analysis: NlpTaskAnalysis) -> Self {
        self.analysis = analysis;
        self
    }

    /// The shared call counters.
    pub fn calls(&self) -> Arc<MockCalls> {
        Arc::clone(&self.calls)
    }

    /// Patches received through `update_config`, in order.
    pub fn recorded_patches(&self) -> Vec<AiConfigPatch> {
        self.patches.lock().clone()
    }
}

#[async_trait]
impl AiProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn name(&self) -> &str {
        self.kind.as_str()
    }

    fn config(&self) -> AiProviderConfig {
        self.config.clone()
    }

    fn update_config(&mut self, patch: AiConfigPatch) {
        self.patches.lock().push(patch.clone());
        self.config.apply(patch);
    }

    async fn breakdown_task(&self, _title: &str, _energy: EnergyLevel) -> TaskBreakdown {
        self.calls.breakdown.fetch_add(1, Ordering::SeqCst);
        self.breakdown.clone()
    }

    async fn daily_focus(&self, tasks: &[Task], _current_energy: EnergyLevel) -> DailyFocus {
        // honor the contract: empty or fully-completed input never counts
        // as an external call
        if tasks.iter().all(|t| t.completed) {
            return fallback::empty_focus();
        }
        self.calls.focus.fetch_add(1, Ordering::SeqCst);
        self.focus.clone()
    }

    async fn predict_emoji(&self, _title: &str, _description: Option<&str>) -> Vec<String> {
        self.calls.emoji.fetch_add(1, Ordering::SeqCst);
        self.emojis.clone()
    }

    async fn analyze_task(&self, _input: &str) -> NlpTaskAnalysis {
        self.calls.analyze.fetch_add(1, Ordering::SeqCst);
        self.analysis.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counters_track_calls() {
        let mock = MockProvider::new(ProviderKind::Gemini);
        let calls = mock.calls();
        mock.breakdown_task("x", EnergyLevel::High).await;
        mock.breakdown_task("y", EnergyLevel::High).await;
        mock.predict_emoji("x", None).await;
        assert_eq!(calls.breakdown.load(Ordering::SeqCst), 2);
        assert_eq!(calls.emoji.load(Ordering::SeqCst), 1);
        assert_eq!(calls.analyze.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_config_is_recorded_and_applied() {
        let mut mock = MockProvider::new(ProviderKind::OpenAi);
        mock.update_config(AiConfigPatch {
            model: Some("gpt-4o".to_string()),
            ..Default::default()
        });
        assert_eq!(mock.config().model, "gpt-4o");
        assert_eq!(mock.recorded_patches().len(), 1);
    }

    #[test]
    fn mock_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockProvider>();
    }
}
