//! The task AI service: single point of contact for route handlers.
//!
//! Owns the active provider instance plus a configuration slot per
//! provider kind, so switching providers never loses the other provider's
//! settings. Configuration is copy-on-write: switches and updates build a
//! fresh provider via the factory and swap the `Arc` pointer, so an
//! operation already holding a provider keeps using the pre-swap instance.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::api::{DailyFocus, EnergyLevel, NlpTaskAnalysis, Task, TaskBreakdown};
use crate::config::{AiConfigPatch, AiProviderConfig, AppAiConfig, ProviderKind};
use crate::core::cache::TtlCache;
use crate::spi::AiProvider;

/// Constructs a provider from a kind and its configuration.
///
/// Injected so tests can count reconstructions; production code uses
/// [`crate::create_provider`].
pub type ProviderFactory =
    Box<dyn Fn(ProviderKind, AiProviderConfig) -> Box<dyn AiProvider> + Send + Sync>;

/// Single point of contact for the four AI operations.
pub struct TaskAiService {
    factory: ProviderFactory,
    active: RwLock<ProviderKind>,
    configs: RwLock<HashMap<ProviderKind, AiProviderConfig>>,
    provider: RwLock<Arc<dyn AiProvider>>,
    breakdown_cache: TtlCache<TaskBreakdown>,
    nlp_cache: TtlCache<NlpTaskAnalysis>,
}

impl TaskAiService {
    /// Create a service from environment configuration with `kind` as the
    /// active provider, applying an optional override to its slot.
    pub fn from_env(
        kind: ProviderKind,
        overrides: Option<AiConfigPatch>,
    ) -> crate::api::AiResult<Self> {
        let mut app = AppAiConfig::from_env()?;
        app.provider = kind;
        Ok(Self::from_app_config(app, overrides))
    }

    /// Create a service from an explicit [`AppAiConfig`] (no environment
    /// reads). This is the injection-friendly constructor.
    pub fn from_app_config(app: AppAiConfig, overrides: Option<AiConfigPatch>) -> Self {
        Self::with_factory(
            app,
            overrides,
            Box::new(|kind, config| crate::create_provider(kind, config)),
        )
    }

    /// Create a service with a custom provider factory.
    pub fn with_factory(
        app: AppAiConfig,
        overrides: Option<AiConfigPatch>,
        factory: ProviderFactory,
    ) -> Self {
        let active = app.provider;
        let mut configs = HashMap::new();
        configs.insert(ProviderKind::Gemini, app.gemini);
        configs.insert(ProviderKind::OpenAi, app.openai);
        if let Some(patch) = overrides {
            if let Some(slot) = configs.get_mut(&active) {
                slot.apply(patch);
            }
        }

        let provider: Arc<dyn AiProvider> = Arc::from(factory(active, configs[&active].clone()));
        info!("task AI service ready with provider {}", active);

        Self {
            factory,
            active: RwLock::new(active),
            configs: RwLock::new(configs),
            provider: RwLock::new(provider),
            breakdown_cache: TtlCache::new(),
            nlp_cache: TtlCache::new(),
        }
    }

    /// The currently active provider kind.
    pub async fn active_provider(&self) -> ProviderKind {
        *self.active.read().await
    }

    /// Make `kind` the active provider.
    ///
    /// A no-op when `kind` is already active. Otherwise the provider is
    /// reconstructed from that kind's stored configuration; the old
    /// instance is dropped, never mutated, so the new provider cannot
    /// inherit stale client state.
    pub async fn switch_provider(&self, kind: ProviderKind) {
        if *self.active.read().await == kind {
            debug!("provider {} already active", kind);
            return;
        }

        let config = self
            .configs
            .read()
            .await
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| AiProviderConfig::for_kind(kind, String::new()));

        let provider: Arc<dyn AiProvider> = Arc::from((self.factory)(kind, config));
        *self.active.write().await = kind;
        *self.provider.write().await = provider;
        self.clear_caches();
        info!("switched AI provider to {}", kind);
    }

    /// A copy of the stored configuration for `kind`, or for the active
    /// provider when `None`.
    pub async fn get_config(&self, kind: Option<ProviderKind>) -> AiProviderConfig {
        let kind = match kind {
            Some(kind) => kind,
            None => *self.active.read().await,
        };
        self.configs
            .read()
            .await
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| AiProviderConfig::for_kind(kind, String::new()))
    }

    /// Merge a partial update into the active provider's configuration and
    /// reconstruct it.
    pub async fn update_config(&self, patch: AiConfigPatch) {
        let kind = *self.active.read().await;
        self.update_provider_config(kind, patch).await;
    }

    /// Merge a partial update into the named provider's stored
    /// configuration. Reconstructs only when that provider is active.
    pub async fn update_provider_config(&self, kind: ProviderKind, patch: AiConfigPatch) {
        let updated = {
            let mut configs = self.configs.write().await;
            let slot = configs
                .entry(kind)
                .or_insert_with(|| AiProviderConfig::for_kind(kind, String::new()));
            slot.apply(patch);
            slot.clone()
        };

        if *self.active.read().await == kind {
            let provider: Arc<dyn AiProvider> = Arc::from((self.factory)(kind, updated));
            *self.provider.write().await = provider;
            self.clear_caches();
            debug!("reconstructed provider {} after config update", kind);
        }
    }

    /// Break a task into actionable steps. Never fails; see
    /// [`AiProvider::breakdown_task`].
    pub async fn breakdown_task(&self, title: &str, energy: EnergyLevel) -> TaskBreakdown {
        let ttl = self.cache_ttl().await;
        let key = format!("{}|{}", title.trim().to_lowercase(), energy.as_str());
        if ttl.is_some() {
            if let Some(hit) = self.breakdown_cache.get(&key) {
                debug!("breakdown cache hit");
                return hit;
            }
        }

        let result = self.current().await.breakdown_task(title, energy).await;
        if let Some(ttl) = ttl {
            self.breakdown_cache.insert(key, result.clone(), ttl);
        }
        result
    }

    /// Suggest up to 3 tasks to focus on today. Never fails.
    pub async fn daily_focus(&self, tasks: &[Task], current_energy: EnergyLevel) -> DailyFocus {
        self.current().await.daily_focus(tasks, current_energy).await
    }

    /// Predict exactly 5 emoji tags for a task. Never fails.
    pub async fn predict_emoji(&self, title: &str, description: Option<&str>) -> Vec<String> {
        self.current().await.predict_emoji(title, description).await
    }

    /// Parse free text into structured task fields. Never fails.
    pub async fn analyze_task(&self, input: &str) -> NlpTaskAnalysis {
        let ttl = self.cache_ttl().await;
        let key = input.trim().to_lowercase();
        if ttl.is_some() {
            if let Some(hit) = self.nlp_cache.get(&key) {
                debug!("NLP cache hit");
                return hit;
            }
        }

        let result = self.current().await.analyze_task(input).await;
        if let Some(ttl) = ttl {
            self.nlp_cache.insert(key, result.clone(), ttl);
        }
        result
    }

    async fn current(&self) -> Arc<dyn AiProvider> {
        self.provider.read().await.clone()
    }

    async fn cache_ttl(&self) -> Option<Duration> {
        let config = self.get_config(None).await;
        config
            .cache_results
            .then(|| Duration::from_secs(config.cache_ttl_secs))
    }

    fn clear_caches(&self) {
        self.breakdown_cache.clear();
        self.nlp_cache.clear();
    }
}
