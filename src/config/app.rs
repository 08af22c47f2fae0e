//! Application-level AI configuration: the composition root.
//!
//! Provider selection is driven by configuration, not code. Environment
//! variables are read here, once, at service construction time; no other
//! module touches the process environment and no secret is ever embedded
//! as a literal fallback.
//!
//! # Example configuration (YAML)
//!
//! ```yaml
//! provider: openai
//!
//! gemini:
//!   model: gemini-1.5-pro
//! openai:
//!   model: gpt-4o
//!   organization: org-acme
//! ```
//!
//! Secrets still come from the environment when loading a file; a config
//! file may override models, endpoints, and tuning, not keys.

use std::path::Path;

use serde::Deserialize;

use super::keys;
use super::provider::{AiConfigPatch, AiProviderConfig, ProviderKind};
use crate::api::{AiError, AiResult};

/// Per-provider configuration slots plus the active provider selection.
#[derive(Debug, Clone, PartialEq)]
pub struct AppAiConfig {
    pub provider: ProviderKind,
    pub gemini: AiProviderConfig,
    pub openai: AiProviderConfig,
}

impl AppAiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default | Purpose |
    /// |----------|---------|---------|
    /// | `TASKMIND_AI_PROVIDER` | `gemini` | Active provider |
    /// | `GEMINI_API_KEY` / `GOOGLE_API_KEY` | empty | Gemini key |
    /// | `OPENAI_API_KEY` | empty | OpenAI key |
    /// | `OPENAI_ORG_ID` | unset | OpenAI organization |
    /// | `GEMINI_MODEL` / `OPENAI_MODEL` | per provider | Model override |
    /// | `GEMINI_BASE_URL` / `OPENAI_BASE_URL` | unset | Endpoint override |
    ///
    /// Absent keys default to the empty string: the provider then fails
    /// every external call and falls back, which is valid degraded mode.
    pub fn from_env() -> AiResult<Self> {
        let provider = match std::env::var(keys::TASKMIND_AI_PROVIDER) {
            Ok(value) => value.parse()?,
            Err(_) => ProviderKind::Gemini,
        };

        let gemini_key = std::env::var(keys::GEMINI_API_KEY)
            .or_else(|_| std::env::var(keys::GOOGLE_API_KEY))
            .unwrap_or_default();
        let mut gemini = AiProviderConfig::for_kind(ProviderKind::Gemini, gemini_key);
        if let Ok(model) = std::env::var(keys::GEMINI_MODEL) {
            gemini.model = model;
        }
        if let Ok(url) = std::env::var(keys::GEMINI_BASE_URL) {
            gemini.base_url = Some(url);
        }

        let openai_key = std::env::var(keys::OPENAI_API_KEY).unwrap_or_default();
        let mut openai = AiProviderConfig::for_kind(ProviderKind::OpenAi, openai_key);
        if let Ok(model) = std::env::var(keys::OPENAI_MODEL) {
            openai.model = model;
        }
        if let Ok(org) = std::env::var(keys::OPENAI_ORG_ID) {
            openai.organization = Some(org);
        }
        if let Ok(url) = std::env::var(keys::OPENAI_BASE_URL) {
            openai.base_url = Some(url);
        }

        Ok(Self {
            provider,
            gemini,
            openai,
        })
    }

    /// Load a YAML config file on top of the environment.
    ///
    /// The file selects the provider and patches tuning fields; API keys
    /// still come from the environment.
    pub fn load(path: impl AsRef<Path>) -> AiResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AiError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let file: AppAiConfigFile = serde_yaml::from_str(&raw).map_err(|e| {
            AiError::Configuration(format!("cannot parse {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_env()?;
        if let Some(provider) = file.provider {
            config.provider = provider.parse()?;
        }
        if let Some(patch) = file.gemini {
            config.gemini.apply(patch);
        }
        if let Some(patch) = file.openai {
            config.openai.apply(patch);
        }
        Ok(config)
    }

    /// The stored configuration for the given provider.
    pub fn config_for(&self, kind: ProviderKind) -> &AiProviderConfig {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAi => &self.openai,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AppAiConfigFile {
    provider: Option<String>,
    #[serde(default)]
    gemini: Option<AiConfigPatch>,
    #[serde(default)]
    openai: Option<AiConfigPatch>,
}
