//! Provider identity and per-provider configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::{AiError, AiResult};

/// Well-known provider identifiers as they appear in configuration.
pub mod provider_id {
    pub const GEMINI: &str = "gemini";
    pub const OPENAI: &str = "openai";
}

/// Closed set of supported AI providers.
///
/// Parsing an unknown tag fails with [`AiError::Configuration`] — this is
/// the one place in the AI layer that surfaces an error synchronously,
/// since it indicates a config mistake rather than a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Gemini => provider_id::GEMINI,
            ProviderKind::OpenAi => provider_id::OPENAI,
        }
    }

    /// Default model for this provider.
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AiError;

    fn from_str(s: &str) -> AiResult<Self> {
        match s.trim().to_lowercase().as_str() {
            provider_id::GEMINI => Ok(ProviderKind::Gemini),
            provider_id::OPENAI => Ok(ProviderKind::OpenAi),
            other => Err(AiError::Configuration(format!(
                "Unsupported AI provider '{}'. Supported: gemini, openai",
                other
            ))),
        }
    }
}

/// One Gemini safety filter entry, serialized as the API expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

impl SafetySetting {
    /// Default filters: block medium-and-above severity across the four
    /// standard harm categories.
    pub fn defaults() -> Vec<SafetySetting> {
        const CATEGORIES: [&str; 4] = [
            "HARM_CATEGORY_HARASSMENT",
            "HARM_CATEGORY_HATE_SPEECH",
            "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            "HARM_CATEGORY_DANGEROUS_CONTENT",
        ];
        CATEGORIES
            .iter()
            .map(|c| SafetySetting {
                category: (*c).to_string(),
                threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
            })
            .collect()
    }
}

/// Configuration for one provider instance.
///
/// A single struct covers both providers; fields the other provider has no
/// use for (`safety_settings`, `organization`) are optionals it ignores.
/// Treated as an immutable value per call: updates replace the whole
/// config, they never mutate a live one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiProviderConfig {
    /// Opaque secret. May be empty, in which case every external call
    /// fails and the operation falls back — degraded but functional.
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    /// HTTP client timeout in milliseconds.
    pub timeout_ms: u64,
    /// Cache breakdown/NLP responses keyed by request fingerprint.
    pub cache_results: bool,
    /// Time-to-live for cached responses, in seconds.
    pub cache_ttl_secs: u64,
    /// Gemini safety filters. `None` means [`SafetySetting::defaults`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
    /// OpenAI organization id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Custom API endpoint. `None` means the provider's public endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for AiProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: String::new(),
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 0.95,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            timeout_ms: 60_000,
            cache_results: false,
            cache_ttl_secs: 300,
            safety_settings: None,
            organization: None,
            base_url: None,
        }
    }
}

impl AiProviderConfig {
    /// Complete defaults for the given provider, with only the key filled in.
    pub fn for_kind(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: kind.default_model().to_string(),
            ..Self::default()
        }
    }

    /// Shallow-merge a partial update: present fields replace, absent
    /// fields retain their previous values.
    pub fn apply(&mut self, patch: AiConfigPatch) {
        if let Some(v) = patch.api_key {
            self.api_key = v;
        }
        if let Some(v) = patch.model {
            self.model = v;
        }
        if let Some(v) = patch.temperature {
            self.temperature = v;
        }
        if let Some(v) = patch.max_tokens {
            self.max_tokens = v;
        }
        if let Some(v) = patch.top_p {
            self.top_p = v;
        }
        if let Some(v) = patch.frequency_penalty {
            self.frequency_penalty = v;
        }
        if let Some(v) = patch.presence_penalty {
            self.presence_penalty = v;
        }
        if let Some(v) = patch.timeout_ms {
            self.timeout_ms = v;
        }
        if let Some(v) = patch.cache_results {
            self.cache_results = v;
        }
        if let Some(v) = patch.cache_ttl_secs {
            self.cache_ttl_secs = v;
        }
        if let Some(v) = patch.safety_settings {
            self.safety_settings = Some(v);
        }
        if let Some(v) = patch.organization {
            self.organization = Some(v);
        }
        if let Some(v) = patch.base_url {
            self.base_url = Some(v);
        }
    }

    /// Consuming variant of [`apply`](Self::apply).
    pub fn merged(mut self, patch: AiConfigPatch) -> Self {
        self.apply(patch);
        self
    }
}

/// Partial configuration update. Every field is optional; see
/// [`AiProviderConfig::apply`] for merge semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfigPatch {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
    pub timeout_ms: Option<u64>,
    pub cache_results: Option<bool>,
    pub cache_ttl_secs: Option<u64>,
    pub safety_settings: Option<Vec<SafetySetting>>,
    pub organization: Option<String>,
    pub base_url: Option<String>,
}

/// Factory input: either a bare API key (complete defaults applied) or a
/// full configuration.
#[derive(Debug, Clone)]
pub enum ProviderSetup {
    ApiKey(String),
    Config(AiProviderConfig),
}

impl ProviderSetup {
    /// Resolve to a concrete configuration for the given provider.
    pub fn into_config(self, kind: ProviderKind) -> AiProviderConfig {
        match self {
            ProviderSetup::ApiKey(key) => AiProviderConfig::for_kind(kind, key),
            ProviderSetup::Config(config) => config,
        }
    }
}

impl From<String> for ProviderSetup {
    fn from(key: String) -> Self {
        ProviderSetup::ApiKey(key)
    }
}

impl From<&str> for ProviderSetup {
    fn from(key: &str) -> Self {
        ProviderSetup::ApiKey(key.to_string())
    }
}

impl From<AiProviderConfig> for ProviderSetup {
    fn from(config: AiProviderConfig) -> Self {
        ProviderSetup::Config(config)
    }
}
