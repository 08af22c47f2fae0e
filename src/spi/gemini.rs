//! Google Gemini provider implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{AiProvider, NLP_TEMPERATURE, SHORT_REPLY_MAX_TOKENS};
use crate::api::{
    AiError, AiResult, DailyFocus, EnergyLevel, NlpTaskAnalysis, Task, TaskBreakdown,
};
use crate::config::{AiConfigPatch, AiProviderConfig, ProviderKind, SafetySetting};
use crate::core::{fallback, parse, prompt};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini provider implementation
#[derive(Debug)]
pub struct GeminiProvider {
    client: Client,
    config: AiProviderConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider with explicit configuration
    pub fn new(config: AiProviderConfig) -> Self {
        let client = build_client(config.timeout_ms);
        Self { client, config }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// One completion round trip: system + user prompt in, reply text out.
    async fn generate(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> AiResult<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: user.to_string(),
                }],
            }],
            system_instruction: Some(GeminiSystemInstruction {
                parts: vec![GeminiPart {
                    text: system.to_string(),
                }],
            }),
            generation_config: Some(GeminiGenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
                top_p: self.config.top_p,
            }),
            safety_settings: self
                .config
                .safety_settings
                .clone()
                .unwrap_or_else(SafetySetting::defaults),
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url(),
            self.config.model,
            self.config.api_key,
        );

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_error(status, &body));
        }

        let reply: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AiError::SerializationError(e.to_string()))?;

        reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AiError::SerializationError("empty completion".to_string()))
    }

    async fn try_breakdown(&self, title: &str, energy: EnergyLevel) -> AiResult<TaskBreakdown> {
        let text = self
            .generate(
                &prompt::breakdown_system_prompt(),
                &prompt::breakdown_user_prompt(title, energy),
                self.config.temperature,
                self.config.max_tokens,
            )
            .await?;
        parse::parse_breakdown(&text)
    }

    async fn try_daily_focus(
        &self,
        open_tasks: &[Task],
        energy: EnergyLevel,
    ) -> AiResult<DailyFocus> {
        let text = self
            .generate(
                &prompt::focus_system_prompt(),
                &prompt::focus_user_prompt(open_tasks, energy),
                self.config.temperature,
                self.config.max_tokens,
            )
            .await?;
        parse::parse_daily_focus(&text, open_tasks)
    }

    async fn try_emoji(&self, title: &str, description: Option<&str>) -> AiResult<Vec<String>> {
        let text = self
            .generate(
                &prompt::emoji_system_prompt(),
                &prompt::emoji_user_prompt(title, description),
                self.config.temperature,
                SHORT_REPLY_MAX_TOKENS,
            )
            .await?;
        parse::parse_emoji_list(&text)
    }

    async fn try_analyze(&self, input: &str) -> AiResult<NlpTaskAnalysis> {
        let today = chrono::Utc::now().date_naive();
        let text = self
            .generate(
                &prompt::nlp_system_prompt(today),
                &prompt::nlp_user_prompt(input),
                NLP_TEMPERATURE,
                SHORT_REPLY_MAX_TOKENS,
            )
            .await?;
        parse::parse_nlp_analysis(&text, input)
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn config(&self) -> AiProviderConfig {
        self.config.clone()
    }

    fn update_config(&mut self, patch: AiConfigPatch) {
        let old_key = self.config.api_key.clone();
        let old_timeout = self.config.timeout_ms;
        self.config.apply(patch);
        // the client is stateful for timeout; key lives in the URL but a
        // key change still gets a fresh client
        if self.config.api_key != old_key || self.config.timeout_ms != old_timeout {
            self.client = build_client(self.config.timeout_ms);
        }
    }

    async fn breakdown_task(&self, title: &str, energy: EnergyLevel) -> TaskBreakdown {
        debug!("gemini breakdown: model={}", self.config.model);
        match self.try_breakdown(title, energy).await {
            Ok(breakdown) => breakdown,
            Err(e) => {
                warn!("gemini breakdown failed, using fallback: {}", e);
                fallback::breakdown_fallback()
            }
        }
    }

    async fn daily_focus(&self, tasks: &[Task], current_energy: EnergyLevel) -> DailyFocus {
        let open: Vec<Task> = tasks.iter().filter(|t| !t.completed).cloned().collect();
        if open.is_empty() {
            return fallback::empty_focus();
        }
        debug!("gemini daily focus over {} open tasks", open.len());
        match self.try_daily_focus(&open, current_energy).await {
            Ok(focus) => focus,
            Err(e) => {
                warn!("gemini daily focus failed, using local ranking: {}", e);
                fallback::daily_focus_fallback(&open)
            }
        }
    }

    async fn predict_emoji(&self, title: &str, description: Option<&str>) -> Vec<String> {
        match self.try_emoji(title, description).await {
            Ok(emojis) => emojis,
            Err(e) => {
                warn!("gemini emoji prediction failed, using defaults: {}", e);
                fallback::default_emojis()
            }
        }
    }

    async fn analyze_task(&self, input: &str) -> NlpTaskAnalysis {
        match self.try_analyze(input).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("gemini NLP analysis failed, using fallback: {}", e);
                fallback::nlp_fallback(input)
            }
        }
    }
}

fn build_client(timeout_ms: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .expect("Failed to create HTTP client")
}

/// Map HTTP status to AiError
fn map_error(status: reqwest::StatusCode, body: &str) -> AiError {
    match status.as_u16() {
        401 | 403 => AiError::AuthenticationFailed(body.to_string()),
        429 => AiError::RateLimited {
            retry_after_ms: None,
        },
        400 => AiError::InvalidRequest(body.to_string()),
        500..=599 => AiError::ProviderError {
            provider: "gemini".to_string(),
            message: body.to_string(),
        },
        _ => AiError::NetworkError(format!("HTTP {}: {}", status, body)),
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}
