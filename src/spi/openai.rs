//! OpenAI provider implementation

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{AiProvider, NLP_TEMPERATURE, SHORT_REPLY_MAX_TOKENS};
use crate::api::{
    AiError, AiResult, DailyFocus, EnergyLevel, NlpTaskAnalysis, Task, TaskBreakdown,
};
use crate::config::{AiConfigPatch, AiProviderConfig, ProviderKind};
use crate::core::{fallback, parse, prompt};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI provider implementation
#[derive(Debug)]
pub struct OpenAiProvider {
    client: Client,
    config: AiProviderConfig,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider with explicit configuration
    pub fn new(config: AiProviderConfig) -> Self {
        let client = build_client(config.timeout_ms);
        Self { client, config }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// One chat-completion round trip: system + user message in, reply
    /// text out.
    async fn generate(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> AiResult<String> {
        let request = OpenAiRequest {
            model: self.config.model.clone(),
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature,
            max_tokens,
            top_p: self.config.top_p,
            frequency_penalty: self.config.frequency_penalty,
            presence_penalty: self.config.presence_penalty,
        };

        let url = format!("{}/chat/completions", self.base_url());
        let mut builder = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(org) = &self.config.organization {
            builder = builder.header("OpenAI-Organization", org);
        }

        let response = builder
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_error(status, &body));
        }

        let reply: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| AiError::SerializationError(e.to_string()))?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
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
impl AiProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn config(&self) -> AiProviderConfig {
        self.config.clone()
    }

    fn update_config(&mut self, patch: AiConfigPatch) {
        let old_key = self.config.api_key.clone();
        let old_timeout = self.config.timeout_ms;
        self.config.apply(patch);
        if self.config.api_key != old_key || self.config.timeout_ms != old_timeout {
            self.client = build_client(self.config.timeout_ms);
        }
    }

    async fn breakdown_task(&self, title: &str, energy: EnergyLevel) -> TaskBreakdown {
        debug!("openai breakdown: model={}", self.config.model);
        match self.try_breakdown(title, energy).await {
            Ok(breakdown) => breakdown,
            Err(e) => {
                warn!("openai breakdown failed, using fallback: {}", e);
                fallback::breakdown_fallback()
            }
        }
    }

    async fn daily_focus(&self, tasks: &[Task], current_energy: EnergyLevel) -> DailyFocus {
        let open: Vec<Task> = tasks.iter().filter(|t| !t.completed).cloned().collect();
        if open.is_empty() {
            return fallback::empty_focus();
        }
        debug!("openai daily focus over {} open tasks", open.len());
        match self.try_daily_focus(&open, current_energy).await {
            Ok(focus) => focus,
            Err(e) => {
                warn!("openai daily focus failed, using local ranking: {}", e);
                fallback::daily_focus_fallback(&open)
            }
        }
    }

    async fn predict_emoji(&self, title: &str, description: Option<&str>) -> Vec<String> {
        match self.try_emoji(title, description).await {
            Ok(emojis) => emojis,
            Err(e) => {
                warn!("openai emoji prediction failed, using defaults: {}", e);
                fallback::default_emojis()
            }
        }
    }

    async fn analyze_task(&self, input: &str) -> NlpTaskAnalysis {
        match self.try_analyze(input).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("openai NLP analysis failed, using fallback: {}", e);
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
        401 => AiError::AuthenticationFailed(body.to_string()),
        429 => AiError::RateLimited {
            retry_after_ms: None,
        },
        400 => AiError::InvalidRequest(body.to_string()),
        500..=599 => AiError::ProviderError {
            provider: "openai".to_string(),
            message: body.to_string(),
        },
        _ => AiError::NetworkError(format!("HTTP {}: {}", status, body)),
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessageOut,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessageOut {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_with_unreachable_endpoint() -> OpenAiProvider {
        let mut config = AiProviderConfig::for_kind(ProviderKind::OpenAi, "");
        config.base_url = Some("http://127.0.0.1:9".to_string());
        config.timeout_ms = 2_000;
        OpenAiProvider::new(config)
    }

    #[test]
    fn request_carries_sampling_penalties() {
        let request = OpenAiRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![],
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 0.95,
            frequency_penalty: 0.1,
            presence_penalty: 0.2,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("frequency_penalty"));
        assert!(json.contains("presence_penalty"));
    }

    #[test]
    fn update_config_replaces_key() {
        let mut provider =
            OpenAiProvider::new(AiProviderConfig::for_kind(ProviderKind::OpenAi, "old"));
        provider.update_config(AiConfigPatch {
            api_key: Some("new".to_string()),
            ..Default::default()
        });
        assert_eq!(provider.config().api_key, "new");
        assert_eq!(provider.config().model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn analyze_falls_back_on_network_failure() {
        let provider = provider_with_unreachable_endpoint();
        let analysis = provider.analyze_task("buy milk tomorrow").await;
        assert_eq!(analysis, fallback::nlp_fallback("buy milk tomorrow"));
    }

    #[tokio::test]
    async fn all_completed_tasks_short_circuit() {
        let provider = provider_with_unreachable_endpoint();
        let tasks = vec![Task {
            id: 1,
            title: "done already".to_string(),
            description: None,
            priority: crate::api::Priority::High,
            energy_level: None,
            estimated_duration: None,
            completed: true,
            due_date: None,
        }];
        let focus = provider.daily_focus(&tasks, EnergyLevel::Low).await;
        assert!(focus.top_tasks.is_empty());
    }
}
