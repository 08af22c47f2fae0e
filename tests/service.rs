//! Integration tests for taskmind through the public surface.
//!
//! No real LLM is contacted: tests either use a local scripted provider,
//! an unreachable endpoint (to exercise the fallback path), or a one-shot
//! in-process HTTP server returning canned provider replies.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use taskmind::core::{fallback, parse, validate};
use taskmind::{
    AiConfigPatch, AiProvider, AiProviderConfig, AppAiConfig, DailyFocus, EnergyLevel,
    NlpTaskAnalysis, Priority, ProviderKind, Task, TaskAiService, TaskBreakdown,
};

// ── Helpers ──────────────────────────────────────────────────────────────

fn task(id: i64, priority: Priority, completed: bool) -> Task {
    Task {
        id,
        title: format!("task {}", id),
        description: None,
        priority,
        energy_level: None,
        estimated_duration: Some(20),
        completed,
        due_date: None,
    }
}

/// App config with fixed keys and no environment reads.
fn app_config(active: ProviderKind) -> AppAiConfig {
    AppAiConfig {
        provider: active,
        gemini: AiProviderConfig::for_kind(ProviderKind::Gemini, "gem-key"),
        openai: AiProviderConfig::for_kind(ProviderKind::OpenAi, "oai-key"),
    }
}

/// Scripted provider for service-level tests: counts operation calls.
#[derive(Debug)]
struct CountingProvider {
    kind: ProviderKind,
    config: AiProviderConfig,
    calls: Arc<AtomicU64>,
}

#[async_trait]
impl AiProvider for CountingProvider {
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
        self.config.apply(patch);
    }

    async fn breakdown_task(&self, _title: &str, _energy: EnergyLevel) -> TaskBreakdown {
        self.calls.fetch_add(1, Ordering::SeqCst);
        fallback::breakdown_fallback()
    }

    async fn daily_focus(&self, tasks: &[Task], _energy: EnergyLevel) -> DailyFocus {
        if tasks.iter().all(|t| t.completed) {
            return fallback::empty_focus();
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        fallback::daily_focus_fallback(tasks)
    }

    async fn predict_emoji(&self, _title: &str, _description: Option<&str>) -> Vec<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        fallback::default_emojis()
    }

    async fn analyze_task(&self, input: &str) -> NlpTaskAnalysis {
        self.calls.fetch_add(1, Ordering::SeqCst);
        fallback::nlp_fallback(input)
    }
}

/// Service whose factory counts provider constructions and whose provider
/// counts operation calls.
fn counting_service(
    active: ProviderKind,
) -> (TaskAiService, Arc<AtomicU64>, Arc<AtomicU64>) {
    let constructions = Arc::new(AtomicU64::new(0));
    let op_calls = Arc::new(AtomicU64::new(0));
    let factory_constructions = Arc::clone(&constructions);
    let factory_calls = Arc::clone(&op_calls);

    let service = TaskAiService::with_factory(
        app_config(active),
        None,
        Box::new(move |kind, config| {
            factory_constructions.fetch_add(1, Ordering::SeqCst);
            Box::new(CountingProvider {
                kind,
                config,
                calls: Arc::clone(&factory_calls),
            })
        }),
    );
    (service, constructions, op_calls)
}

/// Serve exactly one HTTP request with the given JSON body, returning the
/// base URL to point a provider at.
async fn serve_once(body: String) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        // read the full request so the client is not cut off mid-write
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let Ok(n) = socket.read(&mut buf).await else {
                return;
            };
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if let Some(headers_end) = find_headers_end(&request) {
                let headers = String::from_utf8_lossy(&request[..headers_end]);
                let content_length = headers
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if request.len() >= headers_end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body,
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{}", addr)
}

fn find_headers_end(request: &[u8]) -> Option<usize> {
    request.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Wrap a model reply text in a Gemini-shaped response body.
fn gemini_body(reply_text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": reply_text}]
            },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// Wrap a model reply text in an OpenAI-shaped response body.
fn openai_body(reply_text: &str) -> String {
    serde_json::json!({
        "choices": [{
            "message": {"role": "assistant", "content": reply_text}
        }]
    })
    .to_string()
}

// ── Validator properties ─────────────────────────────────────────────────

#[test]
fn priority_validator_is_total() {
    for raw in ["high", "HIGH", "medium", "low", "", "urgent", "42", "ħïgh"] {
        let priority = validate::validate_priority(raw);
        assert!(matches!(
            priority,
            Priority::High | Priority::Medium | Priority::Low
        ));
    }
    assert_eq!(validate::validate_priority("urgent"), Priority::Medium);
    assert_eq!(validate::validate_priority("HIGH"), Priority::High);
}

#[test]
fn energy_validator_maps_invalid_to_none() {
    assert_eq!(validate::validate_energy_level(None), None);
    assert_eq!(validate::validate_energy_level(Some("")), None);
    assert_eq!(validate::validate_energy_level(Some("turbo")), None);
    assert_eq!(
        validate::validate_energy_level(Some("Medium")),
        Some(EnergyLevel::Medium)
    );
}

// ── Emoji: always exactly five ───────────────────────────────────────────

#[test]
fn emoji_parse_always_yields_five() {
    let cases = [
        ("[]", 5),
        (r#"["🌊","🌊","🌊"]"#, 5),
        (r#"["a","b","c","d","e"]"#, 5),
        (r#"["a","b","c","d","e","f","g"]"#, 5),
    ];
    for (raw, expected) in cases {
        let emojis = parse::parse_emoji_list(raw).unwrap();
        assert_eq!(emojis.len(), expected, "input {}", raw);
    }
}

// ── Focus: short circuits and local ranking ──────────────────────────────

#[tokio::test]
async fn empty_task_list_makes_no_provider_call() {
    let (service, _, op_calls) = counting_service(ProviderKind::Gemini);
    let focus = service.daily_focus(&[], EnergyLevel::High).await;
    assert!(focus.top_tasks.is_empty());
    assert!(!focus.motivational_message.is_empty());
    assert_eq!(op_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn all_completed_tasks_make_no_provider_call() {
    let (service, _, op_calls) = counting_service(ProviderKind::Gemini);
    let tasks = vec![
        task(1, Priority::High, true),
        task(2, Priority::Low, true),
    ];
    let focus = service.daily_focus(&tasks, EnergyLevel::Medium).await;
    assert!(focus.top_tasks.is_empty());
    assert_eq!(op_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn focus_fallback_ranks_by_priority_with_stable_ties() {
    let tasks = vec![
        task(1, Priority::Low, false),
        task(2, Priority::High, false),
        task(3, Priority::Medium, false),
        task(4, Priority::High, false),
    ];
    let focus = fallback::daily_focus_fallback(&tasks);
    let ids: Vec<i64> = focus.top_tasks.iter().map(|s| s.task_id).collect();
    assert_eq!(ids, vec![2, 4, 3]);
    assert_eq!(focus.top_tasks.len(), 3);
}

// ── Fence stripping round trip ───────────────────────────────────────────

#[test]
fn fence_stripping_round_trips_valid_breakdown_json() {
    let json = serde_json::to_string(&fallback::breakdown_fallback()).unwrap();
    let fenced = format!("```json\n{}\n```", json);
    assert_eq!(parse::strip_code_fences(&json), json);
    assert_eq!(parse::strip_code_fences(&fenced), json);

    let from_plain: TaskBreakdown =
        serde_json::from_str(parse::strip_code_fences(&json)).unwrap();
    let from_fenced: TaskBreakdown =
        serde_json::from_str(parse::strip_code_fences(&fenced)).unwrap();
    assert_eq!(from_plain, from_fenced);
}

// ── Provider switching ───────────────────────────────────────────────────

#[tokio::test]
async fn repeated_switch_reconstructs_only_once() {
    let (service, constructions, _) = counting_service(ProviderKind::OpenAi);
    assert_eq!(constructions.load(Ordering::SeqCst), 1);

    service.switch_provider(ProviderKind::Gemini).await;
    service.switch_provider(ProviderKind::Gemini).await;
    assert_eq!(constructions.load(Ordering::SeqCst), 2);
    assert_eq!(service.active_provider().await, ProviderKind::Gemini);
}

#[tokio::test]
async fn per_provider_config_survives_switching() {
    let (service, _, _) = counting_service(ProviderKind::Gemini);
    service
        .update_provider_config(
            ProviderKind::OpenAi,
            AiConfigPatch {
                model: Some("gpt-4o".to_string()),
                ..Default::default()
            },
        )
        .await;

    service.switch_provider(ProviderKind::OpenAi).await;
    assert_eq!(service.get_config(None).await.model, "gpt-4o");

    // the gemini slot kept its own settings
    assert_eq!(
        service.get_config(Some(ProviderKind::Gemini)).await.model,
        "gemini-1.5-flash"
    );
}

// ── Factory errors ───────────────────────────────────────────────────────

#[test]
fn unknown_provider_tag_fails_fast() {
    let err = taskmind::create_provider_from_name("claude", "key").unwrap_err();
    assert!(err.to_string().contains("Unsupported AI provider"));
}

// ── End-to-end through a real provider and a canned HTTP reply ───────────

#[tokio::test(flavor = "multi_thread")]
async fn malformed_reply_resolves_to_exact_fallback_breakdown() {
    let base_url = serve_once(gemini_body("I had trouble with that request.")).await;

    let mut gemini = AiProviderConfig::for_kind(ProviderKind::Gemini, "test-key");
    gemini.base_url = Some(base_url);
    let app = AppAiConfig {
        provider: ProviderKind::Gemini,
        gemini,
        openai: AiProviderConfig::for_kind(ProviderKind::OpenAi, ""),
    };
    let service = TaskAiService::from_app_config(app, None);

    let breakdown = service
        .breakdown_task("Clean kitchen", EnergyLevel::Low)
        .await;
    assert_eq!(breakdown.priority, Priority::Medium);
    assert_eq!(breakdown.steps.len(), 3);
    assert!(breakdown.steps.iter().all(|s| s.estimated_duration == 5));
    assert_eq!(breakdown.estimated_duration, 15);
    assert_eq!(breakdown, fallback::breakdown_fallback());
}

#[tokio::test(flavor = "multi_thread")]
async fn fenced_reply_parses_and_clamps_through_gemini() {
    let reply = "```json\n{\"priority\":\"high\",\"estimatedDuration\":40,\
                 \"description\":\"Kitchen reset\",\"steps\":[\
                 {\"description\":\"Clear counters\",\"estimatedDuration\":10},\
                 {\"description\":\"Load dishwasher\",\"estimatedDuration\":0}]}\n```";
    let base_url = serve_once(gemini_body(reply)).await;

    let mut config = AiProviderConfig::for_kind(ProviderKind::Gemini, "test-key");
    config.base_url = Some(base_url);
    let provider = taskmind::GeminiProvider::new(config);

    let breakdown = provider.breakdown_task("Clean kitchen", EnergyLevel::High).await;
    assert_eq!(breakdown.priority, Priority::High);
    assert_eq!(breakdown.estimated_duration, 40);
    assert_eq!(breakdown.description, "Kitchen reset");
    assert_eq!(breakdown.steps[0].estimated_duration, 10);
    // zero-minute step clamped up
    assert_eq!(breakdown.steps[1].estimated_duration, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn openai_emoji_reply_is_padded_to_five() {
    let base_url = serve_once(openai_body(r#"["🍽️","🧼"]"#)).await;

    let mut config = AiProviderConfig::for_kind(ProviderKind::OpenAi, "test-key");
    config.base_url = Some(base_url);
    let provider = taskmind::OpenAiProvider::new(config);

    let emojis = provider.predict_emoji("Do the dishes", None).await;
    assert_eq!(emojis.len(), 5);
    assert_eq!(emojis[0], "🍽️");
    assert_eq!(emojis[2], "📝");
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_endpoint_never_panics_any_operation() {
    let mut config = AiProviderConfig::for_kind(ProviderKind::OpenAi, "test-key");
    config.base_url = Some("http://127.0.0.1:9".to_string());
    config.timeout_ms = 2_000;
    let app = AppAiConfig {
        provider: ProviderKind::OpenAi,
        gemini: AiProviderConfig::for_kind(ProviderKind::Gemini, ""),
        openai: config,
    };
    let service = TaskAiService::from_app_config(app, None);

    let breakdown = service.breakdown_task("Plan trip", EnergyLevel::High).await;
    assert_eq!(breakdown, fallback::breakdown_fallback());

    let tasks = vec![task(1, Priority::Low, false), task(2, Priority::High, false)];
    let focus = service.daily_focus(&tasks, EnergyLevel::Medium).await;
    let ids: Vec<i64> = focus.top_tasks.iter().map(|s| s.task_id).collect();
    assert_eq!(ids, vec![2, 1]);

    let emojis = service.predict_emoji("Plan trip", Some("pack bags")).await;
    assert_eq!(emojis, fallback::default_emojis());

    let analysis = service.analyze_task("book flights next week").await;
    assert_eq!(analysis, fallback::nlp_fallback("book flights next week"));
}
