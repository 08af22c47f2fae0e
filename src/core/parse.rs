//! Parsing of raw model replies into typed responses.
//!
//! Replies are expected to be pure JSON but frequently arrive wrapped in a
//! Markdown code fence; [`strip_code_fences`] removes it before parsing.
//! Enum and numeric fields inside an otherwise-parseable reply are
//! corrected by the validators rather than treated as failures; a reply
//! that is not valid JSON at all is a recoverable error the caller turns
//! into a fallback.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::{
    AiError, AiResult, DailyFocus, FocusSuggestion, NlpTaskAnalysis, Task, TaskBreakdown,
    TaskStep, DEFAULT_EMOJIS,
};
use crate::core::{fallback, validate};

/// Remove a wrapping Markdown code fence, optionally tagged `json`.
///
/// Unfenced input passes through unchanged apart from trimming.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStep {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    estimated_duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBreakdown {
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    estimated_duration: Option<f64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    steps: Vec<RawStep>,
}

/// Parse a task-breakdown reply. Every duration is clamped to >= 1.
pub fn parse_breakdown(raw: &str) -> AiResult<TaskBreakdown> {
    let parsed: RawBreakdown = serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| AiError::SerializationError(e.to_string()))?;

    let steps: Vec<TaskStep> = parsed
        .steps
        .into_iter()
        .map(|step| TaskStep {
            description: step.description.unwrap_or_default(),
            estimated_duration: validate::clamp_duration(step.estimated_duration.unwrap_or(1.0)),
        })
        .collect();

    // missing total: use the sum of the steps
    let total = parsed
        .estimated_duration
        .unwrap_or_else(|| steps.iter().map(|s| f64::from(s.estimated_duration)).sum());

    Ok(TaskBreakdown {
        priority: validate::validate_priority(parsed.priority.as_deref().unwrap_or("")),
        estimated_duration: validate::clamp_duration(total),
        description: parsed.description.unwrap_or_default(),
        steps,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestion {
    #[serde(default)]
    task_id: Option<i64>,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFocus {
    #[serde(default)]
    top_tasks: Vec<RawSuggestion>,
    #[serde(default)]
    motivational_message: Option<String>,
}

/// Parse a daily-focus reply against the open tasks the model was shown.
///
/// Suggestions referencing unknown task ids are dropped; at most 3 are
/// kept. A missing or empty motivational message fails the parse so the
/// caller falls back.
pub fn parse_daily_focus(raw: &str, tasks: &[Task]) -> AiResult<DailyFocus> {
    let parsed: RawFocus = serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| AiError::SerializationError(e.to_string()))?;

    let motivational_message = match parsed.motivational_message {
        Some(message) if !message.trim().is_empty() => message,
        _ => {
            return Err(AiError::SerializationError(
                "missing motivational message".to_string(),
            ))
        }
    };

    let top_tasks: Vec<FocusSuggestion> = parsed
        .top_tasks
        .into_iter()
        .filter_map(|suggestion| {
            let id = suggestion.task_id?;
            let task = tasks.iter().find(|t| t.id == id)?;
            let reason = match suggestion.reason {
                Some(reason) if !reason.trim().is_empty() => reason,
                _ => fallback::priority_reason(task.priority),
            };
            Some(FocusSuggestion {
                task_id: id,
                reason,
            })
        })
        .take(3)
        .collect();

    Ok(DailyFocus {
        top_tasks,
        motivational_message,
    })
}

/// Parse an emoji reply into exactly 5 entries: truncate extras, pad
/// shortfalls from [`DEFAULT_EMOJIS`] in array order.
pub fn parse_emoji_list(raw: &str) -> AiResult<Vec<String>> {
    let parsed: Vec<String> = serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| AiError::SerializationError(e.to_string()))?;

    let mut emojis: Vec<String> = parsed
        .into_iter()
        .filter(|e| !e.trim().is_empty())
        .take(5)
        .collect();
    for default in DEFAULT_EMOJIS {
        if emojis.len() >= 5 {
            break;
        }
        emojis.push(default.to_string());
    }
    Ok(emojis)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNlpAnalysis {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    energy_level: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    estimated_duration: Option<f64>,
}

/// Parse an NLP task-analysis reply. Every enum field goes through the
/// validators; the raw input supplies the title when the model omits one.
pub fn parse_nlp_analysis(raw: &str, input: &str) -> AiResult<NlpTaskAnalysis> {
    let parsed: RawNlpAnalysis = serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| AiError::SerializationError(e.to_string()))?;

    let title = match parsed.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => fallback::truncate_title(input),
    };

    let description = parsed.description.filter(|d| !d.trim().is_empty());

    let due_date = parsed
        .due_date
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());

    Ok(NlpTaskAnalysis {
        title,
        description,
        priority: validate::validate_priority(parsed.priority.as_deref().unwrap_or("")),
        energy_level: validate::validate_energy_level(parsed.energy_level.as_deref()),
        due_date,
        category: validate::validate_category(parsed.category.as_deref().unwrap_or("")),
        estimated_duration: parsed.estimated_duration.map(validate::clamp_duration),
    })
}
