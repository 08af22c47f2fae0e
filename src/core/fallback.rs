//! Deterministic offline responses used when a provider call or its JSON
//! parse fails. These must never fail themselves.

use crate::api::{
    Category, DailyFocus, EnergyLevel, FocusSuggestion, NlpTaskAnalysis, Priority, Task,
    TaskBreakdown, TaskStep, DEFAULT_EMOJIS,
};

const TITLE_MAX_CHARS: usize = 50;

/// Fixed 3-step breakdown: 5 minutes per step, 15 total, medium priority.
pub fn breakdown_fallback() -> TaskBreakdown {
    let steps = [
        "Get started with the task",
        "Continue working on it",
        "Complete and review",
    ];
    TaskBreakdown {
        priority: Priority::Medium,
        estimated_duration: 15,
        description: String::new(),
        steps: steps
            .iter()
            .map(|s| TaskStep {
                description: (*s).to_string(),
                estimated_duration: 5,
            })
            .collect(),
    }
}

/// Response for an empty or fully-completed task list. No sorting, no
/// external call.
pub fn empty_focus() -> DailyFocus {
    DailyFocus {
        top_tasks: Vec::new(),
        motivational_message: "No open tasks right now. A perfect moment to plan something new!"
            .to_string(),
    }
}

/// Locally ranked focus picks: stable sort by priority descending, top 3,
/// with a priority-based reason per task.
pub fn daily_focus_fallback(tasks: &[Task]) -> DailyFocus {
    if tasks.is_empty() {
        return empty_focus();
    }

    let mut ranked: Vec<&Task> = tasks.iter().collect();
    // stable sort keeps original order within equal priorities
    ranked.sort_by(|a, b| b.priority.weight().cmp(&a.priority.weight()));

    let top_tasks: Vec<FocusSuggestion> = ranked
        .into_iter()
        .take(3)
        .map(|task| FocusSuggestion {
            task_id: task.id,
            reason: priority_reason(task.priority),
        })
        .collect();

    let motivational_message = format!(
        "You have {} open task{}. Start with the first one and build momentum!",
        tasks.len(),
        if tasks.len() == 1 { "" } else { "s" },
    );

    DailyFocus {
        top_tasks,
        motivational_message,
    }
}

/// Canned reason used by the local ranking and by parsers when the model
/// omits one.
pub fn priority_reason(priority: Priority) -> String {
    format!("This task has {} priority.", priority.as_str())
}

/// Minimal interpretation of a free-text task: truncated title, medium
/// priority and energy, default category, 30 minutes.
pub fn nlp_fallback(input: &str) -> NlpTaskAnalysis {
    NlpTaskAnalysis {
        title: truncate_title(input),
        description: None,
        priority: Priority::Medium,
        energy_level: Some(EnergyLevel::Medium),
        due_date: None,
        category: Category::Other,
        estimated_duration: Some(30),
    }
}

/// The fixed default emoji set, as an owned list.
pub fn default_emojis() -> Vec<String> {
    DEFAULT_EMOJIS.iter().map(|e| (*e).to_string()).collect()
}

/// Truncate a raw input to a title-sized string, appending an ellipsis
/// when anything was cut. Operates on characters, not bytes.
pub fn truncate_title(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.chars().count() <= TITLE_MAX_CHARS {
        trimmed.to_string()
    } else {
        let mut title: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        title.push_str("...");
        title
    }
}
